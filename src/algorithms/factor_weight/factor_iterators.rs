use crate::semirings::{
    GallicWeight, Semiring, StringWeightRestrict, StringWeightVariant, WeaklyDivisibleSemiring,
    WeightQuantize,
};

/// Enumerates factorizations `(p, q)` of a weight with `w = p ⊗ q`. An
/// iterator that is `done` from the start marks an atomic weight that
/// factoring leaves alone.
pub trait FactorIterator<W: Semiring>: Iterator<Item = (W, W)> {
    fn new(weight: W) -> Self;

    /// True when the weight admits no further factoring.
    fn done(&self) -> bool;
}

/// Splits a restricted string weight into its first label and the rest.
#[derive(Debug)]
pub struct StringFactor {
    weight: StringWeightRestrict,
    emitted: bool,
}

impl FactorIterator<StringWeightRestrict> for StringFactor {
    fn new(weight: StringWeightRestrict) -> Self {
        Self {
            weight,
            emitted: false,
        }
    }

    fn done(&self) -> bool {
        self.emitted || self.weight.len_labels() <= 1
    }
}

impl Iterator for StringFactor {
    type Item = (StringWeightRestrict, StringWeightRestrict);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done() {
            return None;
        }
        self.emitted = true;
        match self.weight.value() {
            StringWeightVariant::Labels(labels) => Some((
                StringWeightRestrict::from_label(labels[0]),
                StringWeightRestrict::from_labels(labels[1..].to_vec()),
            )),
            StringWeightVariant::Infinity => None,
        }
    }
}

/// Splits a Gallic weight into a single-label head (carrying the base
/// weight) and the string remainder.
#[derive(Debug)]
pub struct GallicFactor<W: Semiring> {
    weight: GallicWeight<W>,
    emitted: bool,
}

impl<W: WeaklyDivisibleSemiring + WeightQuantize> FactorIterator<GallicWeight<W>>
    for GallicFactor<W>
{
    fn new(weight: GallicWeight<W>) -> Self {
        Self {
            weight,
            emitted: false,
        }
    }

    fn done(&self) -> bool {
        self.emitted || self.weight.labels().len() <= 1
    }
}

impl<W: WeaklyDivisibleSemiring + WeightQuantize> Iterator for GallicFactor<W> {
    type Item = (GallicWeight<W>, GallicWeight<W>);

    fn next(&mut self) -> Option<Self::Item> {
        if FactorIterator::done(self) {
            return None;
        }
        self.emitted = true;
        let labels = self.weight.labels();
        let head = GallicWeight::from_parts(
            StringWeightRestrict::from_label(labels[0]),
            self.weight.weight().clone(),
        );
        let rest = GallicWeight::from_parts(
            StringWeightRestrict::from_labels(labels[1..].to_vec()),
            W::one(),
        );
        Some((head, rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semirings::TropicalWeight;

    #[test]
    fn test_string_factor() {
        let w = StringWeightRestrict::from_labels(vec![1, 2, 3]);
        let mut it = StringFactor::new(w);
        assert!(!FactorIterator::done(&it));
        let (p, q) = it.next().unwrap();
        assert_eq!(p, StringWeightRestrict::from_label(1));
        assert_eq!(q, StringWeightRestrict::from_labels(vec![2, 3]));
        assert!(it.next().is_none());
    }

    #[test]
    fn test_atomic_is_done() {
        let it = StringFactor::new(StringWeightRestrict::from_label(1));
        assert!(FactorIterator::done(&it));
        let it = StringFactor::new(StringWeightRestrict::one());
        assert!(FactorIterator::done(&it));
    }

    #[test]
    fn test_gallic_factor_carries_weight_on_head() {
        let w = GallicWeight::from_parts(
            StringWeightRestrict::from_labels(vec![4, 5]),
            TropicalWeight::new(2.0),
        );
        let mut it = GallicFactor::new(w);
        let (p, q) = it.next().unwrap();
        assert_eq!(p.labels(), &[4]);
        assert_eq!(p.weight(), &TropicalWeight::new(2.0));
        assert_eq!(q.labels(), &[5]);
        assert_eq!(q.weight(), &TropicalWeight::one());
    }
}
