use std::borrow::Borrow;
use std::fmt;

use log::debug;

use crate::config::core_config;
use crate::semirings::{
    DivideType, Semiring, SemiringProperties, StringWeightRestrict, StringWeightVariant,
    WeaklyDivisibleSemiring, WeightQuantize,
};
use crate::Label;

/// Gallic semiring: a restricted string weight paired with a base weight.
///
/// Encodes output labels as part of the weight so that transducer
/// determinization and label pushing reduce to the acceptor case. `Plus`
/// requires equal string components; combining unequal strings (a
/// non-functional input) produces a non-member value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Hash)]
pub struct GallicWeight<W> {
    value: (StringWeightRestrict, W),
}

impl<W: Semiring> GallicWeight<W> {
    pub fn from_parts(string: StringWeightRestrict, weight: W) -> Self {
        Self {
            value: (string, weight),
        }
    }

    /// Gallic encoding of a single output label with a weight; an epsilon
    /// output contributes an empty string.
    pub fn from_label_weight(label: Label, weight: W) -> Self {
        let string = if label == crate::EPS_LABEL {
            StringWeightRestrict::one()
        } else {
            StringWeightRestrict::from_label(label)
        };
        Self::from_parts(string, weight)
    }

    pub fn string(&self) -> &StringWeightRestrict {
        &self.value.0
    }

    pub fn weight(&self) -> &W {
        &self.value.1
    }

    fn non_member() -> Self {
        // An infinite string over a non-Zero weight is outside the domain.
        Self::from_parts(StringWeightRestrict::zero(), W::one())
    }
}

impl<W: Semiring> Semiring for GallicWeight<W> {
    type Type = (StringWeightRestrict, W);
    type ReverseWeight = GallicWeight<W::ReverseWeight>;

    fn zero() -> Self {
        Self {
            value: (StringWeightRestrict::zero(), W::zero()),
        }
    }

    fn one() -> Self {
        Self {
            value: (StringWeightRestrict::one(), W::one()),
        }
    }

    fn new(value: (StringWeightRestrict, W)) -> Self {
        Self { value }
    }

    fn plus_assign<P: Borrow<Self>>(&mut self, rhs: P) {
        let rhs = rhs.borrow();
        if rhs.is_zero() {
            return;
        }
        if self.is_zero() {
            *self = rhs.clone();
            return;
        }
        if self.value.0 != rhs.value.0 {
            debug!("gallic plus on unequal strings: non-functional input");
            *self = Self::non_member();
            return;
        }
        self.value.1.plus_assign(&rhs.value.1);
    }

    fn times_assign<P: Borrow<Self>>(&mut self, rhs: P) {
        let rhs = rhs.borrow();
        self.value.0.times_assign(&rhs.value.0);
        self.value.1.times_assign(&rhs.value.1);
    }

    fn reverse(&self) -> Self::ReverseWeight {
        GallicWeight {
            value: (self.value.0.reverse(), self.value.1.reverse()),
        }
    }

    fn value(&self) -> &(StringWeightRestrict, W) {
        &self.value
    }

    fn take_value(self) -> (StringWeightRestrict, W) {
        self.value
    }

    fn set_value(&mut self, value: (StringWeightRestrict, W)) {
        self.value = value;
    }

    fn approx_equal<P: Borrow<Self>>(&self, rhs: P, delta: f32) -> bool {
        let rhs = rhs.borrow();
        self.value.0 == rhs.value.0 && self.value.1.approx_equal(&rhs.value.1, delta)
    }

    fn is_member(&self) -> bool {
        if !self.value.1.is_member() {
            return false;
        }
        // The infinite string is only valid over a Zero base weight.
        !(self.value.0.is_zero() && !self.value.1.is_zero())
    }

    fn properties() -> SemiringProperties {
        StringWeightRestrict::properties()
            & W::properties()
            & (SemiringProperties::SEMIRING | SemiringProperties::IDEMPOTENT)
    }
}

impl<W: WeaklyDivisibleSemiring> WeaklyDivisibleSemiring for GallicWeight<W> {
    fn divide_assign(&mut self, rhs: &Self, divide_type: DivideType) {
        self.value.0.divide_assign(&rhs.value.0, divide_type);
        self.value.1.divide_assign(&rhs.value.1, divide_type);
    }
}

impl<W: WeightQuantize> WeightQuantize for GallicWeight<W> {
    fn quantize_assign(&mut self, delta: f32) {
        self.value.1.quantize_assign(delta);
    }
}

impl<W: Semiring> fmt::Display for GallicWeight<W> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.value.0,
            core_config().pair_separator,
            self.value.1
        )
    }
}

impl<W: Semiring> Default for GallicWeight<W> {
    fn default() -> Self {
        Self::one()
    }
}

impl<W: Semiring> GallicWeight<W> {
    /// Labels of the string component, empty for the infinite string.
    pub fn labels(&self) -> &[Label] {
        match self.value.0.value() {
            StringWeightVariant::Infinity => &[],
            StringWeightVariant::Labels(l) => l.as_slice(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semirings::TropicalWeight;

    type G = GallicWeight<TropicalWeight>;

    #[test]
    fn test_gallic_times_concatenates() {
        let a = G::from_label_weight(1, TropicalWeight::new(1.0));
        let b = G::from_label_weight(2, TropicalWeight::new(2.0));
        let p = a.times(&b);
        assert_eq!(p.labels(), &[1, 2]);
        assert_eq!(p.weight(), &TropicalWeight::new(3.0));
        assert!(a.times(G::zero()).is_zero());
    }

    #[test]
    fn test_gallic_plus_equal_strings() {
        let a = G::from_label_weight(1, TropicalWeight::new(2.0));
        let b = G::from_label_weight(1, TropicalWeight::new(1.0));
        assert_eq!(a.plus(&b), b);
        assert_eq!(a.plus(G::zero()), a);
    }

    #[test]
    fn test_gallic_plus_unequal_strings_non_member() {
        let a = G::from_label_weight(1, TropicalWeight::new(2.0));
        let b = G::from_label_weight(2, TropicalWeight::new(1.0));
        assert!(!a.plus(&b).is_member());
    }

    #[test]
    fn test_gallic_divide() {
        let a = G::from_label_weight(1, TropicalWeight::new(1.0));
        let b = G::from_label_weight(2, TropicalWeight::new(2.0));
        let p = a.times(&b);
        let q = p.divide(&a, DivideType::DivideLeft);
        assert_eq!(q.labels(), &[2]);
        assert_eq!(q.weight(), &TropicalWeight::new(2.0));
    }
}
