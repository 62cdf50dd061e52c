use crate::semirings::Semiring;
use crate::StateId;

/// One entry of a weighted subset: an input state paired with the residual
/// weight left to spend on its continuations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeterminizeElement<W: Semiring> {
    pub state: StateId,
    pub weight: W,
}

impl<W: Semiring> DeterminizeElement<W> {
    pub fn new(state: StateId, weight: W) -> Self {
        Self { state, weight }
    }
}

/// A determinization state: a set of `(state, residual)` pairs, kept
/// sorted by state id so equal subsets have equal representations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WeightedSubset<W: Semiring> {
    elements: Vec<DeterminizeElement<W>>,
}

impl<W: Semiring> WeightedSubset<W> {
    /// Builds a subset, sorting by state and `Plus`-merging duplicates.
    pub fn from_elements(mut elements: Vec<DeterminizeElement<W>>) -> Self {
        elements.sort_by_key(|e| e.state);
        let mut merged: Vec<DeterminizeElement<W>> = Vec::with_capacity(elements.len());
        for element in elements {
            match merged.last_mut() {
                Some(last) if last.state == element.state => {
                    last.weight.plus_assign(&element.weight);
                }
                _ => merged.push(element),
            }
        }
        Self { elements: merged }
    }

    pub fn singleton(state: StateId, weight: W) -> Self {
        Self {
            elements: vec![DeterminizeElement::new(state, weight)],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeterminizeElement<W>> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semirings::TropicalWeight;

    #[test]
    fn test_subset_canonical_form() {
        let a = WeightedSubset::from_elements(vec![
            DeterminizeElement::new(2, TropicalWeight::new(1.0)),
            DeterminizeElement::new(1, TropicalWeight::new(2.0)),
        ]);
        let b = WeightedSubset::from_elements(vec![
            DeterminizeElement::new(1, TropicalWeight::new(2.0)),
            DeterminizeElement::new(2, TropicalWeight::new(1.0)),
        ]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_subset_merges_same_state() {
        let a = WeightedSubset::from_elements(vec![
            DeterminizeElement::new(1, TropicalWeight::new(3.0)),
            DeterminizeElement::new(1, TropicalWeight::new(1.0)),
        ]);
        assert_eq!(a.len(), 1);
        assert_eq!(
            a.iter().next().unwrap().weight,
            TropicalWeight::new(1.0)
        );
    }
}
