use std::borrow::Borrow;
use std::fmt;

use crate::config::core_config;
use crate::semirings::{
    DivideType, Semiring, SemiringProperties, WeaklyDivisibleSemiring, WeightQuantize,
};

/// Sparse-index Cartesian power of a semiring.
///
/// A default component value stands in for every index not listed
/// explicitly; `Zero` is the all-default-`Zero` element and `One` the
/// all-default-`One` element. Entries equal to the default are dropped so
/// that equal values have a unique representation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Hash)]
pub struct SparsePowerWeight<W> {
    default: W,
    entries: Vec<(usize, W)>,
}

impl<W: Semiring> SparsePowerWeight<W> {
    pub fn from_entries(default: W, mut entries: Vec<(usize, W)>) -> Self {
        entries.sort_by_key(|(i, _)| *i);
        entries.dedup_by_key(|(i, _)| *i);
        entries.retain(|(_, w)| w != &default);
        Self { default, entries }
    }

    pub fn component(&self, index: usize) -> &W {
        self.entries
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, w)| w)
            .unwrap_or(&self.default)
    }

    pub fn default_component(&self) -> &W {
        &self.default
    }

    pub fn entries(&self) -> &[(usize, W)] {
        &self.entries
    }

    /// Applies `op` pointwise over the union of explicit indices, using
    /// each side's default elsewhere, and renormalizes.
    fn zip_with<F: Fn(&W, &W) -> W>(&self, rhs: &Self, op: F) -> Self {
        let mut entries = Vec::with_capacity(self.entries.len() + rhs.entries.len());
        let (mut i, mut j) = (0, 0);
        while i < self.entries.len() || j < rhs.entries.len() {
            let li = self.entries.get(i).map(|(k, _)| *k);
            let rj = rhs.entries.get(j).map(|(k, _)| *k);
            match (li, rj) {
                (Some(l), Some(r)) if l == r => {
                    entries.push((l, op(&self.entries[i].1, &rhs.entries[j].1)));
                    i += 1;
                    j += 1;
                }
                (Some(l), Some(r)) if l < r => {
                    entries.push((l, op(&self.entries[i].1, &rhs.default)));
                    i += 1;
                }
                (Some(_), Some(r)) => {
                    entries.push((r, op(&self.default, &rhs.entries[j].1)));
                    j += 1;
                }
                (Some(l), None) => {
                    entries.push((l, op(&self.entries[i].1, &rhs.default)));
                    i += 1;
                }
                (None, Some(r)) => {
                    entries.push((r, op(&self.default, &rhs.entries[j].1)));
                    j += 1;
                }
                (None, None) => unreachable!(),
            }
        }
        Self::from_entries(op(&self.default, &rhs.default), entries)
    }
}

impl<W: Semiring> Semiring for SparsePowerWeight<W> {
    type Type = Vec<(usize, W)>;
    type ReverseWeight = SparsePowerWeight<W::ReverseWeight>;

    fn zero() -> Self {
        Self {
            default: W::zero(),
            entries: vec![],
        }
    }

    fn one() -> Self {
        Self {
            default: W::one(),
            entries: vec![],
        }
    }

    fn new(value: Vec<(usize, W)>) -> Self {
        Self::from_entries(W::one(), value)
    }

    fn plus_assign<P: Borrow<Self>>(&mut self, rhs: P) {
        *self = self.zip_with(rhs.borrow(), |a, b| a.plus(b));
    }

    fn times_assign<P: Borrow<Self>>(&mut self, rhs: P) {
        *self = self.zip_with(rhs.borrow(), |a, b| a.times(b));
    }

    fn reverse(&self) -> Self::ReverseWeight {
        SparsePowerWeight {
            default: self.default.reverse(),
            entries: self
                .entries
                .iter()
                .map(|(i, w)| (*i, w.reverse()))
                .collect(),
        }
    }

    fn value(&self) -> &Vec<(usize, W)> {
        &self.entries
    }

    fn take_value(self) -> Vec<(usize, W)> {
        self.entries
    }

    fn set_value(&mut self, value: Vec<(usize, W)>) {
        *self = Self::from_entries(self.default.clone(), value);
    }

    fn approx_equal<P: Borrow<Self>>(&self, rhs: P, delta: f32) -> bool {
        let rhs = rhs.borrow();
        self.zip_with(rhs, |a, b| {
            if a.approx_equal(b, delta) {
                W::one()
            } else {
                W::zero()
            }
        })
        .entries
        .is_empty()
            && self.default.approx_equal(&rhs.default, delta)
    }

    fn is_member(&self) -> bool {
        self.default.is_member() && self.entries.iter().all(|(_, w)| w.is_member())
    }

    fn properties() -> SemiringProperties {
        W::properties()
            & (SemiringProperties::SEMIRING
                | SemiringProperties::COMMUTATIVE
                | SemiringProperties::IDEMPOTENT)
    }
}

impl<W: WeaklyDivisibleSemiring> WeaklyDivisibleSemiring for SparsePowerWeight<W> {
    fn divide_assign(&mut self, rhs: &Self, divide_type: DivideType) {
        *self = self.zip_with(rhs, |a, b| a.divide(b, divide_type));
    }
}

impl<W: WeightQuantize> WeightQuantize for SparsePowerWeight<W> {
    fn quantize_assign(&mut self, delta: f32) {
        let default = self.default.quantize(delta);
        let entries = self
            .entries
            .iter()
            .map(|(i, w)| (*i, w.quantize(delta)))
            .collect();
        *self = Self::from_entries(default, entries);
    }
}

impl<W: Semiring> fmt::Display for SparsePowerWeight<W> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sep = &core_config().pair_separator;
        for (i, (index, w)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", sep)?;
            }
            write!(f, "{}:{}", index, w)?;
        }
        Ok(())
    }
}

impl<W: Semiring> Default for SparsePowerWeight<W> {
    fn default() -> Self {
        Self::one()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semirings::TropicalWeight;

    type SP = SparsePowerWeight<TropicalWeight>;

    #[test]
    fn test_sparse_power_identities() {
        let a = SP::new(vec![(1, TropicalWeight::new(3.0)), (4, TropicalWeight::new(1.0))]);
        assert_eq!(a.times(SP::one()), a);
        assert!(a.times(SP::zero()).is_zero());
        assert_eq!(a.plus(SP::zero()), a);
    }

    #[test]
    fn test_sparse_power_normalized() {
        // An entry equal to the default disappears.
        let a = SP::new(vec![(2, TropicalWeight::one())]);
        assert_eq!(a, SP::one());
    }
}
