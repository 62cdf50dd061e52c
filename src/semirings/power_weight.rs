use std::borrow::Borrow;
use std::fmt;

use crate::config::core_config;
use crate::semirings::{
    DivideType, Semiring, SemiringProperties, WeaklyDivisibleSemiring, WeightQuantize,
};

/// Fixed-arity Cartesian power of a semiring; all operations apply
/// component-wise.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Hash)]
pub struct PowerWeight<W, const N: usize> {
    value: [W; N],
}

impl<W: Semiring, const N: usize> PowerWeight<W, N> {
    pub fn component(&self, i: usize) -> &W {
        &self.value[i]
    }

    pub fn set_component(&mut self, i: usize, w: W) {
        self.value[i] = w;
    }
}

impl<W: Semiring, const N: usize> Semiring for PowerWeight<W, N> {
    type Type = [W; N];
    type ReverseWeight = PowerWeight<W::ReverseWeight, N>;

    fn zero() -> Self {
        Self {
            value: std::array::from_fn(|_| W::zero()),
        }
    }

    fn one() -> Self {
        Self {
            value: std::array::from_fn(|_| W::one()),
        }
    }

    fn new(value: [W; N]) -> Self {
        Self { value }
    }

    fn plus_assign<P: Borrow<Self>>(&mut self, rhs: P) {
        let rhs = rhs.borrow();
        for (w, r) in self.value.iter_mut().zip(rhs.value.iter()) {
            w.plus_assign(r);
        }
    }

    fn times_assign<P: Borrow<Self>>(&mut self, rhs: P) {
        let rhs = rhs.borrow();
        for (w, r) in self.value.iter_mut().zip(rhs.value.iter()) {
            w.times_assign(r);
        }
    }

    fn reverse(&self) -> Self::ReverseWeight {
        PowerWeight {
            value: std::array::from_fn(|i| self.value[i].reverse()),
        }
    }

    fn value(&self) -> &[W; N] {
        &self.value
    }

    fn take_value(self) -> [W; N] {
        self.value
    }

    fn set_value(&mut self, value: [W; N]) {
        self.value = value;
    }

    fn approx_equal<P: Borrow<Self>>(&self, rhs: P, delta: f32) -> bool {
        let rhs = rhs.borrow();
        self.value
            .iter()
            .zip(rhs.value.iter())
            .all(|(a, b)| a.approx_equal(b, delta))
    }

    fn is_member(&self) -> bool {
        self.value.iter().all(|w| w.is_member())
    }

    fn properties() -> SemiringProperties {
        W::properties()
            & (SemiringProperties::SEMIRING
                | SemiringProperties::COMMUTATIVE
                | SemiringProperties::IDEMPOTENT)
    }
}

impl<W, const N: usize> WeaklyDivisibleSemiring for PowerWeight<W, N>
where
    W: WeaklyDivisibleSemiring,
{
    fn divide_assign(&mut self, rhs: &Self, divide_type: DivideType) {
        for (w, r) in self.value.iter_mut().zip(rhs.value.iter()) {
            w.divide_assign(r, divide_type);
        }
    }
}

impl<W, const N: usize> WeightQuantize for PowerWeight<W, N>
where
    W: WeightQuantize,
{
    fn quantize_assign(&mut self, delta: f32) {
        for w in self.value.iter_mut() {
            w.quantize_assign(delta);
        }
    }
}

impl<W: Semiring, const N: usize> fmt::Display for PowerWeight<W, N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sep = &core_config().pair_separator;
        for (i, w) in self.value.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", sep)?;
            }
            write!(f, "{}", w)?;
        }
        Ok(())
    }
}

impl<W: Semiring, const N: usize> Default for PowerWeight<W, N> {
    fn default() -> Self {
        Self::one()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semirings::TropicalWeight;

    type P3 = PowerWeight<TropicalWeight, 3>;

    #[test]
    fn test_power_componentwise() {
        let a = P3::new([
            TropicalWeight::new(1.0),
            TropicalWeight::new(2.0),
            TropicalWeight::new(3.0),
        ]);
        let one = P3::one();
        assert_eq!(a.times(&one), a);
        assert!(a.times(P3::zero()).is_zero());
        assert_eq!(a.plus(P3::zero()), a);
    }
}
