use std::borrow::Borrow;

use crate::semirings::float_weight::Float;
use crate::semirings::{
    DivideType, Semiring, SemiringProperties, WeaklyDivisibleSemiring, WeightQuantize,
};

/// Min-max semiring: `(ℝ ∪ {±∞}, min, max, +∞, -∞)`.
#[derive(Debug, Clone, Copy)]
pub struct MinMaxWeight {
    value: f32,
}

impl Semiring for MinMaxWeight {
    type Type = f32;
    type ReverseWeight = MinMaxWeight;

    fn zero() -> Self {
        Self {
            value: f32::INFINITY,
        }
    }

    fn one() -> Self {
        Self {
            value: f32::NEG_INFINITY,
        }
    }

    fn new(value: f32) -> Self {
        Self { value }
    }

    fn plus_assign<P: Borrow<Self>>(&mut self, rhs: P) {
        let rhs = rhs.borrow();
        if !self.is_member() {
            return;
        }
        if !rhs.is_member() {
            self.value = f32::NAN;
        } else if rhs.value < self.value {
            self.value = rhs.value;
        }
    }

    fn times_assign<P: Borrow<Self>>(&mut self, rhs: P) {
        let rhs = rhs.borrow();
        if !self.is_member() {
            return;
        }
        if !rhs.is_member() {
            self.value = f32::NAN;
        } else if rhs.value > self.value {
            self.value = rhs.value;
        }
    }

    fn reverse(&self) -> Self::ReverseWeight {
        *self
    }

    fn value(&self) -> &f32 {
        &self.value
    }

    fn take_value(self) -> f32 {
        self.value
    }

    fn set_value(&mut self, value: f32) {
        self.value = value;
    }

    fn approx_equal<P: Borrow<Self>>(&self, rhs: P, delta: f32) -> bool {
        self.value.approx_equal(rhs.borrow().value, delta)
    }

    fn is_member(&self) -> bool {
        !self.value.is_nan()
    }

    fn properties() -> SemiringProperties {
        SemiringProperties::SEMIRING
            | SemiringProperties::COMMUTATIVE
            | SemiringProperties::IDEMPOTENT
            | SemiringProperties::PATH
    }
}

impl WeaklyDivisibleSemiring for MinMaxWeight {
    fn divide_assign(&mut self, rhs: &Self, _divide_type: DivideType) {
        // x = max(rhs, z) is solvable only when x >= rhs; z = x then works.
        if !(self.value >= rhs.value) {
            self.value = f32::NAN;
        }
    }
}

impl WeightQuantize for MinMaxWeight {
    fn quantize_assign(&mut self, delta: f32) {
        self.value = self.value.quantize(delta);
    }
}

float_weight_impls!(MinMaxWeight);
float_weight_serializable!(MinMaxWeight, "minmax");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minmax_ops() {
        let a = MinMaxWeight::new(1.0);
        let b = MinMaxWeight::new(2.0);
        assert_eq!(a.plus(b), a);
        assert_eq!(a.times(b), b);
        assert!(a.times(MinMaxWeight::zero()).is_zero());
        assert_eq!(a.times(MinMaxWeight::one()), a);
    }

    #[test]
    fn test_minmax_divide() {
        let a = MinMaxWeight::new(2.0);
        let b = MinMaxWeight::new(1.0);
        assert_eq!(a.divide(&b, DivideType::DivideAny), a);
        assert!(!b.divide(&a, DivideType::DivideAny).is_member());
    }
}
