use std::borrow::Borrow;

use crate::semirings::float_weight::Float;
use crate::semirings::{
    CompleteSemiring, DivideType, Semiring, SemiringProperties, StarSemiring,
    WeaklyDivisibleSemiring, WeightQuantize,
};

/// Real (probability) semiring: `(ℝ, +, ×, 0, 1)`.
#[derive(Debug, Clone, Copy)]
pub struct RealWeightGeneric<F: Float> {
    value: F,
}

/// Real semiring over `f32`.
pub type RealWeight = RealWeightGeneric<f32>;
/// Real semiring over `f64`.
pub type Real64Weight = RealWeightGeneric<f64>;

impl<F: Float> Semiring for RealWeightGeneric<F> {
    type Type = F;
    type ReverseWeight = RealWeightGeneric<F>;

    fn zero() -> Self {
        Self { value: F::zero() }
    }

    fn one() -> Self {
        Self { value: F::one() }
    }

    fn new(value: F) -> Self {
        Self { value }
    }

    fn plus_assign<P: Borrow<Self>>(&mut self, rhs: P) {
        let rhs = rhs.borrow();
        if !self.is_member() {
            return;
        }
        if !rhs.is_member() {
            self.value = F::nan();
        } else {
            self.value = self.value + rhs.value;
        }
    }

    fn times_assign<P: Borrow<Self>>(&mut self, rhs: P) {
        let rhs = rhs.borrow();
        if !self.is_member() {
            return;
        }
        if !rhs.is_member() {
            self.value = F::nan();
        } else {
            self.value = self.value * rhs.value;
        }
    }

    fn reverse(&self) -> Self::ReverseWeight {
        *self
    }

    fn value(&self) -> &F {
        &self.value
    }

    fn take_value(self) -> F {
        self.value
    }

    fn set_value(&mut self, value: F) {
        self.value = value;
    }

    fn approx_equal<P: Borrow<Self>>(&self, rhs: P, delta: f32) -> bool {
        self.value.approx_equal(rhs.borrow().value, delta)
    }

    fn is_member(&self) -> bool {
        !self.value.is_nan()
    }

    fn properties() -> SemiringProperties {
        SemiringProperties::SEMIRING | SemiringProperties::COMMUTATIVE
    }
}

impl<F: Float> WeaklyDivisibleSemiring for RealWeightGeneric<F> {
    fn divide_assign(&mut self, rhs: &Self, _divide_type: DivideType) {
        self.value = self.value / rhs.value;
    }
}

impl<F: Float> CompleteSemiring for RealWeightGeneric<F> {}

impl<F: Float> StarSemiring for RealWeightGeneric<F> {
    fn closure(&self) -> Self {
        // a* = 1 / (1 - a); converges for |a| < 1.
        if self.value.abs() < F::one() {
            Self::new(F::one() / (F::one() - self.value))
        } else {
            Self::new(F::nan())
        }
    }
}

impl<F: Float> WeightQuantize for RealWeightGeneric<F> {
    fn quantize_assign(&mut self, delta: f32) {
        self.value = self.value.quantize(delta);
    }
}

float_weight_impls!(RealWeightGeneric<F>);
float_weight_serializable!(RealWeightGeneric<F>, "real");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_ring_ops() {
        let a = RealWeight::new(0.25);
        let b = RealWeight::new(0.5);
        assert_eq!(a.plus(b), RealWeight::new(0.75));
        assert_eq!(a.times(b), RealWeight::new(0.125));
        assert!(a.times(RealWeight::zero()).is_zero());
        assert_eq!(a.times(RealWeight::one()), a);
    }

    #[test]
    fn test_real_closure() {
        let a = RealWeight::new(0.5);
        assert!(a.closure().approx_equal(RealWeight::new(2.0), 1e-6));
        assert!(!RealWeight::new(1.5).closure().is_member());
    }
}
