use std::borrow::Borrow;

use crate::semirings::float_weight::{log_plus, Float};
use crate::semirings::{
    CompleteSemiring, DivideType, Semiring, SemiringProperties, StarSemiring,
    WeaklyDivisibleSemiring, WeightQuantize,
};

/// Log semiring: `(ℝ ∪ {+∞}, ⊕_log, +, +∞, 0)` where
/// `a ⊕_log b = -log(e⁻ᵃ + e⁻ᵇ)`.
///
/// Weights are negated log-probabilities; `Plus` accumulates probability
/// mass instead of selecting a best operand.
#[derive(Debug, Clone, Copy)]
pub struct LogWeightGeneric<F: Float> {
    value: F,
}

/// Log semiring over `f32`.
pub type LogWeight = LogWeightGeneric<f32>;
/// Log semiring over `f64`.
pub type Log64Weight = LogWeightGeneric<f64>;

impl<F: Float> Semiring for LogWeightGeneric<F> {
    type Type = F;
    type ReverseWeight = LogWeightGeneric<F>;

    fn zero() -> Self {
        Self {
            value: F::infinity(),
        }
    }

    fn one() -> Self {
        Self { value: F::zero() }
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
            self.value = log_plus(self.value, rhs.value);
        }
    }

    fn times_assign<P: Borrow<Self>>(&mut self, rhs: P) {
        let rhs = rhs.borrow();
        if !self.is_member() {
            return;
        }
        if !rhs.is_member() {
            self.value = F::nan();
        } else if self.value == F::infinity() || rhs.value == F::infinity() {
            self.value = F::infinity();
        } else {
            self.value = self.value + rhs.value;
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
        !self.value.is_nan() && self.value != F::neg_infinity()
    }

    fn properties() -> SemiringProperties {
        SemiringProperties::SEMIRING | SemiringProperties::COMMUTATIVE
    }
}

impl<F: Float> WeaklyDivisibleSemiring for LogWeightGeneric<F> {
    fn divide_assign(&mut self, rhs: &Self, _divide_type: DivideType) {
        if rhs.value == F::infinity() {
            self.value = F::nan();
        } else if self.value != F::infinity() {
            self.value = self.value - rhs.value;
        }
    }
}

impl<F: Float> CompleteSemiring for LogWeightGeneric<F> {}

impl<F: Float> StarSemiring for LogWeightGeneric<F> {
    fn closure(&self) -> Self {
        // a* = -log(1 / (1 - e^{-a})) = log(1 - e^{-a}); converges for
        // a > 0 only.
        if self.value > F::zero() {
            Self::new((-self.value).exp().neg().ln_1p())
        } else {
            Self::new(F::nan())
        }
    }
}

impl<F: Float> WeightQuantize for LogWeightGeneric<F> {
    fn quantize_assign(&mut self, delta: f32) {
        self.value = self.value.quantize(delta);
    }
}

float_weight_impls!(LogWeightGeneric<F>);
float_weight_serializable!(LogWeightGeneric<F>, "log");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_plus_accumulates() {
        let a = LogWeight::new(0.0);
        let sum = a.plus(a);
        assert!(sum.approx_equal(LogWeight::new(-(2.0f32).ln()), 1e-5));
        assert_eq!(a.plus(LogWeight::zero()), a);
    }

    #[test]
    fn test_log_times() {
        let a = LogWeight::new(1.0);
        let b = LogWeight::new(2.0);
        assert_eq!(a.times(b), LogWeight::new(3.0));
        assert!(a.times(LogWeight::zero()).is_zero());
    }

    #[test]
    fn test_log64_weight_type() {
        use crate::semirings::SerializableSemiring;
        assert_eq!(LogWeight::weight_type(), "log");
        assert_eq!(Log64Weight::weight_type(), "log64");
    }
}
