use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::semirings::float_weight::{log_minus, log_plus, Float};
use crate::semirings::{
    DivideType, Semiring, SemiringProperties, WeaklyDivisibleSemiring, WeightQuantize,
};
use crate::KDELTA;

/// Signed log semiring: a sign paired with a negated log magnitude,
/// representing signed reals `±e⁻ᵛ` under ordinary addition and
/// multiplication. The first component is the sign (`+1.0` positive,
/// `-1.0` negative), the second the negated log of the magnitude.
#[derive(Debug, Clone, Copy)]
pub struct SignedLogWeight {
    value: (f32, f32),
}

impl SignedLogWeight {
    pub fn positive(&self) -> bool {
        self.value.0 > 0.0
    }

    pub fn magnitude(&self) -> f32 {
        self.value.1
    }

    fn canonical(&self) -> (bool, u64) {
        // Sign is meaningless at magnitude zero.
        let negative = self.value.0 <= 0.0 && self.value.1 != f32::INFINITY;
        (negative, self.value.1.quantize(KDELTA).canonical_bits())
    }
}

impl Semiring for SignedLogWeight {
    type Type = (f32, f32);
    type ReverseWeight = SignedLogWeight;

    fn zero() -> Self {
        Self {
            value: (1.0, f32::INFINITY),
        }
    }

    fn one() -> Self {
        Self { value: (1.0, 0.0) }
    }

    fn new(value: (f32, f32)) -> Self {
        Self { value }
    }

    fn plus_assign<P: Borrow<Self>>(&mut self, rhs: P) {
        let rhs = rhs.borrow();
        if !self.is_member() {
            return;
        }
        if !rhs.is_member() {
            self.value.1 = f32::NAN;
            return;
        }
        if rhs.value.1 == f32::INFINITY {
            return;
        }
        if self.value.1 == f32::INFINITY {
            *self = *rhs;
            return;
        }
        if self.positive() == rhs.positive() {
            self.value.1 = log_plus(self.value.1, rhs.value.1);
        } else if self.value.1.approx_equal(rhs.value.1, KDELTA) {
            *self = Self::zero();
        } else if self.value.1 < rhs.value.1 {
            // Larger magnitude wins the sign; subtract the smaller one.
            self.value.1 = log_minus(self.value.1, rhs.value.1);
        } else {
            self.value.0 = rhs.value.0;
            self.value.1 = log_minus(rhs.value.1, self.value.1);
        }
    }

    fn times_assign<P: Borrow<Self>>(&mut self, rhs: P) {
        let rhs = rhs.borrow();
        if !self.is_member() {
            return;
        }
        if !rhs.is_member() {
            self.value.1 = f32::NAN;
            return;
        }
        let sign = if self.positive() == rhs.positive() {
            1.0
        } else {
            -1.0
        };
        if self.value.1 == f32::INFINITY || rhs.value.1 == f32::INFINITY {
            self.value = (1.0, f32::INFINITY);
        } else {
            self.value = (sign, self.value.1 + rhs.value.1);
        }
    }

    fn reverse(&self) -> Self::ReverseWeight {
        *self
    }

    fn value(&self) -> &(f32, f32) {
        &self.value
    }

    fn take_value(self) -> (f32, f32) {
        self.value
    }

    fn set_value(&mut self, value: (f32, f32)) {
        self.value = value;
    }

    fn approx_equal<P: Borrow<Self>>(&self, rhs: P, delta: f32) -> bool {
        let rhs = rhs.borrow();
        if self.value.1 == f32::INFINITY || rhs.value.1 == f32::INFINITY {
            self.value.1 == rhs.value.1
        } else {
            self.positive() == rhs.positive() && self.value.1.approx_equal(rhs.value.1, delta)
        }
    }

    fn is_member(&self) -> bool {
        !self.value.1.is_nan()
    }

    fn properties() -> SemiringProperties {
        SemiringProperties::SEMIRING | SemiringProperties::COMMUTATIVE
    }
}

impl WeaklyDivisibleSemiring for SignedLogWeight {
    fn divide_assign(&mut self, rhs: &Self, _divide_type: DivideType) {
        if rhs.value.1 == f32::INFINITY {
            self.value.1 = f32::NAN;
            return;
        }
        let sign = if self.positive() == rhs.positive() {
            1.0
        } else {
            -1.0
        };
        self.value.0 = sign;
        if self.value.1 != f32::INFINITY {
            self.value.1 -= rhs.value.1;
        }
    }
}

impl WeightQuantize for SignedLogWeight {
    fn quantize_assign(&mut self, delta: f32) {
        self.value.1 = self.value.1.quantize(delta);
    }
}

impl PartialEq for SignedLogWeight {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for SignedLogWeight {}

impl PartialOrd for SignedLogWeight {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.canonical().partial_cmp(&other.canonical())
    }
}

impl Hash for SignedLogWeight {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for SignedLogWeight {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.positive() {
            write!(f, "{}", self.value.1)
        } else {
            write!(f, "-{}", self.value.1)
        }
    }
}

impl Default for SignedLogWeight {
    fn default() -> Self {
        Self::one()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: SignedLogWeight, b: SignedLogWeight) -> bool {
        a.approx_equal(b, 1e-4)
    }

    #[test]
    fn test_signed_log_plus_same_sign() {
        let a = SignedLogWeight::new((1.0, 0.0));
        let sum = a.plus(a);
        assert!(approx(sum, SignedLogWeight::new((1.0, -(2.0f32).ln()))));
    }

    #[test]
    fn test_signed_log_plus_opposite_cancels() {
        let a = SignedLogWeight::new((1.0, 1.5));
        let b = SignedLogWeight::new((-1.0, 1.5));
        assert!(a.plus(b).is_zero());
    }

    #[test]
    fn test_signed_log_times_signs() {
        let a = SignedLogWeight::new((-1.0, 1.0));
        let b = SignedLogWeight::new((-1.0, 2.0));
        let p = a.times(b);
        assert!(p.positive());
        assert!(approx(p, SignedLogWeight::new((1.0, 3.0))));
        assert!(a.times(SignedLogWeight::zero()).is_zero());
    }
}
