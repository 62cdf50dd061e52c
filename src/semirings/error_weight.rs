use std::borrow::Borrow;
use std::fmt;

use crate::semirings::{DivideType, Semiring, SemiringProperties, WeaklyDivisibleSemiring};

/// One-element error semiring: a single bottom value that absorbs every
/// operation and is never a member. Useful as a sink weight for signalling
/// failed conversions without panicking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Hash, Default)]
pub struct ErrorWeight {}

impl ErrorWeight {
    pub fn new() -> Self {
        Self {}
    }
}

impl Semiring for ErrorWeight {
    type Type = ();
    type ReverseWeight = ErrorWeight;

    fn zero() -> Self {
        Self {}
    }

    fn one() -> Self {
        Self {}
    }

    fn new(_value: ()) -> Self {
        Self {}
    }

    fn plus_assign<P: Borrow<Self>>(&mut self, _rhs: P) {}

    fn times_assign<P: Borrow<Self>>(&mut self, _rhs: P) {}

    fn reverse(&self) -> Self::ReverseWeight {
        *self
    }

    fn value(&self) -> &() {
        &()
    }

    fn take_value(self) {}

    fn set_value(&mut self, _value: ()) {}

    fn approx_equal<P: Borrow<Self>>(&self, _rhs: P, _delta: f32) -> bool {
        true
    }

    fn is_member(&self) -> bool {
        false
    }

    fn properties() -> SemiringProperties {
        SemiringProperties::SEMIRING
            | SemiringProperties::COMMUTATIVE
            | SemiringProperties::IDEMPOTENT
    }
}

impl WeaklyDivisibleSemiring for ErrorWeight {
    // Division on the error element yields the error element.
    fn divide_assign(&mut self, _rhs: &Self, _divide_type: DivideType) {}
}

impl fmt::Display for ErrorWeight {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_weight_absorbs() {
        let e = ErrorWeight::new();
        assert_eq!(e.plus(e), e);
        assert_eq!(e.times(e), e);
        assert!(!e.is_member());
        assert_eq!(e.divide(&e, DivideType::DivideAny), e);
    }
}
