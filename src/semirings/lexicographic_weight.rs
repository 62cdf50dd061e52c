use std::borrow::Borrow;
use std::fmt;

use crate::config::core_config;
use crate::semirings::{
    DivideType, Semiring, SemiringProperties, WeaklyDivisibleSemiring, WeightQuantize,
};

/// Natural order of a path semiring: `a ≤ b` iff `a ⊕ b = a`.
pub(crate) fn natural_less<W: Semiring>(a: &W, b: &W) -> bool {
    &a.plus(b) == a && a != b
}

/// Lexicographic semiring over a pair of path semirings: `Plus` selects the
/// operand that is smaller by the natural order of the first component,
/// breaking ties with the second.
///
/// Members have either both components `Zero` or both non-`Zero`; both type
/// parameters must advertise the path property.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Hash)]
pub struct LexicographicWeight<W1, W2> {
    value: (W1, W2),
}

impl<W1: Semiring, W2: Semiring> LexicographicWeight<W1, W2> {
    pub fn from_parts(w1: W1, w2: W2) -> Self {
        debug_assert!(
            W1::properties().contains(SemiringProperties::PATH)
                && W2::properties().contains(SemiringProperties::PATH),
            "LexicographicWeight requires path semirings"
        );
        Self { value: (w1, w2) }
    }

    pub fn value1(&self) -> &W1 {
        &self.value.0
    }

    pub fn value2(&self) -> &W2 {
        &self.value.1
    }
}

impl<W1: Semiring, W2: Semiring> Semiring for LexicographicWeight<W1, W2> {
    type Type = (W1, W2);
    type ReverseWeight = LexicographicWeight<W1::ReverseWeight, W2::ReverseWeight>;

    fn zero() -> Self {
        Self {
            value: (W1::zero(), W2::zero()),
        }
    }

    fn one() -> Self {
        Self {
            value: (W1::one(), W2::one()),
        }
    }

    fn new(value: (W1, W2)) -> Self {
        Self { value }
    }

    fn plus_assign<P: Borrow<Self>>(&mut self, rhs: P) {
        let rhs = rhs.borrow();
        let keep_rhs = if natural_less(&rhs.value.0, &self.value.0) {
            true
        } else if natural_less(&self.value.0, &rhs.value.0) {
            false
        } else {
            natural_less(&rhs.value.1, &self.value.1)
        };
        if keep_rhs {
            *self = rhs.clone();
        }
    }

    fn times_assign<P: Borrow<Self>>(&mut self, rhs: P) {
        let rhs = rhs.borrow();
        self.value.0.times_assign(&rhs.value.0);
        self.value.1.times_assign(&rhs.value.1);
    }

    fn reverse(&self) -> Self::ReverseWeight {
        LexicographicWeight {
            value: (self.value.0.reverse(), self.value.1.reverse()),
        }
    }

    fn value(&self) -> &(W1, W2) {
        &self.value
    }

    fn take_value(self) -> (W1, W2) {
        self.value
    }

    fn set_value(&mut self, value: (W1, W2)) {
        self.value = value;
    }

    fn approx_equal<P: Borrow<Self>>(&self, rhs: P, delta: f32) -> bool {
        let rhs = rhs.borrow();
        self.value.0.approx_equal(&rhs.value.0, delta)
            && self.value.1.approx_equal(&rhs.value.1, delta)
    }

    fn is_member(&self) -> bool {
        if !self.value.0.is_member() || !self.value.1.is_member() {
            return false;
        }
        // Either both components are Zero or both are non-Zero.
        self.value.0.is_zero() == self.value.1.is_zero()
    }

    fn properties() -> SemiringProperties {
        W1::properties()
            & W2::properties()
            & (SemiringProperties::SEMIRING
                | SemiringProperties::COMMUTATIVE
                | SemiringProperties::IDEMPOTENT
                | SemiringProperties::PATH)
    }
}

impl<W1, W2> WeaklyDivisibleSemiring for LexicographicWeight<W1, W2>
where
    W1: WeaklyDivisibleSemiring,
    W2: WeaklyDivisibleSemiring,
{
    fn divide_assign(&mut self, rhs: &Self, divide_type: DivideType) {
        self.value.0.divide_assign(&rhs.value.0, divide_type);
        self.value.1.divide_assign(&rhs.value.1, divide_type);
    }
}

impl<W1, W2> WeightQuantize for LexicographicWeight<W1, W2>
where
    W1: WeightQuantize,
    W2: WeightQuantize,
{
    fn quantize_assign(&mut self, delta: f32) {
        self.value.0.quantize_assign(delta);
        self.value.1.quantize_assign(delta);
    }
}

impl<W1: Semiring, W2: Semiring> fmt::Display for LexicographicWeight<W1, W2> {
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

impl<W1: Semiring, W2: Semiring> Default for LexicographicWeight<W1, W2> {
    fn default() -> Self {
        Self::one()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semirings::TropicalWeight;

    type Lex = LexicographicWeight<TropicalWeight, TropicalWeight>;

    fn lex(a: f32, b: f32) -> Lex {
        Lex::from_parts(TropicalWeight::new(a), TropicalWeight::new(b))
    }

    #[test]
    fn test_lex_plus_selects_operand() {
        let a = lex(1.0, 5.0);
        let b = lex(1.0, 2.0);
        let c = lex(0.5, 9.0);
        assert_eq!(a.plus(&b), b);
        assert_eq!(a.plus(&c), c);
        assert_eq!(a.plus(Lex::zero()), a);
    }

    #[test]
    fn test_lex_member() {
        assert!(Lex::zero().is_member());
        assert!(lex(1.0, 2.0).is_member());
        let half = Lex::from_parts(TropicalWeight::zero(), TropicalWeight::new(1.0));
        assert!(!half.is_member());
    }

    #[test]
    fn test_lex_is_path() {
        assert!(Lex::properties().contains(SemiringProperties::PATH));
    }
}
