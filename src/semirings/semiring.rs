use std::borrow::Borrow;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::io::{Read, Write};

use anyhow::Result;
use bitflags::bitflags;
use nom::IResult;

bitflags! {
    /// Algebraic properties advertised by a weight type. Algorithms query
    /// them to fail fast on a semiring that cannot support them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SemiringProperties: u32 {
        /// `Times` distributes over `Plus` on the left.
        const LEFT_SEMIRING = 0b1;
        /// `Times` distributes over `Plus` on the right.
        const RIGHT_SEMIRING = 0b10;
        /// `Times(a, b) = Times(b, a)`.
        const COMMUTATIVE = 0b100;
        /// `Plus(a, a) = a`.
        const IDEMPOTENT = 0b1000;
        /// `Plus(a, b)` is one of its operands.
        const PATH = 0b1_0000;
        const SEMIRING = Self::LEFT_SEMIRING.bits() | Self::RIGHT_SEMIRING.bits();
    }
}

/// Side on which a division is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DivideType {
    /// `Divide(Times(a, b), a, Left) = b`.
    DivideLeft,
    /// `Divide(Times(a, b), b, Right) = a`.
    DivideRight,
    /// Either side; only meaningful in a commutative semiring.
    DivideAny,
}

/// For some operations, the weight set associated to a wFST must have the
/// structure of a semiring. `(S, +, *, 0, 1)` is a semiring if `(S, +, 0)`
/// is a commutative monoid with identity element 0, `(S, *, 1)` is a monoid
/// with identity element `1`, `*` distributes over `+` on the side(s)
/// advertised by [`Semiring::properties`], and `0` is an annihilator for
/// `*`. Thus, a semiring is a ring that may lack negation.
/// For more information : <https://cs.nyu.edu/~mohri/pub/hwa.pdf>
///
/// Arithmetic on weights never fails: combining values outside the domain
/// produces a weight whose [`is_member`](Semiring::is_member) returns
/// false.
pub trait Semiring:
    Clone + Debug + Display + Default + PartialEq + PartialOrd + Eq + Hash + Send + Sync + 'static
{
    /// Underlying raw value.
    type Type: Clone + Debug;

    /// Weight type produced by [`reverse`](Semiring::reverse); most
    /// semirings reverse onto themselves.
    type ReverseWeight: Semiring;

    fn zero() -> Self;
    fn one() -> Self;
    fn new(value: Self::Type) -> Self;

    fn plus<P: Borrow<Self>>(&self, rhs: P) -> Self {
        let mut w = self.clone();
        w.plus_assign(rhs);
        w
    }
    fn plus_assign<P: Borrow<Self>>(&mut self, rhs: P);

    fn times<P: Borrow<Self>>(&self, rhs: P) -> Self {
        let mut w = self.clone();
        w.times_assign(rhs);
        w
    }
    fn times_assign<P: Borrow<Self>>(&mut self, rhs: P);

    /// Maps the weight into the reverse semiring. An involution together
    /// with `ReverseWeight::reverse`: reversing twice restores the value.
    fn reverse(&self) -> Self::ReverseWeight;

    fn value(&self) -> &Self::Type;
    fn take_value(self) -> Self::Type;
    fn set_value(&mut self, value: Self::Type);

    /// Approximate equality within an absolute tolerance `delta`; exact
    /// equality for non-numeric weights.
    fn approx_equal<P: Borrow<Self>>(&self, rhs: P, delta: f32) -> bool;

    /// False for not-a-number / uninitialized values produced by invalid
    /// operations.
    fn is_member(&self) -> bool;

    /// Algebraic properties of this weight type.
    fn properties() -> SemiringProperties;

    fn is_one(&self) -> bool {
        *self == Self::one()
    }
    fn is_zero(&self) -> bool {
        *self == Self::zero()
    }
}

/// A semiring is said to be divisible if all non-0 elements admit an
/// inverse, that is if `S - {0}` is a group. `(S, +, *, 0, 1)` is said to
/// be weakly divisible if for any `x` and `y` in `S` such that
/// `x + y != 0`, there exists at least one `z` such that `x = (x+y)*z`.
/// Algorithms that need an inverse of `Times` (determinization, weight
/// pushing) require it.
pub trait WeaklyDivisibleSemiring: Semiring {
    /// Division, inverse of `Times` on the requested side. Dividing by `0`
    /// yields a non-member value.
    fn divide(&self, rhs: &Self, divide_type: DivideType) -> Self {
        let mut w = self.clone();
        w.divide_assign(rhs, divide_type);
        w
    }
    fn divide_assign(&mut self, rhs: &Self, divide_type: DivideType);
}

/// A semiring `(S, ⊕, ⊗, 0, 1)` is said to be complete if for any index
/// set `I` and any family `(ai), i ∈ I` of elements of `S`, `⊕(ai), i∈I`
/// is an element of `S` whose definition does not depend on the order of
/// the terms in the ⊕-sum.
pub trait CompleteSemiring: Semiring {}

/// A complete semiring is a star semiring if it can be augmented with an
/// internal unary closure operation `*` defined by `a* = ⊕ aⁿ` (infinite
/// sum) for any `a ∈ S`.
pub trait StarSemiring: Semiring {
    fn closure(&self) -> Self;
}

/// Coarsening of a weight to a `delta`-grid, for approximate equality and
/// hashing of residual weights.
pub trait WeightQuantize: Semiring {
    fn quantize_assign(&mut self, delta: f32);
    fn quantize(&self, delta: f32) -> Self {
        let mut w = self.clone();
        w.quantize_assign(delta);
        w
    }
}

/// Weights that cross the textual and binary I/O boundary.
pub trait SerializableSemiring: Semiring + Display {
    /// Stable identifier of the weight type, matched against the arc-type
    /// string of binary FST headers.
    fn weight_type() -> String;

    fn parse_text(i: &str) -> IResult<&str, Self>;

    fn read_binary<R: Read>(reader: &mut R) -> Result<Self>;
    fn write_binary<W: Write>(&self, writer: &mut W) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semiring_properties_bits() {
        let p = SemiringProperties::SEMIRING;
        assert!(p.contains(SemiringProperties::LEFT_SEMIRING));
        assert!(p.contains(SemiringProperties::RIGHT_SEMIRING));
        assert!(!p.contains(SemiringProperties::PATH));
    }
}
