use std::borrow::Borrow;
use std::fmt;

use crate::semirings::{Semiring, SemiringProperties, SparsePowerWeight};
use crate::config::core_config;

/// Scaling of an expectation component by a mass component, the cross-type
/// `Times` the expectation semiring is built on.
pub trait ModuleOver<W: Semiring> {
    fn scale_assign(&mut self, x: &W);
}

impl<W: Semiring> ModuleOver<W> for W {
    fn scale_assign(&mut self, x: &W) {
        self.times_assign(x);
    }
}

impl<W: Semiring> ModuleOver<W> for SparsePowerWeight<W> {
    fn scale_assign(&mut self, x: &W) {
        let default = self.default_component().times(x);
        let entries = self
            .entries()
            .iter()
            .map(|(i, w)| (*i, w.times(x)))
            .collect();
        *self = SparsePowerWeight::from_entries(default, entries);
    }
}

/// Expectation semiring over a pair `(x, y)`: `Plus` is component-wise and
/// `Times((x1, y1), (x2, y2)) = (x1⊗x2, x1·y2 ⊕ x2·y1)`, the product rule
/// that makes the second component accumulate an expectation alongside the
/// first component's total mass. The second component is typically the same
/// numeric semiring as the first, or a sparse power of it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Hash)]
pub struct ExpectationWeight<W1, W2> {
    value: (W1, W2),
}

impl<W1: Semiring, W2: Semiring> ExpectationWeight<W1, W2> {
    pub fn from_parts(w1: W1, w2: W2) -> Self {
        Self { value: (w1, w2) }
    }

    pub fn value1(&self) -> &W1 {
        &self.value.0
    }

    pub fn value2(&self) -> &W2 {
        &self.value.1
    }
}

impl<W1, W2> Semiring for ExpectationWeight<W1, W2>
where
    W1: Semiring,
    W2: Semiring + ModuleOver<W1>,
{
    type Type = (W1, W2);
    type ReverseWeight = ExpectationWeight<W1, W2>;

    fn zero() -> Self {
        Self {
            value: (W1::zero(), W2::zero()),
        }
    }

    fn one() -> Self {
        Self {
            value: (W1::one(), W2::zero()),
        }
    }

    fn new(value: (W1, W2)) -> Self {
        Self { value }
    }

    fn plus_assign<P: Borrow<Self>>(&mut self, rhs: P) {
        let rhs = rhs.borrow();
        self.value.0.plus_assign(&rhs.value.0);
        self.value.1.plus_assign(&rhs.value.1);
    }

    fn times_assign<P: Borrow<Self>>(&mut self, rhs: P) {
        let rhs = rhs.borrow();
        let mut x1y2 = rhs.value.1.clone();
        x1y2.scale_assign(&self.value.0);
        let mut x2y1 = self.value.1.clone();
        x2y1.scale_assign(&rhs.value.0);
        self.value.0.times_assign(&rhs.value.0);
        self.value.1 = x1y2.plus(&x2y1);
    }

    // The expectation semiring is its own reverse for commutative mass
    // components, the only ones supported here.
    fn reverse(&self) -> Self::ReverseWeight {
        self.clone()
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
        self.value.0.is_member() && self.value.1.is_member()
    }

    fn properties() -> SemiringProperties {
        W1::properties()
            & W2::properties()
            & (SemiringProperties::SEMIRING | SemiringProperties::COMMUTATIVE)
    }
}

impl<W1: Semiring, W2: Semiring> fmt::Display for ExpectationWeight<W1, W2> {
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

impl<W1, W2> Default for ExpectationWeight<W1, W2>
where
    W1: Semiring,
    W2: Semiring + ModuleOver<W1>,
{
    fn default() -> Self {
        Self::one()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semirings::RealWeight;

    type Exp = ExpectationWeight<RealWeight, RealWeight>;

    fn exp(x: f32, y: f32) -> Exp {
        Exp::from_parts(RealWeight::new(x), RealWeight::new(y))
    }

    #[test]
    fn test_expectation_times_product_rule() {
        let a = exp(0.5, 1.0);
        let b = exp(0.25, 2.0);
        // (0.5 * 0.25, 0.5 * 2.0 + 0.25 * 1.0)
        assert!(a.times(&b).approx_equal(exp(0.125, 1.25), 1e-6));
        assert_eq!(a.times(Exp::one()), a);
        assert!(a.times(Exp::zero()).is_zero());
    }

    #[test]
    fn test_expectation_one_is_identity_on_plus_side() {
        let a = exp(0.3, 0.7);
        assert_eq!(a.plus(Exp::zero()), a);
    }
}
