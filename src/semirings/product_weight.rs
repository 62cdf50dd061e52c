use std::borrow::Borrow;
use std::fmt;

use crate::config::core_config;
use crate::semirings::{
    DivideType, Semiring, SemiringProperties, WeaklyDivisibleSemiring, WeightQuantize,
};

/// Product semiring: `Plus` and `Times` are applied component-wise.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Hash)]
pub struct ProductWeight<W1, W2> {
    value: (W1, W2),
}

impl<W1: Semiring, W2: Semiring> ProductWeight<W1, W2> {
    pub fn value1(&self) -> &W1 {
        &self.value.0
    }

    pub fn value2(&self) -> &W2 {
        &self.value.1
    }

    pub fn set_value1(&mut self, w: W1) {
        self.value.0 = w;
    }

    pub fn set_value2(&mut self, w: W2) {
        self.value.1 = w;
    }

    pub fn from_parts(w1: W1, w2: W2) -> Self {
        Self { value: (w1, w2) }
    }
}

impl<W1: Semiring, W2: Semiring> Semiring for ProductWeight<W1, W2> {
    type Type = (W1, W2);
    type ReverseWeight = ProductWeight<W1::ReverseWeight, W2::ReverseWeight>;

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
        self.value.0.plus_assign(&rhs.value.0);
        self.value.1.plus_assign(&rhs.value.1);
    }

    fn times_assign<P: Borrow<Self>>(&mut self, rhs: P) {
        let rhs = rhs.borrow();
        self.value.0.times_assign(&rhs.value.0);
        self.value.1.times_assign(&rhs.value.1);
    }

    fn reverse(&self) -> Self::ReverseWeight {
        ProductWeight::from_parts(self.value.0.reverse(), self.value.1.reverse())
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
            & (SemiringProperties::SEMIRING
                | SemiringProperties::COMMUTATIVE
                | SemiringProperties::IDEMPOTENT)
    }
}

impl<W1, W2> WeaklyDivisibleSemiring for ProductWeight<W1, W2>
where
    W1: WeaklyDivisibleSemiring,
    W2: WeaklyDivisibleSemiring,
{
    fn divide_assign(&mut self, rhs: &Self, divide_type: DivideType) {
        self.value.0.divide_assign(&rhs.value.0, divide_type);
        self.value.1.divide_assign(&rhs.value.1, divide_type);
    }
}

impl<W1, W2> WeightQuantize for ProductWeight<W1, W2>
where
    W1: WeightQuantize,
    W2: WeightQuantize,
{
    // Quantization applies component-wise; components with different
    // natural scales share the same delta.
    fn quantize_assign(&mut self, delta: f32) {
        self.value.0.quantize_assign(delta);
        self.value.1.quantize_assign(delta);
    }
}

impl<W1: Semiring, W2: Semiring> fmt::Display for ProductWeight<W1, W2> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let config = core_config();
        let mut parens = config.pair_parentheses.chars();
        let open = parens.next();
        let close = parens.next();
        if let Some(open) = open {
            write!(f, "{}", open)?;
        }
        write!(
            f,
            "{}{}{}",
            self.value.0, config.pair_separator, self.value.1
        )?;
        if let Some(close) = close {
            write!(f, "{}", close)?;
        }
        Ok(())
    }
}

impl<W1: Semiring, W2: Semiring> Default for ProductWeight<W1, W2> {
    fn default() -> Self {
        Self::one()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semirings::TropicalWeight;

    type TT = ProductWeight<TropicalWeight, TropicalWeight>;

    #[test]
    fn test_product_componentwise() {
        let a = TT::from_parts(TropicalWeight::new(1.0), TropicalWeight::new(2.0));
        let b = TT::from_parts(TropicalWeight::new(3.0), TropicalWeight::new(1.0));
        assert_eq!(
            a.plus(&b),
            TT::from_parts(TropicalWeight::new(1.0), TropicalWeight::new(1.0))
        );
        assert_eq!(
            a.times(&b),
            TT::from_parts(TropicalWeight::new(4.0), TropicalWeight::new(3.0))
        );
        assert!(a.times(TT::zero()).is_zero());
    }

    #[test]
    fn test_product_properties_drop_path() {
        assert!(!TT::properties().contains(SemiringProperties::PATH));
        assert!(TT::properties().contains(SemiringProperties::COMMUTATIVE));
    }
}
