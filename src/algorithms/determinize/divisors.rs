use std::fmt::Debug;

use crate::semirings::{
    GallicWeight, Semiring, StringWeightRestrict, StringWeightVariant,
};

/// Common divisor used to residualize subset weights: a weight dividing
/// both arguments, as large as the construction can extract.
pub trait CommonDivisor<W: Semiring>: Debug {
    fn common_divisor(w1: &W, w2: &W) -> W;
}

/// `Plus` as the divisor, the right choice for weakly-divisible numeric
/// semirings.
#[derive(Debug)]
pub struct DefaultCommonDivisor;

impl<W: Semiring> CommonDivisor<W> for DefaultCommonDivisor {
    fn common_divisor(w1: &W, w2: &W) -> W {
        w1.plus(w2)
    }
}

/// Divisor for string weights: at most the shared first label, which keeps
/// residual strings finite during subset construction.
#[derive(Debug)]
pub struct LabelCommonDivisor;

impl CommonDivisor<StringWeightRestrict> for LabelCommonDivisor {
    fn common_divisor(w1: &StringWeightRestrict, w2: &StringWeightRestrict) -> StringWeightRestrict {
        let first = |w: &StringWeightRestrict| match w.value() {
            StringWeightVariant::Infinity => None,
            StringWeightVariant::Labels(l) => l.first().copied(),
        };
        match (w1.value(), w2.value()) {
            (StringWeightVariant::Infinity, _) => match first(w2) {
                Some(label) => StringWeightRestrict::from_label(label),
                None => StringWeightRestrict::one(),
            },
            (_, StringWeightVariant::Infinity) => match first(w1) {
                Some(label) => StringWeightRestrict::from_label(label),
                None => StringWeightRestrict::one(),
            },
            _ => match (first(w1), first(w2)) {
                (Some(l1), Some(l2)) if l1 == l2 => StringWeightRestrict::from_label(l1),
                _ => StringWeightRestrict::one(),
            },
        }
    }
}

/// Divisor for Gallic weights: labels through [`LabelCommonDivisor`], base
/// weights through [`DefaultCommonDivisor`].
#[derive(Debug)]
pub struct GallicCommonDivisor;

impl<W: Semiring> CommonDivisor<GallicWeight<W>> for GallicCommonDivisor {
    fn common_divisor(w1: &GallicWeight<W>, w2: &GallicWeight<W>) -> GallicWeight<W> {
        let string = LabelCommonDivisor::common_divisor(w1.string(), w2.string());
        let weight = w1.weight().plus(w2.weight());
        GallicWeight::from_parts(string, weight)
    }
}
