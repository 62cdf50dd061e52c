use anyhow::Result;

use crate::algorithms::tr_mappers::{FinalTr, MapFinalAction, TrMapper};
use crate::semirings::{DivideType, Semiring, WeaklyDivisibleSemiring};
use crate::Transition;

/// Mapper replacing every weight by its multiplicative inverse
/// `One / w`.
pub struct InvertWeightMapper {}

impl InvertWeightMapper {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for InvertWeightMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: WeaklyDivisibleSemiring> TrMapper<W> for InvertWeightMapper {
    fn tr_map(&self, tr: &mut Transition<W>) -> Result<()> {
        tr.weight = W::one().divide(&tr.weight, DivideType::DivideAny);
        Ok(())
    }

    fn final_tr_map(&self, final_tr: &mut FinalTr<W>) -> Result<()> {
        final_tr.weight = W::one().divide(&final_tr.weight, DivideType::DivideAny);
        Ok(())
    }

    fn final_action(&self) -> MapFinalAction {
        MapFinalAction::MapNoSuperfinal
    }
}
