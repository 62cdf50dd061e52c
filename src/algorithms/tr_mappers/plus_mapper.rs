use anyhow::Result;

use crate::algorithms::tr_mappers::{FinalTr, MapFinalAction, TrMapper};
use crate::semirings::Semiring;
use crate::Transition;

/// Mapper `Plus`-combining a constant into every weight.
pub struct PlusMapper<W: Semiring> {
    to_add: W,
}

impl<W: Semiring> PlusMapper<W> {
    pub fn from_weight(value: W) -> Self {
        PlusMapper { to_add: value }
    }
}

impl<W: Semiring> TrMapper<W> for PlusMapper<W> {
    fn tr_map(&self, tr: &mut Transition<W>) -> Result<()> {
        tr.weight.plus_assign(&self.to_add);
        Ok(())
    }

    fn final_tr_map(&self, final_tr: &mut FinalTr<W>) -> Result<()> {
        final_tr.weight.plus_assign(&self.to_add);
        Ok(())
    }

    fn final_action(&self) -> MapFinalAction {
        MapFinalAction::MapNoSuperfinal
    }
}
