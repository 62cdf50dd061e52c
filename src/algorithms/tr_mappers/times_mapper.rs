use anyhow::Result;

use crate::algorithms::tr_mappers::{FinalTr, MapFinalAction, TrMapper};
use crate::semirings::Semiring;
use crate::Transition;

/// Mapper right-multiplying a constant onto every weight.
pub struct TimesMapper<W: Semiring> {
    to_multiply: W,
}

impl<W: Semiring> TimesMapper<W> {
    pub fn from_weight(value: W) -> Self {
        TimesMapper { to_multiply: value }
    }
}

impl<W: Semiring> TrMapper<W> for TimesMapper<W> {
    fn tr_map(&self, tr: &mut Transition<W>) -> Result<()> {
        tr.weight.times_assign(&self.to_multiply);
        Ok(())
    }

    fn final_tr_map(&self, final_tr: &mut FinalTr<W>) -> Result<()> {
        final_tr.weight.times_assign(&self.to_multiply);
        Ok(())
    }

    fn final_action(&self) -> MapFinalAction {
        MapFinalAction::MapNoSuperfinal
    }
}
