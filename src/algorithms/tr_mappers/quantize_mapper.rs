use anyhow::Result;

use crate::algorithms::tr_mappers::{FinalTr, MapFinalAction, TrMapper};
use crate::semirings::{Semiring, WeightQuantize};
use crate::Transition;
use crate::KDELTA;

/// Mapper quantizing all weights to the default grid.
pub struct QuantizeMapper {}

impl QuantizeMapper {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for QuantizeMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: WeightQuantize + Semiring> TrMapper<W> for QuantizeMapper {
    fn tr_map(&self, tr: &mut Transition<W>) -> Result<()> {
        tr.weight.quantize_assign(KDELTA);
        Ok(())
    }

    fn final_tr_map(&self, final_tr: &mut FinalTr<W>) -> Result<()> {
        final_tr.weight.quantize_assign(KDELTA);
        Ok(())
    }

    fn final_action(&self) -> MapFinalAction {
        MapFinalAction::MapNoSuperfinal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::tr_mappers::tr_map;
    use crate::fst_impls::VectorFst;
    use crate::fst_traits::MutableFst;
    use crate::semirings::TropicalWeight;
    use crate::utils::acceptor;

    #[test]
    fn test_quantize() -> Result<()> {
        let mut fst: VectorFst<TropicalWeight> = acceptor(&[1], TropicalWeight::new(1.00001));
        tr_map(&mut fst, &QuantizeMapper::new())?;
        assert_eq!(
            crate::fst_traits::CoreFst::final_weight(&fst, 1)?,
            Some(TropicalWeight::new(1.0))
        );
        Ok(())
    }
}
