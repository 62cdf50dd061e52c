use anyhow::Result;

use crate::algorithms::tr_mappers::{FinalTr, MapFinalAction, TrMapper};
use crate::fst_properties::FstProperties;
use crate::semirings::Semiring;
use crate::Transition;

/// Mapper replacing every non-`Zero` weight by `One`.
pub struct RmWeightMapper {}

impl RmWeightMapper {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for RmWeightMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Semiring> TrMapper<W> for RmWeightMapper {
    fn tr_map(&self, tr: &mut Transition<W>) -> Result<()> {
        if !tr.weight.is_zero() {
            tr.weight = W::one();
        }
        Ok(())
    }

    fn final_tr_map(&self, final_tr: &mut FinalTr<W>) -> Result<()> {
        if !final_tr.weight.is_zero() {
            final_tr.weight = W::one();
        }
        Ok(())
    }

    fn final_action(&self) -> MapFinalAction {
        MapFinalAction::MapNoSuperfinal
    }

    fn properties(&self, inprops: FstProperties) -> FstProperties {
        let mut out = inprops;
        out |= FstProperties::UNWEIGHTED | FstProperties::UNWEIGHTED_CYCLES;
        out -= FstProperties::WEIGHTED | FstProperties::WEIGHTED_CYCLES;
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::tr_mappers::tr_map;
    use crate::fst_impls::VectorFst;
    use crate::fst_traits::{CoreFst, MutableFst};
    use crate::semirings::TropicalWeight;
    use crate::utils::acceptor;

    #[test]
    fn test_rm_weight() -> Result<()> {
        let mut fst: VectorFst<TropicalWeight> = acceptor(&[1], TropicalWeight::new(3.0));
        tr_map(&mut fst, &RmWeightMapper::new())?;
        assert_eq!(fst.final_weight(1)?, Some(TropicalWeight::one()));
        assert!(fst.properties().contains(FstProperties::UNWEIGHTED));
        Ok(())
    }
}
