use anyhow::Result;

use crate::algorithms::tr_mappers::{FinalTr, MapFinalAction};
use crate::algorithms::weight_converters::WeightConverter;
use crate::semirings::Semiring;
use crate::Transition;

/// Converter leaving labels and destinations unchanged and rebuilding the
/// weight from the raw value, for semirings sharing an underlying type
/// (e.g. tropical to log).
pub struct SimpleWeightConverter {}

impl<SI, SO> WeightConverter<SI, SO> for SimpleWeightConverter
where
    SI: Semiring,
    SO: Semiring<Type = SI::Type>,
{
    fn tr_map(&mut self, tr: &Transition<SI>) -> Result<Transition<SO>> {
        Ok(Transition::new(
            tr.ilabel,
            tr.olabel,
            SO::new(tr.weight.value().clone()),
            tr.nextstate,
        ))
    }

    fn final_tr_map(&mut self, final_tr: &FinalTr<SI>) -> Result<FinalTr<SO>> {
        Ok(FinalTr {
            ilabel: final_tr.ilabel,
            olabel: final_tr.olabel,
            weight: SO::new(final_tr.weight.value().clone()),
        })
    }

    fn final_action(&self) -> MapFinalAction {
        MapFinalAction::MapNoSuperfinal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::weight_converters::weight_convert;
    use crate::fst_impls::VectorFst;
    use crate::fst_traits::CoreFst;
    use crate::semirings::{LogWeight, TropicalWeight};
    use crate::utils::acceptor;

    #[test]
    fn test_tropical_to_log() -> Result<()> {
        let fst: VectorFst<TropicalWeight> = acceptor(&[1], TropicalWeight::new(2.0));
        let log_fst: VectorFst<LogWeight> =
            weight_convert(&fst, &mut SimpleWeightConverter {})?;
        assert_eq!(log_fst.final_weight(1)?, Some(LogWeight::new(2.0)));
        Ok(())
    }
}
