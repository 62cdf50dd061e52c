use anyhow::{bail, Result};

use crate::algorithms::tr_mappers::{FinalTr, MapFinalAction};
use crate::algorithms::weight_converters::WeightConverter;
use crate::semirings::{GallicWeight, Semiring};
use crate::{Label, Transition, EPS_LABEL};

/// Restores output labels from the Gallic string component. Strings must
/// have been factored down to at most one label per transition
/// beforehand; residual final strings exit through a transition labeled
/// `superfinal_label` to a superfinal state.
pub struct FromGallicConverter {
    pub superfinal_label: Label,
}

impl<W: Semiring> WeightConverter<GallicWeight<W>, W> for FromGallicConverter {
    fn tr_map(&mut self, tr: &Transition<GallicWeight<W>>) -> Result<Transition<W>> {
        let labels = tr.weight.labels();
        let olabel = match labels.len() {
            0 => EPS_LABEL,
            1 => labels[0],
            n => bail!(
                "FromGallicConverter: unfactored string of {} labels; run factor_weight first",
                n
            ),
        };
        Ok(Transition::new(
            tr.ilabel,
            olabel,
            tr.weight.weight().clone(),
            tr.nextstate,
        ))
    }

    fn final_tr_map(&mut self, final_tr: &FinalTr<GallicWeight<W>>) -> Result<FinalTr<W>> {
        let labels = final_tr.weight.labels();
        match labels.len() {
            0 => Ok(FinalTr {
                ilabel: EPS_LABEL,
                olabel: EPS_LABEL,
                weight: final_tr.weight.weight().clone(),
            }),
            1 => Ok(FinalTr {
                ilabel: self.superfinal_label,
                olabel: labels[0],
                weight: final_tr.weight.weight().clone(),
            }),
            n => bail!(
                "FromGallicConverter: unfactored final string of {} labels; run factor_weight first",
                n
            ),
        }
    }

    fn final_action(&self) -> MapFinalAction {
        MapFinalAction::MapAllowSuperfinal
    }
}
