use anyhow::Result;

use crate::algorithms::tr_mappers::{FinalTr, MapFinalAction};
use crate::algorithms::weight_converters::WeightConverter;
use crate::semirings::{GallicWeight, Semiring};
use crate::Transition;

/// Moves output labels into the Gallic string component, leaving an
/// acceptor over the input alphabet.
pub struct ToGallicConverter {}

impl<W: Semiring> WeightConverter<W, GallicWeight<W>> for ToGallicConverter {
    fn tr_map(&mut self, tr: &Transition<W>) -> Result<Transition<GallicWeight<W>>> {
        Ok(Transition::new(
            tr.ilabel,
            tr.ilabel,
            GallicWeight::from_label_weight(tr.olabel, tr.weight.clone()),
            tr.nextstate,
        ))
    }

    fn final_tr_map(&mut self, final_tr: &FinalTr<W>) -> Result<FinalTr<GallicWeight<W>>> {
        Ok(FinalTr {
            ilabel: final_tr.ilabel,
            olabel: final_tr.olabel,
            weight: GallicWeight::from_parts(
                crate::semirings::StringWeightRestrict::one(),
                final_tr.weight.clone(),
            ),
        })
    }

    fn final_action(&self) -> MapFinalAction {
        MapFinalAction::MapNoSuperfinal
    }
}
