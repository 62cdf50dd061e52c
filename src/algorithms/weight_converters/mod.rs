pub use self::from_gallic_converter::FromGallicConverter;
pub use self::simple_weight_converter::SimpleWeightConverter;
pub use self::to_gallic_converter::ToGallicConverter;

mod from_gallic_converter;
mod simple_weight_converter;
mod to_gallic_converter;

use anyhow::Result;

use crate::algorithms::factor_weight::{factor_weight, FactorWeightOptions, GallicFactor};
use crate::algorithms::tr_mappers::{FinalTr, MapFinalAction};
use crate::fst_impls::VectorFst;
use crate::fst_traits::{ExpandedFst, MutableFst};
use crate::semirings::{GallicWeight, Semiring, WeaklyDivisibleSemiring, WeightQuantize};
use crate::transition::Transition;
use crate::trs::Transitions;
use crate::{StateId, EPS_LABEL};

/// Conversion of transitions between two weight types; unlike
/// [`TrMapper`](crate::algorithms::tr_mappers::TrMapper) the output
/// semiring may differ from the input's.
pub trait WeightConverter<SI: Semiring, SO: Semiring> {
    fn tr_map(&mut self, tr: &Transition<SI>) -> Result<Transition<SO>>;

    fn final_tr_map(&mut self, final_tr: &FinalTr<SI>) -> Result<FinalTr<SO>>;

    fn final_action(&self) -> MapFinalAction;
}

/// Converts every transition and final weight of `ifst` into a new FST
/// over the output semiring, adding a superfinal state when the converter
/// turns final weights into labeled transitions.
pub fn weight_convert<SI, SO, F1, F2, M>(ifst: &F1, mapper: &mut M) -> Result<F2>
where
    SI: Semiring,
    SO: Semiring,
    F1: ExpandedFst<SI>,
    F2: MutableFst<SO>,
    M: WeightConverter<SI, SO>,
{
    let mut ofst = F2::new();
    ofst.add_states(ifst.num_states());
    let mut superfinal: Option<StateId> = None;
    if mapper.final_action() == MapFinalAction::MapRequireSuperfinal {
        let s = ofst.add_state();
        ofst.set_final(s, SO::one())?;
        superfinal = Some(s);
    }
    for state in ifst.states_range() {
        for tr in ifst.get_trs(state)?.trs() {
            ofst.add_tr(state, mapper.tr_map(tr)?)?;
        }
        if let Some(weight) = ifst.final_weight(state)? {
            let final_tr = mapper.final_tr_map(&FinalTr {
                ilabel: EPS_LABEL,
                olabel: EPS_LABEL,
                weight,
            })?;
            match mapper.final_action() {
                MapFinalAction::MapNoSuperfinal => {
                    ofst.set_final(state, final_tr.weight)?;
                }
                MapFinalAction::MapAllowSuperfinal => {
                    if final_tr.ilabel != EPS_LABEL || final_tr.olabel != EPS_LABEL {
                        let s = match superfinal {
                            Some(s) => s,
                            None => {
                                let s = ofst.add_state();
                                ofst.set_final(s, SO::one())?;
                                superfinal = Some(s);
                                s
                            }
                        };
                        ofst.add_tr(
                            state,
                            Transition::new(final_tr.ilabel, final_tr.olabel, final_tr.weight, s),
                        )?;
                    } else {
                        ofst.set_final(state, final_tr.weight)?;
                    }
                }
                MapFinalAction::MapRequireSuperfinal => {
                    let s = superfinal.expect("superfinal created above");
                    if !final_tr.weight.is_zero() {
                        ofst.add_tr(
                            state,
                            Transition::new(final_tr.ilabel, final_tr.olabel, final_tr.weight, s),
                        )?;
                    }
                }
            }
        }
    }
    if let Some(start) = ifst.start() {
        ofst.set_start(start)?;
    }
    Ok(ofst)
}

/// Encodes a transducer into a Gallic-weighted acceptor: every output
/// label moves into the weight's string component.
pub fn to_gallic<W, F1>(ifst: &F1) -> Result<VectorFst<GallicWeight<W>>>
where
    W: Semiring,
    F1: ExpandedFst<W>,
{
    weight_convert(ifst, &mut ToGallicConverter {})
}

/// Decodes a Gallic-weighted acceptor back into a transducer, factoring
/// multi-label strings into chains of single-label transitions first.
/// Residual final strings exit through a transition whose input side is
/// `superfinal_label`.
pub fn from_gallic<W, F2>(
    ifst: &VectorFst<GallicWeight<W>>,
    factor_opts: FactorWeightOptions,
    superfinal_label: crate::Label,
) -> Result<F2>
where
    W: WeaklyDivisibleSemiring + WeightQuantize,
    F2: MutableFst<W>,
{
    let factored: VectorFst<GallicWeight<W>> =
        factor_weight::<_, _, _, GallicFactor<W>>(ifst, factor_opts)?;
    let mut converter = FromGallicConverter { superfinal_label };
    weight_convert(&factored, &mut converter)
}
