pub use self::invert_weight_mapper::InvertWeightMapper;
pub use self::plus_mapper::PlusMapper;
pub use self::quantize_mapper::QuantizeMapper;
pub use self::rm_weight_mapper::RmWeightMapper;
pub use self::times_mapper::TimesMapper;

mod invert_weight_mapper;
mod plus_mapper;
mod quantize_mapper;
mod rm_weight_mapper;
mod times_mapper;

use anyhow::Result;

use crate::fst_properties::op_properties::weight_map_properties;
use crate::fst_properties::FstProperties;
use crate::fst_traits::MutableFst;
use crate::semirings::Semiring;
use crate::transition::Transition;
use crate::{Label, StateId, EPS_LABEL};

/// Final weight of a state viewed as a virtual transition, so mappers can
/// treat finals uniformly with transitions.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalTr<W: Semiring> {
    pub ilabel: Label,
    pub olabel: Label,
    pub weight: W,
}

/// How a mapper's treatment of final weights interacts with the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapFinalAction {
    /// The mapped final transition keeps epsilon labels and stays a plain
    /// final weight.
    MapNoSuperfinal,
    /// A superfinal state is added only when a mapped final transition
    /// carries a non-epsilon label or the mapper requests it.
    MapAllowSuperfinal,
    /// Every final state is redirected through a new superfinal state.
    MapRequireSuperfinal,
}

/// In-place transformation of every transition and final weight.
pub trait TrMapper<W: Semiring> {
    fn tr_map(&self, tr: &mut Transition<W>) -> Result<()>;

    fn final_tr_map(&self, final_tr: &mut FinalTr<W>) -> Result<()>;

    fn final_action(&self) -> MapFinalAction;

    /// Properties holding of the mapped FST given the input's; the default
    /// is right for weight-only mappers.
    fn properties(&self, inprops: FstProperties) -> FstProperties {
        weight_map_properties(inprops)
    }
}

/// Applies a mapper to every transition and final weight of `fst`.
pub fn tr_map<W: Semiring, F: MutableFst<W>, M: TrMapper<W>>(
    fst: &mut F,
    mapper: &M,
) -> Result<()> {
    let inprops = fst.properties();
    let mut superfinal: Option<StateId> = None;
    if mapper.final_action() == MapFinalAction::MapRequireSuperfinal {
        let s = fst.add_state();
        fst.set_final(s, W::one())?;
        superfinal = Some(s);
    }
    for state in 0..fst.num_states() {
        if Some(state) == superfinal {
            continue;
        }
        let mut trs = fst.pop_trs(state)?;
        for tr in trs.iter_mut() {
            mapper.tr_map(tr)?;
        }
        for tr in trs {
            fst.add_tr(state, tr)?;
        }
        let final_weight = fst.final_weight(state)?;
        if let Some(weight) = final_weight {
            let mut final_tr = FinalTr {
                ilabel: EPS_LABEL,
                olabel: EPS_LABEL,
                weight,
            };
            mapper.final_tr_map(&mut final_tr)?;
            match mapper.final_action() {
                MapFinalAction::MapNoSuperfinal => {
                    fst.set_final(state, final_tr.weight)?;
                }
                MapFinalAction::MapAllowSuperfinal => {
                    if final_tr.ilabel != EPS_LABEL || final_tr.olabel != EPS_LABEL {
                        let s = match superfinal {
                            Some(s) => s,
                            None => {
                                let s = fst.add_state();
                                fst.set_final(s, W::one())?;
                                superfinal = Some(s);
                                s
                            }
                        };
                        fst.add_tr(
                            state,
                            Transition::new(final_tr.ilabel, final_tr.olabel, final_tr.weight, s),
                        )?;
                        fst.delete_final_weight(state)?;
                    } else {
                        fst.set_final(state, final_tr.weight)?;
                    }
                }
                MapFinalAction::MapRequireSuperfinal => {
                    let s = superfinal.expect("superfinal created above");
                    if !final_tr.weight.is_zero() {
                        fst.add_tr(
                            state,
                            Transition::new(final_tr.ilabel, final_tr.olabel, final_tr.weight, s),
                        )?;
                    }
                    fst.delete_final_weight(state)?;
                }
            }
        }
    }
    fst.set_properties(mapper.properties(inprops));
    Ok(())
}
