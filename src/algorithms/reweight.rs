use anyhow::Result;

use crate::fst_properties::op_properties::reweight_properties;
use crate::fst_properties::FstProperties;
use crate::fst_traits::MutableFst;
use crate::semirings::{DivideType, Semiring, WeaklyDivisibleSemiring};
use crate::StateId;

/// Direction of a reweighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReweightType {
    /// Potentials are pushed towards the start state.
    ReweightToInitial,
    /// Potentials are pushed towards the final states.
    ReweightToFinal,
}

/// Reweights an FST in place with per-state `potentials`. The recognized
/// relation is unchanged: the weight moved out of each state is moved onto
/// its predecessors (or successors), and the start state (or the finals)
/// absorb the boundary potential.
///
/// Towards the initial state, a transition `s → t` with weight `w` becomes
/// `p[s]⁻¹ ⊗ (w ⊗ p[t])` and final weights become `p[s]⁻¹ ⊗ final(s)`,
/// except at the start state where the division is skipped so that the
/// total weight collects there. Symmetrically towards the finals. States
/// with `Zero` potential keep their weights.
pub fn reweight<W, F>(fst: &mut F, potentials: &[W], reweight_type: ReweightType) -> Result<()>
where
    W: WeaklyDivisibleSemiring,
    F: MutableFst<W>,
{
    let props = fst.properties();
    let start = fst.start();
    let potential_of = |state: StateId| -> W {
        potentials.get(state).cloned().unwrap_or_else(W::zero)
    };
    for state in fst.states_range() {
        let p_state = potential_of(state);
        let at_start = Some(state) == start;
        let mut trs = fst.pop_trs(state)?;
        for tr in trs.iter_mut() {
            let p_next = potential_of(tr.nextstate);
            match reweight_type {
                ReweightType::ReweightToInitial => {
                    let moved = tr.weight.times(&p_next);
                    tr.weight = if at_start || p_state.is_zero() {
                        moved
                    } else {
                        moved.divide(&p_state, DivideType::DivideLeft)
                    };
                }
                ReweightType::ReweightToFinal => {
                    if !p_next.is_zero() {
                        tr.weight =
                            p_state.times(&tr.weight).divide(&p_next, DivideType::DivideRight);
                    }
                }
            }
        }
        for tr in trs {
            fst.add_tr(state, tr)?;
        }
        if let Some(final_weight) = fst.final_weight(state)? {
            match reweight_type {
                ReweightType::ReweightToInitial => {
                    if !at_start && !p_state.is_zero() {
                        fst.set_final(
                            state,
                            final_weight.divide(&p_state, DivideType::DivideLeft),
                        )?;
                    }
                }
                ReweightType::ReweightToFinal => {
                    fst.set_final(state, p_state.times(&final_weight))?;
                }
            }
        }
    }
    fst.set_properties_with_mask(reweight_properties(props), FstProperties::copy_properties());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::shortest_distance::shortest_distance;
    use crate::fst_impls::VectorFst;
    use crate::fst_traits::{CoreFst, Fst};
    use crate::semirings::TropicalWeight;
    use crate::Transition;

    #[test]
    fn test_reweight_preserves_path_weight() -> Result<()> {
        let mut fst = VectorFst::<TropicalWeight>::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        fst.set_start(s0)?;
        fst.set_final(s1, TropicalWeight::new(0.5))?;
        fst.add_tr(s0, Transition::new(1, 1, TropicalWeight::new(2.0), s1))?;
        let before: Vec<_> = fst.paths_iter().collect();
        let potentials = shortest_distance(&fst, true)?;
        reweight(&mut fst, &potentials, ReweightType::ReweightToInitial)?;
        // The relation is unchanged; the whole path weight now sits on the
        // start state's outgoing transition.
        let after: Vec<_> = fst.paths_iter().collect();
        assert_eq!(before, after);
        let trs = crate::fst_traits::CoreFst::get_trs(&fst, 0)?;
        assert_eq!(
            crate::trs::Transitions::trs(&trs)[0].weight,
            TropicalWeight::new(2.5)
        );
        assert_eq!(fst.final_weight(1)?, Some(TropicalWeight::one()));
        Ok(())
    }

    #[test]
    fn test_reweight_to_final_preserves_relation() -> Result<()> {
        let mut fst = VectorFst::<TropicalWeight>::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        fst.set_start(s0)?;
        fst.set_final(s1, TropicalWeight::new(0.5))?;
        fst.add_tr(s0, Transition::new(1, 1, TropicalWeight::new(2.0), s1))?;
        let before: Vec<_> = fst.paths_iter().collect();
        let potentials = shortest_distance(&fst, false)?;
        reweight(&mut fst, &potentials, ReweightType::ReweightToFinal)?;
        assert_eq!(before, fst.paths_iter().collect::<Vec<_>>());
        Ok(())
    }
}
