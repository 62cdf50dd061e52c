use anyhow::Result;
use bitflags::bitflags;

use crate::algorithms::factor_weight::{FactorWeightOptions, FactorWeightType};
use crate::algorithms::reweight::{reweight, ReweightType};
use crate::algorithms::shortest_distance::shortest_distance;
use crate::algorithms::weight_converters::{from_gallic, to_gallic};
use crate::fst_impls::VectorFst;
use crate::fst_traits::{CoreFst, ExpandedFst, MutableFst};
use crate::semirings::{
    DivideType, GallicWeight, Semiring, WeaklyDivisibleSemiring, WeightQuantize,
};
use crate::trs::Transitions;

bitflags! {
    /// What a push pass normalizes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PushType: u32 {
        const PUSH_WEIGHTS = 0b1;
        const PUSH_LABELS = 0b10;
        const REMOVE_TOTAL_WEIGHT = 0b100;
        const REMOVE_COMMON_AFFIX = 0b1000;
    }
}

/// Pushes weights towards the start state (or the finals): afterwards, for
/// every state reachable on an accepting path, the `Plus` over its
/// outgoing transition weights and final weight equals `One`, except at
/// the boundary where the total weight collects. With
/// `remove_total_weight` the collected total is divided out as well.
pub fn push_weights<W, F>(
    fst: &mut F,
    reweight_type: ReweightType,
    remove_total_weight: bool,
) -> Result<()>
where
    W: WeaklyDivisibleSemiring,
    W::ReverseWeight: Semiring<ReverseWeight = W>,
    F: MutableFst<W>,
{
    let potentials = shortest_distance(
        fst,
        reweight_type == ReweightType::ReweightToInitial,
    )?;
    let total = match reweight_type {
        ReweightType::ReweightToInitial => fst
            .start()
            .and_then(|s| potentials.get(s).cloned())
            .unwrap_or_else(W::one),
        ReweightType::ReweightToFinal => {
            let mut total = W::zero();
            for state in fst.states_range() {
                if let Some(final_weight) = fst.final_weight(state)? {
                    let p = potentials.get(state).cloned().unwrap_or_else(W::zero);
                    total.plus_assign(p.times(&final_weight));
                }
            }
            total
        }
    };
    reweight(fst, &potentials, reweight_type)?;
    if remove_total_weight && !total.is_zero() {
        remove_weight(fst, &total, reweight_type)?;
    }
    Ok(())
}

/// Divides the collected total weight out of the boundary states.
fn remove_weight<W, F>(fst: &mut F, total: &W, reweight_type: ReweightType) -> Result<()>
where
    W: WeaklyDivisibleSemiring,
    F: MutableFst<W>,
{
    match reweight_type {
        ReweightType::ReweightToInitial => {
            let start = match fst.start() {
                Some(start) => start,
                None => return Ok(()),
            };
            let mut trs = fst.pop_trs(start)?;
            for tr in trs.iter_mut() {
                tr.weight = tr.weight.divide(total, DivideType::DivideLeft);
            }
            for tr in trs {
                fst.add_tr(start, tr)?;
            }
            if let Some(final_weight) = fst.final_weight(start)? {
                fst.set_final(start, final_weight.divide(total, DivideType::DivideLeft))?;
            }
        }
        ReweightType::ReweightToFinal => {
            for state in fst.states_range() {
                if let Some(final_weight) = fst.final_weight(state)? {
                    fst.set_final(state, final_weight.divide(total, DivideType::DivideRight))?;
                }
            }
        }
    }
    Ok(())
}

/// Pushes weights and/or output labels as requested. Label pushing encodes
/// the output labels into the Gallic semiring, pushes there (moving label
/// mass towards the chosen boundary) and factors the result back into
/// transitions.
pub fn push<W, F1, F2>(ifst: &F1, reweight_type: ReweightType, push_type: PushType) -> Result<F2>
where
    W: WeaklyDivisibleSemiring + WeightQuantize,
    W::ReverseWeight: Semiring<ReverseWeight = W>,
    F1: ExpandedFst<W>,
    F2: MutableFst<W>,
{
    if push_type.contains(PushType::PUSH_LABELS) {
        let mut gallic: VectorFst<GallicWeight<W>> = to_gallic(ifst)?;
        push_weights_gallic(
            &mut gallic,
            reweight_type,
            push_type.contains(PushType::REMOVE_TOTAL_WEIGHT)
                || push_type.contains(PushType::REMOVE_COMMON_AFFIX),
        )?;
        let opts = FactorWeightOptions::new(
            FactorWeightType::FACTOR_FINAL_WEIGHTS | FactorWeightType::FACTOR_ARC_WEIGHTS,
        );
        from_gallic(&gallic, opts, crate::EPS_LABEL)
    } else if push_type.contains(PushType::PUSH_WEIGHTS) {
        let mut ofst: F2 = crate::algorithms::fst_convert::fst_convert_from_ref(ifst);
        push_weights(
            &mut ofst,
            reweight_type,
            push_type.contains(PushType::REMOVE_TOTAL_WEIGHT),
        )?;
        Ok(ofst)
    } else {
        Ok(crate::algorithms::fst_convert::fst_convert_from_ref(ifst))
    }
}

fn push_weights_gallic<W>(
    fst: &mut VectorFst<GallicWeight<W>>,
    reweight_type: ReweightType,
    remove_total: bool,
) -> Result<()>
where
    W: WeaklyDivisibleSemiring + WeightQuantize,
    W::ReverseWeight: Semiring<ReverseWeight = W>,
{
    // The gallic weight reverses into a gallic over the reverse semiring;
    // the reverse pass of shortest_distance needs the round-trip bound, so
    // distances are computed directly here with a FIFO relaxation.
    let potentials = gallic_reverse_distances(fst, reweight_type)?;
    let total = match reweight_type {
        ReweightType::ReweightToInitial => fst
            .start()
            .and_then(|s| potentials.get(s).cloned())
            .unwrap_or_else(GallicWeight::one),
        ReweightType::ReweightToFinal => {
            let mut total = GallicWeight::zero();
            for state in fst.states_range() {
                if let Some(final_weight) = fst.final_weight(state)? {
                    let p = potentials
                        .get(state)
                        .cloned()
                        .unwrap_or_else(GallicWeight::zero);
                    total.plus_assign(p.times(&final_weight));
                }
            }
            total
        }
    };
    reweight(fst, &potentials, reweight_type)?;
    if remove_total && !total.is_zero() {
        remove_weight(fst, &total, reweight_type)?;
    }
    Ok(())
}

/// Distances to the finals (for pushing to initial) or from the start (for
/// pushing to final) in the Gallic semiring, by plain FIFO relaxation on
/// the appropriate graph direction.
fn gallic_reverse_distances<W>(
    fst: &VectorFst<GallicWeight<W>>,
    reweight_type: ReweightType,
) -> Result<Vec<GallicWeight<W>>>
where
    W: WeaklyDivisibleSemiring + WeightQuantize,
{
    use std::collections::VecDeque;
    let n = fst.num_states();
    let mut distance: Vec<GallicWeight<W>> = vec![GallicWeight::zero(); n];
    let mut queue = VecDeque::new();
    let mut in_queue = vec![false; n];
    match reweight_type {
        ReweightType::ReweightToInitial => {
            // Backward relaxation over the reversed graph.
            let mut reverse_adj: Vec<Vec<(usize, GallicWeight<W>)>> = vec![vec![]; n];
            for state in 0..n {
                for tr in fst.get_trs(state)?.trs() {
                    reverse_adj[tr.nextstate].push((state, tr.weight.clone()));
                }
                if let Some(final_weight) = fst.final_weight(state)? {
                    distance[state] = final_weight;
                    queue.push_back(state);
                    in_queue[state] = true;
                }
            }
            while let Some(s) = queue.pop_front() {
                in_queue[s] = false;
                let d = distance[s].clone();
                for (pred, weight) in &reverse_adj[s] {
                    let relaxed = distance[*pred].plus(&weight.times(&d));
                    if relaxed != distance[*pred] {
                        distance[*pred] = relaxed;
                        if !in_queue[*pred] {
                            in_queue[*pred] = true;
                            queue.push_back(*pred);
                        }
                    }
                }
            }
        }
        ReweightType::ReweightToFinal => {
            if let Some(start) = fst.start() {
                distance[start] = GallicWeight::one();
                queue.push_back(start);
                in_queue[start] = true;
                while let Some(s) = queue.pop_front() {
                    in_queue[s] = false;
                    let d = distance[s].clone();
                    for tr in fst.get_trs(s)?.trs() {
                        let relaxed = distance[tr.nextstate].plus(&d.times(&tr.weight));
                        if relaxed != distance[tr.nextstate] {
                            distance[tr.nextstate] = relaxed;
                            if !in_queue[tr.nextstate] {
                                in_queue[tr.nextstate] = true;
                                queue.push_back(tr.nextstate);
                            }
                        }
                    }
                }
            }
        }
    }
    Ok(distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst_traits::{CoreFst, Fst};
    use crate::semirings::TropicalWeight;
    use crate::Transition;

    fn unbalanced() -> VectorFst<TropicalWeight> {
        let mut fst = VectorFst::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        let s2 = fst.add_state();
        fst.set_start(s0).unwrap();
        fst.set_final(s2, TropicalWeight::new(2.0)).unwrap();
        fst.add_tr(s0, Transition::new(1, 1, TropicalWeight::new(1.0), s1))
            .unwrap();
        fst.add_tr(s1, Transition::new(2, 2, TropicalWeight::new(3.0), s2))
            .unwrap();
        fst
    }

    #[test]
    fn test_push_weights_to_initial() -> Result<()> {
        let mut fst = unbalanced();
        let before: Vec<_> = fst.paths_iter().collect();
        push_weights(&mut fst, ReweightType::ReweightToInitial, false)?;
        let after: Vec<_> = fst.paths_iter().collect();
        assert_eq!(before, after);
        // All the weight moved onto the first transition.
        let trs = fst.get_trs(0)?;
        assert_eq!(trs.trs()[0].weight, TropicalWeight::new(6.0));
        assert_eq!(fst.final_weight(2)?, Some(TropicalWeight::one()));
        Ok(())
    }

    #[test]
    fn test_push_weights_remove_total() -> Result<()> {
        let mut fst = unbalanced();
        push_weights(&mut fst, ReweightType::ReweightToInitial, true)?;
        let paths: Vec<_> = fst.paths_iter().collect();
        assert_eq!(paths[0].weight, TropicalWeight::one());
        Ok(())
    }
}
