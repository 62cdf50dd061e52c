use std::collections::VecDeque;

use anyhow::Result;

use crate::algorithms::connect::connect;
use crate::fst_properties::op_properties::rm_epsilon_properties;
use crate::fst_properties::FstProperties;
use crate::fst_traits::MutableFst;
use crate::semirings::Semiring;
use crate::trs::Transitions;
use crate::{StateId, Transition, EPS_LABEL, KSHORTESTDELTA};

/// Removes all double-epsilon transitions in place, preserving the
/// relation: for every state, the `Plus`-sum of epsilon-path weights to
/// each epsilon-reachable descendant is folded into that descendant's
/// non-epsilon transitions and final weight. Dead states are trimmed
/// afterwards.
///
/// On cyclic epsilon subgraphs the closure weights are converged to within
/// the shortest-distance tolerance, so the semiring must be convergent
/// there (always true when epsilon cycles carry `One`).
pub fn rm_epsilon<W: Semiring, F: MutableFst<W>>(fst: &mut F) -> Result<()> {
    let props = fst.properties();
    let num_states = fst.num_states();
    let mut new_trs: Vec<Vec<Transition<W>>> = Vec::with_capacity(num_states);
    let mut new_finals: Vec<Option<W>> = Vec::with_capacity(num_states);
    for state in 0..num_states {
        let closure = epsilon_closure(fst, state)?;
        let mut trs = vec![];
        let mut final_weight: Option<W> = fst.final_weight(state)?;
        for (reached, eps_distance) in closure {
            for tr in fst.get_trs(reached)?.trs() {
                if tr.ilabel == EPS_LABEL && tr.olabel == EPS_LABEL {
                    continue;
                }
                trs.push(Transition::new(
                    tr.ilabel,
                    tr.olabel,
                    eps_distance.times(&tr.weight),
                    tr.nextstate,
                ));
            }
            if let Some(reached_final) = fst.final_weight(reached)? {
                let contribution = eps_distance.times(&reached_final);
                final_weight = Some(match final_weight {
                    Some(w) => w.plus(&contribution),
                    None => contribution,
                });
            }
        }
        for tr in fst.get_trs(state)?.trs() {
            if !(tr.ilabel == EPS_LABEL && tr.olabel == EPS_LABEL) {
                trs.push(tr.clone());
            }
        }
        new_trs.push(trs);
        new_finals.push(final_weight);
    }
    for (state, (trs, final_weight)) in new_trs.into_iter().zip(new_finals).enumerate() {
        fst.delete_trs(state)?;
        for tr in trs {
            fst.add_tr(state, tr)?;
        }
        match final_weight {
            Some(w) => fst.set_final(state, w)?,
            None => fst.delete_final_weight(state)?,
        }
    }
    connect(fst)?;
    fst.set_properties_with_mask(
        rm_epsilon_properties(props),
        FstProperties::copy_properties(),
    );
    Ok(())
}

/// Epsilon-reachable strict descendants of `state` with their `Plus`-summed
/// epsilon-path distances, by relaxation restricted to double-epsilon
/// transitions.
fn epsilon_closure<W: Semiring, F: MutableFst<W>>(
    fst: &F,
    state: StateId,
) -> Result<Vec<(StateId, W)>> {
    let mut distance: Vec<Option<W>> = vec![None; fst.num_states()];
    let mut adder: Vec<W> = vec![W::zero(); fst.num_states()];
    let mut in_queue = vec![false; fst.num_states()];
    let mut queue = VecDeque::new();
    distance[state] = Some(W::one());
    adder[state] = W::one();
    queue.push_back(state);
    in_queue[state] = true;
    while let Some(s) = queue.pop_front() {
        in_queue[s] = false;
        let r = std::mem::replace(&mut adder[s], W::zero());
        for tr in fst.get_trs(s)?.trs() {
            if tr.ilabel != EPS_LABEL || tr.olabel != EPS_LABEL {
                continue;
            }
            let next = tr.nextstate;
            let contribution = r.times(&tr.weight);
            let old = distance[next].clone().unwrap_or_else(W::zero);
            let relaxed = old.plus(&contribution);
            if !old.approx_equal(&relaxed, KSHORTESTDELTA) || distance[next].is_none() {
                distance[next] = Some(relaxed);
                adder[next].plus_assign(&contribution);
                if !in_queue[next] {
                    in_queue[next] = true;
                    queue.push_back(next);
                }
            }
        }
    }
    Ok(distance
        .into_iter()
        .enumerate()
        .filter(|(s, _)| *s != state)
        .filter_map(|(s, d)| d.map(|d| (s, d)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst_impls::VectorFst;
    use crate::fst_properties::FstProperties;
    use crate::fst_traits::{CoreFst, ExpandedFst, Fst};
    use crate::semirings::TropicalWeight;

    #[test]
    fn test_rm_epsilon_simple() -> Result<()> {
        // 0 -eps:eps/1-> 1 -a:a/2-> 2(final)
        let mut fst = VectorFst::<TropicalWeight>::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        let s2 = fst.add_state();
        fst.set_start(s0)?;
        fst.set_final(s2, TropicalWeight::one())?;
        fst.add_tr(s0, Transition::new(0, 0, TropicalWeight::new(1.0), s1))?;
        fst.add_tr(s1, Transition::new(1, 1, TropicalWeight::new(2.0), s2))?;
        rm_epsilon(&mut fst)?;
        let paths: Vec<_> = fst.paths_iter().collect();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].ilabels, vec![1]);
        assert_eq!(paths[0].weight, TropicalWeight::new(3.0));
        for s in fst.states_range() {
            for tr in fst.get_trs(s)?.trs() {
                assert!(!(tr.ilabel == EPS_LABEL && tr.olabel == EPS_LABEL));
            }
        }
        assert!(fst.properties().contains(FstProperties::NO_EPSILONS));
        Ok(())
    }

    #[test]
    fn test_rm_epsilon_final_absorption() -> Result<()> {
        // 0 -eps/0.5-> 1(final/0.25); the start state becomes final with
        // weight 0.75.
        let mut fst = VectorFst::<TropicalWeight>::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        fst.set_start(s0)?;
        fst.set_final(s1, TropicalWeight::new(0.25))?;
        fst.add_tr(s0, Transition::new(0, 0, TropicalWeight::new(0.5), s1))?;
        rm_epsilon(&mut fst)?;
        assert_eq!(fst.final_weight(0)?, Some(TropicalWeight::new(0.75)));
        Ok(())
    }
}
