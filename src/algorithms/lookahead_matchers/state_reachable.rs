use anyhow::{format_err, Result};

use crate::algorithms::dfs_visit::top_order;
use crate::algorithms::lookahead_matchers::interval_set::IntervalSet;
use crate::fst_traits::ExpandedFst;
use crate::semirings::Semiring;
use crate::trs::Transitions;
use crate::StateId;

/// Final-state reachability of an acyclic FST: final states are numbered
/// in topological order and every state carries the interval set of final
/// indices reachable from it. Numbering finals topologically keeps the
/// sets made of few intervals.
#[derive(Debug)]
pub struct StateReachable {
    /// Final index of each state; `usize::MAX` for non-final states.
    pub state2index: Vec<usize>,
    /// Reachable final indices per state.
    pub isets: Vec<IntervalSet>,
}

impl StateReachable {
    pub fn new<W: Semiring, F: ExpandedFst<W>>(fst: &F) -> Result<Self> {
        let n = fst.num_states();
        let order =
            top_order(fst)?.ok_or_else(|| format_err!("StateReachable: input is cyclic"))?;
        // States sorted by topological position.
        let mut by_position = vec![0; n];
        for (state, position) in order.iter().enumerate() {
            by_position[*position] = state;
        }
        // Number the final states in topological order.
        let mut state2index = vec![usize::MAX; n];
        let mut next_index = 0;
        for &state in &by_position {
            if fst.final_weight(state)?.is_some() {
                state2index[state] = next_index;
                next_index += 1;
            }
        }
        // Propagate interval sets backwards.
        let mut isets = vec![IntervalSet::new(); n];
        for &state in by_position.iter().rev() {
            let mut iset = IntervalSet::new();
            if state2index[state] != usize::MAX {
                iset.insert(state2index[state]);
            }
            for tr in fst.get_trs(state)?.trs() {
                let successor = isets[tr.nextstate].clone();
                iset.union(&successor);
            }
            isets[state] = iset;
        }
        Ok(Self { state2index, isets })
    }

    /// Interval set of the given state.
    pub fn iset(&self, state: StateId) -> Option<&IntervalSet> {
        self.isets.get(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst_impls::VectorFst;
    use crate::fst_traits::MutableFst;
    use crate::semirings::TropicalWeight;
    use crate::Transition;

    #[test]
    fn test_state_reachable() -> Result<()> {
        // Diamond with two final leaves.
        let mut fst = VectorFst::<TropicalWeight>::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        let s2 = fst.add_state();
        fst.set_start(s0)?;
        fst.set_final(s1, TropicalWeight::one())?;
        fst.set_final(s2, TropicalWeight::one())?;
        fst.add_tr(s0, Transition::new(1, 1, TropicalWeight::one(), s1))?;
        fst.add_tr(s0, Transition::new(2, 2, TropicalWeight::one(), s2))?;
        let reachable = StateReachable::new(&fst)?;
        let iset0 = reachable.iset(s0).unwrap();
        assert!(iset0.member(reachable.state2index[s1]));
        assert!(iset0.member(reachable.state2index[s2]));
        let iset1 = reachable.iset(s1).unwrap();
        assert!(iset1.member(reachable.state2index[s1]));
        assert!(!iset1.member(reachable.state2index[s2]));
        Ok(())
    }
}
