use std::collections::hash_map::Entry;
use std::collections::HashMap;

use anyhow::{format_err, Result};

use crate::algorithms::lookahead_matchers::interval_set::IntervalSet;
use crate::algorithms::lookahead_matchers::state_reachable::StateReachable;
use crate::fst_impls::VectorFst;
use crate::fst_traits::{CoreFst, ExpandedFst, MutableFst};
use crate::semirings::Semiring;
use crate::{Label, StateId, Transition, EPS_LABEL};

/// Precomputed answer to "starting from state `s`, which labels can be the
/// first one consumed"; the oracle behind label lookahead.
///
/// Built by redirecting every labeled transition to a label-specific final
/// state (epsilon transitions keep their destination, so epsilon paths are
/// followed), redirecting original final weights to a dedicated final
/// marker, and compressing reachability into per-state interval sets.
#[derive(Debug)]
pub struct LabelReachableData {
    reach_input: bool,
    final_index: Option<usize>,
    label2index: HashMap<Label, usize>,
    interval_sets: Vec<IntervalSet>,
}

impl LabelReachableData {
    pub fn interval_set(&self, s: StateId) -> Result<&IntervalSet> {
        self.interval_sets
            .get(s)
            .ok_or_else(|| format_err!("LabelReachableData: missing state {}", s))
    }

    pub fn reach_input(&self) -> bool {
        self.reach_input
    }
}

#[derive(Debug)]
pub struct LabelReachable {
    data: LabelReachableData,
}

impl LabelReachable {
    /// Builds the oracle for one side of `fst`. The epsilon sub-graph must
    /// be acyclic (epsilon cycles would make "first label" ill-defined for
    /// the interval compression).
    pub fn new<W: Semiring>(fst: &VectorFst<W>, reach_input: bool) -> Result<Self> {
        let ins = fst.num_states();
        let mut transformed = VectorFst::<W>::new();
        transformed.add_states(ins);
        let mut label2state: HashMap<Label, StateId> = HashMap::new();
        let mut final_state: Option<StateId> = None;
        for s in 0..ins {
            for tr in crate::trs::Transitions::trs(&fst.get_trs(s)?) {
                let label = if reach_input { tr.ilabel } else { tr.olabel };
                let nextstate = if label == EPS_LABEL {
                    tr.nextstate
                } else {
                    match label2state.entry(label) {
                        Entry::Vacant(e) => {
                            let v = transformed.add_state();
                            e.insert(v);
                            v
                        }
                        Entry::Occupied(e) => *e.get(),
                    }
                };
                transformed.add_tr(
                    s,
                    Transition::new(EPS_LABEL, EPS_LABEL, W::one(), nextstate),
                )?;
            }
            if fst.final_weight(s)?.is_some() {
                let marker = match final_state {
                    Some(marker) => marker,
                    None => {
                        let marker = transformed.add_state();
                        final_state = Some(marker);
                        marker
                    }
                };
                transformed.add_tr(
                    s,
                    Transition::new(EPS_LABEL, EPS_LABEL, W::one(), marker),
                )?;
            }
        }
        for (_, &state) in label2state.iter() {
            transformed.set_final(state, W::one())?;
        }
        if let Some(marker) = final_state {
            transformed.set_final(marker, W::one())?;
        }
        if let Some(start) = fst.start() {
            transformed.set_start(start)?;
        }

        let state_reachable = StateReachable::new(&transformed)?;
        let label2index = label2state
            .into_iter()
            .map(|(label, state)| (label, state_reachable.state2index[state]))
            .collect();
        let final_index = final_state.map(|s| state_reachable.state2index[s]);
        let mut interval_sets = state_reachable.isets;
        interval_sets.truncate(ins);
        Ok(Self {
            data: LabelReachableData {
                reach_input,
                final_index,
                label2index,
                interval_sets,
            },
        })
    }

    pub fn reach_input(&self) -> bool {
        self.data.reach_input
    }

    /// Can `label` be the first label consumed from `current_state`?
    pub fn reach_label(&self, current_state: StateId, label: Label) -> Result<bool> {
        if label == EPS_LABEL {
            return Ok(false);
        }
        match self.data.label2index.get(&label) {
            Some(&index) => Ok(self.data.interval_set(current_state)?.member(index)),
            None => Ok(false),
        }
    }

    /// Can a final state be reached from `current_state` consuming nothing?
    pub fn reach_final(&self, current_state: StateId) -> Result<bool> {
        match self.data.final_index {
            Some(index) => Ok(self.data.interval_set(current_state)?.member(index)),
            None => Ok(false),
        }
    }
}
