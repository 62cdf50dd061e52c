use std::sync::Arc;

use anyhow::{bail, format_err, Result};

use crate::fst_properties::{
    add_state_properties, add_tr_properties, delete_all_states_properties,
    delete_states_properties, delete_trs_properties, set_final_properties, set_start_properties,
    FstProperties,
};
use crate::fst_traits::{
    CoreFst, ExpandedFst, Fst, FstIterData, FstIterator, MutableFst, StateIterator, TrsIterMut,
};
use crate::semirings::Semiring;
use crate::symbol_table::SymbolTable;
use crate::transition::Transition;
use crate::trs::{Transitions, TrsVec};
use crate::{StateId, EPS_LABEL};

/// Growable in-memory FST: one vector of states, each holding its final
/// weight and a shared vector of transitions. O(1) state and transition
/// append, O(states + transitions) deletion.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorFst<W: Semiring> {
    states: Vec<VectorFstState<W>>,
    start_state: Option<StateId>,
    isymt: Option<Arc<SymbolTable>>,
    osymt: Option<Arc<SymbolTable>>,
    properties: FstProperties,
}

#[derive(Debug, Clone, PartialEq)]
struct VectorFstState<W: Semiring> {
    final_weight: Option<W>,
    trs: TrsVec<W>,
    niepsilons: usize,
    noepsilons: usize,
}

impl<W: Semiring> Default for VectorFstState<W> {
    fn default() -> Self {
        Self {
            final_weight: None,
            trs: TrsVec::default(),
            niepsilons: 0,
            noepsilons: 0,
        }
    }
}

impl<W: Semiring> VectorFst<W> {
    fn state(&self, state_id: StateId) -> Result<&VectorFstState<W>> {
        self.states
            .get(state_id)
            .ok_or_else(|| format_err!("state {} does not exist", state_id))
    }

    fn state_mut(&mut self, state_id: StateId) -> Result<&mut VectorFstState<W>> {
        self.states
            .get_mut(state_id)
            .ok_or_else(|| format_err!("state {} does not exist", state_id))
    }
}

impl<W: Semiring> Default for VectorFst<W> {
    fn default() -> Self {
        <Self as MutableFst<W>>::new()
    }
}

impl<W: Semiring> CoreFst<W> for VectorFst<W> {
    type TRS = TrsVec<W>;

    fn start(&self) -> Option<StateId> {
        self.start_state
    }

    fn final_weight(&self, state_id: StateId) -> Result<Option<W>> {
        Ok(self.state(state_id)?.final_weight.clone())
    }

    unsafe fn final_weight_unchecked(&self, state_id: StateId) -> Option<W> {
        self.states.get_unchecked(state_id).final_weight.clone()
    }

    fn num_trs(&self, state_id: StateId) -> Result<usize> {
        Ok(self.state(state_id)?.trs.len())
    }

    unsafe fn num_trs_unchecked(&self, state_id: StateId) -> usize {
        self.states.get_unchecked(state_id).trs.len()
    }

    fn get_trs(&self, state_id: StateId) -> Result<Self::TRS> {
        Ok(self.state(state_id)?.trs.clone())
    }

    unsafe fn get_trs_unchecked(&self, state_id: StateId) -> Self::TRS {
        self.states.get_unchecked(state_id).trs.clone()
    }

    fn properties(&self) -> FstProperties {
        self.properties
    }

    fn num_input_epsilons(&self, state_id: StateId) -> Result<usize> {
        Ok(self.state(state_id)?.niepsilons)
    }

    fn num_output_epsilons(&self, state_id: StateId) -> Result<usize> {
        Ok(self.state(state_id)?.noepsilons)
    }
}

impl<'a, W: Semiring> StateIterator<'a> for VectorFst<W> {
    type Iter = std::ops::Range<StateId>;

    fn states_iter(&'a self) -> Self::Iter {
        0..self.states.len()
    }
}

/// Iterator behind [`FstIterator`] for [`VectorFst`].
pub struct VectorFstIterator<'a, W: Semiring> {
    fst: &'a VectorFst<W>,
    state: StateId,
}

impl<'a, W: Semiring> Iterator for VectorFstIterator<'a, W> {
    type Item = FstIterData<W, TrsVec<W>>;

    fn next(&mut self) -> Option<Self::Item> {
        let state = self.fst.states.get(self.state)?;
        let data = FstIterData {
            state_id: self.state,
            trs: state.trs.clone(),
            final_weight: state.final_weight.clone(),
            num_trs: state.trs.len(),
        };
        self.state += 1;
        Some(data)
    }
}

impl<'a, W: Semiring> FstIterator<'a, W> for VectorFst<W> {
    type FstIter = VectorFstIterator<'a, W>;

    fn fst_iter(&'a self) -> Self::FstIter {
        VectorFstIterator {
            fst: self,
            state: 0,
        }
    }
}

impl<W: Semiring> Fst<W> for VectorFst<W> {
    fn input_symbols(&self) -> Option<&Arc<SymbolTable>> {
        self.isymt.as_ref()
    }

    fn output_symbols(&self) -> Option<&Arc<SymbolTable>> {
        self.osymt.as_ref()
    }

    fn set_input_symbols(&mut self, symt: Arc<SymbolTable>) {
        self.isymt = Some(symt);
    }

    fn set_output_symbols(&mut self, symt: Arc<SymbolTable>) {
        self.osymt = Some(symt);
    }

    fn take_input_symbols(&mut self) -> Option<Arc<SymbolTable>> {
        self.isymt.take()
    }

    fn take_output_symbols(&mut self) -> Option<Arc<SymbolTable>> {
        self.osymt.take()
    }
}

impl<W: Semiring> ExpandedFst<W> for VectorFst<W> {
    fn num_states(&self) -> usize {
        self.states.len()
    }
}

impl<W: Semiring> MutableFst<W> for VectorFst<W> {
    fn new() -> Self {
        Self {
            states: vec![],
            start_state: None,
            isymt: None,
            osymt: None,
            properties: FstProperties::empty_fst_properties()
                | FstProperties::EXPANDED
                | FstProperties::MUTABLE,
        }
    }

    fn set_start(&mut self, state_id: StateId) -> Result<()> {
        if state_id >= self.states.len() {
            bail!("set_start: state {} does not exist", state_id);
        }
        self.start_state = Some(state_id);
        self.properties = set_start_properties(self.properties);
        Ok(())
    }

    unsafe fn set_start_unchecked(&mut self, state_id: StateId) {
        self.start_state = Some(state_id);
        self.properties = set_start_properties(self.properties);
    }

    fn set_final(&mut self, state_id: StateId, final_weight: W) -> Result<()> {
        let old_weight = std::mem::replace(
            &mut self.state_mut(state_id)?.final_weight,
            Some(final_weight),
        );
        self.properties = set_final_properties(
            self.properties,
            old_weight.as_ref(),
            self.states[state_id].final_weight.as_ref(),
        );
        Ok(())
    }

    unsafe fn set_final_unchecked(&mut self, state_id: StateId, final_weight: W) {
        let old_weight = std::mem::replace(
            &mut self.states.get_unchecked_mut(state_id).final_weight,
            Some(final_weight),
        );
        self.properties = set_final_properties(
            self.properties,
            old_weight.as_ref(),
            self.states.get_unchecked(state_id).final_weight.as_ref(),
        );
    }

    fn delete_final_weight(&mut self, state_id: StateId) -> Result<()> {
        let old_weight = self.state_mut(state_id)?.final_weight.take();
        self.properties = set_final_properties::<W>(self.properties, old_weight.as_ref(), None);
        Ok(())
    }

    fn add_state(&mut self) -> StateId {
        self.states.push(VectorFstState::default());
        self.properties = add_state_properties(self.properties);
        self.states.len() - 1
    }

    fn add_tr(&mut self, state_id: StateId, tr: Transition<W>) -> Result<()> {
        if state_id >= self.states.len() {
            bail!("add_tr: state {} does not exist", state_id);
        }
        unsafe { self.add_tr_unchecked(state_id, tr) };
        Ok(())
    }

    unsafe fn add_tr_unchecked(&mut self, state_id: StateId, tr: Transition<W>) {
        self.properties = add_tr_properties(
            self.properties,
            state_id,
            &tr,
            self.states.get_unchecked(state_id).trs.trs().last(),
        );
        let state = self.states.get_unchecked_mut(state_id);
        if tr.ilabel == EPS_LABEL {
            state.niepsilons += 1;
        }
        if tr.olabel == EPS_LABEL {
            state.noepsilons += 1;
        }
        state.trs.push(tr);
    }

    fn del_states<T: IntoIterator<Item = StateId>>(&mut self, states: T) -> Result<()> {
        let mut to_delete = vec![false; self.states.len()];
        for state_id in states {
            if state_id >= self.states.len() {
                bail!("del_states: state {} does not exist", state_id);
            }
            to_delete[state_id] = true;
        }
        // Old id -> new id, deleted states mapped to None.
        let mut mapping = vec![None; self.states.len()];
        let mut next = 0;
        for (old, deleted) in to_delete.iter().enumerate() {
            if !deleted {
                mapping[old] = Some(next);
                next += 1;
            }
        }
        let old_states = std::mem::take(&mut self.states);
        for (old_id, mut state) in old_states.into_iter().enumerate() {
            if mapping[old_id].is_none() {
                continue;
            }
            let mut trs = Vec::with_capacity(state.trs.len());
            state.niepsilons = 0;
            state.noepsilons = 0;
            for tr in state.trs.trs() {
                if let Some(nextstate) = mapping[tr.nextstate] {
                    if tr.ilabel == EPS_LABEL {
                        state.niepsilons += 1;
                    }
                    if tr.olabel == EPS_LABEL {
                        state.noepsilons += 1;
                    }
                    let mut tr = tr.clone();
                    tr.nextstate = nextstate;
                    trs.push(tr);
                }
            }
            state.trs = TrsVec::from(trs);
            self.states.push(state);
        }
        self.start_state = self.start_state.and_then(|s| mapping[s]);
        self.properties = delete_states_properties(self.properties);
        Ok(())
    }

    fn del_all_states(&mut self) {
        self.states.clear();
        self.start_state = None;
        self.properties = delete_all_states_properties()
            | (self.properties & (FstProperties::EXPANDED | FstProperties::MUTABLE));
    }

    fn delete_trs(&mut self, state_id: StateId) -> Result<()> {
        let props = self.properties;
        let state = self.state_mut(state_id)?;
        state.trs = TrsVec::default();
        state.niepsilons = 0;
        state.noepsilons = 0;
        self.properties = delete_trs_properties(props);
        Ok(())
    }

    fn pop_trs(&mut self, state_id: StateId) -> Result<Vec<Transition<W>>> {
        let props = self.properties;
        let state = self.state_mut(state_id)?;
        let trs = std::mem::take(&mut state.trs);
        state.niepsilons = 0;
        state.noepsilons = 0;
        self.properties = delete_trs_properties(props);
        // Reuses the allocation when this FST held the only handle.
        Ok(Arc::try_unwrap(trs.0).unwrap_or_else(|arc| (*arc).clone()))
    }

    fn tr_iter_mut(&mut self, state_id: StateId) -> Result<TrsIterMut<W>> {
        // Arbitrary in-place edits can invalidate any content bit.
        self.properties &= FstProperties::EXPANDED | FstProperties::MUTABLE;
        let state = self.state_mut(state_id)?;
        let trs = Arc::make_mut(&mut state.trs.0);
        Ok(TrsIterMut::new(
            trs,
            &mut state.niepsilons,
            &mut state.noepsilons,
        ))
    }

    fn reserve_states(&mut self, n: usize) {
        self.states.reserve(n);
    }

    fn reserve_trs(&mut self, state_id: StateId, n: usize) -> Result<()> {
        let state = self.state_mut(state_id)?;
        Arc::make_mut(&mut state.trs.0).reserve(n);
        Ok(())
    }

    fn set_properties(&mut self, props: FstProperties) {
        self.properties =
            props | (self.properties & (FstProperties::EXPANDED | FstProperties::MUTABLE));
    }

    fn set_properties_with_mask(&mut self, props: FstProperties, mask: FstProperties) {
        self.properties = (self.properties - mask) | (props & mask);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semirings::TropicalWeight;

    #[test]
    fn test_build_small_fst() -> Result<()> {
        let mut fst = VectorFst::<TropicalWeight>::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        fst.set_start(s0)?;
        fst.set_final(s1, TropicalWeight::new(0.5))?;
        fst.add_tr(s0, Transition::new(1, 2, TropicalWeight::new(1.0), s1))?;
        assert_eq!(fst.num_states(), 2);
        assert_eq!(fst.num_trs(s0)?, 1);
        assert_eq!(fst.final_weight(s1)?, Some(TropicalWeight::new(0.5)));
        assert!(fst.final_weight(s0)?.is_none());
        assert!(fst.final_weight(42).is_err());
        Ok(())
    }

    #[test]
    fn test_empty_fst_properties() {
        let fst = VectorFst::<TropicalWeight>::new();
        let props = fst.properties();
        assert!(props.contains(FstProperties::ACCEPTOR));
        assert!(props.contains(FstProperties::ACYCLIC));
        assert!(props.contains(FstProperties::TOP_SORTED));
        assert!(props.contains(FstProperties::UNWEIGHTED));
        assert!(props.contains(FstProperties::NO_EPSILONS));
        assert!(props.contains(FstProperties::I_DETERMINISTIC));
        assert!(props.contains(FstProperties::O_DETERMINISTIC));
    }

    #[test]
    fn test_add_tr_property_tracking() -> Result<()> {
        let mut fst = VectorFst::<TropicalWeight>::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        fst.set_start(s0)?;
        fst.add_tr(s0, Transition::new(2, 2, TropicalWeight::one(), s1))?;
        assert!(fst.properties().contains(FstProperties::I_LABEL_SORTED));
        // Out-of-order append clears the sorted bit.
        fst.add_tr(s0, Transition::new(1, 1, TropicalWeight::one(), s1))?;
        assert!(!fst.properties().contains(FstProperties::I_LABEL_SORTED));
        assert!(fst
            .properties()
            .contains(FstProperties::NOT_I_LABEL_SORTED));
        Ok(())
    }

    #[test]
    fn test_del_states_remaps() -> Result<()> {
        let mut fst = VectorFst::<TropicalWeight>::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        let s2 = fst.add_state();
        fst.set_start(s0)?;
        fst.set_final(s2, TropicalWeight::one())?;
        fst.add_tr(s0, Transition::new(1, 1, TropicalWeight::one(), s1))?;
        fst.add_tr(s0, Transition::new(2, 2, TropicalWeight::one(), s2))?;
        fst.del_states(vec![s1])?;
        assert_eq!(fst.num_states(), 2);
        // The transition into the deleted state is gone; the other one is
        // renumbered.
        let trs = fst.get_trs(s0)?;
        assert_eq!(trs.len(), 1);
        assert_eq!(trs.trs()[0].nextstate, 1);
        assert_eq!(fst.final_weight(1)?, Some(TropicalWeight::one()));
        Ok(())
    }

    #[test]
    fn test_epsilon_counters() -> Result<()> {
        let mut fst = VectorFst::<TropicalWeight>::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        fst.add_tr(s0, Transition::new(0, 1, TropicalWeight::one(), s1))?;
        fst.add_tr(s0, Transition::new(0, 0, TropicalWeight::one(), s1))?;
        assert_eq!(fst.num_input_epsilons(s0)?, 2);
        assert_eq!(fst.num_output_epsilons(s0)?, 1);
        Ok(())
    }
}
