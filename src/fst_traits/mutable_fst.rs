use anyhow::Result;

use crate::fst_properties::{compute_fst_properties, FstProperties};
use crate::fst_traits::{ExpandedFst, Fst};
use crate::semirings::Semiring;
use crate::transition::Transition;
use crate::{Label, StateId};

/// An FST supporting in-place construction and mutation. Every mutator
/// keeps the stored property bits valid by intersecting them with the
/// mask of its operation.
pub trait MutableFst<W: Semiring>: ExpandedFst<W> {
    /// Creates an empty FST.
    fn new() -> Self;

    fn set_start(&mut self, state_id: StateId) -> Result<()>;

    /// # Safety
    /// `state_id` must be a valid state of this FST.
    unsafe fn set_start_unchecked(&mut self, state_id: StateId);

    fn set_final(&mut self, state_id: StateId, final_weight: W) -> Result<()>;

    /// # Safety
    /// `state_id` must be a valid state of this FST.
    unsafe fn set_final_unchecked(&mut self, state_id: StateId, final_weight: W);

    fn delete_final_weight(&mut self, state_id: StateId) -> Result<()>;

    fn add_state(&mut self) -> StateId;

    fn add_states(&mut self, n: usize) {
        for _ in 0..n {
            self.add_state();
        }
    }

    fn add_tr(&mut self, state_id: StateId, tr: Transition<W>) -> Result<()>;

    /// # Safety
    /// `state_id` and `tr.nextstate` must be valid states of this FST.
    unsafe fn add_tr_unchecked(&mut self, state_id: StateId, tr: Transition<W>);

    fn emplace_tr(
        &mut self,
        state_id: StateId,
        ilabel: Label,
        olabel: Label,
        weight: W,
        nextstate: StateId,
    ) -> Result<()> {
        self.add_tr(state_id, Transition::new(ilabel, olabel, weight, nextstate))
    }

    /// Removes the listed states and renumbers the rest, dropping every
    /// transition into a removed state.
    fn del_states<T: IntoIterator<Item = StateId>>(&mut self, states: T) -> Result<()>;

    fn del_all_states(&mut self);

    /// Removes all transitions leaving `state_id`.
    fn delete_trs(&mut self, state_id: StateId) -> Result<()>;

    /// Removes and returns all transitions leaving `state_id`.
    fn pop_trs(&mut self, state_id: StateId) -> Result<Vec<Transition<W>>>;

    /// Position-based in-place transition mutation. Opening the iterator
    /// invalidates the cached sort, determinism, epsilon and weight bits.
    fn tr_iter_mut(&mut self, state_id: StateId) -> Result<TrsIterMut<W>>;

    fn reserve_states(&mut self, n: usize);

    fn reserve_trs(&mut self, state_id: StateId, n: usize) -> Result<()>;

    /// Copies both symbol tables of `other` onto this FST.
    fn set_symts_from_fst<W2: Semiring, OF: Fst<W2>>(&mut self, other: &OF) {
        if let Some(symt) = other.input_symbols() {
            self.set_input_symbols(symt.clone());
        } else {
            self.take_input_symbols();
        }
        if let Some(symt) = other.output_symbols() {
            self.set_output_symbols(symt.clone());
        } else {
            self.take_output_symbols();
        }
    }

    /// Overwrites the stored property bits. The caller asserts the bits
    /// hold; contradicting a freshly computed value is a logic error.
    fn set_properties(&mut self, props: FstProperties);

    /// Updates only the bits selected by `mask`.
    fn set_properties_with_mask(&mut self, props: FstProperties, mask: FstProperties);

    /// Computes any bits of `mask` not currently known, caches the full
    /// result and returns the requested bits. With the `verify_properties`
    /// knob on, every computation also cross-checks the previously stored
    /// bits; a stored bit contradicting a computed one is an internal bug
    /// and fails fast.
    fn compute_and_update_properties(&mut self, mask: FstProperties) -> Result<FstProperties> {
        let known = self.properties().known_properties();
        let verify = crate::config::core_config().verify_properties;
        if verify || !(mask - FstProperties::binary_properties() - known).is_empty() {
            let computed = compute_fst_properties(self)?;
            if verify {
                let stored = self.properties() & FstProperties::trinary_properties();
                assert!(
                    computed.contains(stored),
                    "property contradiction: stored {:?} not confirmed by computed {:?}",
                    stored,
                    computed
                );
            }
            let binary = self.properties() & FstProperties::binary_properties();
            self.set_properties(computed | binary);
        }
        Ok(self.properties() & mask)
    }

    fn compute_and_update_properties_all(&mut self) -> Result<FstProperties> {
        self.compute_and_update_properties(FstProperties::all_properties())
    }
}

/// Mutable, position-addressed view of the transitions of one state. All
/// edits go through [`set_value`](TrsIterMut::set_value) so the per-state
/// epsilon counters stay exact.
pub struct TrsIterMut<'a, W: Semiring> {
    trs: &'a mut Vec<Transition<W>>,
    niepsilons: &'a mut usize,
    noepsilons: &'a mut usize,
    pos: usize,
}

impl<'a, W: Semiring> TrsIterMut<'a, W> {
    /// The caller is responsible for having invalidated the property bits
    /// this view can break.
    pub(crate) fn new(
        trs: &'a mut Vec<Transition<W>>,
        niepsilons: &'a mut usize,
        noepsilons: &'a mut usize,
    ) -> Self {
        Self {
            trs,
            niepsilons,
            noepsilons,
            pos: 0,
        }
    }

    pub fn done(&self) -> bool {
        self.pos >= self.trs.len()
    }

    pub fn len(&self) -> usize {
        self.trs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trs.is_empty()
    }

    pub fn value(&self) -> Option<&Transition<W>> {
        self.trs.get(self.pos)
    }

    pub fn next(&mut self) {
        self.pos += 1;
    }

    pub fn reset(&mut self) {
        self.pos = 0;
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn set_value(&mut self, tr: Transition<W>) -> Result<()> {
        match self.trs.get_mut(self.pos) {
            Some(slot) => {
                if slot.ilabel == crate::EPS_LABEL {
                    *self.niepsilons -= 1;
                }
                if slot.olabel == crate::EPS_LABEL {
                    *self.noepsilons -= 1;
                }
                if tr.ilabel == crate::EPS_LABEL {
                    *self.niepsilons += 1;
                }
                if tr.olabel == crate::EPS_LABEL {
                    *self.noepsilons += 1;
                }
                *slot = tr;
                Ok(())
            }
            None => anyhow::bail!("TrsIterMut: position {} out of range", self.pos),
        }
    }
}
