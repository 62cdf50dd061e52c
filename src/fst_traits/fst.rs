use std::fmt::Debug;
use std::sync::Arc;

use anyhow::Result;

use crate::fst_properties::FstProperties;
use crate::fst_traits::iterators::{FstIterator, StateIterator};
use crate::fst_traits::paths::{FinalStatesIterator, PathsIterator};
use crate::semirings::Semiring;
use crate::symbol_table::SymbolTable;
use crate::trs::Transitions;
use crate::{StateId, EPS_LABEL};

/// Read-only random access to the states and transitions of an FST.
pub trait CoreFst<W: Semiring> {
    /// Handle returned when asking for the transitions of a state.
    type TRS: Transitions<W>;

    /// Start state, or `None` for the empty FST.
    fn start(&self) -> Option<StateId>;

    /// Final weight of a state; `None` marks a non-final state.
    fn final_weight(&self, state_id: StateId) -> Result<Option<W>>;

    /// # Safety
    /// `state_id` must be a valid state of this FST.
    unsafe fn final_weight_unchecked(&self, state_id: StateId) -> Option<W>;

    fn is_final(&self, state_id: StateId) -> Result<bool> {
        Ok(self.final_weight(state_id)?.is_some())
    }

    /// Number of transitions leaving a state.
    fn num_trs(&self, state_id: StateId) -> Result<usize>;

    /// # Safety
    /// `state_id` must be a valid state of this FST.
    unsafe fn num_trs_unchecked(&self, state_id: StateId) -> usize;

    /// Outgoing transitions of a state.
    fn get_trs(&self, state_id: StateId) -> Result<Self::TRS>;

    /// # Safety
    /// `state_id` must be a valid state of this FST.
    unsafe fn get_trs_unchecked(&self, state_id: StateId) -> Self::TRS;

    /// Property bits known of this FST, with no computation: every set bit
    /// holds, unset bits are merely unknown.
    fn properties(&self) -> FstProperties;

    fn properties_with_mask(&self, mask: FstProperties) -> FstProperties {
        self.properties() & mask
    }

    fn num_input_epsilons(&self, state_id: StateId) -> Result<usize> {
        Ok(self
            .get_trs(state_id)?
            .trs()
            .iter()
            .filter(|tr| tr.ilabel == EPS_LABEL)
            .count())
    }

    fn num_output_epsilons(&self, state_id: StateId) -> Result<usize> {
        Ok(self
            .get_trs(state_id)?
            .trs()
            .iter()
            .filter(|tr| tr.olabel == EPS_LABEL)
            .count())
    }
}

/// An FST: core access plus state iteration and symbol tables.
pub trait Fst<W: Semiring>:
    CoreFst<W> + for<'a> StateIterator<'a> + for<'b> FstIterator<'b, W> + Debug
{
    fn input_symbols(&self) -> Option<&Arc<SymbolTable>>;
    fn output_symbols(&self) -> Option<&Arc<SymbolTable>>;

    fn set_input_symbols(&mut self, symt: Arc<SymbolTable>);
    fn set_output_symbols(&mut self, symt: Arc<SymbolTable>);

    fn take_input_symbols(&mut self) -> Option<Arc<SymbolTable>>;
    fn take_output_symbols(&mut self) -> Option<Arc<SymbolTable>>;

    /// Iterator over the accepting paths. Cycles are not followed, so the
    /// enumeration is exhaustive on acyclic FSTs only.
    fn paths_iter(&self) -> PathsIterator<W>
    where
        Self: Sized,
    {
        PathsIterator::new(self)
    }

    /// Iterator over the final states and their weights.
    fn final_states_iter(&self) -> FinalStatesIterator<'_, W, Self>
    where
        Self: Sized,
    {
        FinalStatesIterator::new(self)
    }
}
