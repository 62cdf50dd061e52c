use std::fmt::Debug;

use anyhow::Result;

use crate::fst_properties::FstProperties;
use crate::semirings::Semiring;
use crate::trs::TrsVec;
use crate::StateId;

/// Expansion operator of a delayed FST: computes the start state, a
/// state's transitions and a state's final weight on demand.
///
/// An operator must be deterministic: re-computing a state after cache
/// eviction must yield the identical transition sequence.
pub trait FstOp<W: Semiring>: Debug {
    fn compute_start(&self) -> Result<Option<StateId>>;

    fn compute_trs(&self, id: StateId) -> Result<TrsVec<W>>;

    fn compute_final_weight(&self, id: StateId) -> Result<Option<W>>;

    /// Property bits asserted of the expanded graph, stamped from the
    /// per-combinator propagation rules at construction time.
    fn properties(&self) -> FstProperties;
}
