//! Rust library for constructing, combining, optimizing and searching
//! weighted finite-state transducers (wFSTs).
//!
//! A weighted finite-state transducer is a directed multigraph whose edges
//! carry an input label, an output label and a weight drawn from a semiring;
//! each state optionally carries a final weight. Weighted acceptors are the
//! special case where input and output labels agree on every transition.
//!
//! The crate decomposes into:
//!
//! - [`semirings`]: the algebraic weight contract and a catalogue of concrete
//!   and composite weights (tropical, log, string, product, gallic, ...).
//! - [`fst_traits`]: the polymorphic transducer interface
//!   ([`CoreFst`](fst_traits::CoreFst), [`Fst`](fst_traits::Fst),
//!   [`ExpandedFst`](fst_traits::ExpandedFst),
//!   [`MutableFst`](fst_traits::MutableFst)).
//! - [`fst_impls`]: in-memory representations
//!   ([`VectorFst`](fst_impls::VectorFst), [`ConstFst`](fst_impls::ConstFst),
//!   [`CompactFst`](fst_impls::CompactFst)).
//! - [`fst_properties`]: cheap capability facts about a transducer and their
//!   propagation through every combinator.
//! - [`lazy`]: the on-demand expansion engine behind every delayed
//!   transducer (state tables, per-state caches, eviction).
//! - [`algorithms`]: composition with pluggable matchers and epsilon
//!   filters, connection, shortest-distance and shortest-path,
//!   determinization, epsilon removal, topological sort, reversal, pushing,
//!   and the rational combinators (union, concatenation, closure, replace).
//! - [`parsers`]: the textual and binary transducer formats.
//!
//! ## Example
//!
//! ```rust
//! use anyhow::Result;
//! use wfst::algorithms::compose::compose;
//! use wfst::fst_impls::VectorFst;
//! use wfst::fst_traits::MutableFst;
//! use wfst::semirings::{Semiring, TropicalWeight};
//!
//! fn main() -> Result<()> {
//!     let mut a = VectorFst::<TropicalWeight>::new();
//!     let s0 = a.add_state();
//!     let s1 = a.add_state();
//!     a.set_start(s0)?;
//!     a.set_final(s1, TropicalWeight::new(0.5))?;
//!     a.emplace_tr(s0, 3, 4, TropicalWeight::new(1.0), s1)?;
//!
//!     let mut b = VectorFst::<TropicalWeight>::new();
//!     let t0 = b.add_state();
//!     let t1 = b.add_state();
//!     b.set_start(t0)?;
//!     b.set_final(t1, TropicalWeight::one())?;
//!     b.emplace_tr(t0, 4, 5, TropicalWeight::new(2.5), t1)?;
//!
//!     let c: VectorFst<TropicalWeight> = compose(a, b)?;
//!     Ok(())
//! }
//! ```

#[macro_use]
mod macros;

pub mod algorithms;
mod config;
pub mod fst_impls;
pub mod fst_properties;
pub mod fst_traits;
pub mod lazy;
pub mod parsers;
pub mod semirings;
mod symbol_table;
mod transition;
mod trs;
pub mod utils;

pub use crate::config::{core_config, set_core_config, CoreConfig};
pub use crate::symbol_table::{compat_symbols, SymbolTable};
pub use crate::transition::Transition;
pub use crate::trs::{Transitions, TrsConst, TrsVec};

/// Label of a transition. `0` is reserved for epsilon.
pub type Label = usize;

/// Identifier of a state. "No state" is expressed as `Option<StateId>`.
pub type StateId = usize;

/// Epsilon label: matches without consuming a symbol on that side.
pub const EPS_LABEL: Label = 0;

/// Sentinel meaning "no label". Internal to the library; a transition
/// carrying it on one side does not consume a symbol there.
pub const NO_LABEL: Label = usize::MAX;

/// Symbol conventionally attached to `EPS_LABEL` in symbol tables.
pub const EPS_SYMBOL: &str = "<eps>";

/// Default tolerance for weight quantization and approximate equality.
pub const KDELTA: f32 = 1.0 / 1024.0;

/// Default convergence tolerance for shortest-distance relaxation.
pub const KSHORTESTDELTA: f32 = 1e-6;

/// A prelude re-exporting the types most user code touches.
pub mod prelude {
    pub use crate::algorithms::compose::compose;
    pub use crate::algorithms::{
        closure, concat, connect, determinize, invert, project, push, reverse, rm_epsilon,
        shortest_distance, shortest_path, top_sort, tr_sort, union,
    };
    pub use crate::fst_impls::{CompactFst, ConstFst, VectorFst};
    pub use crate::fst_traits::{
        CoreFst, ExpandedFst, Fst, FstIterator, MutableFst, SerializableFst, StateIterator,
    };
    pub use crate::semirings::{
        LogWeight, Semiring, SerializableSemiring, TropicalWeight, WeaklyDivisibleSemiring,
        WeightQuantize,
    };
    pub use crate::{Label, StateId, SymbolTable, Transition, TrsVec, EPS_LABEL, NO_LABEL};
}
