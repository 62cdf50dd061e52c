//! Machinery behind every delayed FST: an expansion operator
//! ([`FstOp`]), a per-state cache ([`FstCache`] and its implementations)
//! and the tuple ↔ state-id bijection ([`StateTable`]). [`LazyFst`] ties
//! the three together and presents the full [`Fst`](crate::fst_traits::Fst)
//! interface.

pub use self::cache::{
    CacheOptions, CacheStatus, FstCache, GcLruCache, SimpleHashMapCache, SimpleVecCache,
};
pub use self::fst_op::FstOp;
pub use self::lazy_fst::LazyFst;
pub use self::state_table::StateTable;

mod cache;
mod fst_op;
mod lazy_fst;
mod state_table;
