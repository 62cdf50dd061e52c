pub use self::expanded_fst::ExpandedFst;
pub use self::fst::{CoreFst, Fst};
pub use self::iterators::{FstIterData, FstIterator, StateIterator};
pub use self::mutable_fst::{MutableFst, TrsIterMut};
pub use self::paths::{FinalStatesIterator, FstPath, PathsIterator};
pub use self::serializable_fst::SerializableFst;

mod expanded_fst;
mod fst;
mod iterators;
mod mutable_fst;
mod paths;
mod serializable_fst;
