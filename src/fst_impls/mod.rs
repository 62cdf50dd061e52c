pub use self::compact_fst::{AcceptorCompactor, CompactFst, Compactor, UnweightedCompactor};
pub use self::const_fst::ConstFst;
pub use self::vector_fst::VectorFst;

mod compact_fst;
mod const_fst;
mod vector_fst;
