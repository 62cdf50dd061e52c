//! The textual and binary transducer formats and the potentials file
//! format. Byte-level framing lives here; the algorithms never touch it.

pub use self::bin_fst::{BinFormatError, FST_MAGIC_NUMBER};
pub use self::text_fst::ParsedTextFst;
pub use self::text_potentials::{read_potentials, write_potentials};

pub mod bin_fst;
pub mod text_fst;
mod text_potentials;
mod serializable_fsts;
