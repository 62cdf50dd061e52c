use std::path::Path;

use anyhow::Result;

use crate::fst_traits::ExpandedFst;
use crate::semirings::SerializableSemiring;

/// Concrete FST types that cross the I/O boundary, in both the binary
/// format (magic-framed header plus a type-specific body) and the textual
/// one-transition-per-line format.
pub trait SerializableFst<W: SerializableSemiring>: ExpandedFst<W> {
    /// Stable identifier of the concrete type, stored in binary headers.
    fn fst_type() -> String;

    /// Reads a binary FST, validating magic, type and version.
    fn read<P: AsRef<Path>>(path: P) -> Result<Self>;

    /// Writes the binary form.
    fn write<P: AsRef<Path>>(&self, path: P) -> Result<()>;

    /// Parses the textual form.
    fn from_text_string(fst_string: &str) -> Result<Self>;

    /// Reads the textual form from a file.
    fn read_text<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_text_string(&data)
    }

    /// Renders the textual form.
    fn text(&self) -> Result<String>;

    /// Writes the textual form to a file.
    fn write_text<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.text()?)?;
        Ok(())
    }
}
