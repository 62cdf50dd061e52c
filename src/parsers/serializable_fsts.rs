use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::Result;

use crate::fst_impls::{ConstFst, VectorFst};
use crate::fst_traits::SerializableFst;
use crate::parsers::bin_fst::{read_expanded_body, write_expanded_body};
use crate::parsers::text_fst::{render_text_fst, ParsedTextFst};
use crate::semirings::SerializableSemiring;

impl<W: SerializableSemiring> SerializableFst<W> for VectorFst<W> {
    fn fst_type() -> String {
        "vector".to_string()
    }

    fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        read_expanded_body(&mut reader, &Self::fst_type())
    }

    fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        write_expanded_body(self, &Self::fst_type(), &mut writer)
    }

    fn from_text_string(fst_string: &str) -> Result<Self> {
        ParsedTextFst::from_string(fst_string)?.builds()
    }

    fn text(&self) -> Result<String> {
        render_text_fst(self)
    }
}

impl<W: SerializableSemiring> SerializableFst<W> for ConstFst<W> {
    fn fst_type() -> String {
        "const".to_string()
    }

    fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        let vector: VectorFst<W> = read_expanded_body(&mut reader, &Self::fst_type())?;
        ConstFst::from_fst(&vector)
    }

    fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        write_expanded_body(self, &Self::fst_type(), &mut writer)
    }

    fn from_text_string(fst_string: &str) -> Result<Self> {
        let vector: VectorFst<W> = ParsedTextFst::from_string(fst_string)?.builds()?;
        ConstFst::from_fst(&vector)
    }

    fn text(&self) -> Result<String> {
        render_text_fst(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semirings::{Semiring, TropicalWeight};
    use crate::utils::acceptor;

    #[test]
    fn test_file_roundtrip() -> Result<()> {
        let fst: VectorFst<TropicalWeight> = acceptor(&[1, 2], TropicalWeight::new(0.5));
        let dir = std::env::temp_dir().join("wfst-serializable-test");
        std::fs::create_dir_all(&dir)?;
        let path = dir.join("roundtrip.fst");
        fst.write(&path)?;
        let back = VectorFst::<TropicalWeight>::read(&path)?;
        assert!(crate::algorithms::isomorphic(&fst, &back)?);
        std::fs::remove_file(&path)?;
        Ok(())
    }

    #[test]
    fn test_text_trait_roundtrip() -> Result<()> {
        let fst: VectorFst<TropicalWeight> = acceptor(&[1, 2], TropicalWeight::new(0.5));
        let text = fst.text()?;
        let back = VectorFst::<TropicalWeight>::from_text_string(&text)?;
        assert!(crate::algorithms::isomorphic(&fst, &back)?);
        Ok(())
    }
}
