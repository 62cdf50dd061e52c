use std::io::{Read, Write};

use anyhow::{Context, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::fst_properties::FstProperties;
use crate::fst_traits::{ExpandedFst, MutableFst};
use crate::semirings::SerializableSemiring;
use crate::symbol_table::SymbolTable;
use crate::trs::Transitions;
use crate::{StateId, Transition};

/// Magic number heading every binary FST stream.
pub const FST_MAGIC_NUMBER: u32 = 2_125_659_606;

/// Version of the binary framing produced by this crate.
pub const FST_FILE_VERSION: i32 = 1;

const FLAG_HAS_ISYMBOLS: i32 = 0x1;
const FLAG_HAS_OSYMBOLS: i32 = 0x2;

/// Typed failures of the binary reader; surfaced through `anyhow::Error`
/// and matchable by downcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinFormatError {
    BadMagic(u32),
    UnknownFstType(String),
    ArcTypeMismatch { expected: String, found: String },
    UnsupportedVersion(i32),
    Truncated,
}

impl std::fmt::Display for BinFormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            BinFormatError::BadMagic(magic) => {
                write!(f, "bad magic number {:#x} in binary FST stream", magic)
            }
            BinFormatError::UnknownFstType(t) => write!(f, "unknown fst type {:?}", t),
            BinFormatError::ArcTypeMismatch { expected, found } => write!(
                f,
                "arc type mismatch: stream holds {:?}, reader expects {:?}",
                found, expected
            ),
            BinFormatError::UnsupportedVersion(v) => {
                write!(f, "unsupported binary FST version {}", v)
            }
            BinFormatError::Truncated => write!(f, "truncated binary FST stream"),
        }
    }
}

impl std::error::Error for BinFormatError {}

/// Logical header of a binary FST stream.
#[derive(Debug, Clone, PartialEq)]
pub struct FstHeader {
    pub fst_type: String,
    pub arc_type: String,
    pub version: i32,
    pub flags: i32,
    pub properties: FstProperties,
    pub start: Option<StateId>,
    pub num_states: u64,
    pub num_trs: u64,
    pub isymt: Option<SymbolTable>,
    pub osymt: Option<SymbolTable>,
}

fn write_string<Wr: Write>(writer: &mut Wr, s: &str) -> Result<()> {
    writer.write_u32::<LittleEndian>(s.len() as u32)?;
    writer.write_all(s.as_bytes())?;
    Ok(())
}

fn read_string<R: Read>(reader: &mut R) -> Result<String> {
    let len = reader.read_u32::<LittleEndian>()? as usize;
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf).map_err(|_| BinFormatError::Truncated)?;
    Ok(String::from_utf8(buf)?)
}

fn write_symbol_table<Wr: Write>(writer: &mut Wr, symt: &SymbolTable) -> Result<()> {
    writer.write_u64::<LittleEndian>(symt.num_symbols() as u64)?;
    for (label, symbol) in symt.iter() {
        writer.write_u64::<LittleEndian>(label as u64)?;
        write_string(writer, symbol)?;
    }
    Ok(())
}

fn read_symbol_table<R: Read>(reader: &mut R) -> Result<SymbolTable> {
    let n = reader.read_u64::<LittleEndian>()?;
    let mut symt = SymbolTable::new();
    for _ in 0..n {
        let label = reader.read_u64::<LittleEndian>()? as usize;
        let symbol = read_string(reader)?;
        symt.add_symbol_with_key(symbol, label)?;
    }
    Ok(symt)
}

impl FstHeader {
    pub fn write<Wr: Write>(&self, writer: &mut Wr) -> Result<()> {
        writer.write_u32::<LittleEndian>(FST_MAGIC_NUMBER)?;
        write_string(writer, &self.fst_type)?;
        write_string(writer, &self.arc_type)?;
        writer.write_i32::<LittleEndian>(self.version)?;
        let mut flags = 0;
        if self.isymt.is_some() {
            flags |= FLAG_HAS_ISYMBOLS;
        }
        if self.osymt.is_some() {
            flags |= FLAG_HAS_OSYMBOLS;
        }
        writer.write_i32::<LittleEndian>(flags)?;
        writer.write_u64::<LittleEndian>(self.properties.bits())?;
        writer.write_i64::<LittleEndian>(match self.start {
            Some(s) => s as i64,
            None => -1,
        })?;
        writer.write_i64::<LittleEndian>(self.num_states as i64)?;
        writer.write_i64::<LittleEndian>(self.num_trs as i64)?;
        if let Some(symt) = &self.isymt {
            write_symbol_table(writer, symt)?;
        }
        if let Some(symt) = &self.osymt {
            write_symbol_table(writer, symt)?;
        }
        Ok(())
    }

    /// Reads and validates a header: the magic must match, the fst type
    /// must be registered and the arc type must agree with the expected
    /// weight type. The stream is left positioned at the type-specific
    /// body.
    pub fn read<R: Read>(
        reader: &mut R,
        expected_fst_type: &str,
        expected_arc_type: &str,
    ) -> Result<Self> {
        let magic = reader.read_u32::<LittleEndian>().map_err(|_| BinFormatError::Truncated)?;
        if magic != FST_MAGIC_NUMBER {
            return Err(BinFormatError::BadMagic(magic).into());
        }
        let fst_type = read_string(reader)?;
        if fst_type != expected_fst_type {
            return Err(BinFormatError::UnknownFstType(fst_type).into());
        }
        let arc_type = read_string(reader)?;
        if arc_type != expected_arc_type {
            return Err(BinFormatError::ArcTypeMismatch {
                expected: expected_arc_type.to_string(),
                found: arc_type,
            }
            .into());
        }
        let version = reader.read_i32::<LittleEndian>()?;
        if version != FST_FILE_VERSION {
            return Err(BinFormatError::UnsupportedVersion(version).into());
        }
        let flags = reader.read_i32::<LittleEndian>()?;
        let properties =
            FstProperties::from_bits_truncate(reader.read_u64::<LittleEndian>()?);
        let start = match reader.read_i64::<LittleEndian>()? {
            -1 => None,
            s => Some(s as StateId),
        };
        let num_states = reader.read_i64::<LittleEndian>()? as u64;
        let num_trs = reader.read_i64::<LittleEndian>()? as u64;
        let isymt = if flags & FLAG_HAS_ISYMBOLS != 0 {
            Some(read_symbol_table(reader)?)
        } else {
            None
        };
        let osymt = if flags & FLAG_HAS_OSYMBOLS != 0 {
            Some(read_symbol_table(reader)?)
        } else {
            None
        };
        Ok(Self {
            fst_type,
            arc_type,
            version,
            flags,
            properties,
            start,
            num_states,
            num_trs,
            isymt,
            osymt,
        })
    }
}

fn write_tr<W: SerializableSemiring, Wr: Write>(
    writer: &mut Wr,
    tr: &Transition<W>,
) -> Result<()> {
    writer.write_u64::<LittleEndian>(tr.ilabel as u64)?;
    writer.write_u64::<LittleEndian>(tr.olabel as u64)?;
    tr.weight.write_binary(writer)?;
    writer.write_u64::<LittleEndian>(tr.nextstate as u64)?;
    Ok(())
}

fn read_tr<W: SerializableSemiring, R: Read>(reader: &mut R) -> Result<Transition<W>> {
    let ilabel = reader.read_u64::<LittleEndian>()? as usize;
    let olabel = reader.read_u64::<LittleEndian>()? as usize;
    let weight = W::read_binary(reader)?;
    let nextstate = reader.read_u64::<LittleEndian>()? as usize;
    Ok(Transition::new(ilabel, olabel, weight, nextstate))
}

/// Writes the header and the per-state body shared by the expanded
/// representations.
pub fn write_expanded_body<W, F, Wr>(fst: &F, fst_type: &str, writer: &mut Wr) -> Result<()>
where
    W: SerializableSemiring,
    F: ExpandedFst<W>,
    Wr: Write,
{
    let header = FstHeader {
        fst_type: fst_type.to_string(),
        arc_type: W::weight_type(),
        version: FST_FILE_VERSION,
        flags: 0,
        properties: fst.properties(),
        start: fst.start(),
        num_states: fst.num_states() as u64,
        num_trs: fst.num_all_trs() as u64,
        isymt: fst.input_symbols().map(|s| (**s).clone()),
        osymt: fst.output_symbols().map(|s| (**s).clone()),
    };
    header.write(writer)?;
    for state in fst.states_range() {
        match fst.final_weight(state)? {
            Some(weight) => {
                writer.write_u8(1)?;
                weight.write_binary(writer)?;
            }
            None => writer.write_u8(0)?,
        }
        let trs = fst.get_trs(state)?;
        writer.write_u64::<LittleEndian>(trs.len() as u64)?;
        for tr in trs.trs() {
            write_tr(writer, tr)?;
        }
    }
    Ok(())
}

/// Reads the body written by [`write_expanded_body`] into a mutable FST.
pub fn read_expanded_body<W, F, R>(reader: &mut R, fst_type: &str) -> Result<F>
where
    W: SerializableSemiring,
    F: MutableFst<W>,
    R: Read,
{
    let header = FstHeader::read(reader, fst_type, &W::weight_type())?;
    let mut fst = F::new();
    fst.add_states(header.num_states as usize);
    for state in 0..header.num_states as usize {
        let has_final = reader.read_u8().context("reading final flag")? != 0;
        if has_final {
            let weight = W::read_binary(reader)?;
            fst.set_final(state, weight)?;
        }
        let num_trs = reader.read_u64::<LittleEndian>()?;
        fst.reserve_trs(state, num_trs as usize)?;
        for _ in 0..num_trs {
            fst.add_tr(state, read_tr(reader)?)?;
        }
    }
    if let Some(start) = header.start {
        fst.set_start(start)?;
    }
    if let Some(symt) = header.isymt {
        fst.set_input_symbols(std::sync::Arc::new(symt));
    }
    if let Some(symt) = header.osymt {
        fst.set_output_symbols(std::sync::Arc::new(symt));
    }
    fst.set_properties_with_mask(header.properties, FstProperties::copy_properties());
    Ok(fst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst_impls::VectorFst;
    use crate::semirings::{Semiring, TropicalWeight};
    use crate::utils::transducer;

    #[test]
    fn test_binary_roundtrip() -> Result<()> {
        let fst: VectorFst<TropicalWeight> =
            transducer(&[1, 2], &[3, 4], TropicalWeight::new(0.5));
        let mut buf = vec![];
        write_expanded_body(&fst, "vector", &mut buf)?;
        let back: VectorFst<TropicalWeight> =
            read_expanded_body(&mut buf.as_slice(), "vector")?;
        assert!(crate::algorithms::isomorphic(&fst, &back)?);
        Ok(())
    }

    #[test]
    fn test_bad_magic_is_typed() {
        let buf = vec![0u8; 64];
        let err = read_expanded_body::<TropicalWeight, VectorFst<TropicalWeight>, _>(
            &mut buf.as_slice(),
            "vector",
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BinFormatError>(),
            Some(BinFormatError::BadMagic(0))
        ));
    }

    #[test]
    fn test_arc_type_mismatch() -> Result<()> {
        let fst: VectorFst<TropicalWeight> = transducer(&[1], &[1], TropicalWeight::one());
        let mut buf = vec![];
        write_expanded_body(&fst, "vector", &mut buf)?;
        let err = read_expanded_body::<crate::semirings::LogWeight, VectorFst<_>, _>(
            &mut buf.as_slice(),
            "vector",
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BinFormatError>(),
            Some(BinFormatError::ArcTypeMismatch { .. })
        ));
        Ok(())
    }
}
