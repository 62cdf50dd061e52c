use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use anyhow::{bail, Result};
use log::warn;

use crate::config::core_config;
use crate::{Label, EPS_SYMBOL};

/// Bidirectional mapping between symbols (strings) and labels (integers).
///
/// Symbol tables are shared between FSTs behind an [`Arc`]; mutation of a
/// shared table goes through `Arc::make_mut`, which copies on write once the
/// reference count exceeds one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SymbolTable {
    label_to_symbol: BTreeMap<Label, String>,
    symbol_to_label: HashMap<String, Label>,
    available_key: Label,
}

impl SymbolTable {
    /// Creates an empty symbol table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a symbol table with epsilon pre-registered at label `0`.
    pub fn new_with_eps() -> Self {
        let mut table = Self::new();
        table.add_symbol(EPS_SYMBOL);
        table
    }

    /// Adds a symbol, assigning the next available key. Adding a symbol
    /// already present returns its existing key.
    pub fn add_symbol<S: Into<String>>(&mut self, symbol: S) -> Label {
        let symbol = symbol.into();
        if let Some(&label) = self.symbol_to_label.get(&symbol) {
            return label;
        }
        let label = self.available_key;
        self.register(symbol, label);
        label
    }

    /// Adds a symbol under an explicit key. Re-adding an identical
    /// `(symbol, key)` pair is a no-op; rebinding either side is an error.
    pub fn add_symbol_with_key<S: Into<String>>(&mut self, symbol: S, key: Label) -> Result<Label> {
        let symbol = symbol.into();
        match (
            self.symbol_to_label.get(&symbol).copied(),
            self.label_to_symbol.get(&key),
        ) {
            (Some(label), _) if label == key => Ok(key),
            (Some(label), _) => bail!(
                "SymbolTable: symbol {:?} already mapped to key {}, refusing key {}",
                symbol,
                label,
                key
            ),
            (None, Some(other)) => bail!(
                "SymbolTable: key {} already mapped to symbol {:?}, refusing symbol {:?}",
                key,
                other,
                symbol
            ),
            (None, None) => {
                self.register(symbol, key);
                Ok(key)
            }
        }
    }

    fn register(&mut self, symbol: String, label: Label) {
        self.label_to_symbol.insert(label, symbol.clone());
        self.symbol_to_label.insert(symbol, label);
        if label >= self.available_key {
            self.available_key = label + 1;
        }
    }

    /// Symbol attached to `label`, if any.
    pub fn get_symbol(&self, label: Label) -> Option<&str> {
        self.label_to_symbol.get(&label).map(|s| s.as_str())
    }

    /// Label attached to `symbol`, if any.
    pub fn get_label(&self, symbol: &str) -> Option<Label> {
        self.symbol_to_label.get(symbol).copied()
    }

    pub fn contains_symbol(&self, symbol: &str) -> bool {
        self.symbol_to_label.contains_key(symbol)
    }

    pub fn contains_label(&self, label: Label) -> bool {
        self.label_to_symbol.contains_key(&label)
    }

    pub fn num_symbols(&self) -> usize {
        self.label_to_symbol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.label_to_symbol.is_empty()
    }

    /// One past the largest key in use.
    pub fn available_key(&self) -> Label {
        self.available_key
    }

    /// Iterates over `(label, symbol)` pairs in increasing label order.
    pub fn iter(&self) -> impl Iterator<Item = (Label, &str)> {
        self.label_to_symbol.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn labels(&self) -> impl Iterator<Item = Label> + '_ {
        self.label_to_symbol.keys().copied()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.label_to_symbol.values().map(|s| s.as_str())
    }

    /// Deterministic 16-byte digest of the `(key, symbol)` set. Two tables
    /// with the same content produce the same checksum.
    pub fn checksum(&self) -> [u8; 16] {
        // Two FNV-1a lanes seeded differently, folded over the entries in
        // key order.
        let mut lanes: [u64; 2] = [0xcbf2_9ce4_8422_2325, 0x6c62_272e_07bb_0142];
        const PRIME: u64 = 0x1000_0000_01b3;
        for (label, symbol) in self.iter() {
            for (i, lane) in lanes.iter_mut().enumerate() {
                let mut h = *lane;
                for byte in label
                    .to_le_bytes()
                    .iter()
                    .chain(symbol.as_bytes())
                    .chain(&[0xff, i as u8])
                {
                    h ^= u64::from(*byte);
                    h = h.wrapping_mul(PRIME);
                }
                *lane = h;
            }
        }
        let mut out = [0u8; 16];
        out[..8].copy_from_slice(&lanes[0].to_le_bytes());
        out[8..].copy_from_slice(&lanes[1].to_le_bytes());
        out
    }
}

/// Compatibility of two optional symbol tables: both absent, or both present
/// with equal checksums. With the `compat_symbols` configuration knob off,
/// a mismatch is downgraded to a warning and treated as compatible.
pub fn compat_symbols(a: Option<&Arc<SymbolTable>>, b: Option<&Arc<SymbolTable>>) -> bool {
    let compatible = match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => Arc::ptr_eq(a, b) || a.checksum() == b.checksum(),
        _ => false,
    };
    if !compatible && !core_config().compat_symbols {
        warn!("symbol tables differ but compat_symbols is disabled");
        return true;
    }
    compatible
}
