use anyhow::{bail, format_err, Result};

use crate::semirings::{Semiring, SerializableSemiring};
use crate::StateId;

/// Parses a potentials file: one `state weight` pair per line. States
/// absent from the file default to `Zero`; the returned vector covers
/// `0..=max mentioned state`. Used by the push and reweight tooling.
pub fn read_potentials<W: SerializableSemiring>(text: &str) -> Result<Vec<W>> {
    let mut pairs: Vec<(StateId, W)> = vec![];
    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let state = fields
            .next()
            .ok_or_else(|| format_err!("line {}: missing state", lineno + 1))?
            .parse::<StateId>()
            .map_err(|_| format_err!("line {}: bad state id", lineno + 1))?;
        let weight_token = fields
            .next()
            .ok_or_else(|| format_err!("line {}: missing weight", lineno + 1))?;
        if fields.next().is_some() {
            bail!("line {}: wrong number of columns", lineno + 1);
        }
        let (_, weight) = W::parse_text(weight_token)
            .map_err(|e| format_err!("line {}: bad weight: {}", lineno + 1, e))?;
        pairs.push((state, weight));
    }
    let len = pairs.iter().map(|(s, _)| s + 1).max().unwrap_or(0);
    let mut potentials = vec![W::zero(); len];
    for (state, weight) in pairs {
        potentials[state] = weight;
    }
    Ok(potentials)
}

/// Renders potentials, skipping `Zero` entries (they are the default).
pub fn write_potentials<W: SerializableSemiring>(potentials: &[W]) -> String {
    let mut out = String::new();
    for (state, weight) in potentials.iter().enumerate() {
        if !weight.is_zero() {
            out.push_str(&format!("{}\t{}\n", state, weight));
        }
    }
    out
}
