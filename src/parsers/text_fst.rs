use std::fmt::Write as _;

use anyhow::{bail, format_err, Result};
use nom::bytes::complete::take_till1;
use nom::character::complete::multispace0;
use nom::multi::many1;
use nom::sequence::preceded;
use nom::IResult;

use crate::config::core_config;
use crate::semirings::{Semiring, SerializableSemiring};
use crate::symbol_table::SymbolTable;
use crate::trs::Transitions;
use crate::fst_traits::{ExpandedFst, MutableFst};
use crate::{Label, StateId, Transition};

/// A textual FST: whitespace-separated records, one per line, either
/// `src dst ilabel olabel [weight]` (a transition) or `state [weight]`
/// (a final state). Empty weights default to `One`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTextFst<W: Semiring> {
    pub start: Option<StateId>,
    pub transitions: Vec<(StateId, Label, Label, W, StateId)>,
    pub final_states: Vec<(StateId, W)>,
}

fn field(i: &str) -> IResult<&str, &str> {
    let separator = |c: char| {
        core_config().field_separator.contains(c) || c == ' ' || c == '\t'
    };
    preceded(multispace0, take_till1(separator))(i)
}

fn row_fields(i: &str) -> IResult<&str, Vec<&str>> {
    many1(field)(i)
}

fn parse_label(token: &str, symt: Option<&SymbolTable>) -> Result<Label> {
    if let Ok(label) = token.parse::<Label>() {
        return Ok(label);
    }
    symt.and_then(|symt| symt.get_label(token))
        .ok_or_else(|| format_err!("cannot resolve label {:?}", token))
}

fn parse_weight<W: SerializableSemiring>(token: &str) -> Result<W> {
    let (rest, weight) = W::parse_text(token)
        .map_err(|e| format_err!("cannot parse weight {:?}: {}", token, e))?;
    if !rest.trim().is_empty() {
        bail!("trailing content after weight: {:?}", token);
    }
    Ok(weight)
}

impl<W: SerializableSemiring> ParsedTextFst<W> {
    /// Parses the textual format; symbolic labels are resolved through the
    /// given symbol tables when numeric parsing fails.
    pub fn from_string_with_symbols(
        fst_string: &str,
        isymt: Option<&SymbolTable>,
        osymt: Option<&SymbolTable>,
    ) -> Result<Self> {
        let mut parsed = ParsedTextFst {
            start: None,
            transitions: vec![],
            final_states: vec![],
        };
        for (lineno, line) in fst_string.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let (_, fields) = row_fields(line)
                .map_err(|e| format_err!("line {}: unparsable row: {}", lineno + 1, e))?;
            match fields.as_slice() {
                [state] => {
                    let state = state
                        .parse::<StateId>()
                        .map_err(|_| format_err!("line {}: bad state id", lineno + 1))?;
                    parsed.final_states.push((state, W::one()));
                    parsed.start.get_or_insert(state);
                }
                [state, weight] => {
                    let state = state
                        .parse::<StateId>()
                        .map_err(|_| format_err!("line {}: bad state id", lineno + 1))?;
                    parsed.final_states.push((state, parse_weight(weight)?));
                    parsed.start.get_or_insert(state);
                }
                [src, dst, ilabel, olabel] => {
                    let src = src.parse::<StateId>()?;
                    let dst = dst.parse::<StateId>()?;
                    parsed.transitions.push((
                        src,
                        parse_label(ilabel, isymt)?,
                        parse_label(olabel, osymt)?,
                        W::one(),
                        dst,
                    ));
                    parsed.start.get_or_insert(src);
                }
                [src, dst, ilabel, olabel, weight] => {
                    let src = src.parse::<StateId>()?;
                    let dst = dst.parse::<StateId>()?;
                    parsed.transitions.push((
                        src,
                        parse_label(ilabel, isymt)?,
                        parse_label(olabel, osymt)?,
                        parse_weight(weight)?,
                        dst,
                    ));
                    parsed.start.get_or_insert(src);
                }
                _ => bail!(
                    "line {}: wrong number of columns ({})",
                    lineno + 1,
                    fields.len()
                ),
            }
        }
        Ok(parsed)
    }

    pub fn from_string(fst_string: &str) -> Result<Self> {
        Self::from_string_with_symbols(fst_string, None, None)
    }

    /// The first state mentioned in the file is the start state.
    pub fn builds<F: MutableFst<W>>(&self) -> Result<F> {
        let mut fst = F::new();
        let max_state = self
            .transitions
            .iter()
            .flat_map(|(src, _, _, _, dst)| [*src, *dst])
            .chain(self.final_states.iter().map(|(s, _)| *s))
            .max();
        if let Some(max_state) = max_state {
            fst.add_states(max_state + 1);
        }
        for (src, ilabel, olabel, weight, dst) in &self.transitions {
            fst.add_tr(*src, Transition::new(*ilabel, *olabel, weight.clone(), *dst))?;
        }
        for (state, weight) in &self.final_states {
            fst.set_final(*state, weight.clone())?;
        }
        if let Some(start) = self.start {
            fst.set_start(start)?;
        }
        Ok(fst)
    }
}

/// Renders an expanded FST in the textual format.
pub fn render_text_fst<W: SerializableSemiring, F: ExpandedFst<W>>(fst: &F) -> Result<String> {
    let mut out = String::new();
    // The start state's rows come first so parsing restores it.
    let states: Vec<StateId> = match fst.start() {
        Some(start) => std::iter::once(start)
            .chain(fst.states_range().filter(|s| *s != start))
            .collect(),
        None => fst.states_range().collect(),
    };
    for state in states {
        for tr in fst.get_trs(state)?.trs() {
            writeln!(
                out,
                "{}\t{}\t{}\t{}\t{}",
                state, tr.nextstate, tr.ilabel, tr.olabel, tr.weight
            )?;
        }
        if let Some(final_weight) = fst.final_weight(state)? {
            writeln!(out, "{}\t{}", state, final_weight)?;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst_impls::VectorFst;
    use crate::fst_traits::{CoreFst, Fst};
    use crate::semirings::TropicalWeight;

    #[test]
    fn test_parse_text_fst() -> Result<()> {
        let text = "0\t1\t1\t2\t1.5\n1\t2\t3\t4\n2\t0.5\n";
        let parsed = ParsedTextFst::<TropicalWeight>::from_string(text)?;
        assert_eq!(parsed.start, Some(0));
        assert_eq!(parsed.transitions.len(), 2);
        assert_eq!(parsed.final_states, vec![(2, TropicalWeight::new(0.5))]);
        let fst: VectorFst<TropicalWeight> = parsed.builds()?;
        assert_eq!(fst.start(), Some(0));
        let paths: Vec<_> = fst.paths_iter().collect();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].ilabels, vec![1, 3]);
        assert_eq!(paths[0].weight, TropicalWeight::new(2.0));
        Ok(())
    }

    #[test]
    fn test_parse_rejects_wrong_columns() {
        let text = "0 1 2\n";
        assert!(ParsedTextFst::<TropicalWeight>::from_string(text).is_err());
    }

    #[test]
    fn test_render_roundtrip() -> Result<()> {
        let fst: VectorFst<TropicalWeight> =
            crate::utils::transducer(&[1, 2], &[3, 4], TropicalWeight::new(0.5));
        let text = render_text_fst(&fst)?;
        let back: VectorFst<TropicalWeight> =
            ParsedTextFst::<TropicalWeight>::from_string(&text)?.builds()?;
        assert!(crate::algorithms::isomorphic(&fst, &back)?);
        Ok(())
    }
}
