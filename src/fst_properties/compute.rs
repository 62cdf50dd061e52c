use std::collections::HashSet;

use anyhow::Result;

use crate::algorithms::dfs_visit::{
    accessible_states, coaccessible_states, strongly_connected_components,
};
use crate::fst_properties::FstProperties;
use crate::fst_traits::ExpandedFst;
use crate::semirings::Semiring;
use crate::trs::Transitions;
use crate::EPS_LABEL;

/// Computes all ternary properties of an FST in one pass over its
/// transitions plus a depth-first traversal for the connectivity and
/// cyclicity bits. Every returned bit is definitively known.
pub fn compute_fst_properties<W: Semiring, F: ExpandedFst<W>>(fst: &F) -> Result<FstProperties> {
    let num_states = fst.num_states();
    let mut props = FstProperties::empty_fst_properties();
    if num_states == 0 {
        return Ok(props);
    }

    let start = fst.start();

    // Local bits: one scan over every state's transitions.
    let mut ilabels = HashSet::new();
    let mut olabels = HashSet::new();
    for state in 0..num_states {
        ilabels.clear();
        olabels.clear();
        let trs = fst.get_trs(state)?;
        let mut prev: Option<(usize, usize)> = None;
        for tr in trs.trs() {
            if tr.ilabel != tr.olabel {
                props |= FstProperties::NOT_ACCEPTOR;
                props -= FstProperties::ACCEPTOR;
            }
            if tr.ilabel == EPS_LABEL {
                props |= FstProperties::I_EPSILONS;
                props -= FstProperties::NO_I_EPSILONS;
                if tr.olabel == EPS_LABEL {
                    props |= FstProperties::EPSILONS;
                    props -= FstProperties::NO_EPSILONS;
                }
            }
            if tr.olabel == EPS_LABEL {
                props |= FstProperties::O_EPSILONS;
                props -= FstProperties::NO_O_EPSILONS;
            }
            if !ilabels.insert(tr.ilabel) {
                props |= FstProperties::NOT_I_DETERMINISTIC;
                props -= FstProperties::I_DETERMINISTIC;
            }
            if !olabels.insert(tr.olabel) {
                props |= FstProperties::NOT_O_DETERMINISTIC;
                props -= FstProperties::O_DETERMINISTIC;
            }
            if let Some((pi, po)) = prev {
                if pi > tr.ilabel {
                    props |= FstProperties::NOT_I_LABEL_SORTED;
                    props -= FstProperties::I_LABEL_SORTED;
                }
                if po > tr.olabel {
                    props |= FstProperties::NOT_O_LABEL_SORTED;
                    props -= FstProperties::O_LABEL_SORTED;
                }
            }
            prev = Some((tr.ilabel, tr.olabel));
            if !tr.weight.is_zero() && !tr.weight.is_one() {
                props |= FstProperties::WEIGHTED;
                props -= FstProperties::UNWEIGHTED;
            }
            if tr.nextstate <= state {
                props |= FstProperties::NOT_TOP_SORTED;
                props -= FstProperties::TOP_SORTED;
            }
        }
        if let Some(final_weight) = fst.final_weight(state)? {
            if !final_weight.is_zero() && !final_weight.is_one() {
                props |= FstProperties::WEIGHTED;
                props -= FstProperties::UNWEIGHTED;
            }
        }
    }

    // Strongly connected components (iterative Tarjan) for the cyclicity
    // bits.
    let sccs = strongly_connected_components(fst)?;
    let mut scc_size = vec![0usize; num_states];
    for &c in &sccs {
        scc_size[c] += 1;
    }
    let mut cyclic = false;
    let mut weighted_cycles = false;
    for state in 0..num_states {
        for tr in fst.get_trs(state)?.trs() {
            if sccs[tr.nextstate] == sccs[state] && (scc_size[sccs[state]] > 1 || tr.nextstate == state)
            {
                cyclic = true;
                if !tr.weight.is_one() {
                    weighted_cycles = true;
                }
            }
        }
    }
    if cyclic {
        props |= FstProperties::CYCLIC;
        props -= FstProperties::ACYCLIC;
    }
    if weighted_cycles {
        props |= FstProperties::WEIGHTED_CYCLES;
        props -= FstProperties::UNWEIGHTED_CYCLES;
    }
    if let Some(start) = start {
        let start_cyclic = scc_size[sccs[start]] > 1
            || fst
                .get_trs(start)?
                .trs()
                .iter()
                .any(|tr| tr.nextstate == start);
        if start_cyclic {
            props |= FstProperties::INITIAL_CYCLIC;
            props -= FstProperties::INITIAL_ACYCLIC;
        }
    }

    // Reachability bits.
    if accessible_states(fst)?.iter().any(|a| !a) {
        props |= FstProperties::NOT_ACCESSIBLE;
        props -= FstProperties::ACCESSIBLE;
    }
    if coaccessible_states(fst)?.iter().any(|c| !c) {
        props |= FstProperties::NOT_COACCESSIBLE;
        props -= FstProperties::COACCESSIBLE;
    }

    // String: a single accessible path covering every state.
    if !is_string(fst)? {
        props |= FstProperties::NOT_STRING;
        props -= FstProperties::STRING;
    }

    Ok(props)
}

fn is_string<W: Semiring, F: ExpandedFst<W>>(fst: &F) -> Result<bool> {
    let n = fst.num_states();
    let mut current = match fst.start() {
        Some(s) => s,
        None => return Ok(n == 0),
    };
    let mut seen = vec![false; n];
    let mut count = 0usize;
    loop {
        if seen[current] {
            return Ok(false);
        }
        seen[current] = true;
        count += 1;
        let trs = fst.get_trs(current)?;
        let is_final = fst.final_weight(current)?.is_some();
        match trs.trs().len() {
            0 => return Ok(is_final && count == n),
            1 => {
                if is_final {
                    return Ok(false);
                }
                current = trs.trs()[0].nextstate;
            }
            _ => return Ok(false),
        }
    }
}
