use anyhow::Result;

use crate::algorithms::dfs_visit::{
    accessible_states, coaccessible_states, strongly_connected_components,
};
use crate::fst_properties::FstProperties;
use crate::fst_traits::{ExpandedFst, MutableFst};
use crate::semirings::Semiring;
use crate::trs::Transitions;
use crate::Transition;

/// Trims an FST in place, removing every state that is not both accessible
/// and coaccessible (and the transitions touching them). The recognized
/// relation is unchanged.
///
/// Complexity: time and space O(V + E).
pub fn connect<W: Semiring, F: MutableFst<W>>(fst: &mut F) -> Result<()> {
    let props = fst.properties();
    if props.contains(FstProperties::ACCESSIBLE | FstProperties::COACCESSIBLE) {
        return Ok(());
    }
    let access = accessible_states(fst)?;
    let coaccess = coaccessible_states(fst)?;
    let dstates: Vec<_> = (0..fst.num_states())
        .filter(|&s| !access[s] || !coaccess[s])
        .collect();
    fst.del_states(dstates)?;
    fst.set_properties_with_mask(
        FstProperties::ACCESSIBLE | FstProperties::COACCESSIBLE,
        FstProperties::ACCESSIBLE
            | FstProperties::NOT_ACCESSIBLE
            | FstProperties::COACCESSIBLE
            | FstProperties::NOT_COACCESSIBLE,
    );
    Ok(())
}

/// Condenses each strongly connected component of `ifst` to a single
/// state, keeping transitions between components and dropping those
/// within. Returns the condensed FST and the state → component mapping.
pub fn condense<W: Semiring, F1: ExpandedFst<W>, F2: MutableFst<W>>(
    ifst: &F1,
) -> Result<(F2, Vec<usize>)> {
    let scc = strongly_connected_components(ifst)?;
    let mut ofst = F2::new();
    let num_condensed = scc.iter().max().map(|m| m + 1).unwrap_or(0);
    ofst.add_states(num_condensed);
    for s in 0..ifst.num_states() {
        let c = scc[s];
        if Some(s) == ifst.start() {
            ofst.set_start(c)?;
        }
        if let Some(final_weight) = ifst.final_weight(s)? {
            let w = match ofst.final_weight(c)? {
                Some(old) => old.plus(&final_weight),
                None => final_weight,
            };
            ofst.set_final(c, w)?;
        }
        for tr in ifst.get_trs(s)?.trs() {
            let nextc = scc[tr.nextstate];
            if nextc != c {
                ofst.add_tr(c, Transition::new(tr.ilabel, tr.olabel, tr.weight.clone(), nextc))?;
            }
        }
    }
    ofst.set_properties_with_mask(
        FstProperties::ACYCLIC | FstProperties::INITIAL_ACYCLIC,
        FstProperties::ACYCLIC
            | FstProperties::CYCLIC
            | FstProperties::INITIAL_ACYCLIC
            | FstProperties::INITIAL_CYCLIC,
    );
    Ok((ofst, scc))
}
