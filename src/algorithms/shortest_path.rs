use std::collections::BinaryHeap;

use anyhow::{bail, Result};

use crate::algorithms::determinize::determinize;
use crate::algorithms::encode::{decode, encode, EncodeMapper, EncodeType};
use crate::algorithms::fst_convert::fst_convert_from_ref;
use crate::algorithms::rm_epsilon::rm_epsilon;
use crate::algorithms::shortest_distance::{
    shortest_distance_with_config, ShortestDistanceConfig,
};
use crate::fst_impls::VectorFst;
use crate::fst_properties::op_properties::shortest_path_properties;
use crate::fst_properties::FstProperties;
use crate::fst_traits::{ExpandedFst, MutableFst};
use crate::semirings::{Semiring, SemiringProperties, WeaklyDivisibleSemiring, WeightQuantize};
use crate::trs::Transitions;
use crate::{StateId, KSHORTESTDELTA};

/// Options of the n-best search.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPathConfig {
    /// Number of paths to return.
    pub nshortest: usize,
    /// Return paths with distinct input strings; the input is determinized
    /// over an encoded alphabet first.
    pub unique: bool,
    /// Convergence tolerance of the underlying shortest-distance pass.
    pub delta: f32,
}

impl Default for ShortestPathConfig {
    fn default() -> Self {
        Self {
            nshortest: 1,
            unique: false,
            delta: KSHORTESTDELTA,
        }
    }
}

/// Single shortest path; see [`shortest_path_with_config`].
pub fn shortest_path<W, F1, F2>(fst: &F1) -> Result<F2>
where
    W: WeaklyDivisibleSemiring + WeightQuantize,
    W::ReverseWeight: Semiring<ReverseWeight = W>,
    F1: ExpandedFst<W>,
    F2: MutableFst<W>,
{
    shortest_path_with_config(fst, ShortestPathConfig::default())
}

/// Computes the `n` best accepting paths as an FST: a single linear path
/// for `n = 1`, a prefix tree otherwise. Paths are emitted in
/// non-decreasing weight order by a best-first search guided by the
/// reverse shortest distances, so the semiring must have the path
/// property. An input without any accepting path yields the empty FST
/// (no start state), which is a normal result.
pub fn shortest_path_with_config<W, F1, F2>(fst: &F1, config: ShortestPathConfig) -> Result<F2>
where
    W: WeaklyDivisibleSemiring + WeightQuantize,
    W::ReverseWeight: Semiring<ReverseWeight = W>,
    F1: ExpandedFst<W>,
    F2: MutableFst<W>,
{
    if !W::properties().contains(SemiringProperties::PATH)
        || !W::properties().contains(SemiringProperties::IDEMPOTENT)
    {
        bail!("shortest_path: requires an idempotent path semiring");
    }
    if config.nshortest == 0 {
        return Ok(F2::new());
    }
    if config.unique {
        // Distinct input strings: fold the output labels away, normalize
        // epsilons, determinize, then search the deterministic machine.
        let mut encoded: VectorFst<W> = fst_convert_from_ref(fst);
        let mut mapper = EncodeMapper::new(EncodeType::EncodeLabels);
        encode(&mut encoded, &mut mapper)?;
        rm_epsilon(&mut encoded)?;
        let det: VectorFst<W> = determinize(&encoded)?;
        let mut paths: VectorFst<W> = nshortest_search(&det, &config)?;
        decode(&mut paths, &mapper)?;
        return Ok(fst_convert_from_ref(&paths));
    }
    nshortest_search(fst, &config)
}

#[derive(Debug)]
struct SearchItem<W> {
    /// Priority: weight so far times the reverse potential.
    priority: W,
    /// Weight accumulated from the start.
    weight: W,
    state: StateId,
    /// Output state of the parent search node.
    parent: Option<StateId>,
    tr: Option<crate::Transition<W>>,
}

impl<W: Semiring> PartialEq for SearchItem<W> {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.state == other.state
    }
}

impl<W: Semiring> Eq for SearchItem<W> {}

impl<W: Semiring> PartialOrd for SearchItem<W> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<W: Semiring> Ord for SearchItem<W> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Max-heap: the naturally better priority compares Greater.
        let self_better = self.priority.plus(&other.priority) == self.priority;
        let other_better = other.priority.plus(&self.priority) == other.priority;
        match (self_better, other_better) {
            (true, false) => std::cmp::Ordering::Greater,
            (false, true) => std::cmp::Ordering::Less,
            _ => self.state.cmp(&other.state).reverse(),
        }
    }
}

fn nshortest_search<W, F1, F2>(fst: &F1, config: &ShortestPathConfig) -> Result<F2>
where
    W: Semiring,
    W::ReverseWeight: Semiring<ReverseWeight = W>,
    F1: ExpandedFst<W>,
    F2: MutableFst<W>,
{
    let mut ofst = F2::new();
    ofst.set_symts_from_fst(fst);
    let start = match fst.start() {
        Some(start) => start,
        None => return Ok(ofst),
    };
    let distance_config = ShortestDistanceConfig {
        delta: config.delta,
        source: None,
        state_budget: None,
    };
    // Potential of each state: its shortest distance to a final state.
    let potentials = shortest_distance_with_config(fst, true, distance_config)?;

    let n = config.nshortest;
    let mut pops = vec![0usize; fst.num_states()];
    let mut completed = 0usize;
    let mut heap = BinaryHeap::new();
    heap.push(SearchItem {
        priority: potentials.get(start).cloned().unwrap_or_else(W::zero),
        weight: W::one(),
        state: start,
        parent: None,
        tr: None,
    });
    while let Some(item) = heap.pop() {
        if completed >= n {
            break;
        }
        if pops[item.state] >= n || !item.priority.is_member() {
            continue;
        }
        if item.priority.is_zero() {
            // No accepting continuation from here.
            continue;
        }
        pops[item.state] += 1;
        let ostate = ofst.add_state();
        match (item.parent, &item.tr) {
            (Some(parent), Some(tr)) => {
                ofst.add_tr(
                    parent,
                    crate::Transition::new(tr.ilabel, tr.olabel, tr.weight.clone(), ostate),
                )?;
            }
            _ => {
                ofst.set_start(ostate)?;
            }
        }
        if let Some(final_weight) = fst.final_weight(item.state)? {
            ofst.set_final(ostate, final_weight)?;
            completed += 1;
            if completed >= n {
                break;
            }
        }
        for tr in fst.get_trs(item.state)?.trs() {
            let weight = item.weight.times(&tr.weight);
            let potential = potentials
                .get(tr.nextstate)
                .cloned()
                .unwrap_or_else(W::zero);
            heap.push(SearchItem {
                priority: weight.times(&potential),
                weight,
                state: tr.nextstate,
                parent: Some(ostate),
                tr: Some(tr.clone()),
            });
        }
    }
    if completed == 0 {
        // No accepting path at all: the empty FST.
        return Ok(F2::new());
    }
    // Drop search nodes that did not lead to a returned path.
    crate::algorithms::connect::connect(&mut ofst)?;
    ofst.set_properties_with_mask(
        shortest_path_properties(n),
        FstProperties::copy_properties(),
    );
    Ok(ofst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst_traits::{CoreFst, Fst};
    use crate::semirings::TropicalWeight;
    use crate::Transition;

    fn two_paths() -> VectorFst<TropicalWeight> {
        let mut fst = VectorFst::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        fst.set_start(s0).unwrap();
        fst.set_final(s1, TropicalWeight::one()).unwrap();
        fst.add_tr(s0, Transition::new(1, 1, TropicalWeight::new(1.0), s1))
            .unwrap();
        fst.add_tr(s0, Transition::new(1, 1, TropicalWeight::new(5.0), s1))
            .unwrap();
        fst
    }

    #[test]
    fn test_single_shortest_path() -> Result<()> {
        let fst = two_paths();
        let best: VectorFst<TropicalWeight> = shortest_path(&fst)?;
        let paths: Vec<_> = best.paths_iter().collect();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].ilabels, vec![1]);
        assert_eq!(paths[0].weight, TropicalWeight::new(1.0));
        Ok(())
    }

    #[test]
    fn test_two_shortest_paths() -> Result<()> {
        let fst = two_paths();
        let best: VectorFst<TropicalWeight> = shortest_path_with_config(
            &fst,
            ShortestPathConfig {
                nshortest: 2,
                ..Default::default()
            },
        )?;
        let mut weights: Vec<_> = best.paths_iter().map(|p| p.weight).collect();
        weights.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(
            weights,
            vec![TropicalWeight::new(1.0), TropicalWeight::new(5.0)]
        );
        Ok(())
    }

    #[test]
    fn test_no_accepting_path_yields_empty() -> Result<()> {
        let mut fst = VectorFst::<TropicalWeight>::new();
        let s0 = fst.add_state();
        fst.set_start(s0)?;
        let best: VectorFst<TropicalWeight> = shortest_path(&fst)?;
        assert_eq!(best.start(), None);
        Ok(())
    }

    #[test]
    fn test_unique_collapses_equal_strings() -> Result<()> {
        let fst = two_paths();
        let best: VectorFst<TropicalWeight> = shortest_path_with_config(
            &fst,
            ShortestPathConfig {
                nshortest: 2,
                unique: true,
                ..Default::default()
            },
        )?;
        // Both paths read the same string, so only one survives.
        let paths: Vec<_> = best.paths_iter().collect();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].weight, TropicalWeight::new(1.0));
        Ok(())
    }
}
