//! Depth-first traversals shared by the structural algorithms: forward and
//! reverse reachability, strongly connected components and topological
//! ordering.

use anyhow::Result;

use crate::fst_traits::ExpandedFst;
use crate::semirings::Semiring;
use crate::trs::Transitions;
use crate::StateId;

/// Per-state flag: reachable from the start state.
pub fn accessible_states<W: Semiring, F: ExpandedFst<W>>(fst: &F) -> Result<Vec<bool>> {
    let mut access = vec![false; fst.num_states()];
    if let Some(start) = fst.start() {
        let mut stack = vec![start];
        access[start] = true;
        while let Some(s) = stack.pop() {
            for tr in fst.get_trs(s)?.trs() {
                if !access[tr.nextstate] {
                    access[tr.nextstate] = true;
                    stack.push(tr.nextstate);
                }
            }
        }
    }
    Ok(access)
}

/// Per-state flag: some final state is reachable from the state.
pub fn coaccessible_states<W: Semiring, F: ExpandedFst<W>>(fst: &F) -> Result<Vec<bool>> {
    let n = fst.num_states();
    let mut reverse_adj: Vec<Vec<StateId>> = vec![vec![]; n];
    let mut coaccess = vec![false; n];
    let mut stack = vec![];
    for state in 0..n {
        for tr in fst.get_trs(state)?.trs() {
            reverse_adj[tr.nextstate].push(state);
        }
        if fst.final_weight(state)?.is_some() {
            coaccess[state] = true;
            stack.push(state);
        }
    }
    while let Some(s) = stack.pop() {
        for &p in &reverse_adj[s] {
            if !coaccess[p] {
                coaccess[p] = true;
                stack.push(p);
            }
        }
    }
    Ok(coaccess)
}

/// Strongly connected component id of every state (iterative Tarjan; ids
/// are arbitrary but consistent).
pub fn strongly_connected_components<W: Semiring, F: ExpandedFst<W>>(
    fst: &F,
) -> Result<Vec<usize>> {
    let n = fst.num_states();
    let mut index = vec![usize::MAX; n];
    let mut lowlink = vec![0usize; n];
    let mut on_stack = vec![false; n];
    let mut scc = vec![0usize; n];
    let mut stack: Vec<StateId> = vec![];
    let mut next_index = 0usize;
    let mut next_scc = 0usize;

    // Work items: (state, next transition position).
    let mut work: Vec<(StateId, usize)> = vec![];
    for root in 0..n {
        if index[root] != usize::MAX {
            continue;
        }
        work.push((root, 0));
        while let Some((s, pos)) = work.pop() {
            if pos == 0 {
                index[s] = next_index;
                lowlink[s] = next_index;
                next_index += 1;
                stack.push(s);
                on_stack[s] = true;
            }
            let trs = fst.get_trs(s)?;
            let mut advanced = false;
            for (i, tr) in trs.trs().iter().enumerate().skip(pos) {
                let t = tr.nextstate;
                if index[t] == usize::MAX {
                    work.push((s, i + 1));
                    work.push((t, 0));
                    advanced = true;
                    break;
                } else if on_stack[t] {
                    lowlink[s] = lowlink[s].min(index[t]);
                }
            }
            if advanced {
                continue;
            }
            if lowlink[s] == index[s] {
                while let Some(t) = stack.pop() {
                    on_stack[t] = false;
                    scc[t] = next_scc;
                    if t == s {
                        break;
                    }
                }
                next_scc += 1;
            }
            if let Some(&(parent, _)) = work.last() {
                lowlink[parent] = lowlink[parent].min(lowlink[s]);
            }
        }
    }
    Ok(scc)
}

/// Topological order of the states (`order[old_id] = position`), or `None`
/// when the FST is cyclic. Unreachable states are appended after the
/// reachable ones.
pub fn top_order<W: Semiring, F: ExpandedFst<W>>(fst: &F) -> Result<Option<Vec<StateId>>> {
    let n = fst.num_states();
    // Colors: 0 = white, 1 = grey, 2 = black.
    let mut color = vec![0u8; n];
    let mut finish: Vec<StateId> = Vec::with_capacity(n);
    let roots: Vec<StateId> = match fst.start() {
        Some(start) => std::iter::once(start).chain(0..n).collect(),
        None => (0..n).collect(),
    };
    let mut work: Vec<(StateId, usize)> = vec![];
    for root in roots {
        if color[root] != 0 {
            continue;
        }
        work.push((root, 0));
        color[root] = 1;
        while let Some((s, pos)) = work.pop() {
            let trs = fst.get_trs(s)?;
            let mut advanced = false;
            for (i, tr) in trs.trs().iter().enumerate().skip(pos) {
                let t = tr.nextstate;
                match color[t] {
                    0 => {
                        work.push((s, i + 1));
                        color[t] = 1;
                        work.push((t, 0));
                        advanced = true;
                        break;
                    }
                    1 => return Ok(None),
                    _ => {}
                }
            }
            if !advanced {
                color[s] = 2;
                finish.push(s);
            }
        }
    }
    // Reverse finish order gives the topological position.
    let mut order = vec![0; n];
    for (i, s) in finish.iter().rev().enumerate() {
        order[*s] = i;
    }
    Ok(Some(order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst_impls::VectorFst;
    use crate::fst_traits::MutableFst;
    use crate::semirings::{Semiring, TropicalWeight};
    use crate::Transition;

    fn chain() -> VectorFst<TropicalWeight> {
        let mut fst = VectorFst::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        let s2 = fst.add_state();
        fst.set_start(s0).unwrap();
        fst.set_final(s2, TropicalWeight::one()).unwrap();
        fst.add_tr(s0, Transition::new(1, 1, TropicalWeight::one(), s1))
            .unwrap();
        fst.add_tr(s1, Transition::new(2, 2, TropicalWeight::one(), s2))
            .unwrap();
        fst
    }

    #[test]
    fn test_reachability() -> Result<()> {
        let mut fst = chain();
        let dead = fst.add_state();
        fst.add_tr(dead, Transition::new(5, 5, TropicalWeight::one(), 2))?;
        let access = accessible_states(&fst)?;
        let coaccess = coaccessible_states(&fst)?;
        assert_eq!(access, vec![true, true, true, false]);
        assert_eq!(coaccess, vec![true, true, true, true]);
        Ok(())
    }

    #[test]
    fn test_top_order() -> Result<()> {
        let fst = chain();
        let order = top_order(&fst)?.unwrap();
        assert_eq!(order, vec![0, 1, 2]);
        let mut cyclic = chain();
        cyclic.add_tr(2, Transition::new(3, 3, TropicalWeight::one(), 0))?;
        assert!(top_order(&cyclic)?.is_none());
        Ok(())
    }

    #[test]
    fn test_scc_on_cycle() -> Result<()> {
        let mut fst = chain();
        fst.add_tr(2, Transition::new(3, 3, TropicalWeight::one(), 0))?;
        let scc = strongly_connected_components(&fst)?;
        assert_eq!(scc[0], scc[1]);
        assert_eq!(scc[1], scc[2]);
        Ok(())
    }
}
