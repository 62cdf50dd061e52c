use anyhow::{bail, Result};

use crate::fst_traits::MutableFst;
use crate::semirings::Semiring;
use crate::StateId;

/// Renumbers the states of an FST in place: state `s` moves to
/// `order[s]`. `order` must be a permutation of the state ids.
pub fn state_sort<W: Semiring, F: MutableFst<W>>(fst: &mut F, order: &[StateId]) -> Result<()> {
    let n = fst.num_states();
    if order.len() != n {
        bail!(
            "state_sort: order has {} entries for {} states",
            order.len(),
            n
        );
    }
    let mut seen = vec![false; n];
    for &pos in order {
        if pos >= n || seen[pos] {
            bail!("state_sort: order is not a permutation");
        }
        seen[pos] = true;
    }

    let start = fst.start();
    // Collect the relabeled content, then rebuild.
    let mut finals = vec![None; n];
    let mut trs = Vec::with_capacity(n);
    trs.resize_with(n, Vec::new);
    for s in 0..n {
        finals[order[s]] = fst.final_weight(s)?;
        let mut state_trs = fst.pop_trs(s)?;
        for tr in state_trs.iter_mut() {
            tr.nextstate = order[tr.nextstate];
        }
        trs[order[s]] = state_trs;
    }
    for s in 0..n {
        fst.delete_final_weight(s)?;
    }
    for (s, state_trs) in trs.into_iter().enumerate() {
        for tr in state_trs {
            fst.add_tr(s, tr)?;
        }
        if let Some(weight) = finals[s].take() {
            fst.set_final(s, weight)?;
        }
    }
    if let Some(start) = start {
        fst.set_start(order[start])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst_impls::VectorFst;
    use crate::fst_traits::CoreFst;
    use crate::semirings::TropicalWeight;
    use crate::trs::Transitions;
    use crate::Transition;

    #[test]
    fn test_state_sort_swap() -> Result<()> {
        let mut fst = VectorFst::<TropicalWeight>::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        fst.set_start(s0)?;
        fst.set_final(s1, TropicalWeight::new(0.5))?;
        fst.add_tr(s0, Transition::new(1, 1, TropicalWeight::one(), s1))?;
        state_sort(&mut fst, &[1, 0])?;
        assert_eq!(fst.start(), Some(1));
        assert_eq!(fst.final_weight(0)?, Some(TropicalWeight::new(0.5)));
        assert_eq!(fst.get_trs(1)?.trs()[0].nextstate, 0);
        Ok(())
    }
}
