use anyhow::Result;
use itertools::Itertools;

use crate::fst_traits::MutableFst;
use crate::semirings::Semiring;

/// Combines identically labeled transitions with the same destination by
/// `Plus`-summing their weights. Transitions end up sorted by
/// `(ilabel, olabel, nextstate)`.
pub fn tr_sum<W: Semiring, F: MutableFst<W>>(fst: &mut F) -> Result<()> {
    for state in fst.states_range() {
        let mut trs = fst.pop_trs(state)?;
        trs.sort_by(|a, b| {
            (a.ilabel, a.olabel, a.nextstate).cmp(&(b.ilabel, b.olabel, b.nextstate))
        });
        let merged = trs.into_iter().coalesce(|mut a, b| {
            if a.ilabel == b.ilabel && a.olabel == b.olabel && a.nextstate == b.nextstate {
                a.weight.plus_assign(&b.weight);
                Ok(a)
            } else {
                Err((a, b))
            }
        });
        for tr in merged {
            fst.add_tr(state, tr)?;
        }
    }
    Ok(())
}

/// Removes exact duplicate transitions (same labels, weight and
/// destination), keeping one copy of each. Transitions end up sorted.
pub fn tr_unique<W: Semiring, F: MutableFst<W>>(fst: &mut F) -> Result<()> {
    for state in fst.states_range() {
        let mut trs = fst.pop_trs(state)?;
        trs.sort_by(|a, b| {
            (a.ilabel, a.olabel, a.nextstate)
                .cmp(&(b.ilabel, b.olabel, b.nextstate))
                .then_with(|| a.weight.partial_cmp(&b.weight).unwrap_or(std::cmp::Ordering::Equal))
        });
        trs.dedup();
        for tr in trs {
            fst.add_tr(state, tr)?;
        }
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
    fn test_tr_sum_merges_parallel() -> Result<()> {
        let mut fst = VectorFst::<TropicalWeight>::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        fst.set_start(s0)?;
        fst.set_final(s1, TropicalWeight::one())?;
        fst.add_tr(s0, Transition::new(1, 1, TropicalWeight::new(3.0), s1))?;
        fst.add_tr(s0, Transition::new(1, 1, TropicalWeight::new(1.0), s1))?;
        tr_sum(&mut fst)?;
        let trs = fst.get_trs(s0)?;
        assert_eq!(trs.len(), 1);
        assert_eq!(trs.trs()[0].weight, TropicalWeight::new(1.0));
        Ok(())
    }

    #[test]
    fn test_tr_unique_drops_duplicates() -> Result<()> {
        let mut fst = VectorFst::<TropicalWeight>::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        fst.set_start(s0)?;
        fst.set_final(s1, TropicalWeight::one())?;
        fst.add_tr(s0, Transition::new(1, 1, TropicalWeight::new(3.0), s1))?;
        fst.add_tr(s0, Transition::new(1, 1, TropicalWeight::new(3.0), s1))?;
        fst.add_tr(s0, Transition::new(1, 1, TropicalWeight::new(1.0), s1))?;
        tr_unique(&mut fst)?;
        assert_eq!(fst.num_trs(s0)?, 2);
        Ok(())
    }
}
