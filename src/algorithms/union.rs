use anyhow::Result;

use crate::algorithms::fst_convert::fst_convert_from_ref;
use crate::algorithms::replace::{replace_fst, ReplaceFst, ReplaceFstConfig};
use crate::fst_impls::VectorFst;
use crate::fst_properties::op_properties::union_properties;
use crate::fst_traits::{ExpandedFst, FstIterator, MutableFst};
use crate::semirings::Semiring;
use crate::{Transition, EPS_LABEL, NO_LABEL};

/// Merges `fst2` into `fst1` in place so that `fst1` accepts the union of
/// both relations: a fresh start state fans out with epsilon transitions
/// to the two original start states.
pub fn union<W, F1, F2>(fst1: &mut F1, fst2: &F2) -> Result<()>
where
    W: Semiring,
    F1: MutableFst<W>,
    F2: ExpandedFst<W>,
{
    let props1 = fst1.properties();
    let props2 = fst2.properties();
    let offset = fst1.num_states();
    let start1 = fst1.start();
    fst1.add_states(fst2.num_states());
    for data in fst2.fst_iter() {
        let state = data.state_id + offset;
        for tr in crate::trs::Transitions::trs(&data.trs) {
            fst1.add_tr(
                state,
                Transition::new(tr.ilabel, tr.olabel, tr.weight.clone(), tr.nextstate + offset),
            )?;
        }
        if let Some(final_weight) = data.final_weight {
            fst1.set_final(state, final_weight)?;
        }
    }
    let new_start = fst1.add_state();
    if let Some(start1) = start1 {
        fst1.add_tr(
            new_start,
            Transition::new(EPS_LABEL, EPS_LABEL, W::one(), start1),
        )?;
    }
    if let Some(start2) = fst2.start() {
        fst1.add_tr(
            new_start,
            Transition::new(EPS_LABEL, EPS_LABEL, W::one(), start2 + offset),
        )?;
    }
    fst1.set_start(new_start)?;
    fst1.set_properties(union_properties(props1, props2));
    Ok(())
}

/// Delayed union built on the replace engine, with the rational topology
/// of the original library: a two-state root whose two parallel call
/// transitions expand into the operands.
#[derive(Debug)]
pub struct UnionFst<W: Semiring>(ReplaceFst<W, VectorFst<W>>);

impl<W: Semiring> UnionFst<W> {
    pub fn new<F1, F2>(fst1: &F1, fst2: &F2) -> Result<Self>
    where
        F1: ExpandedFst<W>,
        F2: ExpandedFst<W>,
    {
        let nt1 = NO_LABEL - 1;
        let nt2 = NO_LABEL - 2;
        let root_label = NO_LABEL - 3;
        let mut root = VectorFst::<W>::new();
        let s0 = root.add_state();
        let s1 = root.add_state();
        root.set_start(s0)?;
        root.set_final(s1, W::one())?;
        root.add_tr(s0, Transition::new(EPS_LABEL, nt1, W::one(), s1))?;
        root.add_tr(s0, Transition::new(EPS_LABEL, nt2, W::one(), s1))?;
        let inner = replace_fst(
            vec![
                (root_label, root),
                (nt1, fst_convert_from_ref(fst1)),
                (nt2, fst_convert_from_ref(fst2)),
            ],
            ReplaceFstConfig::new(root_label),
        )?;
        Ok(UnionFst(inner))
    }

    /// Materialises the delayed union.
    pub fn compute<F2: MutableFst<W>>(&self) -> Result<F2> {
        self.0.compute()
    }
}

delegate_fst_newtype!(UnionFst, ReplaceFst<W, VectorFst<W>>);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst_traits::Fst;
    use crate::semirings::TropicalWeight;
    use crate::utils::acceptor;

    #[test]
    fn test_union_eager() -> Result<()> {
        let mut a: VectorFst<TropicalWeight> = acceptor(&[1], TropicalWeight::new(1.0));
        let b: VectorFst<TropicalWeight> = acceptor(&[2], TropicalWeight::new(2.0));
        union(&mut a, &b)?;
        let mut strings: Vec<_> = a.paths_iter().map(|p| p.ilabels).collect();
        strings.sort();
        assert_eq!(strings, vec![vec![1], vec![2]]);
        Ok(())
    }

    #[test]
    fn test_union_delayed_matches_eager() -> Result<()> {
        let a: VectorFst<TropicalWeight> = acceptor(&[1], TropicalWeight::new(1.0));
        let b: VectorFst<TropicalWeight> = acceptor(&[2], TropicalWeight::new(2.0));
        let delayed = UnionFst::new(&a, &b)?;
        let computed: VectorFst<TropicalWeight> = delayed.compute()?;
        let mut strings: Vec<_> = computed
            .paths_iter()
            .map(|p| (p.ilabels, p.weight))
            .collect();
        strings.sort_by(|x, y| x.0.cmp(&y.0));
        assert_eq!(
            strings,
            vec![
                (vec![1], TropicalWeight::new(1.0)),
                (vec![2], TropicalWeight::new(2.0))
            ]
        );
        Ok(())
    }
}
