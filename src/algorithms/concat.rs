use anyhow::Result;

use crate::algorithms::fst_convert::fst_convert_from_ref;
use crate::algorithms::replace::{replace_fst, ReplaceFst, ReplaceFstConfig};
use crate::fst_impls::VectorFst;
use crate::fst_properties::op_properties::concat_properties;
use crate::fst_traits::{ExpandedFst, FstIterator, MutableFst};
use crate::semirings::Semiring;
use crate::{StateId, Transition, EPS_LABEL, NO_LABEL};

/// Appends `fst2` to `fst1` in place so that `fst1` accepts the
/// concatenation of the two relations: every final state of `fst1` gains
/// an epsilon transition, weighted with its final weight, to the start of
/// `fst2`, and stops being final.
pub fn concat<W, F1, F2>(fst1: &mut F1, fst2: &F2) -> Result<()>
where
    W: Semiring,
    F1: MutableFst<W>,
    F2: ExpandedFst<W>,
{
    let props1 = fst1.properties();
    let props2 = fst2.properties();
    let offset = fst1.num_states();
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
    let finals1: Vec<(StateId, W)> = (0..offset)
        .filter_map(|s| {
            fst1.final_weight(s)
                .ok()
                .flatten()
                .map(|w| (s, w))
        })
        .collect();
    match fst2.start() {
        Some(start2) => {
            for (state, weight) in finals1 {
                fst1.add_tr(
                    state,
                    Transition::new(EPS_LABEL, EPS_LABEL, weight, start2 + offset),
                )?;
                fst1.delete_final_weight(state)?;
            }
        }
        None => {
            // Concatenating with the empty relation empties the result.
            for (state, _) in finals1 {
                fst1.delete_final_weight(state)?;
            }
        }
    }
    fst1.set_properties(concat_properties(props1, props2));
    Ok(())
}

/// Delayed concatenation built on the replace engine: a three-state root
/// chains two call transitions.
#[derive(Debug)]
pub struct ConcatFst<W: Semiring>(ReplaceFst<W, VectorFst<W>>);

impl<W: Semiring> ConcatFst<W> {
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
        let s2 = root.add_state();
        root.set_start(s0)?;
        root.set_final(s2, W::one())?;
        root.add_tr(s0, Transition::new(EPS_LABEL, nt1, W::one(), s1))?;
        root.add_tr(s1, Transition::new(EPS_LABEL, nt2, W::one(), s2))?;
        let inner = replace_fst(
            vec![
                (root_label, root),
                (nt1, fst_convert_from_ref(fst1)),
                (nt2, fst_convert_from_ref(fst2)),
            ],
            ReplaceFstConfig::new(root_label),
        )?;
        Ok(ConcatFst(inner))
    }

    /// Materialises the delayed concatenation.
    pub fn compute<F2: MutableFst<W>>(&self) -> Result<F2> {
        self.0.compute()
    }
}

delegate_fst_newtype!(ConcatFst, ReplaceFst<W, VectorFst<W>>);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst_traits::Fst;
    use crate::semirings::TropicalWeight;
    use crate::utils::acceptor;

    #[test]
    fn test_concat_eager() -> Result<()> {
        let mut a: VectorFst<TropicalWeight> = acceptor(&[1], TropicalWeight::new(1.0));
        let b: VectorFst<TropicalWeight> = acceptor(&[2], TropicalWeight::new(2.0));
        concat(&mut a, &b)?;
        let paths: Vec<_> = a.paths_iter().collect();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].ilabels, vec![1, 2]);
        assert_eq!(paths[0].weight, TropicalWeight::new(3.0));
        Ok(())
    }

    #[test]
    fn test_concat_with_empty_is_empty() -> Result<()> {
        let mut a: VectorFst<TropicalWeight> = acceptor(&[1], TropicalWeight::new(1.0));
        let empty = VectorFst::<TropicalWeight>::new();
        concat(&mut a, &empty)?;
        assert_eq!(a.paths_iter().count(), 0);
        Ok(())
    }

    #[test]
    fn test_concat_delayed_matches_eager() -> Result<()> {
        let a: VectorFst<TropicalWeight> = acceptor(&[1], TropicalWeight::new(1.0));
        let b: VectorFst<TropicalWeight> = acceptor(&[2], TropicalWeight::new(2.0));
        let delayed = ConcatFst::new(&a, &b)?;
        let computed: VectorFst<TropicalWeight> = delayed.compute()?;
        let paths: Vec<_> = computed.paths_iter().collect();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].ilabels, vec![1, 2]);
        assert_eq!(paths[0].weight, TropicalWeight::new(3.0));
        Ok(())
    }
}
