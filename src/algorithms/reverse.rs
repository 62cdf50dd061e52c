use anyhow::Result;

use crate::fst_properties::op_properties::reverse_properties;
use crate::fst_properties::FstProperties;
use crate::fst_traits::{ExpandedFst, MutableFst};
use crate::semirings::Semiring;
use crate::trs::Transitions;
use crate::{Transition, EPS_LABEL};

/// Builds the transducer of the reversed relation over the reverse
/// semiring.
///
/// State `s` of the input maps to `s + 1` of the output; state `0` is a
/// fresh superinitial state with an epsilon transition to each reversed
/// final state carrying its (reversed) final weight. Every transition is
/// flipped and its weight mapped by `reverse`.
pub fn reverse<W, F1, F2>(ifst: &F1) -> Result<F2>
where
    W: Semiring,
    F1: ExpandedFst<W>,
    F2: MutableFst<W::ReverseWeight>,
{
    let mut ofst = F2::new();
    ofst.add_states(ifst.num_states() + 1);
    let superinitial = 0;
    ofst.set_start(superinitial)?;
    for s in ifst.states_range() {
        for tr in ifst.get_trs(s)?.trs() {
            let reversed = Transition::new(tr.ilabel, tr.olabel, tr.weight.reverse(), s + 1);
            ofst.add_tr(tr.nextstate + 1, reversed)?;
        }
        if let Some(final_weight) = ifst.final_weight(s)? {
            ofst.add_tr(
                superinitial,
                Transition::new(EPS_LABEL, EPS_LABEL, final_weight.reverse(), s + 1),
            )?;
        }
    }
    if let Some(start) = ifst.start() {
        ofst.set_final(start + 1, W::ReverseWeight::one())?;
    }
    ofst.set_symts_from_fst(ifst);
    ofst.set_properties_with_mask(
        reverse_properties(ifst.properties()),
        FstProperties::copy_properties(),
    );
    Ok(ofst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst_impls::VectorFst;
    use crate::fst_traits::Fst;
    use crate::semirings::TropicalWeight;
    use crate::utils::acceptor;

    #[test]
    fn test_reverse_linear() -> Result<()> {
        let fst: VectorFst<TropicalWeight> = acceptor(&[1, 2, 3], TropicalWeight::new(0.5));
        let rev: VectorFst<TropicalWeight> = reverse(&fst)?;
        let paths: Vec<_> = rev.paths_iter().collect();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].ilabels, vec![3, 2, 1]);
        assert_eq!(paths[0].weight, TropicalWeight::new(0.5));
        Ok(())
    }

    #[test]
    fn test_reverse_reverse_preserves_relation() -> Result<()> {
        let fst: VectorFst<TropicalWeight> = acceptor(&[4, 5], TropicalWeight::new(1.5));
        let rev: VectorFst<TropicalWeight> = reverse(&fst)?;
        let back: VectorFst<TropicalWeight> = reverse(&rev)?;
        let mut orig: Vec<_> = fst.paths_iter().collect();
        let mut round: Vec<_> = back.paths_iter().collect();
        orig.sort_by(|a, b| a.ilabels.cmp(&b.ilabels));
        round.sort_by(|a, b| a.ilabels.cmp(&b.ilabels));
        assert_eq!(orig, round);
        Ok(())
    }
}
