//! Small construction helpers used pervasively in tests and examples.

use anyhow::Result;

use crate::fst_traits::MutableFst;
use crate::semirings::Semiring;
use crate::transition::Transition;
use crate::{Label, EPS_LABEL};

/// Builds a linear acceptor for `labels`, placing `weight` on the final
/// state and `One` on every transition.
pub fn acceptor<W: Semiring, F: MutableFst<W>>(labels: &[Label], weight: W) -> F {
    transducer(labels, labels, weight)
}

/// Builds a linear transducer mapping `ilabels` to `olabels`, padding the
/// shorter side with epsilons; `weight` goes on the final state.
pub fn transducer<W: Semiring, F: MutableFst<W>>(
    ilabels: &[Label],
    olabels: &[Label],
    weight: W,
) -> F {
    let mut fst = F::new();
    let n = ilabels.len().max(olabels.len());
    fst.reserve_states(n + 1);
    let start = fst.add_state();
    unsafe { fst.set_start_unchecked(start) };
    let mut current = start;
    for i in 0..n {
        let next = fst.add_state();
        let tr = Transition::new(
            ilabels.get(i).copied().unwrap_or(EPS_LABEL),
            olabels.get(i).copied().unwrap_or(EPS_LABEL),
            W::one(),
            next,
        );
        unsafe { fst.add_tr_unchecked(current, tr) };
        current = next;
    }
    unsafe { fst.set_final_unchecked(current, weight) };
    fst
}

/// Builds the FST with a single, immediately-final state.
pub fn epsilon_machine<W: Semiring, F: MutableFst<W>>() -> Result<F> {
    let mut fst = F::new();
    let s = fst.add_state();
    fst.set_start(s)?;
    fst.set_final(s, W::one())?;
    Ok(fst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst_impls::VectorFst;
    use crate::fst_traits::{CoreFst, ExpandedFst, Fst};
    use crate::semirings::TropicalWeight;

    #[test]
    fn test_acceptor_shape() {
        let fst: VectorFst<TropicalWeight> = acceptor(&[1, 2, 3], TropicalWeight::new(0.5));
        assert_eq!(fst.num_states(), 4);
        assert_eq!(fst.start(), Some(0));
        let paths: Vec<_> = fst.paths_iter().collect();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].ilabels, vec![1, 2, 3]);
        assert_eq!(paths[0].weight, TropicalWeight::new(0.5));
    }

    #[test]
    fn test_transducer_pads_with_epsilon() {
        let fst: VectorFst<TropicalWeight> = transducer(&[1, 2], &[7], TropicalWeight::one());
        let paths: Vec<_> = fst.paths_iter().collect();
        assert_eq!(paths[0].ilabels, vec![1, 2]);
        assert_eq!(paths[0].olabels, vec![7]);
    }
}
