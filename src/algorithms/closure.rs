use anyhow::Result;

use crate::algorithms::fst_convert::fst_convert_from_ref;
use crate::algorithms::replace::{replace_fst, ReplaceFst, ReplaceFstConfig};
use crate::fst_impls::VectorFst;
use crate::fst_properties::op_properties::closure_properties;
use crate::fst_traits::{ExpandedFst, Fst, MutableFst};
use crate::semirings::Semiring;
use crate::{StateId, Transition, EPS_LABEL, NO_LABEL};

/// Whether the closure accepts the empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosureType {
    /// `T*`: zero or more repetitions.
    ClosureStar,
    /// `T+`: one or more repetitions.
    ClosurePlus,
}

/// Closes an FST in place under repetition: every final state gains an
/// epsilon transition, weighted with its final weight, back to the start;
/// the star form adds a fresh, immediately-final start so the empty string
/// is accepted too.
pub fn closure<W: Semiring, F: MutableFst<W>>(fst: &mut F, closure_type: ClosureType) {
    let props = fst.properties();
    if let Some(start) = fst.start() {
        let finals: Vec<(StateId, W)> = fst
            .final_states_iter()
            .collect();
        for (state, weight) in finals {
            // Loop back for another repetition.
            let _ = fst.add_tr(state, Transition::new(EPS_LABEL, EPS_LABEL, weight, start));
        }
    }
    if closure_type == ClosureType::ClosureStar {
        let new_start = fst.add_state();
        if let Some(old_start) = fst.start() {
            let _ = fst.add_tr(
                new_start,
                Transition::new(EPS_LABEL, EPS_LABEL, W::one(), old_start),
            );
        }
        // set_start on a state just added cannot fail.
        let _ = fst.set_start(new_start);
        let _ = fst.set_final(new_start, W::one());
    }
    fst.set_properties(closure_properties(
        props,
        closure_type == ClosureType::ClosureStar,
    ));
}

/// Delayed closure built on the replace engine: the star root is a single
/// final state with a call self-loop, the plus root calls once then loops
/// back with epsilon.
#[derive(Debug)]
pub struct ClosureFst<W: Semiring>(ReplaceFst<W, VectorFst<W>>);

impl<W: Semiring> ClosureFst<W> {
    pub fn new<F: ExpandedFst<W>>(fst: &F, closure_type: ClosureType) -> Result<Self> {
        let nt = NO_LABEL - 1;
        let root_label = NO_LABEL - 2;
        let mut root = VectorFst::<W>::new();
        match closure_type {
            ClosureType::ClosureStar => {
                let s0 = root.add_state();
                root.set_start(s0)?;
                root.set_final(s0, W::one())?;
                root.add_tr(s0, Transition::new(EPS_LABEL, nt, W::one(), s0))?;
            }
            ClosureType::ClosurePlus => {
                let s0 = root.add_state();
                let s1 = root.add_state();
                root.set_start(s0)?;
                root.set_final(s1, W::one())?;
                root.add_tr(s0, Transition::new(EPS_LABEL, nt, W::one(), s1))?;
                root.add_tr(s1, Transition::new(EPS_LABEL, EPS_LABEL, W::one(), s0))?;
            }
        }
        let inner = replace_fst(
            vec![(root_label, root), (nt, fst_convert_from_ref(fst))],
            ReplaceFstConfig::new(root_label),
        )?;
        Ok(ClosureFst(inner))
    }

    /// Materialises the delayed closure.
    pub fn compute<F2: MutableFst<W>>(&self) -> Result<F2> {
        self.0.compute()
    }
}

delegate_fst_newtype!(ClosureFst, ReplaceFst<W, VectorFst<W>>);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst_traits::Fst;
    use crate::semirings::TropicalWeight;
    use crate::utils::acceptor;

    #[test]
    fn test_closure_star_accepts_empty() -> Result<()> {
        let mut fst: VectorFst<TropicalWeight> = acceptor(&[1], TropicalWeight::new(1.0));
        closure(&mut fst, ClosureType::ClosureStar);
        let strings: Vec<_> = fst.paths_iter().map(|p| p.ilabels).collect();
        assert!(strings.contains(&vec![]));
        assert!(strings.contains(&vec![1]));
        Ok(())
    }

    #[test]
    fn test_closure_plus_rejects_empty() -> Result<()> {
        let mut fst: VectorFst<TropicalWeight> = acceptor(&[1], TropicalWeight::new(1.0));
        closure(&mut fst, ClosureType::ClosurePlus);
        let strings: Vec<_> = fst.paths_iter().map(|p| p.ilabels).collect();
        assert!(!strings.contains(&vec![]));
        assert!(strings.contains(&vec![1]));
        Ok(())
    }

    #[test]
    fn test_closure_fst_delayed() -> Result<()> {
        use crate::fst_traits::CoreFst;
        use crate::trs::Transitions;
        let fst: VectorFst<TropicalWeight> = acceptor(&[1], TropicalWeight::new(1.0));
        let delayed = ClosureFst::new(&fst, ClosureType::ClosureStar)?;
        let computed: VectorFst<TropicalWeight> = delayed.compute()?;
        // The start accepts the empty string, and one repetition loops
        // back to it through the expanded operand.
        let start = computed.start().unwrap();
        assert!(computed.final_weight(start)?.is_some());
        let mut saw_symbol = false;
        let mut saw_return_to_start = false;
        for s in computed.states_range() {
            for tr in computed.get_trs(s)?.trs() {
                saw_symbol |= tr.ilabel == 1;
                saw_return_to_start |= tr.nextstate == start && s != start;
            }
        }
        assert!(saw_symbol);
        assert!(saw_return_to_start);
        Ok(())
    }
}
