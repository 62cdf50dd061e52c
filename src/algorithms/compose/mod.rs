//! Composition of two transducers: pluggable matchers answer label
//! queries, an epsilon filter arbitrates epsilon moves, and the delayed
//! three-way state product expands on demand.

pub use self::compose_fst::ComposeFst;
pub use self::compose_fst_op::{ComposeFstOp, ComposeFstOpOptions, ComposeStateTuple};

pub mod compose_filters;
pub mod filter_states;
pub mod matchers;

mod compose_fst;
mod compose_fst_op;

use std::sync::Arc;

use anyhow::Result;

use crate::algorithms::compose::compose_filters::{
    AltSequenceComposeFilter, ComposeFilter, MatchComposeFilter, NoMatchComposeFilter,
    NullComposeFilter, SequenceComposeFilter,
};
use crate::algorithms::compose::matchers::SortedMatcher;
use crate::algorithms::connect::connect;
use crate::algorithms::fst_convert::fst_convert_from_ref;
use crate::algorithms::tr_sort::{ilabel_compare, olabel_compare, tr_sort};
use crate::fst_impls::VectorFst;
use crate::fst_traits::{ExpandedFst, MutableFst};
use crate::semirings::Semiring;

/// Epsilon-filter selection of the eager [`compose_with_config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeFilterEnum {
    /// Sequence filter, correct for every input.
    AutoFilter,
    SequenceFilter,
    AltSequenceFilter,
    MatchFilter,
    NoMatchFilter,
    NullFilter,
}

/// Options of the eager composition.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeConfig {
    pub compose_filter: ComposeFilterEnum,
    /// Trim the result.
    pub connect: bool,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            compose_filter: ComposeFilterEnum::AutoFilter,
            connect: true,
        }
    }
}

/// Composes two transducers: `C(x, z) = ⊕ over y of A(x, y) ⊗ B(y, z)`,
/// with the default configuration. Working copies of the operands are
/// label-sorted on the composition sides so the sorted matcher can binary
/// search.
pub fn compose<W, F1, F2, F3>(fst1: F1, fst2: F2) -> Result<F3>
where
    W: Semiring,
    F1: ExpandedFst<W>,
    F2: ExpandedFst<W>,
    F3: MutableFst<W>,
{
    compose_with_config(fst1, fst2, ComposeConfig::default())
}

pub fn compose_with_config<W, F1, F2, F3>(
    fst1: F1,
    fst2: F2,
    config: ComposeConfig,
) -> Result<F3>
where
    W: Semiring,
    F1: ExpandedFst<W>,
    F2: ExpandedFst<W>,
    F3: MutableFst<W>,
{
    if !crate::symbol_table::compat_symbols(fst1.output_symbols(), fst2.input_symbols()) {
        anyhow::bail!("compose: output symbol table of the first operand differs from the input symbol table of the second");
    }
    let mut vfst1: VectorFst<W> = fst_convert_from_ref(&fst1);
    let mut vfst2: VectorFst<W> = fst_convert_from_ref(&fst2);
    tr_sort(&mut vfst1, olabel_compare);
    tr_sort(&mut vfst2, ilabel_compare);
    let fst1 = Arc::new(vfst1);
    let fst2 = Arc::new(vfst2);

    type M<W> = SortedMatcher<W, VectorFst<W>>;
    let mut ofst: F3 = match config.compose_filter {
        ComposeFilterEnum::AutoFilter | ComposeFilterEnum::SequenceFilter => {
            ComposeFst::<W, SequenceComposeFilter<W, M<W>, M<W>>>::new(fst1, fst2)?.compute()?
        }
        ComposeFilterEnum::AltSequenceFilter => {
            ComposeFst::<W, AltSequenceComposeFilter<W, M<W>, M<W>>>::new(fst1, fst2)?
                .compute()?
        }
        ComposeFilterEnum::MatchFilter => {
            ComposeFst::<W, MatchComposeFilter<W, M<W>, M<W>>>::new(fst1, fst2)?.compute()?
        }
        ComposeFilterEnum::NoMatchFilter => {
            ComposeFst::<W, NoMatchComposeFilter<W, M<W>, M<W>>>::new(fst1, fst2)?.compute()?
        }
        ComposeFilterEnum::NullFilter => {
            ComposeFst::<W, NullComposeFilter<W, M<W>, M<W>>>::new(fst1, fst2)?.compute()?
        }
    };
    if config.connect {
        connect(&mut ofst)?;
    }
    Ok(ofst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::shortest_distance::shortest_distance;
    use crate::fst_traits::{CoreFst, Fst};
    use crate::semirings::TropicalWeight;
    use crate::utils::{acceptor, transducer};
    use crate::Transition;

    #[test]
    fn test_compose_acceptors() -> Result<()> {
        // Scenario: two linear acceptors over "ab"; the composed weight is
        // the sum of all four transition weights.
        let mut a = VectorFst::<TropicalWeight>::new();
        let a0 = a.add_state();
        let a1 = a.add_state();
        let a2 = a.add_state();
        a.set_start(a0)?;
        a.set_final(a2, TropicalWeight::one())?;
        a.add_tr(a0, Transition::new(1, 1, TropicalWeight::new(1.0), a1))?;
        a.add_tr(a1, Transition::new(2, 2, TropicalWeight::new(2.0), a2))?;
        let mut b = VectorFst::<TropicalWeight>::new();
        let b0 = b.add_state();
        let b1 = b.add_state();
        let b2 = b.add_state();
        b.set_start(b0)?;
        b.set_final(b2, TropicalWeight::one())?;
        b.add_tr(b0, Transition::new(1, 1, TropicalWeight::new(3.0), b1))?;
        b.add_tr(b1, Transition::new(2, 2, TropicalWeight::new(4.0), b2))?;

        let composed: VectorFst<TropicalWeight> = compose(a, b)?;
        assert_eq!(composed.num_states(), 3);
        let d = shortest_distance(&composed, false)?;
        let total: Vec<_> = composed
            .final_states_iter()
            .map(|(s, w)| d[s].times(&w))
            .collect();
        assert_eq!(total, vec![TropicalWeight::new(10.0)]);
        Ok(())
    }

    #[test]
    fn test_compose_epsilon_sequence_filter() -> Result<()> {
        // A maps x -> eps then eps -> y; B consumes y. One surviving path
        // with input x, output y, weight 6.
        let mut a = VectorFst::<TropicalWeight>::new();
        let a0 = a.add_state();
        let a1 = a.add_state();
        let a2 = a.add_state();
        a.set_start(a0)?;
        a.set_final(a2, TropicalWeight::one())?;
        a.add_tr(a0, Transition::new(10, 0, TropicalWeight::new(1.0), a1))?;
        a.add_tr(a1, Transition::new(0, 20, TropicalWeight::new(2.0), a2))?;
        let b: VectorFst<TropicalWeight> = acceptor(&[20], TropicalWeight::new(3.0));

        let composed: VectorFst<TropicalWeight> = compose(a.clone(), b.clone())?;
        let paths: Vec<_> = composed.paths_iter().collect();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].ilabels, vec![10]);
        assert_eq!(paths[0].olabels, vec![20]);
        assert_eq!(paths[0].weight, TropicalWeight::new(6.0));

        // The match filter yields the same relation here.
        let composed_match: VectorFst<TropicalWeight> = compose_with_config(
            a,
            b,
            ComposeConfig {
                compose_filter: ComposeFilterEnum::MatchFilter,
                connect: true,
            },
        )?;
        let paths_match: Vec<_> = composed_match.paths_iter().collect();
        assert_eq!(paths_match.len(), 1);
        assert_eq!(paths_match[0].weight, TropicalWeight::new(6.0));
        Ok(())
    }

    #[test]
    fn test_compose_transducers_chain() -> Result<()> {
        let a: VectorFst<TropicalWeight> = transducer(&[1, 2], &[3, 4], TropicalWeight::one());
        let b: VectorFst<TropicalWeight> = transducer(&[3, 4], &[5, 6], TropicalWeight::one());
        let composed: VectorFst<TropicalWeight> = compose(a, b)?;
        let paths: Vec<_> = composed.paths_iter().collect();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].ilabels, vec![1, 2]);
        assert_eq!(paths[0].olabels, vec![5, 6]);
        Ok(())
    }

    #[test]
    fn test_epsilon_free_filters_agree() -> Result<()> {
        // On epsilon-free operands every filter computes the same
        // composition.
        let a: VectorFst<TropicalWeight> = transducer(&[1, 2], &[3, 4], TropicalWeight::one());
        let b: VectorFst<TropicalWeight> = transducer(&[3, 4], &[5, 6], TropicalWeight::one());
        let reference: VectorFst<TropicalWeight> = compose(a.clone(), b.clone())?;
        for filter in [ComposeFilterEnum::NullFilter, ComposeFilterEnum::NoMatchFilter] {
            let composed: VectorFst<TropicalWeight> = compose_with_config(
                a.clone(),
                b.clone(),
                ComposeConfig {
                    compose_filter: filter,
                    connect: true,
                },
            )?;
            assert!(crate::algorithms::isomorphic(&reference, &composed)?);
        }
        Ok(())
    }

    #[test]
    fn test_compose_empty_inputs() -> Result<()> {
        let empty1 = VectorFst::<TropicalWeight>::new();
        let empty2 = VectorFst::<TropicalWeight>::new();
        let composed: VectorFst<TropicalWeight> = compose(empty1, empty2)?;
        assert_eq!(composed.start(), None);
        Ok(())
    }
}
