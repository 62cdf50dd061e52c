use std::sync::Arc;

use anyhow::{bail, Result};

use crate::algorithms::complement::ComplementFst;
use crate::algorithms::compose::compose_filters::SequenceComposeFilter;
use crate::algorithms::compose::matchers::{
    GenericMatcher, MatchType, Matcher, MatcherRewriteMode, RhoMatcher,
};
use crate::algorithms::compose::{ComposeFst, ComposeFstOpOptions};
use crate::algorithms::connect::connect;
use crate::algorithms::fst_convert::fst_convert_from_ref;
use crate::fst_impls::VectorFst;
use crate::fst_properties::FstProperties;
use crate::fst_traits::{ExpandedFst, MutableFst};
use crate::semirings::Semiring;
use crate::NO_LABEL;

/// Label carried by the complement's completion transitions; private to
/// the library, rewritten away by the rho matcher during composition.
const RHO_LABEL: usize = NO_LABEL - 1;

/// Difference of two acceptors: paths of `fst1` whose string is not
/// accepted by `fst2`, with their `fst1` weights.
///
/// `fst2` must be a deterministic, epsilon-free, unweighted acceptor; its
/// complement is taken as a delayed view with a rho-labeled sink, and the
/// composition matches the rho transitions against "the rest of the
/// alphabet".
pub fn difference<W, F1, F2, F3>(fst1: &F1, fst2: &F2) -> Result<F3>
where
    W: Semiring,
    F1: ExpandedFst<W>,
    F2: ExpandedFst<W>,
    F3: MutableFst<W>,
{
    let props1 = fst1.properties_check(FstProperties::ACCEPTOR)?;
    if !props1.contains(FstProperties::ACCEPTOR) {
        bail!("difference: first operand must be an acceptor");
    }
    let complement: ComplementFst<W, VectorFst<W>> =
        ComplementFst::new(Arc::new(fst_convert_from_ref(fst2)), RHO_LABEL)?;
    let complement_vec: VectorFst<W> = fst_convert_from_ref(&complement);
    let fst1 = Arc::new(fst_convert_from_ref::<W, _, VectorFst<W>>(fst1));
    let fst2 = Arc::new(complement_vec);
    let matcher2 = RhoMatcher::new_with_matcher(
        GenericMatcher::new(Arc::clone(&fst2), MatchType::MatchInput)?,
        RHO_LABEL,
        MatcherRewriteMode::Auto,
    );
    let opts = ComposeFstOpOptions {
        matcher1: None,
        matcher2: Some(matcher2),
        filter: None,
        state_table: None,
    };
    type M1<W> = GenericMatcher<W, VectorFst<W>>;
    type M2<W> = RhoMatcher<W, GenericMatcher<W, VectorFst<W>>>;
    let composed =
        ComposeFst::<W, SequenceComposeFilter<W, M1<W>, M2<W>>>::new_with_options(
            fst1, fst2, opts,
        )?;
    let mut ofst: F3 = composed.compute()?;
    connect(&mut ofst)?;
    Ok(ofst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst_traits::Fst;
    use crate::semirings::TropicalWeight;
    use crate::utils::acceptor;
    use crate::algorithms::union::union;

    #[test]
    fn test_difference_removes_accepted_strings() -> Result<()> {
        // fst1 accepts {1, 2}; fst2 accepts {1}; the difference is {2}.
        let mut fst1: VectorFst<TropicalWeight> = acceptor(&[1], TropicalWeight::new(0.5));
        let other: VectorFst<TropicalWeight> = acceptor(&[2], TropicalWeight::new(1.5));
        union(&mut fst1, &other)?;
        let fst2: VectorFst<TropicalWeight> = acceptor(&[1], TropicalWeight::one());

        let diff: VectorFst<TropicalWeight> = difference(&fst1, &fst2)?;
        let paths: Vec<_> = diff.paths_iter().collect();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].ilabels, vec![2]);
        assert_eq!(paths[0].weight, TropicalWeight::new(1.5));
        Ok(())
    }

    #[test]
    fn test_difference_with_self_is_empty() -> Result<()> {
        let fst: VectorFst<TropicalWeight> = acceptor(&[1, 2], TropicalWeight::one());
        let diff: VectorFst<TropicalWeight> = difference(&fst, &fst)?;
        assert_eq!(diff.paths_iter().count(), 0);
        Ok(())
    }
}
