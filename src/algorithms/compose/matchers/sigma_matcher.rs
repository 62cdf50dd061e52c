use std::sync::Arc;

use anyhow::Result;

use crate::algorithms::compose::matchers::{
    rewrite_tr, MatchType, Matcher, MatcherFlags, MatcherRewriteMode,
};
use crate::semirings::Semiring;
use crate::transition::Transition;
use crate::{Label, StateId, EPS_LABEL, NO_LABEL};

/// Wrapping matcher realising "any symbol" semantics: transitions carrying
/// the sigma label match every non-epsilon query, relabeled to the query,
/// in addition to the literal matches of the wrapped matcher.
#[derive(Debug)]
pub struct SigmaMatcher<W: Semiring, M: Matcher<W>> {
    matcher: M,
    sigma_label: Label,
    rewrite_mode: MatcherRewriteMode,
    w: std::marker::PhantomData<W>,
}

impl<W: Semiring, M: Matcher<W>> SigmaMatcher<W, M> {
    pub fn new_with_matcher(
        matcher: M,
        sigma_label: Label,
        rewrite_mode: MatcherRewriteMode,
    ) -> Self {
        Self {
            matcher,
            sigma_label,
            rewrite_mode,
            w: std::marker::PhantomData,
        }
    }

    pub fn sigma_label(&self) -> Label {
        self.sigma_label
    }
}

impl<W: Semiring, M: Matcher<W>> Matcher<W> for SigmaMatcher<W, M> {
    type F = M::F;
    type Iter = std::vec::IntoIter<Transition<W>>;

    /// A plain construction disables the sigma label; use
    /// [`new_with_matcher`](SigmaMatcher::new_with_matcher) to pick one.
    fn new(fst: Arc<Self::F>, match_type: MatchType) -> Result<Self> {
        Ok(Self::new_with_matcher(
            M::new(fst, match_type)?,
            NO_LABEL,
            MatcherRewriteMode::Auto,
        ))
    }

    fn iter_match(&self, state: StateId, label: Label) -> Result<Self::Iter> {
        let mut matches: Vec<_> = self.matcher.iter_match(state, label)?.collect();
        if label != EPS_LABEL && label != self.sigma_label && self.sigma_label != NO_LABEL {
            for mut tr in self.matcher.iter_match(state, self.sigma_label)? {
                rewrite_tr(
                    &mut tr,
                    self.match_type(),
                    self.sigma_label,
                    label,
                    self.rewrite_mode,
                );
                matches.push(tr);
            }
        }
        Ok(matches.into_iter())
    }

    fn match_type(&self) -> MatchType {
        self.matcher.match_type()
    }

    fn flags(&self) -> MatcherFlags {
        self.matcher.flags() | MatcherFlags::SIGMA_MATCHER
    }

    fn fst(&self) -> &Arc<Self::F> {
        self.matcher.fst()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::compose::matchers::GenericMatcher;
    use crate::fst_impls::VectorFst;
    use crate::fst_traits::MutableFst;
    use crate::semirings::TropicalWeight;

    #[test]
    fn test_sigma_matches_any_label() -> Result<()> {
        let sigma = 99;
        let mut fst = VectorFst::<TropicalWeight>::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        fst.set_start(s0)?;
        fst.set_final(s1, TropicalWeight::one())?;
        fst.add_tr(s0, Transition::new(1, 1, TropicalWeight::one(), s1))?;
        fst.add_tr(s0, Transition::new(sigma, sigma, TropicalWeight::one(), s1))?;
        let inner = GenericMatcher::new(Arc::new(fst), MatchType::MatchInput)?;
        let matcher = SigmaMatcher::new_with_matcher(inner, sigma, MatcherRewriteMode::Auto);
        // Label 1 matches both the literal transition and the sigma one.
        let matches: Vec<_> = matcher.iter_match(s0, 1)?.collect();
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|tr| tr.ilabel == 1));
        // An unknown label matches through sigma only.
        let matches: Vec<_> = matcher.iter_match(s0, 42)?.collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].ilabel, 42);
        Ok(())
    }
}
