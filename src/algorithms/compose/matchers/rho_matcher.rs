use std::sync::Arc;

use anyhow::Result;

use crate::algorithms::compose::matchers::{
    rewrite_tr, MatchType, Matcher, MatcherFlags, MatcherRewriteMode,
};
use crate::semirings::Semiring;
use crate::transition::Transition;
use crate::{Label, StateId, EPS_LABEL, NO_LABEL};

/// Wrapping matcher realising "rest of the alphabet" semantics:
/// transitions carrying the rho label match, relabeled, exactly those
/// non-epsilon queries for which no literal match exists. Rho consumes the
/// queried symbol.
#[derive(Debug)]
pub struct RhoMatcher<W: Semiring, M: Matcher<W>> {
    matcher: M,
    rho_label: Label,
    rewrite_mode: MatcherRewriteMode,
    w: std::marker::PhantomData<W>,
}

impl<W: Semiring, M: Matcher<W>> RhoMatcher<W, M> {
    pub fn new_with_matcher(matcher: M, rho_label: Label, rewrite_mode: MatcherRewriteMode) -> Self {
        Self {
            matcher,
            rho_label,
            rewrite_mode,
            w: std::marker::PhantomData,
        }
    }

    pub fn rho_label(&self) -> Label {
        self.rho_label
    }
}

impl<W: Semiring, M: Matcher<W>> Matcher<W> for RhoMatcher<W, M> {
    type F = M::F;
    type Iter = std::vec::IntoIter<Transition<W>>;

    /// A plain construction disables the rho label; use
    /// [`new_with_matcher`](RhoMatcher::new_with_matcher) to pick one.
    fn new(fst: Arc<Self::F>, match_type: MatchType) -> Result<Self> {
        Ok(Self::new_with_matcher(
            M::new(fst, match_type)?,
            NO_LABEL,
            MatcherRewriteMode::Auto,
        ))
    }

    fn iter_match(&self, state: StateId, label: Label) -> Result<Self::Iter> {
        let matches: Vec<_> = self.matcher.iter_match(state, label)?.collect();
        if !matches.is_empty()
            || label == EPS_LABEL
            || label == self.rho_label
            || self.rho_label == NO_LABEL
        {
            return Ok(matches.into_iter());
        }
        let mut rho_matches = vec![];
        for mut tr in self.matcher.iter_match(state, self.rho_label)? {
            rewrite_tr(
                &mut tr,
                self.match_type(),
                self.rho_label,
                label,
                self.rewrite_mode,
            );
            rho_matches.push(tr);
        }
        Ok(rho_matches.into_iter())
    }

    fn match_type(&self) -> MatchType {
        self.matcher.match_type()
    }

    fn flags(&self) -> MatcherFlags {
        self.matcher.flags() | MatcherFlags::RHO_MATCHER
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
    fn test_rho_matches_rest_only() -> Result<()> {
        let rho = 99;
        let mut fst = VectorFst::<TropicalWeight>::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        fst.set_start(s0)?;
        fst.set_final(s1, TropicalWeight::one())?;
        fst.add_tr(s0, Transition::new(1, 1, TropicalWeight::one(), s1))?;
        fst.add_tr(s0, Transition::new(rho, rho, TropicalWeight::one(), s1))?;
        let inner = GenericMatcher::new(Arc::new(fst), MatchType::MatchInput)?;
        let matcher = RhoMatcher::new_with_matcher(inner, rho, MatcherRewriteMode::Auto);
        // A literal match suppresses rho.
        let matches: Vec<_> = matcher.iter_match(s0, 1)?.collect();
        assert_eq!(matches.len(), 1);
        // An unknown label falls through to rho, relabeled.
        let matches: Vec<_> = matcher.iter_match(s0, 42)?.collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].ilabel, 42);
        Ok(())
    }
}
