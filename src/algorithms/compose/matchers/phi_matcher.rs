use std::sync::Arc;

use anyhow::Result;

use crate::algorithms::compose::matchers::{
    rewrite_tr, MatchType, Matcher, MatcherFlags, MatcherRewriteMode,
};
use crate::semirings::Semiring;
use crate::transition::Transition;
use crate::{Label, StateId, EPS_LABEL, NO_LABEL};

/// Wrapping matcher realising failure-transition semantics: when a literal
/// match fails, phi-labeled transitions are followed (without consuming
/// the symbol, accumulating their weights) until a state with a literal
/// match is reached. The returned transitions carry the phi-path weight.
#[derive(Debug)]
pub struct PhiMatcher<W: Semiring, M: Matcher<W>> {
    matcher: M,
    phi_label: Label,
    rewrite_mode: MatcherRewriteMode,
    w: std::marker::PhantomData<W>,
}

impl<W: Semiring, M: Matcher<W>> PhiMatcher<W, M> {
    pub fn new_with_matcher(matcher: M, phi_label: Label, rewrite_mode: MatcherRewriteMode) -> Self {
        Self {
            matcher,
            phi_label,
            rewrite_mode,
            w: std::marker::PhantomData,
        }
    }

    pub fn phi_label(&self) -> Label {
        self.phi_label
    }
}

impl<W: Semiring, M: Matcher<W>> Matcher<W> for PhiMatcher<W, M> {
    type F = M::F;
    type Iter = std::vec::IntoIter<Transition<W>>;

    /// A plain construction disables the phi label; use
    /// [`new_with_matcher`](PhiMatcher::new_with_matcher) to pick one.
    fn new(fst: Arc<Self::F>, match_type: MatchType) -> Result<Self> {
        Ok(Self::new_with_matcher(
            M::new(fst, match_type)?,
            NO_LABEL,
            MatcherRewriteMode::Auto,
        ))
    }

    fn iter_match(&self, state: StateId, label: Label) -> Result<Self::Iter> {
        if label == EPS_LABEL || label == self.phi_label || self.phi_label == NO_LABEL {
            return Ok(self
                .matcher
                .iter_match(state, label)?
                .collect::<Vec<_>>()
                .into_iter());
        }
        // Follow failure transitions until the label matches; the visited
        // set guards against phi cycles.
        let mut current = state;
        let mut phi_weight = W::one();
        let mut visited = vec![state];
        loop {
            let matches: Vec<_> = self.matcher.iter_match(current, label)?.collect();
            if !matches.is_empty() {
                let out: Vec<_> = matches
                    .into_iter()
                    .map(|mut tr| {
                        tr.weight = phi_weight.times(&tr.weight);
                        rewrite_tr(
                            &mut tr,
                            self.match_type(),
                            self.phi_label,
                            label,
                            self.rewrite_mode,
                        );
                        tr
                    })
                    .collect();
                return Ok(out.into_iter());
            }
            let mut phi_trs = self.matcher.iter_match(current, self.phi_label)?;
            match phi_trs.next() {
                Some(phi_tr) => {
                    if visited.contains(&phi_tr.nextstate) {
                        return Ok(vec![].into_iter());
                    }
                    phi_weight.times_assign(&phi_tr.weight);
                    current = phi_tr.nextstate;
                    visited.push(current);
                }
                None => return Ok(vec![].into_iter()),
            }
        }
    }

    fn match_type(&self) -> MatchType {
        self.matcher.match_type()
    }

    fn flags(&self) -> MatcherFlags {
        self.matcher.flags() | MatcherFlags::PHI_MATCHER
    }

    fn fst(&self) -> &Arc<Self::F> {
        self.matcher.fst()
    }
}
