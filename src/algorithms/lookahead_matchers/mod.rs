//! Lookahead matching: matchers that additionally answer whether a
//! candidate transition has any viable future in the composed machine, so
//! composition can prune futile epsilon exploration.

pub use self::interval_set::IntervalSet;
pub use self::label_reachable::{LabelReachable, LabelReachableData};
pub use self::state_reachable::StateReachable;

mod interval_set;
mod label_reachable;
mod state_reachable;

use anyhow::Result;

use crate::algorithms::compose::matchers::{MatchType, Matcher, MatcherFlags};
use crate::algorithms::fst_convert::fst_convert_from_ref;
use crate::fst_impls::VectorFst;
use crate::fst_traits::ExpandedFst;
use crate::semirings::Semiring;
use crate::transition::Transition;
use crate::{Label, StateId};

/// A matcher that can additionally rule out labels with no future.
pub trait LookaheadMatcher<W: Semiring>: Matcher<W> {
    /// Can `label` still be consumed somewhere ahead of `state`?
    fn lookahead_label(&self, state: StateId, label: Label) -> Result<bool>;

    /// Can a final state be reached from `state` without consuming?
    fn lookahead_final(&self, state: StateId) -> Result<bool>;
}

/// Label-lookahead wrapper: delegates matching to the wrapped matcher and
/// answers future queries from a precomputed [`LabelReachable`] oracle
/// over the matcher's FST.
#[derive(Debug)]
pub struct LabelLookAheadMatcher<W: Semiring, M: Matcher<W>> {
    matcher: M,
    reachable: LabelReachable,
    w: std::marker::PhantomData<W>,
}

impl<W: Semiring, M: Matcher<W>> LabelLookAheadMatcher<W, M>
where
    M::F: ExpandedFst<W>,
{
    pub fn new_with_matcher(matcher: M) -> Result<Self> {
        let vfst: VectorFst<W> = fst_convert_from_ref(matcher.fst().as_ref());
        let reach_input = matcher.match_type() != MatchType::MatchOutput;
        let reachable = LabelReachable::new(&vfst, reach_input)?;
        Ok(Self {
            matcher,
            reachable,
            w: std::marker::PhantomData,
        })
    }
}

impl<W: Semiring, M: Matcher<W>> Matcher<W> for LabelLookAheadMatcher<W, M>
where
    M::F: ExpandedFst<W>,
{
    type F = M::F;
    type Iter = std::vec::IntoIter<Transition<W>>;

    fn new(fst: std::sync::Arc<Self::F>, match_type: MatchType) -> Result<Self> {
        Self::new_with_matcher(M::new(fst, match_type)?)
    }

    fn iter_match(&self, state: StateId, label: Label) -> Result<Self::Iter> {
        Ok(self
            .matcher
            .iter_match(state, label)?
            .collect::<Vec<_>>()
            .into_iter())
    }

    fn match_type(&self) -> MatchType {
        self.matcher.match_type()
    }

    fn flags(&self) -> MatcherFlags {
        self.matcher.flags() | MatcherFlags::LOOKAHEAD_MATCHER
    }

    fn fst(&self) -> &std::sync::Arc<Self::F> {
        self.matcher.fst()
    }
}

impl<W: Semiring, M: Matcher<W>> LookaheadMatcher<W> for LabelLookAheadMatcher<W, M>
where
    M::F: ExpandedFst<W>,
{
    fn lookahead_label(&self, state: StateId, label: Label) -> Result<bool> {
        self.reachable.reach_label(state, label)
    }

    fn lookahead_final(&self, state: StateId) -> Result<bool> {
        self.reachable.reach_final(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::compose::matchers::GenericMatcher;
    use crate::semirings::TropicalWeight;
    use crate::utils::acceptor;
    use std::sync::Arc;

    #[test]
    fn test_label_lookahead_matcher() -> Result<()> {
        let fst: VectorFst<TropicalWeight> = acceptor(&[1, 2, 3], TropicalWeight::one());
        let inner = GenericMatcher::new(Arc::new(fst), MatchType::MatchInput)?;
        let matcher = LabelLookAheadMatcher::new_with_matcher(inner)?;
        assert!(matcher.lookahead_label(0, 1)?);
        // Labels 2 and 3 cannot be the next symbol at the start state.
        assert!(!matcher.lookahead_label(0, 2)?);
        assert!(matcher.lookahead_label(1, 2)?);
        assert!(matcher.lookahead_final(3)?);
        assert!(!matcher.lookahead_final(0)?);
        assert!(matcher
            .flags()
            .contains(MatcherFlags::LOOKAHEAD_MATCHER));
        Ok(())
    }
}
