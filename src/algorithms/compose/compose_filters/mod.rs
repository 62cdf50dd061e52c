pub use self::alt_sequence_compose_filter::AltSequenceComposeFilter;
pub use self::match_compose_filter::MatchComposeFilter;
pub use self::no_match_compose_filter::NoMatchComposeFilter;
pub use self::null_compose_filter::NullComposeFilter;
pub use self::sequence_compose_filter::SequenceComposeFilter;

mod alt_sequence_compose_filter;
mod match_compose_filter;
mod no_match_compose_filter;
mod null_compose_filter;
mod sequence_compose_filter;

use std::fmt::Debug;
use std::sync::Arc;

use anyhow::Result;

use crate::algorithms::compose::filter_states::FilterState;
use crate::algorithms::compose::matchers::Matcher;
use crate::semirings::Semiring;
use crate::transition::Transition;
use crate::StateId;

/// Finite-state machine coordinating epsilon choices during composition.
///
/// Its state, together with a pair of operand states, parameterises a
/// composition state. For each candidate transition pair the filter
/// returns the successor filter state or the rejecting state; a side whose
/// transition label is `NO_LABEL` consumes nothing there (the implicit
/// epsilon self-loop). The filter may rewrite the transitions it is shown.
pub trait ComposeFilter<W: Semiring>: Debug {
    type M1: Matcher<W>;
    type M2: Matcher<W>;
    type FS: FilterState;

    /// Builds the filter over the two operands; matchers default to
    /// `M::new` on the corresponding side when not supplied.
    fn new(
        fst1: Arc<<Self::M1 as Matcher<W>>::F>,
        fst2: Arc<<Self::M2 as Matcher<W>>::F>,
        matcher1: Option<Self::M1>,
        matcher2: Option<Self::M2>,
    ) -> Result<Self>
    where
        Self: Sized;

    /// Filter state at the composed start state.
    fn start(&self) -> Self::FS;

    /// Positions the filter on a composition state; called once per state
    /// expansion before any `filter_tr` for that state.
    fn set_state(&mut self, s1: StateId, s2: StateId, filter_state: &Self::FS) -> Result<()>;

    /// Decides one candidate transition pair.
    fn filter_tr(&mut self, tr1: &mut Transition<W>, tr2: &mut Transition<W>)
        -> Result<Self::FS>;

    /// Adjusts the final weights of a jointly final composition state.
    fn filter_final(&self, w1: &mut W, w2: &mut W) -> Result<()>;

    fn matcher1(&self) -> &Self::M1;

    fn matcher2(&self) -> &Self::M2;
}
