use std::sync::Arc;

use anyhow::Result;

use crate::algorithms::compose::compose_filters::ComposeFilter;
use crate::algorithms::compose::filter_states::{FilterState, TrivialFilterState};
use crate::algorithms::compose::matchers::{MatchType, Matcher};
use crate::semirings::Semiring;
use crate::transition::Transition;
use crate::{StateId, NO_LABEL};

/// Filter blocking every unilateral epsilon move; exact composition of
/// epsilon-free operands with no filter bookkeeping at all.
pub struct NullComposeFilter<W: Semiring, M1: Matcher<W>, M2: Matcher<W>> {
    matcher1: M1,
    matcher2: M2,
    w: std::marker::PhantomData<W>,
}

impl<W: Semiring, M1: Matcher<W>, M2: Matcher<W>> std::fmt::Debug
    for NullComposeFilter<W, M1, M2>
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("NullComposeFilter").finish()
    }
}

impl<W: Semiring, M1: Matcher<W>, M2: Matcher<W>> ComposeFilter<W>
    for NullComposeFilter<W, M1, M2>
{
    type M1 = M1;
    type M2 = M2;
    type FS = TrivialFilterState;

    fn new(
        fst1: Arc<M1::F>,
        fst2: Arc<M2::F>,
        matcher1: Option<M1>,
        matcher2: Option<M2>,
    ) -> Result<Self> {
        let matcher1 = match matcher1 {
            Some(m) => m,
            None => M1::new(fst1, MatchType::MatchOutput)?,
        };
        let matcher2 = match matcher2 {
            Some(m) => m,
            None => M2::new(fst2, MatchType::MatchInput)?,
        };
        Ok(Self {
            matcher1,
            matcher2,
            w: std::marker::PhantomData,
        })
    }

    fn start(&self) -> Self::FS {
        TrivialFilterState::new(true)
    }

    fn set_state(&mut self, _s1: StateId, _s2: StateId, _fs: &Self::FS) -> Result<()> {
        Ok(())
    }

    fn filter_tr(&mut self, tr1: &mut Transition<W>, tr2: &mut Transition<W>)
        -> Result<Self::FS> {
        Ok(TrivialFilterState::new(
            tr1.olabel != NO_LABEL && tr2.ilabel != NO_LABEL,
        ))
    }

    fn filter_final(&self, _w1: &mut W, _w2: &mut W) -> Result<()> {
        Ok(())
    }

    fn matcher1(&self) -> &M1 {
        &self.matcher1
    }

    fn matcher2(&self) -> &M2 {
        &self.matcher2
    }
}
