use std::sync::Arc;

use anyhow::Result;

use crate::algorithms::compose::compose_filters::ComposeFilter;
use crate::algorithms::compose::filter_states::{FilterState, IntegerFilterState};
use crate::algorithms::compose::matchers::{MatchType, Matcher};
use crate::fst_traits::CoreFst;
use crate::semirings::Semiring;
use crate::transition::Transition;
use crate::{StateId, EPS_LABEL, NO_LABEL};

/// The default epsilon filter: output epsilons of the first operand are
/// drained before input epsilons of the second are consumed, and
/// simultaneous epsilon pairing is rejected, so exactly one composed path
/// survives per path pair of the relation.
pub struct SequenceComposeFilter<W: Semiring, M1: Matcher<W>, M2: Matcher<W>> {
    fst1: Arc<M1::F>,
    matcher1: M1,
    matcher2: M2,
    /// Cached composition state.
    s1: Option<StateId>,
    s2: Option<StateId>,
    fs: IntegerFilterState,
    /// Only epsilons (and no final weight) leave `s1`.
    alleps1: bool,
    /// No epsilons leave `s1`.
    noeps1: bool,
}

impl<W: Semiring, M1: Matcher<W>, M2: Matcher<W>> std::fmt::Debug
    for SequenceComposeFilter<W, M1, M2>
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("SequenceComposeFilter")
            .field("s1", &self.s1)
            .field("s2", &self.s2)
            .field("fs", &self.fs)
            .finish()
    }
}

impl<W: Semiring, M1: Matcher<W>, M2: Matcher<W>> ComposeFilter<W>
    for SequenceComposeFilter<W, M1, M2>
{
    type M1 = M1;
    type M2 = M2;
    type FS = IntegerFilterState;

    fn new(
        fst1: Arc<M1::F>,
        fst2: Arc<M2::F>,
        matcher1: Option<M1>,
        matcher2: Option<M2>,
    ) -> Result<Self> {
        let matcher1 = match matcher1 {
            Some(m) => m,
            None => M1::new(Arc::clone(&fst1), MatchType::MatchOutput)?,
        };
        let matcher2 = match matcher2 {
            Some(m) => m,
            None => M2::new(Arc::clone(&fst2), MatchType::MatchInput)?,
        };
        Ok(Self {
            fst1,
            matcher1,
            matcher2,
            s1: None,
            s2: None,
            fs: IntegerFilterState::new_no_state(),
            alleps1: false,
            noeps1: false,
        })
    }

    fn start(&self) -> Self::FS {
        IntegerFilterState::new(0)
    }

    fn set_state(&mut self, s1: StateId, s2: StateId, filter_state: &Self::FS) -> Result<()> {
        if self.s1 == Some(s1) && self.s2 == Some(s2) && &self.fs == filter_state {
            return Ok(());
        }
        self.s1 = Some(s1);
        self.s2 = Some(s2);
        self.fs = filter_state.clone();
        let na1 = self.fst1.num_trs(s1)?;
        let ne1 = self.fst1.num_output_epsilons(s1)?;
        let fin1 = self.fst1.is_final(s1)?;
        self.alleps1 = na1 == ne1 && !fin1;
        self.noeps1 = ne1 == 0;
        Ok(())
    }

    fn filter_tr(&mut self, tr1: &mut Transition<W>, tr2: &mut Transition<W>)
        -> Result<Self::FS> {
        let fs = if tr1.olabel == NO_LABEL {
            // The second operand consumes its input epsilon alone.
            if self.alleps1 {
                IntegerFilterState::new_no_state()
            } else if self.noeps1 {
                IntegerFilterState::new(0)
            } else {
                IntegerFilterState::new(1)
            }
        } else if tr2.ilabel == NO_LABEL {
            // The first operand emits its output epsilon alone; only
            // before any second-side epsilon was consumed.
            if self.fs != IntegerFilterState::new(0) {
                IntegerFilterState::new_no_state()
            } else {
                IntegerFilterState::new(0)
            }
        } else if tr1.olabel == EPS_LABEL {
            // Simultaneous epsilon pairing is routed through the
            // unilateral moves instead.
            IntegerFilterState::new_no_state()
        } else {
            IntegerFilterState::new(0)
        };
        Ok(fs)
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
