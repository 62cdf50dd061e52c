use std::sync::Arc;

use anyhow::Result;

use crate::algorithms::compose::compose_filters::ComposeFilter;
use crate::algorithms::compose::filter_states::{FilterState, IntegerFilterState};
use crate::algorithms::compose::matchers::{MatchType, Matcher};
use crate::fst_traits::CoreFst;
use crate::semirings::Semiring;
use crate::transition::Transition;
use crate::{StateId, EPS_LABEL, NO_LABEL};

/// The mirror of the sequence filter: input epsilons of the second operand
/// are consumed before output epsilons of the first are drained.
pub struct AltSequenceComposeFilter<W: Semiring, M1: Matcher<W>, M2: Matcher<W>> {
    fst2: Arc<M2::F>,
    matcher1: M1,
    matcher2: M2,
    s1: Option<StateId>,
    s2: Option<StateId>,
    fs: IntegerFilterState,
    /// Only epsilons (and no final weight) leave `s2`.
    alleps2: bool,
    /// No epsilons leave `s2`.
    noeps2: bool,
    w: std::marker::PhantomData<W>,
}

impl<W: Semiring, M1: Matcher<W>, M2: Matcher<W>> std::fmt::Debug
    for AltSequenceComposeFilter<W, M1, M2>
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("AltSequenceComposeFilter")
            .field("s1", &self.s1)
            .field("s2", &self.s2)
            .field("fs", &self.fs)
            .finish()
    }
}

impl<W: Semiring, M1: Matcher<W>, M2: Matcher<W>> ComposeFilter<W>
    for AltSequenceComposeFilter<W, M1, M2>
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
            fst2,
            matcher1,
            matcher2,
            s1: None,
            s2: None,
            fs: IntegerFilterState::new_no_state(),
            alleps2: false,
            noeps2: false,
            w: std::marker::PhantomData,
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
        let na2 = self.fst2.num_trs(s2)?;
        let ne2 = self.fst2.num_input_epsilons(s2)?;
        let fin2 = self.fst2.is_final(s2)?;
        self.alleps2 = na2 == ne2 && !fin2;
        self.noeps2 = ne2 == 0;
        Ok(())
    }

    fn filter_tr(&mut self, tr1: &mut Transition<W>, tr2: &mut Transition<W>)
        -> Result<Self::FS> {
        let fs = if tr2.ilabel == NO_LABEL {
            // The first operand emits its output epsilon alone.
            if self.alleps2 {
                IntegerFilterState::new_no_state()
            } else if self.noeps2 {
                IntegerFilterState::new(0)
            } else {
                IntegerFilterState::new(1)
            }
        } else if tr1.olabel == NO_LABEL {
            // The second operand consumes its input epsilon alone; blocked
            // once a first-side epsilon was postponed.
            if self.fs == IntegerFilterState::new(1) {
                IntegerFilterState::new_no_state()
            } else {
                IntegerFilterState::new(0)
            }
        } else if tr1.olabel == EPS_LABEL {
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
