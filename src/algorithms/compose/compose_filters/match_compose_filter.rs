use std::sync::Arc;

use anyhow::Result;

use crate::algorithms::compose::compose_filters::ComposeFilter;
use crate::algorithms::compose::filter_states::{FilterState, IntegerFilterState};
use crate::algorithms::compose::matchers::{MatchType, Matcher};
use crate::fst_traits::CoreFst;
use crate::semirings::Semiring;
use crate::transition::Transition;
use crate::{StateId, EPS_LABEL, NO_LABEL};

/// Epsilon filter preferring simultaneous epsilon matching over the
/// unilateral moves; needed when either side has local epsilon
/// parallelism. Filter states: 0 undecided, 1 committed to second-side
/// epsilons, 2 committed to first-side epsilons.
pub struct MatchComposeFilter<W: Semiring, M1: Matcher<W>, M2: Matcher<W>> {
    fst1: Arc<M1::F>,
    fst2: Arc<M2::F>,
    matcher1: M1,
    matcher2: M2,
    s1: Option<StateId>,
    s2: Option<StateId>,
    fs: IntegerFilterState,
    /// Only epsilons (and no final weight) leave `s1` / `s2`.
    alleps1: bool,
    alleps2: bool,
    /// No epsilons leave `s1` / `s2`.
    noeps1: bool,
    noeps2: bool,
}

impl<W: Semiring, M1: Matcher<W>, M2: Matcher<W>> std::fmt::Debug
    for MatchComposeFilter<W, M1, M2>
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("MatchComposeFilter")
            .field("s1", &self.s1)
            .field("s2", &self.s2)
            .field("fs", &self.fs)
            .finish()
    }
}

impl<W: Semiring, M1: Matcher<W>, M2: Matcher<W>> ComposeFilter<W>
    for MatchComposeFilter<W, M1, M2>
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
            fst2,
            matcher1,
            matcher2,
            s1: None,
            s2: None,
            fs: IntegerFilterState::new_no_state(),
            alleps1: false,
            alleps2: false,
            noeps1: false,
            noeps2: false,
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
        let f1 = self.fst1.is_final(s1)?;
        self.alleps1 = na1 == ne1 && !f1;
        self.noeps1 = ne1 == 0;
        let na2 = self.fst2.num_trs(s2)?;
        let ne2 = self.fst2.num_input_epsilons(s2)?;
        let f2 = self.fst2.is_final(s2)?;
        self.alleps2 = na2 == ne2 && !f2;
        self.noeps2 = ne2 == 0;
        Ok(())
    }

    fn filter_tr(&mut self, tr1: &mut Transition<W>, tr2: &mut Transition<W>)
        -> Result<Self::FS> {
        let zero = IntegerFilterState::new(0);
        let one = IntegerFilterState::new(1);
        let two = IntegerFilterState::new(2);
        let fs = if tr2.ilabel == NO_LABEL {
            // Epsilon of the first operand taken alone.
            if self.fs == zero {
                if self.noeps2 {
                    zero
                } else if self.alleps2 {
                    IntegerFilterState::new_no_state()
                } else {
                    one
                }
            } else if self.fs == one {
                one
            } else {
                IntegerFilterState::new_no_state()
            }
        } else if tr1.olabel == NO_LABEL {
            // Epsilon of the second operand taken alone.
            if self.fs == zero {
                if self.noeps1 {
                    zero
                } else if self.alleps1 {
                    IntegerFilterState::new_no_state()
                } else {
                    two
                }
            } else if self.fs == two {
                two
            } else {
                IntegerFilterState::new_no_state()
            }
        } else if tr1.olabel == EPS_LABEL {
            // Simultaneous epsilon match, preferred in the undecided state.
            if self.fs == zero {
                zero
            } else {
                IntegerFilterState::new_no_state()
            }
        } else {
            zero
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
