use std::fmt::Debug;
use std::sync::{Arc, Mutex};

use anyhow::Result;

use crate::algorithms::compose::compose_filters::ComposeFilter;
use crate::algorithms::compose::filter_states::FilterState;
use crate::algorithms::compose::matchers::Matcher;
use crate::fst_properties::op_properties::compose_properties;
use crate::fst_properties::FstProperties;
use crate::fst_traits::{CoreFst, Fst};
use crate::lazy::{FstOp, StateTable};
use crate::semirings::Semiring;
use crate::transition::Transition;
use crate::trs::{Transitions, TrsVec};
use crate::{StateId, EPS_LABEL, NO_LABEL};

/// Tuple behind a composition state: one state per operand plus the
/// epsilon filter's state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComposeStateTuple<FS: FilterState> {
    pub s1: StateId,
    pub s2: StateId,
    pub fs: FS,
}

/// Construction knobs of a [`ComposeFstOp`]: pre-built matchers, filter
/// and state table; anything left `None` is built with defaults.
pub struct ComposeFstOpOptions<M1, M2, CF, ST> {
    pub matcher1: Option<M1>,
    pub matcher2: Option<M2>,
    pub filter: Option<CF>,
    pub state_table: Option<ST>,
}

impl<M1, M2, CF, ST> Default for ComposeFstOpOptions<M1, M2, CF, ST> {
    fn default() -> Self {
        Self {
            matcher1: None,
            matcher2: None,
            filter: None,
            state_table: None,
        }
    }
}

/// Expansion operator of the three-way state product `(s1, s2, f)`.
///
/// At each composed state the transitions of `s1` drive the iteration;
/// non-epsilon output labels query the second operand's matcher, epsilon
/// moves pair with the implicit self-loops under filter control.
pub struct ComposeFstOp<W: Semiring, CF: ComposeFilter<W>> {
    fst1: Arc<<CF::M1 as Matcher<W>>::F>,
    fst2: Arc<<CF::M2 as Matcher<W>>::F>,
    filter: Mutex<CF>,
    state_table: StateTable<ComposeStateTuple<CF::FS>>,
    properties: FstProperties,
}

impl<W: Semiring, CF: ComposeFilter<W>> Debug for ComposeFstOp<W, CF> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ComposeFstOp")
            .field("fst1", &self.fst1)
            .field("fst2", &self.fst2)
            .field("state_table", &self.state_table)
            .finish()
    }
}

impl<W: Semiring, CF: ComposeFilter<W>> ComposeFstOp<W, CF> {
    pub fn new(
        fst1: Arc<<CF::M1 as Matcher<W>>::F>,
        fst2: Arc<<CF::M2 as Matcher<W>>::F>,
        opts: ComposeFstOpOptions<CF::M1, CF::M2, CF, StateTable<ComposeStateTuple<CF::FS>>>,
    ) -> Result<Self> {
        let filter = match opts.filter {
            Some(filter) => filter,
            None => CF::new(
                Arc::clone(&fst1),
                Arc::clone(&fst2),
                opts.matcher1,
                opts.matcher2,
            )?,
        };
        let properties = compose_properties(fst1.properties(), fst2.properties());
        Ok(Self {
            fst1,
            fst2,
            filter: Mutex::new(filter),
            state_table: opts.state_table.unwrap_or_default(),
            properties,
        })
    }

    fn emit(
        &self,
        trs: &mut Vec<Transition<W>>,
        tr1: &Transition<W>,
        tr2: &Transition<W>,
        fs: CF::FS,
    ) {
        if fs.is_no_state() {
            return;
        }
        let tuple = ComposeStateTuple {
            s1: tr1.nextstate,
            s2: tr2.nextstate,
            fs,
        };
        let nextstate = self.state_table.find_id(tuple);
        let ilabel = if tr1.ilabel == NO_LABEL {
            EPS_LABEL
        } else {
            tr1.ilabel
        };
        let olabel = if tr2.olabel == NO_LABEL {
            EPS_LABEL
        } else {
            tr2.olabel
        };
        trs.push(Transition::new(
            ilabel,
            olabel,
            tr1.weight.times(&tr2.weight),
            nextstate,
        ));
    }
}

impl<W: Semiring, CF: ComposeFilter<W>> FstOp<W> for ComposeFstOp<W, CF> {
    fn compute_start(&self) -> Result<Option<StateId>> {
        let (s1, s2) = match (self.fst1.start(), self.fst2.start()) {
            (Some(s1), Some(s2)) => (s1, s2),
            _ => return Ok(None),
        };
        let fs = self.filter.lock().unwrap().start();
        Ok(Some(self.state_table.find_id(ComposeStateTuple {
            s1,
            s2,
            fs,
        })))
    }

    fn compute_trs(&self, id: StateId) -> Result<TrsVec<W>> {
        let tuple = self.state_table.find_tuple(id);
        let (s1, s2) = (tuple.s1, tuple.s2);
        let mut filter = self.filter.lock().unwrap();
        filter.set_state(s1, s2, &tuple.fs)?;
        let mut trs = vec![];
        let trs1 = self.fst1.get_trs(s1)?;
        for tr1 in trs1.trs() {
            if tr1.olabel == EPS_LABEL {
                // Pair the output epsilon with the implicit self-loop of
                // the second operand.
                let mut tr1_mut = tr1.clone();
                let mut loop2 = Transition::new(NO_LABEL, EPS_LABEL, W::one(), s2);
                let fs = filter.filter_tr(&mut tr1_mut, &mut loop2)?;
                self.emit(&mut trs, &tr1_mut, &loop2, fs);
                // And with the literal epsilon transitions of `s2`.
                let eps_matches: Vec<_> =
                    filter.matcher2().iter_match(s2, EPS_LABEL)?.collect();
                for tr2 in eps_matches {
                    let mut tr1_mut = tr1.clone();
                    let mut tr2_mut = tr2;
                    let fs = filter.filter_tr(&mut tr1_mut, &mut tr2_mut)?;
                    self.emit(&mut trs, &tr1_mut, &tr2_mut, fs);
                }
            } else {
                let matches: Vec<_> =
                    filter.matcher2().iter_match(s2, tr1.olabel)?.collect();
                for tr2 in matches {
                    let mut tr1_mut = tr1.clone();
                    let mut tr2_mut = tr2;
                    let fs = filter.filter_tr(&mut tr1_mut, &mut tr2_mut)?;
                    self.emit(&mut trs, &tr1_mut, &tr2_mut, fs);
                }
            }
        }
        // Input epsilons of the second operand consumed alone, paired with
        // the implicit self-loop of the first.
        let eps_matches: Vec<_> = filter.matcher2().iter_match(s2, EPS_LABEL)?.collect();
        for tr2 in eps_matches {
            let mut loop1 = Transition::new(EPS_LABEL, NO_LABEL, W::one(), s1);
            let mut tr2_mut = tr2;
            let fs = filter.filter_tr(&mut loop1, &mut tr2_mut)?;
            self.emit(&mut trs, &loop1, &tr2_mut, fs);
        }
        Ok(TrsVec::from(trs))
    }

    fn compute_final_weight(&self, id: StateId) -> Result<Option<W>> {
        let tuple = self.state_table.find_tuple(id);
        let w1 = self.fst1.final_weight(tuple.s1)?;
        let w2 = self.fst2.final_weight(tuple.s2)?;
        match (w1, w2) {
            (Some(mut w1), Some(mut w2)) => {
                let mut filter = self.filter.lock().unwrap();
                filter.set_state(tuple.s1, tuple.s2, &tuple.fs)?;
                filter.filter_final(&mut w1, &mut w2)?;
                let weight = w1.times(&w2);
                Ok(if weight.is_zero() { None } else { Some(weight) })
            }
            _ => Ok(None),
        }
    }

    fn properties(&self) -> FstProperties {
        self.properties
    }
}
