use std::sync::Arc;

use anyhow::{bail, Result};

use crate::fst_properties::op_properties::complement_properties;
use crate::fst_properties::FstProperties;
use crate::fst_traits::{
    CoreFst, ExpandedFst, Fst, FstIterData, FstIterator, StateIterator,
};
use crate::semirings::Semiring;
use crate::symbol_table::SymbolTable;
use crate::transition::Transition;
use crate::trs::TrsVec;
use crate::{Label, StateId};

/// Delayed complement of a deterministic, epsilon-free, unweighted
/// acceptor.
///
/// The construction completes the machine and flips final states: output
/// state `0` is a fresh sink receiving a rho-labeled transition from every
/// state (matching "the rest of the alphabet" under a rho matcher) and a
/// rho self-loop; input state `s` maps to output state `s + 1` with its
/// final status inverted. No cycles of ownership arise: the view holds a
/// shared read-only reference to its source.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplementFst<W: Semiring, F: ExpandedFst<W>> {
    fst: Arc<F>,
    rho_label: Label,
    isymt: Option<Arc<SymbolTable>>,
    osymt: Option<Arc<SymbolTable>>,
    properties: FstProperties,
    w: std::marker::PhantomData<W>,
}

impl<W: Semiring, F: ExpandedFst<W>> ComplementFst<W, F> {
    pub fn new(fst: Arc<F>, rho_label: Label) -> Result<Self> {
        let required = FstProperties::ACCEPTOR
            | FstProperties::UNWEIGHTED
            | FstProperties::NO_EPSILONS
            | FstProperties::I_DETERMINISTIC;
        let props = fst.properties_check(required)?;
        if !props.contains(required) {
            bail!(
                "ComplementFst: argument is not an unweighted epsilon-free \
                 deterministic acceptor"
            );
        }
        let isymt = fst.input_symbols().cloned();
        let osymt = fst.output_symbols().cloned();
        let properties = complement_properties(fst.properties());
        Ok(Self {
            fst,
            rho_label,
            isymt,
            osymt,
            properties,
            w: std::marker::PhantomData,
        })
    }

    pub fn rho_label(&self) -> Label {
        self.rho_label
    }

    fn rho_tr(&self) -> Transition<W> {
        Transition::new(self.rho_label, self.rho_label, W::one(), 0)
    }
}

impl<W: Semiring, F: ExpandedFst<W>> CoreFst<W> for ComplementFst<W, F> {
    type TRS = TrsVec<W>;

    fn start(&self) -> Option<StateId> {
        match self.fst.start() {
            Some(start) => Some(start + 1),
            None => Some(0),
        }
    }

    fn final_weight(&self, state_id: StateId) -> Result<Option<W>> {
        if state_id == 0 {
            return Ok(Some(W::one()));
        }
        match self.fst.final_weight(state_id - 1)? {
            Some(_) => Ok(None),
            None => Ok(Some(W::one())),
        }
    }

    unsafe fn final_weight_unchecked(&self, state_id: StateId) -> Option<W> {
        if state_id == 0 {
            return Some(W::one());
        }
        match self.fst.final_weight_unchecked(state_id - 1) {
            Some(_) => None,
            None => Some(W::one()),
        }
    }

    fn num_trs(&self, state_id: StateId) -> Result<usize> {
        if state_id == 0 {
            Ok(1)
        } else {
            Ok(self.fst.num_trs(state_id - 1)? + 1)
        }
    }

    unsafe fn num_trs_unchecked(&self, state_id: StateId) -> usize {
        if state_id == 0 {
            1
        } else {
            self.fst.num_trs_unchecked(state_id - 1) + 1
        }
    }

    fn get_trs(&self, state_id: StateId) -> Result<Self::TRS> {
        let mut trs = vec![self.rho_tr()];
        if state_id > 0 {
            for tr in crate::trs::Transitions::trs(&self.fst.get_trs(state_id - 1)?) {
                trs.push(Transition::new(
                    tr.ilabel,
                    tr.olabel,
                    tr.weight.clone(),
                    tr.nextstate + 1,
                ));
            }
        }
        Ok(TrsVec::from(trs))
    }

    unsafe fn get_trs_unchecked(&self, state_id: StateId) -> Self::TRS {
        self.get_trs(state_id)
            .expect("complement fst: state out of range")
    }

    fn properties(&self) -> FstProperties {
        self.properties
    }
}

impl<'a, W: Semiring, F: ExpandedFst<W> + 'static> StateIterator<'a> for ComplementFst<W, F> {
    type Iter = std::ops::Range<StateId>;

    fn states_iter(&'a self) -> Self::Iter {
        0..self.num_states()
    }
}

/// Iterator behind [`FstIterator`] for [`ComplementFst`].
pub struct ComplementFstIterator<'a, W: Semiring, F: ExpandedFst<W>> {
    fst: &'a ComplementFst<W, F>,
    state: StateId,
}

impl<'a, W: Semiring, F: ExpandedFst<W> + 'static> Iterator for ComplementFstIterator<'a, W, F> {
    type Item = FstIterData<W, TrsVec<W>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state >= self.fst.num_states() {
            return None;
        }
        let state_id = self.state;
        self.state += 1;
        let trs = self.fst.get_trs(state_id).ok()?;
        Some(FstIterData {
            state_id,
            num_trs: crate::trs::Transitions::len(&trs),
            final_weight: self.fst.final_weight(state_id).ok()?,
            trs,
        })
    }
}

impl<'a, W: Semiring, F: ExpandedFst<W> + 'a + 'static> FstIterator<'a, W> for ComplementFst<W, F> {
    type FstIter = ComplementFstIterator<'a, W, F>;

    fn fst_iter(&'a self) -> Self::FstIter {
        ComplementFstIterator {
            fst: self,
            state: 0,
        }
    }
}

impl<W: Semiring, F: ExpandedFst<W> + 'static> Fst<W> for ComplementFst<W, F> {
    fn input_symbols(&self) -> Option<&Arc<SymbolTable>> {
        self.isymt.as_ref()
    }

    fn output_symbols(&self) -> Option<&Arc<SymbolTable>> {
        self.osymt.as_ref()
    }

    fn set_input_symbols(&mut self, symt: Arc<SymbolTable>) {
        self.isymt = Some(symt);
    }

    fn set_output_symbols(&mut self, symt: Arc<SymbolTable>) {
        self.osymt = Some(symt);
    }

    fn take_input_symbols(&mut self) -> Option<Arc<SymbolTable>> {
        self.isymt.take()
    }

    fn take_output_symbols(&mut self) -> Option<Arc<SymbolTable>> {
        self.osymt.take()
    }
}

impl<W: Semiring, F: ExpandedFst<W> + 'static> ExpandedFst<W> for ComplementFst<W, F> {
    fn num_states(&self) -> usize {
        self.fst.num_states() + 1
    }
}
