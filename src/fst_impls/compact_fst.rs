use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;

use anyhow::{bail, format_err, Result};

use crate::fst_properties::FstProperties;
use crate::fst_traits::{
    CoreFst, ExpandedFst, Fst, FstIterData, FstIterator, StateIterator,
};
use crate::semirings::Semiring;
use crate::symbol_table::SymbolTable;
use crate::transition::Transition;
use crate::trs::TrsVec;
use crate::{Label, StateId};

/// Plug-in encoding of transitions into fixed-size elements.
///
/// A compactor must round-trip: `expand(state, compact(state, tr)) == tr`
/// for every transition of a compatible FST.
pub trait Compactor<W: Semiring>: Clone + Debug + PartialEq + Default + 'static {
    type Element: Clone + Debug + PartialEq + 'static;

    /// Encodes a transition, failing on transitions the element type
    /// cannot represent.
    fn compact(&self, state: StateId, tr: &Transition<W>) -> Result<Self::Element>;

    /// Decodes an element back into a transition.
    fn expand(&self, state: StateId, element: &Self::Element) -> Transition<W>;

    /// Stable identifier of the compaction scheme.
    fn compactor_type() -> String;
}

/// Compactor for acceptors: stores `(label, weight, nextstate)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AcceptorCompactor<W> {
    w: PhantomData<W>,
}

impl<W: Semiring> Compactor<W> for AcceptorCompactor<W> {
    type Element = (Label, W, StateId);

    fn compact(&self, _state: StateId, tr: &Transition<W>) -> Result<Self::Element> {
        if tr.ilabel != tr.olabel {
            bail!(
                "AcceptorCompactor: transition {}:{} is not an acceptor transition",
                tr.ilabel,
                tr.olabel
            );
        }
        Ok((tr.ilabel, tr.weight.clone(), tr.nextstate))
    }

    fn expand(&self, _state: StateId, element: &Self::Element) -> Transition<W> {
        Transition::new(element.0, element.0, element.1.clone(), element.2)
    }

    fn compactor_type() -> String {
        "acceptor".to_string()
    }
}

/// Compactor for unweighted transducers: stores `(ilabel, olabel,
/// nextstate)` and rebuilds the weight as `One`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnweightedCompactor<W> {
    w: PhantomData<W>,
}

impl<W: Semiring> Compactor<W> for UnweightedCompactor<W> {
    type Element = (Label, Label, StateId);

    fn compact(&self, _state: StateId, tr: &Transition<W>) -> Result<Self::Element> {
        if !tr.weight.is_one() {
            bail!("UnweightedCompactor: non-trivial weight {:?}", tr.weight);
        }
        Ok((tr.ilabel, tr.olabel, tr.nextstate))
    }

    fn expand(&self, _state: StateId, element: &Self::Element) -> Transition<W> {
        Transition::new(element.0, element.1, W::one(), element.2)
    }

    fn compactor_type() -> String {
        "unweighted".to_string()
    }
}

/// Read-only FST storing compacted transition elements; transitions are
/// decoded on access.
#[derive(Debug, Clone, PartialEq)]
pub struct CompactFst<W: Semiring, C: Compactor<W>> {
    compactor: C,
    states: Vec<CompactState<W>>,
    elements: Vec<C::Element>,
    start: Option<StateId>,
    isymt: Option<Arc<SymbolTable>>,
    osymt: Option<Arc<SymbolTable>>,
    properties: FstProperties,
}

#[derive(Debug, Clone, PartialEq)]
struct CompactState<W> {
    final_weight: Option<W>,
    pos: usize,
    ntrs: usize,
}

impl<W: Semiring, C: Compactor<W>> CompactFst<W, C> {
    /// Compacts an expanded FST; fails on any transition the compactor
    /// cannot represent (the compatibility predicate).
    pub fn from_fst<F: ExpandedFst<W>>(fst: &F, compactor: C) -> Result<Self> {
        let mut states = Vec::with_capacity(fst.num_states());
        let mut elements = vec![];
        for state_id in fst.states_range() {
            let trs = fst.get_trs(state_id)?;
            let pos = elements.len();
            for tr in crate::trs::Transitions::trs(&trs) {
                elements.push(compactor.compact(state_id, tr)?);
            }
            states.push(CompactState {
                final_weight: fst.final_weight(state_id)?,
                pos,
                ntrs: elements.len() - pos,
            });
        }
        Ok(Self {
            compactor,
            states,
            elements,
            start: fst.start(),
            isymt: fst.input_symbols().cloned(),
            osymt: fst.output_symbols().cloned(),
            properties: (fst.properties() & FstProperties::copy_properties())
                | FstProperties::EXPANDED,
        })
    }

    /// True when every transition of `fst` survives a compact/expand
    /// round-trip under `compactor`.
    pub fn compatible<F: ExpandedFst<W>>(fst: &F, compactor: &C) -> bool {
        for state_id in fst.states_range() {
            let trs = match fst.get_trs(state_id) {
                Ok(trs) => trs,
                Err(_) => return false,
            };
            for tr in crate::trs::Transitions::trs(&trs) {
                match compactor.compact(state_id, tr) {
                    Ok(element) => {
                        if &compactor.expand(state_id, &element) != tr {
                            return false;
                        }
                    }
                    Err(_) => return false,
                }
            }
        }
        true
    }

    fn state(&self, state_id: StateId) -> Result<&CompactState<W>> {
        self.states
            .get(state_id)
            .ok_or_else(|| format_err!("state {} does not exist", state_id))
    }

    fn expand_state(&self, state_id: StateId, state: &CompactState<W>) -> TrsVec<W> {
        let trs = self.elements[state.pos..state.pos + state.ntrs]
            .iter()
            .map(|element| self.compactor.expand(state_id, element))
            .collect::<Vec<_>>();
        TrsVec::from(trs)
    }
}

impl<W: Semiring, C: Compactor<W>> CoreFst<W> for CompactFst<W, C> {
    type TRS = TrsVec<W>;

    fn start(&self) -> Option<StateId> {
        self.start
    }

    fn final_weight(&self, state_id: StateId) -> Result<Option<W>> {
        Ok(self.state(state_id)?.final_weight.clone())
    }

    unsafe fn final_weight_unchecked(&self, state_id: StateId) -> Option<W> {
        self.states.get_unchecked(state_id).final_weight.clone()
    }

    fn num_trs(&self, state_id: StateId) -> Result<usize> {
        Ok(self.state(state_id)?.ntrs)
    }

    unsafe fn num_trs_unchecked(&self, state_id: StateId) -> usize {
        self.states.get_unchecked(state_id).ntrs
    }

    fn get_trs(&self, state_id: StateId) -> Result<Self::TRS> {
        let state = self.state(state_id)?;
        Ok(self.expand_state(state_id, state))
    }

    unsafe fn get_trs_unchecked(&self, state_id: StateId) -> Self::TRS {
        let state = self.states.get_unchecked(state_id);
        self.expand_state(state_id, state)
    }

    fn properties(&self) -> FstProperties {
        self.properties
    }
}

impl<'a, W: Semiring, C: Compactor<W>> StateIterator<'a> for CompactFst<W, C> {
    type Iter = std::ops::Range<StateId>;

    fn states_iter(&'a self) -> Self::Iter {
        0..self.states.len()
    }
}

/// Iterator behind [`FstIterator`] for [`CompactFst`].
pub struct CompactFstIterator<'a, W: Semiring, C: Compactor<W>> {
    fst: &'a CompactFst<W, C>,
    state: StateId,
}

impl<'a, W: Semiring, C: Compactor<W>> Iterator for CompactFstIterator<'a, W, C> {
    type Item = FstIterData<W, TrsVec<W>>;

    fn next(&mut self) -> Option<Self::Item> {
        let state = self.fst.states.get(self.state)?;
        let data = FstIterData {
            state_id: self.state,
            trs: self.fst.expand_state(self.state, state),
            final_weight: state.final_weight.clone(),
            num_trs: state.ntrs,
        };
        self.state += 1;
        Some(data)
    }
}

impl<'a, W: Semiring, C: Compactor<W>> FstIterator<'a, W> for CompactFst<W, C> {
    type FstIter = CompactFstIterator<'a, W, C>;

    fn fst_iter(&'a self) -> Self::FstIter {
        CompactFstIterator {
            fst: self,
            state: 0,
        }
    }
}

impl<W: Semiring, C: Compactor<W>> Fst<W> for CompactFst<W, C> {
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

impl<W: Semiring, C: Compactor<W>> ExpandedFst<W> for CompactFst<W, C> {
    fn num_states(&self) -> usize {
        self.states.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst_impls::VectorFst;
    use crate::fst_traits::MutableFst;
    use crate::semirings::TropicalWeight;
    use crate::trs::Transitions;

    #[test]
    fn test_acceptor_compactor_roundtrip() -> Result<()> {
        let mut fst = VectorFst::<TropicalWeight>::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        fst.set_start(s0)?;
        fst.set_final(s1, TropicalWeight::new(1.0))?;
        fst.add_tr(s0, Transition::new(3, 3, TropicalWeight::new(0.5), s1))?;
        assert!(CompactFst::compatible(&fst, &AcceptorCompactor::default()));
        let compact = CompactFst::from_fst(&fst, AcceptorCompactor::default())?;
        assert_eq!(compact.num_states(), 2);
        assert_eq!(compact.get_trs(s0)?.trs(), fst.get_trs(s0)?.trs());
        Ok(())
    }

    #[test]
    fn test_acceptor_compactor_rejects_transducer() -> Result<()> {
        let mut fst = VectorFst::<TropicalWeight>::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        fst.set_start(s0)?;
        fst.set_final(s1, TropicalWeight::one())?;
        fst.add_tr(s0, Transition::new(3, 4, TropicalWeight::one(), s1))?;
        assert!(!CompactFst::compatible(&fst, &AcceptorCompactor::default()));
        assert!(CompactFst::from_fst(&fst, AcceptorCompactor::default()).is_err());
        assert!(CompactFst::compatible(&fst, &UnweightedCompactor::default()));
        Ok(())
    }
}
