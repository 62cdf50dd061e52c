use std::sync::Arc;

use anyhow::{format_err, Result};

use crate::fst_properties::FstProperties;
use crate::fst_traits::{
    CoreFst, ExpandedFst, Fst, FstIterData, FstIterator, MutableFst, StateIterator,
};
use crate::semirings::Semiring;
use crate::symbol_table::SymbolTable;
use crate::transition::Transition;
use crate::trs::{Transitions, TrsConst};
use crate::{StateId, EPS_LABEL};

/// Immutable FST over two flat arrays: one of per-state records and one of
/// transitions. Built once from any expanded FST, then read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstFst<W: Semiring> {
    states: Vec<ConstState<W>>,
    trs: Arc<Vec<Transition<W>>>,
    start: Option<StateId>,
    isymt: Option<Arc<SymbolTable>>,
    osymt: Option<Arc<SymbolTable>>,
    properties: FstProperties,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ConstState<W> {
    pub(crate) final_weight: Option<W>,
    /// Offset of the state's transitions in the flat array.
    pub(crate) pos: usize,
    pub(crate) ntrs: usize,
    pub(crate) niepsilons: usize,
    pub(crate) noepsilons: usize,
}

impl<W: Semiring> ConstFst<W> {
    fn state(&self, state_id: StateId) -> Result<&ConstState<W>> {
        self.states
            .get(state_id)
            .ok_or_else(|| format_err!("state {} does not exist", state_id))
    }

    /// Flattens any expanded FST into the const representation, preserving
    /// state numbering, per-state transition order and final weights.
    pub fn from_fst<F: ExpandedFst<W>>(fst: &F) -> Result<Self> {
        let mut states = Vec::with_capacity(fst.num_states());
        let mut trs = vec![];
        for state_id in fst.states_range() {
            let state_trs = fst.get_trs(state_id)?;
            let pos = trs.len();
            let mut niepsilons = 0;
            let mut noepsilons = 0;
            for tr in state_trs.trs() {
                if tr.ilabel == EPS_LABEL {
                    niepsilons += 1;
                }
                if tr.olabel == EPS_LABEL {
                    noepsilons += 1;
                }
                trs.push(tr.clone());
            }
            states.push(ConstState {
                final_weight: fst.final_weight(state_id)?,
                pos,
                ntrs: trs.len() - pos,
                niepsilons,
                noepsilons,
            });
        }
        Ok(Self {
            states,
            trs: Arc::new(trs),
            start: fst.start(),
            isymt: fst.input_symbols().cloned(),
            osymt: fst.output_symbols().cloned(),
            properties: (fst.properties() & FstProperties::copy_properties())
                | FstProperties::EXPANDED,
        })
    }

}

impl<W: Semiring> CoreFst<W> for ConstFst<W> {
    type TRS = TrsConst<W>;

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
        Ok(TrsConst {
            trs: Arc::clone(&self.trs),
            pos: state.pos,
            n: state.ntrs,
        })
    }

    unsafe fn get_trs_unchecked(&self, state_id: StateId) -> Self::TRS {
        let state = self.states.get_unchecked(state_id);
        TrsConst {
            trs: Arc::clone(&self.trs),
            pos: state.pos,
            n: state.ntrs,
        }
    }

    fn properties(&self) -> FstProperties {
        self.properties
    }

    fn num_input_epsilons(&self, state_id: StateId) -> Result<usize> {
        Ok(self.state(state_id)?.niepsilons)
    }

    fn num_output_epsilons(&self, state_id: StateId) -> Result<usize> {
        Ok(self.state(state_id)?.noepsilons)
    }
}

impl<'a, W: Semiring> StateIterator<'a> for ConstFst<W> {
    type Iter = std::ops::Range<StateId>;

    fn states_iter(&'a self) -> Self::Iter {
        0..self.states.len()
    }
}

/// Iterator behind [`FstIterator`] for [`ConstFst`].
pub struct ConstFstIterator<'a, W: Semiring> {
    fst: &'a ConstFst<W>,
    state: StateId,
}

impl<'a, W: Semiring> Iterator for ConstFstIterator<'a, W> {
    type Item = FstIterData<W, TrsConst<W>>;

    fn next(&mut self) -> Option<Self::Item> {
        let state = self.fst.states.get(self.state)?;
        let data = FstIterData {
            state_id: self.state,
            trs: TrsConst {
                trs: Arc::clone(&self.fst.trs),
                pos: state.pos,
                n: state.ntrs,
            },
            final_weight: state.final_weight.clone(),
            num_trs: state.ntrs,
        };
        self.state += 1;
        Some(data)
    }
}

impl<'a, W: Semiring> FstIterator<'a, W> for ConstFst<W> {
    type FstIter = ConstFstIterator<'a, W>;

    fn fst_iter(&'a self) -> Self::FstIter {
        ConstFstIterator {
            fst: self,
            state: 0,
        }
    }
}

impl<W: Semiring> Fst<W> for ConstFst<W> {
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

impl<W: Semiring> ExpandedFst<W> for ConstFst<W> {
    fn num_states(&self) -> usize {
        self.states.len()
    }
}

impl<W: Semiring> From<crate::fst_impls::VectorFst<W>> for ConstFst<W> {
    fn from(fst: crate::fst_impls::VectorFst<W>) -> Self {
        // Infallible: states of an expanded FST are always enumerable.
        ConstFst::from_fst(&fst).expect("const conversion from vector fst")
    }
}

impl<W: Semiring> From<ConstFst<W>> for crate::fst_impls::VectorFst<W> {
    fn from(fst: ConstFst<W>) -> Self {
        let mut out = crate::fst_impls::VectorFst::new();
        out.add_states(fst.num_states());
        for data in fst.fst_iter() {
            for tr in data.trs.trs() {
                unsafe { out.add_tr_unchecked(data.state_id, tr.clone()) };
            }
            if let Some(w) = data.final_weight {
                unsafe { out.set_final_unchecked(data.state_id, w) };
            }
        }
        if let Some(start) = fst.start() {
            unsafe { out.set_start_unchecked(start) };
        }
        out.set_symts_from_fst(&fst);
        out.set_properties(fst.properties() & FstProperties::copy_properties());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst_impls::VectorFst;
    use crate::semirings::TropicalWeight;

    fn build() -> VectorFst<TropicalWeight> {
        let mut fst = VectorFst::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        fst.set_start(s0).unwrap();
        fst.set_final(s1, TropicalWeight::new(0.25)).unwrap();
        fst.add_tr(s0, Transition::new(1, 2, TropicalWeight::new(1.0), s1))
            .unwrap();
        fst.add_tr(s0, Transition::new(0, 3, TropicalWeight::one(), s1))
            .unwrap();
        fst
    }

    #[test]
    fn test_const_fst_roundtrip() -> Result<()> {
        let vector_fst = build();
        let const_fst: ConstFst<_> = vector_fst.clone().into();
        assert_eq!(const_fst.num_states(), vector_fst.num_states());
        assert_eq!(const_fst.start(), vector_fst.start());
        for s in vector_fst.states_range() {
            assert_eq!(
                const_fst.get_trs(s)?.trs(),
                vector_fst.get_trs(s)?.trs()
            );
            assert_eq!(const_fst.final_weight(s)?, vector_fst.final_weight(s)?);
        }
        assert_eq!(const_fst.num_input_epsilons(0)?, 1);
        let back: VectorFst<_> = const_fst.into();
        assert_eq!(back.get_trs(0)?.trs(), vector_fst.get_trs(0)?.trs());
        Ok(())
    }
}
