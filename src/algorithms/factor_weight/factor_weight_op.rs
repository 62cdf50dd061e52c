use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;

use anyhow::Result;

use crate::algorithms::factor_weight::{FactorIterator, FactorWeightOptions, FactorWeightType};
use crate::fst_properties::op_properties::factor_weight_properties;
use crate::fst_properties::FstProperties;
use crate::fst_traits::ExpandedFst;
use crate::lazy::{FstOp, LazyFst, SimpleHashMapCache, StateTable};
use crate::semirings::WeightQuantize;
use crate::trs::{Transitions, TrsVec};
use crate::{StateId, Transition};

/// Delayed factored view; see the module documentation.
pub type FactorWeightFst<W, F, FI> = LazyFst<W, FactorWeightOp<W, F, FI>, SimpleHashMapCache<W>>;

/// An output state: an input state with a residual weight still to be
/// unwound, or a pure residual tail (`state == None`) after the input's
/// final weight began factoring.
type FactorElement<W> = (Option<StateId>, W);

/// Expansion operator of the factored FST.
pub struct FactorWeightOp<W: WeightQuantize, F: ExpandedFst<W>, FI: FactorIterator<W>> {
    fst: Arc<F>,
    opts: FactorWeightOptions,
    state_table: StateTable<FactorElement<W>>,
    properties: FstProperties,
    fi: PhantomData<FI>,
}

impl<W: WeightQuantize, F: ExpandedFst<W>, FI: FactorIterator<W>> Debug
    for FactorWeightOp<W, F, FI>
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("FactorWeightOp")
            .field("fst", &self.fst)
            .field("opts", &self.opts)
            .field("state_table", &self.state_table)
            .finish()
    }
}

impl<W: WeightQuantize, F: ExpandedFst<W>, FI: FactorIterator<W>> FactorWeightOp<W, F, FI> {
    pub fn new(fst: Arc<F>, opts: FactorWeightOptions) -> Result<Self> {
        let properties = factor_weight_properties(fst.properties());
        Ok(Self {
            fst,
            opts,
            state_table: StateTable::new(),
            properties,
            fi: PhantomData,
        })
    }

    fn find_state(&self, element: FactorElement<W>) -> StateId {
        let (state, weight) = element;
        self.state_table
            .find_id((state, weight.quantize(self.opts.delta)))
    }
}

impl<W, F, FI> FstOp<W> for FactorWeightOp<W, F, FI>
where
    W: WeightQuantize,
    F: ExpandedFst<W>,
    FI: FactorIterator<W>,
{
    fn compute_start(&self) -> Result<Option<StateId>> {
        Ok(self
            .fst
            .start()
            .map(|s| self.find_state((Some(s), W::one()))))
    }

    fn compute_trs(&self, id: StateId) -> Result<TrsVec<W>> {
        let (state, residual) = self.state_table.find_tuple(id);
        let mut trs = vec![];
        if let Some(state) = state {
            for tr in self.fst.get_trs(state)?.trs() {
                let weight = residual.times(&tr.weight);
                let fit = FI::new(weight.clone());
                if !self.opts.mode.contains(FactorWeightType::FACTOR_ARC_WEIGHTS) || fit.done() {
                    let dest = self.find_state((Some(tr.nextstate), W::one()));
                    trs.push(Transition::new(tr.ilabel, tr.olabel, weight, dest));
                } else {
                    for (head, rest) in fit {
                        let dest = self.find_state((Some(tr.nextstate), rest));
                        trs.push(Transition::new(tr.ilabel, tr.olabel, head, dest));
                    }
                }
            }
        }
        // Factoring of the (residual) final weight into fresh transitions.
        let final_weight = match state {
            Some(state) => self
                .fst
                .final_weight(state)?
                .map(|f| residual.times(&f)),
            None => Some(residual),
        };
        if let Some(weight) = final_weight {
            let fit = FI::new(weight);
            if self.opts.mode.contains(FactorWeightType::FACTOR_FINAL_WEIGHTS) && !fit.done() {
                for (head, rest) in fit {
                    let dest = self.find_state((None, rest));
                    trs.push(Transition::new(
                        self.opts.final_ilabel,
                        self.opts.final_olabel,
                        head,
                        dest,
                    ));
                }
            }
        }
        Ok(TrsVec::from(trs))
    }

    fn compute_final_weight(&self, id: StateId) -> Result<Option<W>> {
        let (state, residual) = self.state_table.find_tuple(id);
        let weight = match state {
            Some(state) => self.fst.final_weight(state)?.map(|f| residual.times(&f)),
            None => Some(residual),
        };
        match weight {
            Some(weight) => {
                let fit = FI::new(weight.clone());
                if self.opts.mode.contains(FactorWeightType::FACTOR_FINAL_WEIGHTS) && !fit.done() {
                    // Still factoring: the chain continues via transitions.
                    Ok(None)
                } else {
                    Ok(Some(weight))
                }
            }
            None => Ok(None),
        }
    }

    fn properties(&self) -> FstProperties {
        self.properties
    }
}
