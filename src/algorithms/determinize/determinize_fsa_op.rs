use std::collections::BTreeMap;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;

use anyhow::{bail, Result};

use crate::algorithms::determinize::{CommonDivisor, DeterminizeElement, WeightedSubset};
use crate::fst_properties::op_properties::determinize_properties;
use crate::fst_properties::FstProperties;
use crate::fst_traits::ExpandedFst;
use crate::lazy::{FstOp, LazyFst, SimpleHashMapCache, StateTable};
use crate::semirings::{
    DivideType, SemiringProperties, WeaklyDivisibleSemiring, WeightQuantize,
};
use crate::trs::{Transitions, TrsVec};
use crate::{Label, StateId, Transition};

/// Delayed determinization of a weighted acceptor.
pub type DeterminizeFsa<W, F, CD> =
    LazyFst<W, DeterminizeFsaOp<W, F, CD>, SimpleHashMapCache<W>>;

/// Weighted subset construction: each output state is a set of input
/// states with residual weights; per input label the construction combines
/// the reachable targets, extracts their common divisor as the transition
/// weight, and interns the residualized subset.
pub struct DeterminizeFsaOp<W, F, CD>
where
    W: WeaklyDivisibleSemiring + WeightQuantize,
    F: ExpandedFst<W>,
    CD: CommonDivisor<W>,
{
    fst: Arc<F>,
    state_table: StateTable<WeightedSubset<W>>,
    delta: f32,
    properties: FstProperties,
    cd: PhantomData<CD>,
}

impl<W, F, CD> Debug for DeterminizeFsaOp<W, F, CD>
where
    W: WeaklyDivisibleSemiring + WeightQuantize,
    F: ExpandedFst<W>,
    CD: CommonDivisor<W>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("DeterminizeFsaOp")
            .field("fst", &self.fst)
            .field("state_table", &self.state_table)
            .field("delta", &self.delta)
            .finish()
    }
}

impl<W, F, CD> DeterminizeFsaOp<W, F, CD>
where
    W: WeaklyDivisibleSemiring + WeightQuantize,
    F: ExpandedFst<W>,
    CD: CommonDivisor<W>,
{
    pub fn new(fst: Arc<F>, delta: f32) -> Result<Self> {
        if !W::properties().contains(SemiringProperties::LEFT_SEMIRING) {
            bail!(
                "determinize: weight type must be weakly left divisible (left semiring)"
            );
        }
        let properties = determinize_properties(fst.properties());
        Ok(Self {
            fst,
            state_table: StateTable::new(),
            delta,
            properties,
            cd: PhantomData,
        })
    }
}

impl<W, F, CD> FstOp<W> for DeterminizeFsaOp<W, F, CD>
where
    W: WeaklyDivisibleSemiring + WeightQuantize,
    F: ExpandedFst<W>,
    CD: CommonDivisor<W>,
{
    fn compute_start(&self) -> Result<Option<StateId>> {
        Ok(self.fst.start().map(|start| {
            self.state_table
                .find_id(WeightedSubset::singleton(start, W::one()))
        }))
    }

    fn compute_trs(&self, id: StateId) -> Result<TrsVec<W>> {
        let subset = self.state_table.find_tuple(id);
        // Reachable elements per label, in label order for a deterministic
        // transition sequence.
        let mut by_label: BTreeMap<Label, Vec<DeterminizeElement<W>>> = BTreeMap::new();
        for element in subset.iter() {
            for tr in self.fst.get_trs(element.state)?.trs() {
                by_label
                    .entry(tr.ilabel)
                    .or_default()
                    .push(DeterminizeElement::new(
                        tr.nextstate,
                        element.weight.times(&tr.weight),
                    ));
            }
        }
        let mut trs = vec![];
        for (label, elements) in by_label {
            let merged = WeightedSubset::from_elements(elements);
            let mut divisor: Option<W> = None;
            for element in merged.iter() {
                divisor = Some(match divisor {
                    Some(d) => CD::common_divisor(&d, &element.weight),
                    None => element.weight.clone(),
                });
            }
            let divisor = divisor.expect("non-empty label group");
            let residualized = WeightedSubset::from_elements(
                merged
                    .iter()
                    .map(|element| {
                        DeterminizeElement::new(
                            element.state,
                            element
                                .weight
                                .divide(&divisor, DivideType::DivideLeft)
                                .quantize(self.delta),
                        )
                    })
                    .collect(),
            );
            let nextstate = self.state_table.find_id(residualized);
            trs.push(Transition::new(label, label, divisor, nextstate));
        }
        Ok(TrsVec::from(trs))
    }

    fn compute_final_weight(&self, id: StateId) -> Result<Option<W>> {
        let subset = self.state_table.find_tuple(id);
        let mut weight = W::zero();
        for element in subset.iter() {
            if let Some(final_weight) = self.fst.final_weight(element.state)? {
                weight.plus_assign(element.weight.times(&final_weight));
            }
        }
        Ok(if weight.is_zero() { None } else { Some(weight) })
    }

    fn properties(&self) -> FstProperties {
        self.properties
    }
}
