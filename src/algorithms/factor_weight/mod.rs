//! Expansion of composite weights into transition chains: rebuilds an FST
//! so that every weight is "factored down" to atoms the surrounding
//! machinery can carry on single transitions. The workhorse behind
//! converting determinized Gallic acceptors back into transducers and
//! behind label pushing.

pub use self::factor_iterators::{FactorIterator, GallicFactor, StringFactor};
pub use self::factor_weight_op::{FactorWeightFst, FactorWeightOp};

mod factor_iterators;
mod factor_weight_op;

use anyhow::Result;
use bitflags::bitflags;

use crate::fst_traits::{ExpandedFst, Fst, MutableFst};
use crate::lazy::{LazyFst, SimpleHashMapCache};
use crate::semirings::{Semiring, WeightQuantize};
use crate::{Label, EPS_LABEL, KDELTA};

bitflags! {
    /// Which weights a factoring pass expands.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FactorWeightType: u32 {
        /// Final weights are factored into chains through fresh states.
        const FACTOR_FINAL_WEIGHTS = 0b1;
        /// Transition weights are factored.
        const FACTOR_ARC_WEIGHTS = 0b10;
    }
}

/// Options of a factoring pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorWeightOptions {
    /// Quantization applied to residual weights before interning them.
    pub delta: f32,
    pub mode: FactorWeightType,
    /// Input label placed on transitions carrying factored final weight.
    pub final_ilabel: Label,
    /// Output label placed on transitions carrying factored final weight.
    pub final_olabel: Label,
}

impl FactorWeightOptions {
    pub fn new(mode: FactorWeightType) -> Self {
        Self {
            delta: KDELTA,
            mode,
            final_ilabel: EPS_LABEL,
            final_olabel: EPS_LABEL,
        }
    }
}

/// Eagerly factors the weights of `ifst`; see [`FactorWeightFst`] for the
/// delayed form and the exact expansion rules.
pub fn factor_weight<W, F1, F2, FI>(ifst: &F1, opts: FactorWeightOptions) -> Result<F2>
where
    W: WeightQuantize,
    F1: ExpandedFst<W> + 'static,
    F2: MutableFst<W>,
    FI: FactorIterator<W> + 'static,
{
    let isymt = ifst.input_symbols().cloned();
    let osymt = ifst.output_symbols().cloned();
    let op = FactorWeightOp::<W, F1, FI>::new(std::sync::Arc::new(ifst.clone()), opts)?;
    let fst: FactorWeightFst<W, F1, FI> =
        LazyFst::from_op_and_cache(op, SimpleHashMapCache::new(), isymt, osymt);
    fst.compute()
}
