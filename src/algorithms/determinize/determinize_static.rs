use std::sync::Arc;

use anyhow::{bail, Result};

use crate::algorithms::determinize::{
    CommonDivisor, DefaultCommonDivisor, DeterminizeFsa, DeterminizeFsaOp, DeterminizeType,
    GallicCommonDivisor,
};
use crate::algorithms::factor_weight::{FactorWeightOptions, FactorWeightType};
use crate::algorithms::fst_convert::fst_convert_from_ref;
use crate::algorithms::weight_converters::{from_gallic, to_gallic};
use crate::fst_impls::VectorFst;
use crate::fst_properties::FstProperties;
use crate::fst_traits::{ExpandedFst, MutableFst};
use crate::lazy::{LazyFst, SimpleHashMapCache};
use crate::semirings::{GallicWeight, WeaklyDivisibleSemiring, WeightQuantize};
use crate::{Label, EPS_LABEL, KDELTA};

/// Options of determinization.
#[derive(Debug, Clone, PartialEq)]
pub struct DeterminizeConfig {
    pub det_type: DeterminizeType,
    /// Quantization delta applied to subset residuals.
    pub delta: f32,
    /// Input label of the transition carrying residual final weight out of
    /// a subsequential subset state.
    pub subsequential_label: Label,
}

impl Default for DeterminizeConfig {
    fn default() -> Self {
        Self {
            det_type: DeterminizeType::DeterminizeFunctional,
            delta: KDELTA,
            subsequential_label: EPS_LABEL,
        }
    }
}

/// Determinizes a weighted FST: the result accepts the same relation and
/// no two transitions leaving any state share an input label.
///
/// Acceptors run the weighted subset construction directly. Transducers
/// are first encoded into the Gallic semiring (output labels as string
/// weights), determinized there, and factored back; this requires the
/// input to be functional.
pub fn determinize<W, F1, F2>(fst_in: &F1) -> Result<F2>
where
    W: WeaklyDivisibleSemiring + WeightQuantize,
    F1: ExpandedFst<W>,
    F2: MutableFst<W>,
{
    determinize_with_config(fst_in, DeterminizeConfig::default())
}

pub fn determinize_with_config<W, F1, F2>(fst_in: &F1, config: DeterminizeConfig) -> Result<F2>
where
    W: WeaklyDivisibleSemiring + WeightQuantize,
    F1: ExpandedFst<W>,
    F2: MutableFst<W>,
{
    let props = fst_in.properties_check(FstProperties::ACCEPTOR)?;
    if props.contains(FstProperties::ACCEPTOR) {
        determinize_fsa::<W, F1, F2, DefaultCommonDivisor>(fst_in, config.delta)
    } else {
        match config.det_type {
            DeterminizeType::DeterminizeFunctional => {
                let gallic: VectorFst<GallicWeight<W>> = to_gallic(fst_in)?;
                let determinized: VectorFst<GallicWeight<W>> =
                    determinize_fsa::<_, _, _, GallicCommonDivisor>(&gallic, config.delta)?;
                let factor_opts = FactorWeightOptions {
                    delta: config.delta,
                    mode: FactorWeightType::FACTOR_FINAL_WEIGHTS
                        | FactorWeightType::FACTOR_ARC_WEIGHTS,
                    final_ilabel: config.subsequential_label,
                    final_olabel: EPS_LABEL,
                };
                from_gallic(&determinized, factor_opts, config.subsequential_label)
            }
            DeterminizeType::DeterminizeNonFunctional
            | DeterminizeType::DeterminizeDisambiguate => bail!(
                "determinize: only functional transducer determinization is supported; \
                 got {:?}",
                config.det_type
            ),
        }
    }
}

/// Weighted subset construction over an acceptor, with a caller-chosen
/// common divisor.
pub fn determinize_fsa<W, F1, F2, CD>(fst_in: &F1, delta: f32) -> Result<F2>
where
    W: WeaklyDivisibleSemiring + WeightQuantize,
    F1: ExpandedFst<W>,
    F2: MutableFst<W>,
    CD: CommonDivisor<W> + 'static,
{
    let vfst: Arc<VectorFst<W>> = Arc::new(fst_convert_from_ref(fst_in));
    let isymt = fst_in.input_symbols().cloned();
    let osymt = fst_in.output_symbols().cloned();
    let op = DeterminizeFsaOp::<W, VectorFst<W>, CD>::new(vfst, delta)?;
    let lazy: DeterminizeFsa<W, VectorFst<W>, CD> =
        LazyFst::from_op_and_cache(op, SimpleHashMapCache::new(), isymt, osymt);
    lazy.compute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst_properties::FstProperties;
    use crate::fst_traits::{CoreFst, Fst};
    use crate::semirings::{Semiring, TropicalWeight};
    use crate::trs::Transitions;
    use crate::Transition;

    #[test]
    fn test_determinize_fsa_merges_prefixes() -> Result<()> {
        // Nondeterministic: 0 -a/1-> 1, 0 -a/2-> 2, 1 -b/10-> 3,
        // 2 -b/20-> 3, 3 final. Determinized: a/1 then b/10.
        let mut fst = VectorFst::<TropicalWeight>::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        let s2 = fst.add_state();
        let s3 = fst.add_state();
        fst.set_start(s0)?;
        fst.set_final(s3, TropicalWeight::one())?;
        fst.add_tr(s0, Transition::new(1, 1, TropicalWeight::new(1.0), s1))?;
        fst.add_tr(s0, Transition::new(1, 1, TropicalWeight::new(2.0), s2))?;
        fst.add_tr(s1, Transition::new(2, 2, TropicalWeight::new(10.0), s3))?;
        fst.add_tr(s2, Transition::new(2, 2, TropicalWeight::new(20.0), s3))?;

        let det: VectorFst<TropicalWeight> = determinize(&fst)?;
        assert_eq!(det.num_states(), 3);
        let start = det.start().unwrap();
        let trs = det.get_trs(start)?;
        assert_eq!(trs.len(), 1);
        assert_eq!(trs.trs()[0].ilabel, 1);
        assert_eq!(trs.trs()[0].weight, TropicalWeight::new(1.0));
        let mid = trs.trs()[0].nextstate;
        let trs2 = det.get_trs(mid)?;
        assert_eq!(trs2.len(), 1);
        assert_eq!(trs2.trs()[0].weight, TropicalWeight::new(10.0));
        // The relation's single string keeps total weight 11.
        let paths: Vec<_> = det.paths_iter().collect();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].weight, TropicalWeight::new(11.0));
        assert!(det
            .properties()
            .contains(FstProperties::I_DETERMINISTIC));
        Ok(())
    }

    #[test]
    fn test_determinize_functional_transducer() -> Result<()> {
        // Nondeterministic copies of one functional mapping collapse into
        // a single deterministic path through the Gallic construction.
        let mut fst = VectorFst::<TropicalWeight>::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        let s2 = fst.add_state();
        let s3 = fst.add_state();
        fst.set_start(s0)?;
        fst.set_final(s3, TropicalWeight::one())?;
        fst.add_tr(s0, Transition::new(1, 5, TropicalWeight::new(1.0), s1))?;
        fst.add_tr(s0, Transition::new(1, 5, TropicalWeight::new(2.0), s2))?;
        fst.add_tr(s1, Transition::new(2, 6, TropicalWeight::new(10.0), s3))?;
        fst.add_tr(s2, Transition::new(2, 6, TropicalWeight::new(20.0), s3))?;

        let det: VectorFst<TropicalWeight> = determinize(&fst)?;
        let paths: Vec<_> = det.paths_iter().collect();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].ilabels, vec![1, 2]);
        assert_eq!(paths[0].olabels, vec![5, 6]);
        assert_eq!(paths[0].weight, TropicalWeight::new(11.0));
        let mut det_mut = det;
        let props = det_mut.compute_and_update_properties_all()?;
        assert!(props.contains(FstProperties::I_DETERMINISTIC));
        Ok(())
    }
}
