use std::collections::HashMap;

use anyhow::{format_err, Result};

use crate::fst_properties::FstProperties;
use crate::fst_traits::MutableFst;
use crate::semirings::Semiring;
use crate::{Label, EPS_LABEL};

/// What an encoding folds into the transition labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeType {
    /// Fold `(ilabel, olabel)` pairs into fresh input labels; the result
    /// is an acceptor over the pair alphabet.
    EncodeLabels,
    /// Fold `(ilabel, weight)` into fresh labels and move the weight out;
    /// the result is unweighted.
    EncodeWeights,
    /// Fold `(ilabel, olabel, weight)`.
    EncodeLabelsAndWeights,
}

/// Invertible mapping from transition content to fresh labels, built up
/// while encoding and replayed while decoding.
#[derive(Debug, Clone)]
pub struct EncodeMapper<W: Semiring> {
    encode_type: EncodeType,
    key_to_label: HashMap<(Label, Label, W), Label>,
    label_to_key: Vec<(Label, Label, W)>,
}

impl<W: Semiring> EncodeMapper<W> {
    pub fn new(encode_type: EncodeType) -> Self {
        Self {
            encode_type,
            key_to_label: HashMap::new(),
            label_to_key: vec![],
        }
    }

    pub fn encode_type(&self) -> EncodeType {
        self.encode_type
    }

    fn key_of(&self, tr: &crate::Transition<W>) -> (Label, Label, W) {
        match self.encode_type {
            EncodeType::EncodeLabels => (tr.ilabel, tr.olabel, W::one()),
            EncodeType::EncodeWeights => (tr.ilabel, EPS_LABEL, tr.weight.clone()),
            EncodeType::EncodeLabelsAndWeights => (tr.ilabel, tr.olabel, tr.weight.clone()),
        }
    }

    fn label_of(&mut self, key: (Label, Label, W)) -> Label {
        if let Some(&label) = self.key_to_label.get(&key) {
            return label;
        }
        // Labels start at 1; 0 stays reserved for epsilon.
        let label = self.label_to_key.len() + 1;
        self.label_to_key.push(key.clone());
        self.key_to_label.insert(key, label);
        label
    }

    fn lookup(&self, label: Label) -> Result<&(Label, Label, W)> {
        self.label_to_key
            .get(label.wrapping_sub(1))
            .ok_or_else(|| format_err!("EncodeMapper: unknown encoded label {}", label))
    }
}

/// Encodes an FST in place: every transition's content selected by the
/// mapper's [`EncodeType`] is replaced by a fresh label on both sides,
/// producing an unweighted and/or acceptor view that algorithms requiring
/// those properties can process; [`decode`] restores the original.
pub fn encode<W: Semiring, F: MutableFst<W>>(
    fst: &mut F,
    mapper: &mut EncodeMapper<W>,
) -> Result<()> {
    for state in fst.states_range() {
        let mut trs = fst.pop_trs(state)?;
        for tr in trs.iter_mut() {
            let key = mapper.key_of(tr);
            let label = mapper.label_of(key);
            tr.ilabel = label;
            match mapper.encode_type {
                EncodeType::EncodeLabels => {
                    tr.olabel = label;
                }
                EncodeType::EncodeWeights => {
                    tr.weight = W::one();
                }
                EncodeType::EncodeLabelsAndWeights => {
                    tr.olabel = label;
                    tr.weight = W::one();
                }
            }
        }
        for tr in trs {
            fst.add_tr(state, tr)?;
        }
    }
    let mut props = FstProperties::empty();
    let mut mask = FstProperties::empty();
    if !matches!(mapper.encode_type, EncodeType::EncodeWeights) {
        props |= FstProperties::ACCEPTOR;
        mask |= FstProperties::ACCEPTOR | FstProperties::NOT_ACCEPTOR;
    }
    if !matches!(mapper.encode_type, EncodeType::EncodeLabels) {
        props |= FstProperties::UNWEIGHTED;
        mask |= FstProperties::WEIGHTED | FstProperties::UNWEIGHTED;
    }
    fst.set_properties_with_mask(props, mask);
    Ok(())
}

/// Reverses [`encode`] using the same mapper.
pub fn decode<W: Semiring, F: MutableFst<W>>(fst: &mut F, mapper: &EncodeMapper<W>) -> Result<()> {
    for state in fst.states_range() {
        let mut trs = fst.pop_trs(state)?;
        for tr in trs.iter_mut() {
            let (ilabel, olabel, weight) = mapper.lookup(tr.ilabel)?.clone();
            tr.ilabel = ilabel;
            match mapper.encode_type {
                EncodeType::EncodeLabels => {
                    tr.olabel = olabel;
                }
                EncodeType::EncodeWeights => {
                    tr.weight = tr.weight.times(&weight);
                }
                EncodeType::EncodeLabelsAndWeights => {
                    tr.olabel = olabel;
                    tr.weight = tr.weight.times(&weight);
                }
            }
        }
        for tr in trs {
            fst.add_tr(state, tr)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst_impls::VectorFst;
    use crate::fst_traits::Fst;
    use crate::semirings::TropicalWeight;
    use crate::utils::transducer;

    #[test]
    fn test_encode_decode_labels_roundtrip() -> Result<()> {
        let orig: VectorFst<TropicalWeight> =
            transducer(&[1, 2], &[3, 4], TropicalWeight::new(0.5));
        let mut fst = orig.clone();
        let mut mapper = EncodeMapper::new(EncodeType::EncodeLabels);
        encode(&mut fst, &mut mapper)?;
        let encoded_paths: Vec<_> = fst.paths_iter().collect();
        assert_eq!(encoded_paths[0].ilabels, encoded_paths[0].olabels);
        decode(&mut fst, &mapper)?;
        assert_eq!(
            orig.paths_iter().collect::<Vec<_>>(),
            fst.paths_iter().collect::<Vec<_>>()
        );
        Ok(())
    }

    #[test]
    fn test_encode_labels_and_weights() -> Result<()> {
        let orig: VectorFst<TropicalWeight> =
            transducer(&[1, 2], &[3, 4], TropicalWeight::new(0.5));
        let mut fst = orig.clone();
        let mut mapper = EncodeMapper::new(EncodeType::EncodeLabelsAndWeights);
        encode(&mut fst, &mut mapper)?;
        let encoded: Vec<_> = fst.paths_iter().collect();
        assert_eq!(encoded[0].ilabels, encoded[0].olabels);
        decode(&mut fst, &mapper)?;
        assert_eq!(
            orig.paths_iter().collect::<Vec<_>>(),
            fst.paths_iter().collect::<Vec<_>>()
        );
        Ok(())
    }

    #[test]
    fn test_encode_weights_unweights() -> Result<()> {
        let mut fst: VectorFst<TropicalWeight> =
            transducer(&[1], &[1], TropicalWeight::one());
        fst.pop_trs(0)?;
        fst.add_tr(0, crate::Transition::new(1, 1, TropicalWeight::new(2.0), 1))?;
        let mut mapper = EncodeMapper::new(EncodeType::EncodeWeights);
        encode(&mut fst, &mut mapper)?;
        let paths: Vec<_> = fst.paths_iter().collect();
        assert_eq!(paths[0].weight, TropicalWeight::one());
        decode(&mut fst, &mapper)?;
        let paths: Vec<_> = fst.paths_iter().collect();
        assert_eq!(paths[0].weight, TropicalWeight::new(2.0));
        Ok(())
    }
}
