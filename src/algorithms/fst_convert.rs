use crate::fst_properties::FstProperties;
use crate::fst_traits::{ExpandedFst, FstIterator, MutableFst};
use crate::semirings::Semiring;
use crate::trs::Transitions;

/// Materialises any expanded FST into another representation, preserving
/// state numbering, transition order and final weights.
pub fn fst_convert_from_ref<W, F1, F2>(ifst: &F1) -> F2
where
    W: Semiring,
    F1: ExpandedFst<W>,
    F2: MutableFst<W>,
{
    let mut ofst = F2::new();
    ofst.add_states(ifst.num_states());
    for data in ifst.fst_iter() {
        for tr in data.trs.trs() {
            unsafe { ofst.add_tr_unchecked(data.state_id, tr.clone()) };
        }
        if let Some(final_weight) = data.final_weight {
            unsafe { ofst.set_final_unchecked(data.state_id, final_weight) };
        }
    }
    if let Some(start) = ifst.start() {
        unsafe { ofst.set_start_unchecked(start) };
    }
    ofst.set_symts_from_fst(ifst);
    ofst.set_properties_with_mask(ifst.properties(), FstProperties::copy_properties());
    ofst
}

/// Consuming variant of [`fst_convert_from_ref`].
pub fn fst_convert<W, F1, F2>(ifst: F1) -> F2
where
    W: Semiring,
    F1: ExpandedFst<W>,
    F2: MutableFst<W>,
{
    fst_convert_from_ref(&ifst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst_impls::{ConstFst, VectorFst};
    use crate::fst_traits::CoreFst;
    use crate::semirings::TropicalWeight;
    use crate::utils::acceptor;

    #[test]
    fn test_convert_preserves_structure() {
        let fst: VectorFst<TropicalWeight> = acceptor(&[1, 2], TropicalWeight::new(0.5));
        let const_fst = ConstFst::from_fst(&fst).unwrap();
        let back: VectorFst<TropicalWeight> = fst_convert_from_ref(&const_fst);
        assert_eq!(back.num_states(), fst.num_states());
        assert_eq!(back.start(), fst.start());
        for s in 0..fst.num_states() {
            assert_eq!(
                back.get_trs(s).unwrap().trs(),
                fst.get_trs(s).unwrap().trs()
            );
        }
    }
}
