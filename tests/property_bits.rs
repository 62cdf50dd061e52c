//! Property-bit behavior at the trait boundary: the defaults of a fresh
//! FST, the per-mutation refinements, and the `Properties(mask, test)`
//! contract.

use anyhow::Result;

use wfst::fst_impls::VectorFst;
use wfst::fst_properties::FstProperties;
use wfst::fst_traits::{CoreFst, ExpandedFst, MutableFst};
use wfst::semirings::{Semiring, TropicalWeight};
use wfst::Transition;

type TF = VectorFst<TropicalWeight>;

#[test]
fn test_default_fst_properties() {
    let fst = TF::new();
    let props = fst.properties();
    for bit in [
        FstProperties::ACCEPTOR,
        FstProperties::ACYCLIC,
        FstProperties::TOP_SORTED,
        FstProperties::UNWEIGHTED,
        FstProperties::NO_EPSILONS,
        FstProperties::I_DETERMINISTIC,
        FstProperties::O_DETERMINISTIC,
    ] {
        assert!(props.contains(bit), "missing {:?}", bit);
    }
}

#[test]
fn test_add_tr_clears_sorted_iff_out_of_order() -> Result<()> {
    let mut fst = TF::new();
    let s0 = fst.add_state();
    let s1 = fst.add_state();
    fst.set_start(s0)?;
    fst.set_final(s1, TropicalWeight::one())?;

    fst.add_tr(s0, Transition::new(1, 1, TropicalWeight::one(), s1))?;
    fst.add_tr(s0, Transition::new(2, 2, TropicalWeight::one(), s1))?;
    // In-order appends keep the bit.
    assert!(fst.properties().contains(FstProperties::I_LABEL_SORTED));

    fst.add_tr(s0, Transition::new(1, 1, TropicalWeight::one(), s1))?;
    // An input label preceding the previous last one clears it.
    assert!(!fst.properties().contains(FstProperties::I_LABEL_SORTED));
    assert!(fst
        .properties()
        .contains(FstProperties::NOT_I_LABEL_SORTED));
    Ok(())
}

#[test]
fn test_weighted_bit_follows_final_weights() -> Result<()> {
    let mut fst = TF::new();
    let s0 = fst.add_state();
    fst.set_start(s0)?;
    assert!(fst.properties().contains(FstProperties::UNWEIGHTED));
    fst.set_final(s0, TropicalWeight::new(2.0))?;
    assert!(fst.properties().contains(FstProperties::WEIGHTED));
    Ok(())
}

#[test]
fn test_properties_check_computes_unknown_bits() -> Result<()> {
    let mut fst = TF::new();
    let s0 = fst.add_state();
    let s1 = fst.add_state();
    fst.set_start(s0)?;
    fst.set_final(s1, TropicalWeight::one())?;
    fst.add_tr(s0, Transition::new(1, 1, TropicalWeight::one(), s1))?;
    // Accessibility is unknown after mutation; the checking form computes
    // it without lying about it beforehand.
    let known = fst.properties();
    assert!(!known.contains(FstProperties::ACCESSIBLE));
    let checked = fst.properties_check(FstProperties::ACCESSIBLE | FstProperties::NOT_ACCESSIBLE)?;
    assert!(checked.contains(FstProperties::ACCESSIBLE));
    // The mutable caching form records the computed bits.
    let cached = fst.compute_and_update_properties_all()?;
    assert!(cached.contains(FstProperties::ACCESSIBLE));
    assert!(fst.properties().contains(FstProperties::ACCESSIBLE));
    Ok(())
}

#[test]
fn test_self_loop_sets_cyclic_bits() -> Result<()> {
    let mut fst = TF::new();
    let s0 = fst.add_state();
    fst.set_start(s0)?;
    fst.add_tr(s0, Transition::new(1, 1, TropicalWeight::one(), s0))?;
    assert!(fst.properties().contains(FstProperties::CYCLIC));
    assert!(!fst.properties().contains(FstProperties::ACYCLIC));
    Ok(())
}

#[test]
fn test_properties_stay_consistent() -> Result<()> {
    let mut fst = TF::new();
    let s0 = fst.add_state();
    let s1 = fst.add_state();
    fst.set_start(s0)?;
    fst.set_final(s1, TropicalWeight::new(1.0))?;
    fst.add_tr(s0, Transition::new(3, 4, TropicalWeight::one(), s1))?;
    fst.add_tr(s0, Transition::new(2, 2, TropicalWeight::new(0.5), s1))?;
    fst.del_states(vec![s1])?;
    // No ternary pair may ever have both bits set.
    assert!(fst.properties().is_consistent());
    Ok(())
}
