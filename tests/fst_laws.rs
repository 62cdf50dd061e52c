//! Structural laws every implementation must satisfy: conversions preserve
//! the graph, the involutions round-trip, the optimizations preserve the
//! relation, and delayed FSTs expand deterministically.

use anyhow::Result;

use wfst::algorithms::compose::compose_filters::SequenceComposeFilter;
use wfst::algorithms::compose::matchers::GenericMatcher;
use wfst::algorithms::compose::{compose, ComposeFst, ComposeFstOp, ComposeFstOpOptions};
use wfst::algorithms::{
    connect, determinize, intersect, invert, reverse, rm_epsilon, shortest_distance, union,
};
use wfst::fst_impls::{ConstFst, VectorFst};
use wfst::fst_properties::compute_fst_properties;
use wfst::fst_traits::{CoreFst, ExpandedFst, Fst, MutableFst};
use wfst::lazy::{CacheOptions, GcLruCache, LazyFst};
use wfst::semirings::{Semiring, TropicalWeight};
use wfst::utils::{acceptor, transducer};
use wfst::{Transition, Transitions, EPS_LABEL};

type TF = VectorFst<TropicalWeight>;

fn paths_sorted<F: Fst<TropicalWeight>>(fst: &F) -> Vec<(Vec<usize>, Vec<usize>, TropicalWeight)> {
    let mut paths: Vec<_> = fst
        .paths_iter()
        .map(|p| (p.ilabels, p.olabels, p.weight))
        .collect();
    paths.sort_by(|a, b| {
        (&a.0, &a.1)
            .cmp(&(&b.0, &b.1))
            .then_with(|| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal))
    });
    paths
}

fn branching_fst() -> TF {
    let mut fst = TF::new();
    let s0 = fst.add_state();
    let s1 = fst.add_state();
    let s2 = fst.add_state();
    let s3 = fst.add_state();
    fst.set_start(s0).unwrap();
    fst.set_final(s2, TropicalWeight::new(0.5)).unwrap();
    fst.set_final(s3, TropicalWeight::new(1.5)).unwrap();
    fst.add_tr(s0, Transition::new(1, 4, TropicalWeight::new(1.0), s1))
        .unwrap();
    fst.add_tr(s0, Transition::new(2, 5, TropicalWeight::new(2.0), s2))
        .unwrap();
    fst.add_tr(s1, Transition::new(3, 6, TropicalWeight::new(3.0), s3))
        .unwrap();
    fst
}

#[test]
fn test_conversion_preserves_states_and_trs() -> Result<()> {
    let fst = branching_fst();
    let const_fst = ConstFst::from_fst(&fst)?;
    assert_eq!(const_fst.num_states(), fst.num_states());
    for s in fst.states_range() {
        assert_eq!(const_fst.get_trs(s)?.trs(), fst.get_trs(s)?.trs());
        assert_eq!(const_fst.final_weight(s)?, fst.final_weight(s)?);
    }
    Ok(())
}

#[test]
fn test_invert_invert_identity() -> Result<()> {
    let orig = branching_fst();
    let mut fst = orig.clone();
    invert(&mut fst)?;
    invert(&mut fst)?;
    assert_eq!(paths_sorted(&orig), paths_sorted(&fst));
    Ok(())
}

#[test]
fn test_reverse_reverse_equivalent() -> Result<()> {
    let orig = branching_fst();
    let rev: TF = reverse(&orig)?;
    let back: TF = reverse(&rev)?;
    assert_eq!(paths_sorted(&orig), paths_sorted(&back));
    Ok(())
}

#[test]
fn test_connect_preserves_relation() -> Result<()> {
    let mut fst = branching_fst();
    // Graft unreachable and dead-end states.
    let dead = fst.add_state();
    fst.add_tr(0, Transition::new(9, 9, TropicalWeight::one(), dead))?;
    let unreachable = fst.add_state();
    fst.add_tr(unreachable, Transition::new(8, 8, TropicalWeight::one(), 2))?;
    let before = paths_sorted(&fst);
    connect(&mut fst)?;
    assert_eq!(before, paths_sorted(&fst));
    let props = compute_fst_properties(&fst)?;
    assert!(props.contains(wfst::fst_properties::FstProperties::ACCESSIBLE));
    assert!(props.contains(wfst::fst_properties::FstProperties::COACCESSIBLE));
    Ok(())
}

#[test]
fn test_rm_epsilon_preserves_relation() -> Result<()> {
    let mut fst = TF::new();
    let s0 = fst.add_state();
    let s1 = fst.add_state();
    let s2 = fst.add_state();
    fst.set_start(s0)?;
    fst.set_final(s2, TropicalWeight::one())?;
    fst.add_tr(s0, Transition::new(0, 0, TropicalWeight::new(1.0), s1))?;
    fst.add_tr(s1, Transition::new(7, 7, TropicalWeight::new(2.0), s2))?;
    fst.add_tr(s0, Transition::new(7, 7, TropicalWeight::new(9.0), s2))?;
    let before = paths_sorted(&fst);
    rm_epsilon(&mut fst)?;
    // Same label strings, same weights (the epsilon path folds into the
    // direct transition set).
    let after = paths_sorted(&fst);
    assert_eq!(
        before.iter().map(|(i, o, _)| (i, o)).collect::<Vec<_>>(),
        after.iter().map(|(i, o, _)| (i, o)).collect::<Vec<_>>()
    );
    for s in fst.states_range() {
        for tr in fst.get_trs(s)?.trs() {
            assert!(!(tr.ilabel == EPS_LABEL && tr.olabel == EPS_LABEL));
        }
    }
    Ok(())
}

#[test]
fn test_determinize_preserves_functional_relation() -> Result<()> {
    let mut fst = TF::new();
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
    let mut det: TF = determinize(&fst)?;
    let paths = paths_sorted(&det);
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].2, TropicalWeight::new(11.0));
    let props = det.compute_and_update_properties_all()?;
    assert!(props.contains(wfst::fst_properties::FstProperties::I_DETERMINISTIC));
    Ok(())
}

#[test]
fn test_shortest_distance_total_weight() -> Result<()> {
    let fst = branching_fst();
    let d = shortest_distance(&fst, false)?;
    let mut total = TropicalWeight::zero();
    for (s, final_weight) in fst.final_states_iter() {
        total.plus_assign(d[s].times(&final_weight));
    }
    // Best path: 2 -> final 0.5, total 2.5.
    assert_eq!(total, TropicalWeight::new(2.5));
    // And it agrees with the reverse distance from the start state.
    let r = shortest_distance(&fst, true)?;
    assert_eq!(r[0], total);
    Ok(())
}

#[test]
fn test_compose_equals_intersect_on_acceptors() -> Result<()> {
    let mut a: TF = acceptor(&[1], TropicalWeight::new(1.0));
    let b: TF = acceptor(&[1, 2], TropicalWeight::new(2.0));
    union(&mut a, &b)?;
    let c: TF = acceptor(&[1, 2], TropicalWeight::new(0.25));
    let composed: TF = compose(a.clone(), c.clone())?;
    let intersected: TF = intersect(&a, &c)?;
    assert_eq!(paths_sorted(&composed), paths_sorted(&intersected));
    Ok(())
}

#[test]
fn test_cache_determinism_under_eviction() -> Result<()> {
    // A delayed composition over a byte budget small enough to evict
    // states must still expand identical transition sequences.
    let a: TF = transducer(&[1, 2, 3], &[4, 5, 6], TropicalWeight::new(1.0));
    let b: TF = transducer(&[4, 5, 6], &[7, 8, 9], TropicalWeight::new(2.0));
    let opts = ComposeFstOpOptions::default();
    let op: ComposeFstOp<
        TropicalWeight,
        SequenceComposeFilter<TropicalWeight, GenericMatcher<_, TF>, GenericMatcher<_, TF>>,
    > = ComposeFstOp::new(std::sync::Arc::new(a), std::sync::Arc::new(b), opts)?;
    let cache = GcLruCache::new(CacheOptions {
        gc: true,
        gc_limit: 64,
    });
    let lazy = LazyFst::from_op_and_cache(op, cache, None, None);

    let first: Vec<Vec<Transition<TropicalWeight>>> = (0..4)
        .map(|s| lazy.get_trs(s).map(|trs| trs.trs().to_vec()))
        .collect::<Result<_>>()?;
    // Walk again: earlier states were evicted by the later expansions.
    let second: Vec<Vec<Transition<TropicalWeight>>> = (0..4)
        .map(|s| lazy.get_trs(s).map(|trs| trs.trs().to_vec()))
        .collect::<Result<_>>()?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_property_propagation_is_sound() -> Result<()> {
    // For each combinator output, every asserted ternary bit must be
    // confirmed by a full recomputation.
    let mut a: TF = acceptor(&[1], TropicalWeight::new(1.0));
    let b: TF = acceptor(&[2], TropicalWeight::new(2.0));
    union(&mut a, &b)?;
    let asserted = a.properties() & wfst::fst_properties::FstProperties::trinary_properties();
    let computed = compute_fst_properties(&a)?;
    assert!(
        computed.contains(asserted),
        "asserted {:?} not confirmed by {:?}",
        asserted,
        computed
    );

    let composed: TF = compose(a.clone(), b.clone())?;
    let asserted =
        composed.properties() & wfst::fst_properties::FstProperties::trinary_properties();
    let computed = compute_fst_properties(&composed)?;
    assert!(computed.contains(asserted));
    Ok(())
}

#[test]
fn test_delayed_compose_matches_eager() -> Result<()> {
    let a: TF = transducer(&[1, 2], &[3, 4], TropicalWeight::new(0.5));
    let b: TF = transducer(&[3, 4], &[5, 6], TropicalWeight::new(0.25));
    let eager: TF = compose(a.clone(), b.clone())?;
    let delayed = ComposeFst::new_auto(std::sync::Arc::new(a), std::sync::Arc::new(b))?;
    let computed: TF = delayed.compute()?;
    assert_eq!(paths_sorted(&eager), paths_sorted(&computed));
    Ok(())
}
