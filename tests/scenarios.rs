//! End-to-end scenarios over the tropical semiring: composition with and
//! without epsilons, determinization, epsilon removal, shortest path and
//! the rational operations.

use anyhow::Result;

use wfst::algorithms::compose::{compose, compose_with_config, ComposeConfig, ComposeFilterEnum};
use wfst::algorithms::{
    closure, determinize, rm_epsilon, shortest_distance, shortest_path, union, ClosureType,
};
use wfst::fst_impls::VectorFst;
use wfst::fst_traits::{CoreFst, ExpandedFst, Fst, MutableFst};
use wfst::semirings::{Semiring, TropicalWeight};
use wfst::utils::acceptor;
use wfst::{Transition, Transitions, EPS_LABEL};

type TF = VectorFst<TropicalWeight>;

fn total_weight(fst: &TF) -> Result<TropicalWeight> {
    let d = shortest_distance(fst, false)?;
    let mut total = TropicalWeight::zero();
    for (s, w) in fst.final_states_iter() {
        total.plus_assign(d[s].times(&w));
    }
    Ok(total)
}

/// Composition of two linear acceptors: 3 states, one path, weight 10.
#[test]
fn test_scenario_compose_acceptors() -> Result<()> {
    let mut a = TF::new();
    let s: Vec<_> = (0..3).map(|_| a.add_state()).collect();
    a.set_start(s[0])?;
    a.set_final(s[2], TropicalWeight::new(0.0))?;
    a.add_tr(s[0], Transition::new(1, 1, TropicalWeight::new(1.0), s[1]))?;
    a.add_tr(s[1], Transition::new(2, 2, TropicalWeight::new(2.0), s[2]))?;
    let mut b = TF::new();
    let t: Vec<_> = (0..3).map(|_| b.add_state()).collect();
    b.set_start(t[0])?;
    b.set_final(t[2], TropicalWeight::new(0.0))?;
    b.add_tr(t[0], Transition::new(1, 1, TropicalWeight::new(3.0), t[1]))?;
    b.add_tr(t[1], Transition::new(2, 2, TropicalWeight::new(4.0), t[2]))?;

    let composed: TF = compose(a, b)?;
    assert_eq!(composed.num_states(), 3);
    assert_eq!(total_weight(&composed)?, TropicalWeight::new(10.0));
    Ok(())
}

/// Epsilon composition: with the sequence filter exactly one accepting
/// path survives, input `x`, output `y`, weight 6; the match filter
/// agrees here.
#[test]
fn test_scenario_epsilon_composition() -> Result<()> {
    let (x, y) = (1, 2);
    let mut a = TF::new();
    let s: Vec<_> = (0..3).map(|_| a.add_state()).collect();
    a.set_start(s[0])?;
    a.set_final(s[2], TropicalWeight::new(0.0))?;
    a.add_tr(s[0], Transition::new(x, EPS_LABEL, TropicalWeight::new(1.0), s[1]))?;
    a.add_tr(s[1], Transition::new(EPS_LABEL, y, TropicalWeight::new(2.0), s[2]))?;
    let mut b = TF::new();
    let t: Vec<_> = (0..2).map(|_| b.add_state()).collect();
    b.set_start(t[0])?;
    b.set_final(t[1], TropicalWeight::new(0.0))?;
    b.add_tr(t[0], Transition::new(y, y, TropicalWeight::new(3.0), t[1]))?;

    for filter in [
        ComposeFilterEnum::SequenceFilter,
        ComposeFilterEnum::AltSequenceFilter,
        ComposeFilterEnum::MatchFilter,
    ] {
        let composed: TF = compose_with_config(
            a.clone(),
            b.clone(),
            ComposeConfig {
                compose_filter: filter,
                connect: true,
            },
        )?;
        let paths: Vec<_> = composed.paths_iter().collect();
        assert_eq!(paths.len(), 1, "filter {:?}", filter);
        assert_eq!(paths[0].ilabels, vec![x]);
        assert_eq!(paths[0].olabels, vec![y]);
        assert_eq!(paths[0].weight, TropicalWeight::new(6.0));
    }
    Ok(())
}

/// Determinization of a nondeterministic FSA: one transition per label,
/// the single string "ab" keeps weight 11.
#[test]
fn test_scenario_determinize() -> Result<()> {
    let (la, lb) = (1, 2);
    let mut fst = TF::new();
    let s: Vec<_> = (0..4).map(|_| fst.add_state()).collect();
    fst.set_start(s[0])?;
    fst.set_final(s[3], TropicalWeight::new(0.0))?;
    fst.add_tr(s[0], Transition::new(la, la, TropicalWeight::new(1.0), s[1]))?;
    fst.add_tr(s[0], Transition::new(la, la, TropicalWeight::new(2.0), s[2]))?;
    fst.add_tr(s[1], Transition::new(lb, lb, TropicalWeight::new(10.0), s[3]))?;
    fst.add_tr(s[2], Transition::new(lb, lb, TropicalWeight::new(20.0), s[3]))?;

    let det: TF = determinize(&fst)?;
    let start = det.start().unwrap();
    let trs = det.get_trs(start)?;
    assert_eq!(trs.len(), 1);
    assert_eq!(trs.trs()[0].weight, TropicalWeight::new(1.0));
    let mid = trs.trs()[0].nextstate;
    let trs = det.get_trs(mid)?;
    assert_eq!(trs.len(), 1);
    assert_eq!(trs.trs()[0].weight, TropicalWeight::new(10.0));
    assert!(det.final_weight(trs.trs()[0].nextstate)?.is_some());
    assert_eq!(total_weight(&det)?, TropicalWeight::new(11.0));
    Ok(())
}

/// Epsilon removal: `0 -ε:ε/1-> 1 -a:a/2-> 2` becomes a direct transition
/// of weight 3 and no double-epsilon transition remains.
#[test]
fn test_scenario_rm_epsilon() -> Result<()> {
    let mut fst = TF::new();
    let s: Vec<_> = (0..3).map(|_| fst.add_state()).collect();
    fst.set_start(s[0])?;
    fst.set_final(s[2], TropicalWeight::new(0.0))?;
    fst.add_tr(
        s[0],
        Transition::new(EPS_LABEL, EPS_LABEL, TropicalWeight::new(1.0), s[1]),
    )?;
    fst.add_tr(s[1], Transition::new(1, 1, TropicalWeight::new(2.0), s[2]))?;
    rm_epsilon(&mut fst)?;
    for state in fst.states_range() {
        for tr in fst.get_trs(state)?.trs() {
            assert!(!(tr.ilabel == EPS_LABEL && tr.olabel == EPS_LABEL));
        }
    }
    let paths: Vec<_> = fst.paths_iter().collect();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].weight, TropicalWeight::new(3.0));
    Ok(())
}

/// Single shortest path over parallel transitions keeps the cheaper one.
#[test]
fn test_scenario_shortest_path() -> Result<()> {
    let mut fst = TF::new();
    let s0 = fst.add_state();
    let s1 = fst.add_state();
    fst.set_start(s0)?;
    fst.set_final(s1, TropicalWeight::new(0.0))?;
    fst.add_tr(s0, Transition::new(1, 1, TropicalWeight::new(1.0), s1))?;
    fst.add_tr(s0, Transition::new(1, 1, TropicalWeight::new(5.0), s1))?;
    let best: TF = shortest_path(&fst)?;
    let paths: Vec<_> = best.paths_iter().collect();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].ilabels, vec![1]);
    assert_eq!(paths[0].weight, TropicalWeight::new(1.0));
    assert_eq!(total_weight(&best)?, TropicalWeight::new(1.0));
    Ok(())
}

/// Union plus star closure accepts every string over the alphabet with
/// the length-weighted minimum: "" at 0, "a" at 1, "ab" at 3.
#[test]
fn test_scenario_union_closure() -> Result<()> {
    let (la, lb) = (1, 2);
    let mut machine: TF = acceptor(&[la], TropicalWeight::new(1.0));
    let b: TF = acceptor(&[lb], TropicalWeight::new(2.0));
    union(&mut machine, &b)?;
    closure(&mut machine, ClosureType::ClosureStar);

    let weight_of = |labels: &[usize]| -> Result<TropicalWeight> {
        let probe: TF = acceptor(labels, TropicalWeight::new(0.0));
        let composed: TF = compose(machine.clone(), probe)?;
        total_weight(&composed)
    };
    assert_eq!(weight_of(&[])?, TropicalWeight::new(0.0));
    assert_eq!(weight_of(&[la])?, TropicalWeight::new(1.0));
    assert_eq!(weight_of(&[la, lb])?, TropicalWeight::new(3.0));
    assert_eq!(weight_of(&[lb, lb, la])?, TropicalWeight::new(5.0));
    Ok(())
}
