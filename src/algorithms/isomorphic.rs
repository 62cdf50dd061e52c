use std::collections::VecDeque;

use anyhow::Result;

use crate::fst_traits::ExpandedFst;
use crate::semirings::Semiring;
use crate::trs::Transitions;
use crate::{StateId, KDELTA};

/// Tests whether two FSTs are isomorphic: identical up to a renumbering of
/// states, with weights compared within `delta`.
///
/// The pairing is grown breadth-first from the start states; at each state
/// pair the transition multisets must match under a canonical
/// `(ilabel, olabel, weight)` ordering. Transition sets with weight ties on
/// otherwise equal labels are paired in order, which decides isomorphism
/// correctly whenever such ties are absent or consistently ordered.
pub fn isomorphic<W, F1, F2>(fst1: &F1, fst2: &F2) -> Result<bool>
where
    W: Semiring,
    F1: ExpandedFst<W>,
    F2: ExpandedFst<W>,
{
    isomorphic_with_delta(fst1, fst2, KDELTA)
}

pub fn isomorphic_with_delta<W, F1, F2>(fst1: &F1, fst2: &F2, delta: f32) -> Result<bool>
where
    W: Semiring,
    F1: ExpandedFst<W>,
    F2: ExpandedFst<W>,
{
    if fst1.num_states() != fst2.num_states() {
        return Ok(false);
    }
    let (start1, start2) = match (fst1.start(), fst2.start()) {
        (None, None) => return Ok(true),
        (Some(s1), Some(s2)) => (s1, s2),
        _ => return Ok(false),
    };
    // state of fst1 -> paired state of fst2.
    let mut pairing: Vec<Option<StateId>> = vec![None; fst1.num_states()];
    let mut paired_back: Vec<Option<StateId>> = vec![None; fst2.num_states()];
    let mut queue = VecDeque::new();
    pairing[start1] = Some(start2);
    paired_back[start2] = Some(start1);
    queue.push_back((start1, start2));
    while let Some((s1, s2)) = queue.pop_front() {
        let w1 = fst1.final_weight(s1)?;
        let w2 = fst2.final_weight(s2)?;
        let finals_match = match (&w1, &w2) {
            (None, None) => true,
            (Some(a), Some(b)) => a.approx_equal(b, delta),
            _ => false,
        };
        if !finals_match {
            return Ok(false);
        }
        let trs1 = fst1.get_trs(s1)?;
        let trs2 = fst2.get_trs(s2)?;
        if trs1.len() != trs2.len() {
            return Ok(false);
        }
        let key = |tr: &crate::Transition<W>| (tr.ilabel, tr.olabel, tr.weight.clone());
        let mut sorted1: Vec<_> = trs1.trs().to_vec();
        let mut sorted2: Vec<_> = trs2.trs().to_vec();
        sorted1.sort_by(|a, b| {
            key(a)
                .partial_cmp(&key(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        sorted2.sort_by(|a, b| {
            key(a)
                .partial_cmp(&key(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for (tr1, tr2) in sorted1.iter().zip(sorted2.iter()) {
            if tr1.ilabel != tr2.ilabel
                || tr1.olabel != tr2.olabel
                || !tr1.weight.approx_equal(&tr2.weight, delta)
            {
                return Ok(false);
            }
            match (pairing[tr1.nextstate], paired_back[tr2.nextstate]) {
                (None, None) => {
                    pairing[tr1.nextstate] = Some(tr2.nextstate);
                    paired_back[tr2.nextstate] = Some(tr1.nextstate);
                    queue.push_back((tr1.nextstate, tr2.nextstate));
                }
                (Some(mapped), Some(back))
                    if mapped == tr2.nextstate && back == tr1.nextstate => {}
                _ => return Ok(false),
            }
        }
    }
    Ok(true)
}
