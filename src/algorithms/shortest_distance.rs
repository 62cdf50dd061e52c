use anyhow::Result;

use crate::algorithms::queues::{AutoQueue, Queue};
use crate::algorithms::reverse::reverse;
use crate::fst_impls::VectorFst;
use crate::fst_traits::ExpandedFst;
use crate::semirings::{Semiring, SemiringProperties};
use crate::trs::Transitions;
use crate::{StateId, KSHORTESTDELTA};

/// Convergence and source options of the shortest-distance relaxation.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestDistanceConfig {
    /// Distances closer than this are treated as converged.
    pub delta: f32,
    /// Source state; defaults to the start state.
    pub source: Option<StateId>,
    /// Abort after relaxing this many states (a step budget against
    /// non-convergent inputs); `None` means unbounded.
    pub state_budget: Option<usize>,
}

impl Default for ShortestDistanceConfig {
    fn default() -> Self {
        Self {
            delta: KSHORTESTDELTA,
            source: None,
            state_budget: None,
        }
    }
}

/// Single-source shortest distances `d[s] = ⊕ over paths π: source → s of
/// w(π)`, by queue-driven relaxation; the queue discipline is chosen from
/// the FST's properties.
///
/// With `reversed = true` the distances are from each state to the final
/// states instead (computed on the reverse FST over the reverse semiring
/// and mapped back).
///
/// Termination requires the semiring to converge under `delta` on the
/// cycles of the input (trivially true on acyclic inputs and idempotent
/// semirings).
pub fn shortest_distance<W, F>(fst: &F, reversed: bool) -> Result<Vec<W>>
where
    W: Semiring,
    W::ReverseWeight: Semiring<ReverseWeight = W>,
    F: ExpandedFst<W>,
{
    shortest_distance_with_config(fst, reversed, ShortestDistanceConfig::default())
}

pub fn shortest_distance_with_config<W, F>(
    fst: &F,
    reversed: bool,
    config: ShortestDistanceConfig,
) -> Result<Vec<W>>
where
    W: Semiring,
    W::ReverseWeight: Semiring<ReverseWeight = W>,
    F: ExpandedFst<W>,
{
    if !reversed {
        let mut queue = AutoQueue::new(fst)?;
        return single_source_shortest_distance(fst, &mut queue, &config);
    }
    // Reverse pass: relax the reversed FST in the reverse semiring, then
    // map the distances back. The superinitial state of the reversal is
    // state 0 and input state s maps to s + 1.
    let rfst: VectorFst<W::ReverseWeight> = reverse(fst)?;
    let rconfig = ShortestDistanceConfig {
        delta: config.delta,
        source: None,
        state_budget: config.state_budget,
    };
    let mut queue = AutoQueue::new(&rfst)?;
    let rdistances = single_source_shortest_distance(&rfst, &mut queue, &rconfig)?;
    let mut distances = Vec::with_capacity(fst.num_states());
    for state in 0..fst.num_states() {
        let rw = rdistances
            .get(state + 1)
            .cloned()
            .unwrap_or_else(W::ReverseWeight::zero);
        distances.push(rw.reverse());
    }
    Ok(distances)
}

/// The generic relaxation loop over a caller-chosen queue.
pub fn single_source_shortest_distance<W, F, Q>(
    fst: &F,
    queue: &mut Q,
    config: &ShortestDistanceConfig,
) -> Result<Vec<W>>
where
    W: Semiring,
    F: ExpandedFst<W>,
    Q: Queue<W>,
{
    let num_states = fst.num_states();
    let mut distance = vec![W::zero(); num_states];
    let mut adder = vec![W::zero(); num_states];
    let mut in_queue = vec![false; num_states];
    let source = match config.source.or_else(|| fst.start()) {
        Some(s) => s,
        None => return Ok(distance),
    };
    if source >= num_states {
        anyhow::bail!("shortest_distance: source state {} out of range", source);
    }

    let one_pass = W::properties().contains(SemiringProperties::IDEMPOTENT)
        && W::properties().contains(SemiringProperties::PATH);
    let mut budget = config.state_budget;

    distance[source] = W::one();
    adder[source] = W::one();
    in_queue[source] = true;
    queue.enqueue(source, &distance[source]);

    while let Some(state) = queue.dequeue() {
        if !in_queue[state] {
            // Stale queue entry from a later re-enqueue.
            continue;
        }
        in_queue[state] = false;
        if let Some(b) = budget.as_mut() {
            if *b == 0 {
                anyhow::bail!("shortest_distance: state budget exhausted before convergence");
            }
            *b -= 1;
        }
        let r = std::mem::replace(&mut adder[state], W::zero());
        for tr in fst.get_trs(state)?.trs() {
            let next = tr.nextstate;
            let delta_weight = r.times(&tr.weight);
            let relaxed = distance[next].plus(&delta_weight);
            if !distance[next].approx_equal(&relaxed, config.delta) {
                adder[next] = if one_pass {
                    relaxed.clone()
                } else {
                    adder[next].plus(&delta_weight)
                };
                distance[next] = relaxed;
                if in_queue[next] {
                    queue.update(next, &distance[next]);
                } else {
                    in_queue[next] = true;
                    queue.enqueue(next, &distance[next]);
                }
            }
        }
    }
    Ok(distance)
}
