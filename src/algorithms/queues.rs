use std::collections::{BTreeSet, BinaryHeap, VecDeque};
use std::fmt::Debug;

use anyhow::Result;

use crate::algorithms::dfs_visit::top_order;
use crate::fst_properties::FstProperties;
use crate::fst_traits::ExpandedFst;
use crate::semirings::{Semiring, SemiringProperties};
use crate::StateId;

/// Discipline of a shortest-distance queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueType {
    TrivialQueue,
    FifoQueue,
    LifoQueue,
    ShortestFirstQueue,
    TopOrderQueue,
    StateOrderQueue,
    AutoQueue,
}

/// State queue driving the generic relaxation loop. `enqueue` and `update`
/// receive the state's current distance estimate so that best-first
/// disciplines can order on it; the others ignore it.
pub trait Queue<W: Semiring>: Debug {
    fn enqueue(&mut self, state: StateId, weight: &W);

    /// Re-keys an already queued state after its estimate improved.
    fn update(&mut self, state: StateId, weight: &W) {
        self.enqueue(state, weight);
    }

    fn dequeue(&mut self) -> Option<StateId>;

    fn is_empty(&self) -> bool;

    fn clear(&mut self);

    fn queue_type(&self) -> QueueType;
}

/// First-in, first-out discipline; the default for general semirings.
#[derive(Debug, Default)]
pub struct FifoQueue {
    queue: VecDeque<StateId>,
}

impl FifoQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<W: Semiring> Queue<W> for FifoQueue {
    fn enqueue(&mut self, state: StateId, _weight: &W) {
        self.queue.push_back(state);
    }

    fn dequeue(&mut self) -> Option<StateId> {
        self.queue.pop_front()
    }

    fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    fn clear(&mut self) {
        self.queue.clear();
    }

    fn queue_type(&self) -> QueueType {
        QueueType::FifoQueue
    }
}

/// Last-in, first-out discipline.
#[derive(Debug, Default)]
pub struct LifoQueue {
    queue: Vec<StateId>,
}

impl LifoQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<W: Semiring> Queue<W> for LifoQueue {
    fn enqueue(&mut self, state: StateId, _weight: &W) {
        self.queue.push(state);
    }

    fn dequeue(&mut self) -> Option<StateId> {
        self.queue.pop()
    }

    fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    fn clear(&mut self) {
        self.queue.clear();
    }

    fn queue_type(&self) -> QueueType {
        QueueType::LifoQueue
    }
}

/// Dequeues the lowest state id first.
#[derive(Debug, Default)]
pub struct StateOrderQueue {
    states: BTreeSet<StateId>,
}

impl StateOrderQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<W: Semiring> Queue<W> for StateOrderQueue {
    fn enqueue(&mut self, state: StateId, _weight: &W) {
        self.states.insert(state);
    }

    fn dequeue(&mut self) -> Option<StateId> {
        let first = *self.states.iter().next()?;
        self.states.remove(&first);
        Some(first)
    }

    fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    fn clear(&mut self) {
        self.states.clear();
    }

    fn queue_type(&self) -> QueueType {
        QueueType::StateOrderQueue
    }
}

/// Dequeues in a fixed topological order; on an acyclic FST the
/// relaxation then visits every state once.
#[derive(Debug)]
pub struct TopOrderQueue {
    order: Vec<usize>,
    states: BTreeSet<(usize, StateId)>,
}

impl TopOrderQueue {
    /// `order[state]` is the state's topological position.
    pub fn new(order: Vec<usize>) -> Self {
        Self {
            order,
            states: BTreeSet::new(),
        }
    }

    /// Derives the order from an acyclic FST; fails on cyclic input.
    pub fn from_fst<W: Semiring, F: ExpandedFst<W>>(fst: &F) -> Result<Self> {
        let order = top_order(fst)?
            .ok_or_else(|| anyhow::format_err!("TopOrderQueue: input is cyclic"))?;
        Ok(Self::new(order))
    }
}

impl<W: Semiring> Queue<W> for TopOrderQueue {
    fn enqueue(&mut self, state: StateId, _weight: &W) {
        self.states.insert((self.order[state], state));
    }

    fn dequeue(&mut self) -> Option<StateId> {
        let first = *self.states.iter().next()?;
        self.states.remove(&first);
        Some(first.1)
    }

    fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    fn clear(&mut self) {
        self.states.clear();
    }

    fn queue_type(&self) -> QueueType {
        QueueType::TopOrderQueue
    }
}

#[derive(Debug)]
struct HeapItem<W> {
    weight: W,
    state: StateId,
}

impl<W: Semiring> PartialEq for HeapItem<W> {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state && self.weight == other.weight
    }
}

impl<W: Semiring> Eq for HeapItem<W> {}

impl<W: Semiring> PartialOrd for HeapItem<W> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<W: Semiring> Ord for HeapItem<W> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Natural order: a weight is "better" when Plus selects it. The
        // heap is a max-heap, so better means Greater here.
        let self_better = self.weight.plus(&other.weight) == self.weight;
        let other_better = other.weight.plus(&self.weight) == other.weight;
        match (self_better, other_better) {
            (true, false) => std::cmp::Ordering::Greater,
            (false, true) => std::cmp::Ordering::Less,
            _ => self.state.cmp(&other.state).reverse(),
        }
    }
}

/// Best-first discipline by the natural order of a path semiring; the
/// weight snapshot taken at enqueue time keys the heap, and stale entries
/// are skipped through the relaxation loop's membership flags.
#[derive(Debug)]
pub struct NaturalShortestFirstQueue<W: Semiring> {
    heap: BinaryHeap<HeapItem<W>>,
}

impl<W: Semiring> NaturalShortestFirstQueue<W> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
        }
    }
}

impl<W: Semiring> Default for NaturalShortestFirstQueue<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Semiring> Queue<W> for NaturalShortestFirstQueue<W> {
    fn enqueue(&mut self, state: StateId, weight: &W) {
        self.heap.push(HeapItem {
            weight: weight.clone(),
            state,
        });
    }

    fn dequeue(&mut self) -> Option<StateId> {
        self.heap.pop().map(|item| item.state)
    }

    fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn clear(&mut self) {
        self.heap.clear();
    }

    fn queue_type(&self) -> QueueType {
        QueueType::ShortestFirstQueue
    }
}

/// Discipline chosen from the FST's properties and the semiring: top-order
/// on acyclic inputs (one pass), best-first on path semirings, FIFO
/// otherwise.
#[derive(Debug)]
pub enum AutoQueue<W: Semiring> {
    TopOrder(TopOrderQueue),
    ShortestFirst(NaturalShortestFirstQueue<W>),
    Fifo(FifoQueue),
}

impl<W: Semiring> AutoQueue<W> {
    pub fn new<F: ExpandedFst<W>>(fst: &F) -> Result<Self> {
        let props = fst.properties_check(FstProperties::CYCLIC | FstProperties::ACYCLIC)?;
        if props.contains(FstProperties::ACYCLIC) {
            Ok(AutoQueue::TopOrder(TopOrderQueue::from_fst(fst)?))
        } else if W::properties().contains(SemiringProperties::PATH)
            && W::properties().contains(SemiringProperties::IDEMPOTENT)
        {
            Ok(AutoQueue::ShortestFirst(NaturalShortestFirstQueue::new()))
        } else {
            Ok(AutoQueue::Fifo(FifoQueue::new()))
        }
    }
}

impl<W: Semiring> Queue<W> for AutoQueue<W> {
    fn enqueue(&mut self, state: StateId, weight: &W) {
        match self {
            AutoQueue::TopOrder(q) => Queue::<W>::enqueue(q, state, weight),
            AutoQueue::ShortestFirst(q) => q.enqueue(state, weight),
            AutoQueue::Fifo(q) => Queue::<W>::enqueue(q, state, weight),
        }
    }

    fn dequeue(&mut self) -> Option<StateId> {
        match self {
            AutoQueue::TopOrder(q) => Queue::<W>::dequeue(q),
            AutoQueue::ShortestFirst(q) => q.dequeue(),
            AutoQueue::Fifo(q) => Queue::<W>::dequeue(q),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            AutoQueue::TopOrder(q) => Queue::<W>::is_empty(q),
            AutoQueue::ShortestFirst(q) => q.is_empty(),
            AutoQueue::Fifo(q) => Queue::<W>::is_empty(q),
        }
    }

    fn clear(&mut self) {
        match self {
            AutoQueue::TopOrder(q) => Queue::<W>::clear(q),
            AutoQueue::ShortestFirst(q) => q.clear(),
            AutoQueue::Fifo(q) => Queue::<W>::clear(q),
        }
    }

    fn queue_type(&self) -> QueueType {
        QueueType::AutoQueue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semirings::TropicalWeight;

    #[test]
    fn test_fifo_order() {
        let mut q = FifoQueue::new();
        let w = TropicalWeight::one();
        Queue::enqueue(&mut q, 1, &w);
        Queue::enqueue(&mut q, 2, &w);
        assert_eq!(Queue::<TropicalWeight>::dequeue(&mut q), Some(1));
        assert_eq!(Queue::<TropicalWeight>::dequeue(&mut q), Some(2));
    }

    #[test]
    fn test_lifo_and_state_order() {
        let w = TropicalWeight::one();
        let mut q = LifoQueue::new();
        Queue::enqueue(&mut q, 1, &w);
        Queue::enqueue(&mut q, 2, &w);
        assert_eq!(Queue::<TropicalWeight>::dequeue(&mut q), Some(2));

        let mut q = StateOrderQueue::new();
        Queue::enqueue(&mut q, 5, &w);
        Queue::enqueue(&mut q, 3, &w);
        Queue::enqueue(&mut q, 4, &w);
        assert_eq!(Queue::<TropicalWeight>::dequeue(&mut q), Some(3));
        assert_eq!(Queue::<TropicalWeight>::dequeue(&mut q), Some(4));
        assert_eq!(Queue::<TropicalWeight>::dequeue(&mut q), Some(5));
    }

    #[test]
    fn test_shortest_first_order() {
        let mut q = NaturalShortestFirstQueue::<TropicalWeight>::new();
        q.enqueue(1, &TropicalWeight::new(5.0));
        q.enqueue(2, &TropicalWeight::new(1.0));
        q.enqueue(3, &TropicalWeight::new(3.0));
        assert_eq!(q.dequeue(), Some(2));
        assert_eq!(q.dequeue(), Some(3));
        assert_eq!(q.dequeue(), Some(1));
    }
}
