use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::sync::Mutex;

use crate::config::core_config;
use crate::semirings::Semiring;
use crate::trs::{Transitions, TrsVec};
use crate::{StateId, EPS_LABEL};

/// Outcome of a cache lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus<T> {
    Computed(T),
    NotComputed,
}

impl<T> CacheStatus<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            CacheStatus::Computed(v) => Some(v),
            CacheStatus::NotComputed => None,
        }
    }
}

/// Garbage-collection policy of a delayed FST cache.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheOptions {
    /// Evict least-recently-used states once over budget.
    pub gc: bool,
    /// Byte budget that triggers eviction.
    pub gc_limit: u64,
}

impl Default for CacheOptions {
    fn default() -> Self {
        let config = core_config();
        Self {
            gc: config.cache_gc,
            gc_limit: config.cache_gc_limit,
        }
    }
}

/// Store of already-expanded states of a delayed FST.
///
/// Start, final weight and transitions of a state are cached
/// independently. A state's transitions, once handed out, live behind a
/// shared [`TrsVec`]; an outstanding handle therefore stays valid even if
/// the entry is evicted afterwards, which is what makes eviction safe
/// under open iterators.
pub trait FstCache<W: Semiring>: Debug {
    fn get_start(&self) -> CacheStatus<Option<StateId>>;
    fn insert_start(&self, id: Option<StateId>);

    fn get_trs(&self, id: StateId) -> CacheStatus<TrsVec<W>>;
    fn insert_trs(&self, id: StateId, trs: TrsVec<W>);

    fn get_final_weight(&self, id: StateId) -> CacheStatus<Option<W>>;
    fn insert_final_weight(&self, id: StateId, weight: Option<W>);

    /// One past the largest state id this cache has seen, including
    /// destination states of cached transitions.
    fn num_known_states(&self) -> usize;

    fn num_trs(&self, id: StateId) -> Option<usize>;
    fn num_input_epsilons(&self, id: StateId) -> Option<usize>;
    fn num_output_epsilons(&self, id: StateId) -> Option<usize>;
}

#[derive(Debug)]
struct CachedTrs<W: Semiring> {
    trs: TrsVec<W>,
    niepsilons: usize,
    noepsilons: usize,
}

/// Cache growing monotonically, one hash map per concern.
#[derive(Debug)]
pub struct SimpleHashMapCache<W: Semiring> {
    start: Mutex<CacheStatus<Option<StateId>>>,
    trs: Mutex<(usize, HashMap<StateId, CachedTrs<W>>)>,
    final_weights: Mutex<(usize, HashMap<StateId, Option<W>>)>,
}

impl<W: Semiring> SimpleHashMapCache<W> {
    pub fn new() -> Self {
        Self {
            start: Mutex::new(CacheStatus::NotComputed),
            trs: Mutex::new((0, HashMap::new())),
            final_weights: Mutex::new((0, HashMap::new())),
        }
    }
}

impl<W: Semiring> Default for SimpleHashMapCache<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Semiring> FstCache<W> for SimpleHashMapCache<W> {
    fn get_start(&self) -> CacheStatus<Option<StateId>> {
        *self.start.lock().unwrap()
    }

    fn insert_start(&self, id: Option<StateId>) {
        if let Some(s) = id {
            let mut data = self.trs.lock().unwrap();
            data.0 = data.0.max(s + 1);
        }
        *self.start.lock().unwrap() = CacheStatus::Computed(id);
    }

    fn get_trs(&self, id: StateId) -> CacheStatus<TrsVec<W>> {
        match self.trs.lock().unwrap().1.get(&id) {
            Some(cached) => CacheStatus::Computed(cached.trs.clone()),
            None => CacheStatus::NotComputed,
        }
    }

    fn insert_trs(&self, id: StateId, trs: TrsVec<W>) {
        let mut data = self.trs.lock().unwrap();
        let mut niepsilons = 0;
        let mut noepsilons = 0;
        data.0 = data.0.max(id + 1);
        for tr in trs.trs() {
            data.0 = data.0.max(tr.nextstate + 1);
            if tr.ilabel == EPS_LABEL {
                niepsilons += 1;
            }
            if tr.olabel == EPS_LABEL {
                noepsilons += 1;
            }
        }
        data.1.insert(
            id,
            CachedTrs {
                trs,
                niepsilons,
                noepsilons,
            },
        );
    }

    fn get_final_weight(&self, id: StateId) -> CacheStatus<Option<W>> {
        match self.final_weights.lock().unwrap().1.get(&id) {
            Some(w) => CacheStatus::Computed(w.clone()),
            None => CacheStatus::NotComputed,
        }
    }

    fn insert_final_weight(&self, id: StateId, weight: Option<W>) {
        let mut data = self.final_weights.lock().unwrap();
        data.0 = data.0.max(id + 1);
        data.1.insert(id, weight);
    }

    fn num_known_states(&self) -> usize {
        let a = self.trs.lock().unwrap().0;
        let b = self.final_weights.lock().unwrap().0;
        a.max(b)
    }

    fn num_trs(&self, id: StateId) -> Option<usize> {
        self.trs.lock().unwrap().1.get(&id).map(|c| c.trs.len())
    }

    fn num_input_epsilons(&self, id: StateId) -> Option<usize> {
        self.trs.lock().unwrap().1.get(&id).map(|c| c.niepsilons)
    }

    fn num_output_epsilons(&self, id: StateId) -> Option<usize> {
        self.trs.lock().unwrap().1.get(&id).map(|c| c.noepsilons)
    }
}

/// Cache for operators whose state ids are dense and discovered roughly in
/// order; stores entries in vectors.
#[derive(Debug)]
pub struct SimpleVecCache<W: Semiring> {
    start: Mutex<CacheStatus<Option<StateId>>>,
    trs: Mutex<(usize, Vec<Option<CachedTrs<W>>>)>,
    final_weights: Mutex<(usize, Vec<Option<Option<W>>>)>,
}

impl<W: Semiring> SimpleVecCache<W> {
    pub fn new() -> Self {
        Self {
            start: Mutex::new(CacheStatus::NotComputed),
            trs: Mutex::new((0, vec![])),
            final_weights: Mutex::new((0, vec![])),
        }
    }
}

impl<W: Semiring> Default for SimpleVecCache<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Semiring> FstCache<W> for SimpleVecCache<W> {
    fn get_start(&self) -> CacheStatus<Option<StateId>> {
        *self.start.lock().unwrap()
    }

    fn insert_start(&self, id: Option<StateId>) {
        if let Some(s) = id {
            let mut data = self.trs.lock().unwrap();
            data.0 = data.0.max(s + 1);
        }
        *self.start.lock().unwrap() = CacheStatus::Computed(id);
    }

    fn get_trs(&self, id: StateId) -> CacheStatus<TrsVec<W>> {
        match self.trs.lock().unwrap().1.get(id) {
            Some(Some(cached)) => CacheStatus::Computed(cached.trs.clone()),
            _ => CacheStatus::NotComputed,
        }
    }

    fn insert_trs(&self, id: StateId, trs: TrsVec<W>) {
        let mut data = self.trs.lock().unwrap();
        let mut niepsilons = 0;
        let mut noepsilons = 0;
        data.0 = data.0.max(id + 1);
        for tr in trs.trs() {
            data.0 = data.0.max(tr.nextstate + 1);
            if tr.ilabel == EPS_LABEL {
                niepsilons += 1;
            }
            if tr.olabel == EPS_LABEL {
                noepsilons += 1;
            }
        }
        if data.1.len() <= id {
            data.1.resize_with(id + 1, || None);
        }
        data.1[id] = Some(CachedTrs {
            trs,
            niepsilons,
            noepsilons,
        });
    }

    fn get_final_weight(&self, id: StateId) -> CacheStatus<Option<W>> {
        match self.final_weights.lock().unwrap().1.get(id) {
            Some(Some(w)) => CacheStatus::Computed(w.clone()),
            _ => CacheStatus::NotComputed,
        }
    }

    fn insert_final_weight(&self, id: StateId, weight: Option<W>) {
        let mut data = self.final_weights.lock().unwrap();
        data.0 = data.0.max(id + 1);
        if data.1.len() <= id {
            data.1.resize_with(id + 1, || None);
        }
        data.1[id] = Some(weight);
    }

    fn num_known_states(&self) -> usize {
        let a = self.trs.lock().unwrap().0;
        let b = self.final_weights.lock().unwrap().0;
        a.max(b)
    }

    fn num_trs(&self, id: StateId) -> Option<usize> {
        match self.trs.lock().unwrap().1.get(id) {
            Some(Some(cached)) => Some(cached.trs.len()),
            _ => None,
        }
    }

    fn num_input_epsilons(&self, id: StateId) -> Option<usize> {
        match self.trs.lock().unwrap().1.get(id) {
            Some(Some(cached)) => Some(cached.niepsilons),
            _ => None,
        }
    }

    fn num_output_epsilons(&self, id: StateId) -> Option<usize> {
        match self.trs.lock().unwrap().1.get(id) {
            Some(Some(cached)) => Some(cached.noepsilons),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct LruEntry<W: Semiring> {
    trs: Option<CachedTrs<W>>,
    final_weight: Option<Option<W>>,
    stamp: u64,
}

#[derive(Debug)]
struct LruInner<W: Semiring> {
    entries: HashMap<StateId, LruEntry<W>>,
    recency: BTreeMap<u64, StateId>,
    clock: u64,
    bytes: u64,
    known: usize,
}

/// Byte-budgeted cache with least-recently-used eviction.
///
/// Evicting a state drops both its transitions and its final weight;
/// the next access recomputes them. The start state is held outside the
/// budget and is never evicted.
#[derive(Debug)]
pub struct GcLruCache<W: Semiring> {
    start: Mutex<CacheStatus<Option<StateId>>>,
    inner: Mutex<LruInner<W>>,
    opts: CacheOptions,
}

impl<W: Semiring> GcLruCache<W> {
    pub fn new(opts: CacheOptions) -> Self {
        Self {
            start: Mutex::new(CacheStatus::NotComputed),
            inner: Mutex::new(LruInner {
                entries: HashMap::new(),
                recency: BTreeMap::new(),
                clock: 0,
                bytes: 0,
                known: 0,
            }),
            opts,
        }
    }

    fn entry_bytes(entry: &LruEntry<W>) -> u64 {
        let per_tr = std::mem::size_of::<crate::Transition<W>>() as u64;
        let base = std::mem::size_of::<LruEntry<W>>() as u64;
        base + entry
            .trs
            .as_ref()
            .map(|c| c.trs.len() as u64 * per_tr)
            .unwrap_or(0)
    }
}

impl<W: Semiring> LruInner<W> {
    fn touch(&mut self, id: StateId) {
        let entry = match self.entries.get_mut(&id) {
            Some(e) => e,
            None => return,
        };
        self.recency.remove(&entry.stamp);
        self.clock += 1;
        entry.stamp = self.clock;
        self.recency.insert(self.clock, id);
    }

    fn evict_over_budget(&mut self, limit: u64, protect: StateId) {
        while self.bytes > limit {
            let victim = match self.recency.iter().find(|(_, &s)| s != protect) {
                Some((&stamp, &s)) => (stamp, s),
                None => return,
            };
            self.recency.remove(&victim.0);
            if let Some(entry) = self.entries.remove(&victim.1) {
                self.bytes = self.bytes.saturating_sub(GcLruCache::<W>::entry_bytes(&entry));
            }
        }
    }

    fn upsert<F: FnOnce(&mut LruEntry<W>)>(&mut self, id: StateId, update: F) {
        self.clock += 1;
        let clock = self.clock;
        let entry = self.entries.entry(id).or_default();
        self.recency.remove(&entry.stamp);
        self.bytes = self
            .bytes
            .saturating_sub(GcLruCache::<W>::entry_bytes(entry));
        update(entry);
        entry.stamp = clock;
        self.recency.insert(clock, id);
        self.bytes += GcLruCache::<W>::entry_bytes(entry);
    }
}

impl<W: Semiring> FstCache<W> for GcLruCache<W> {
    fn get_start(&self) -> CacheStatus<Option<StateId>> {
        *self.start.lock().unwrap()
    }

    fn insert_start(&self, id: Option<StateId>) {
        if let Some(s) = id {
            let mut inner = self.inner.lock().unwrap();
            inner.known = inner.known.max(s + 1);
        }
        *self.start.lock().unwrap() = CacheStatus::Computed(id);
    }

    fn get_trs(&self, id: StateId) -> CacheStatus<TrsVec<W>> {
        let mut inner = self.inner.lock().unwrap();
        if self.opts.gc {
            inner.touch(id);
        }
        match inner.entries.get(&id).and_then(|e| e.trs.as_ref()) {
            Some(cached) => CacheStatus::Computed(cached.trs.clone()),
            None => CacheStatus::NotComputed,
        }
    }

    fn insert_trs(&self, id: StateId, trs: TrsVec<W>) {
        let mut inner = self.inner.lock().unwrap();
        let mut niepsilons = 0;
        let mut noepsilons = 0;
        inner.known = inner.known.max(id + 1);
        for tr in trs.trs() {
            inner.known = inner.known.max(tr.nextstate + 1);
            if tr.ilabel == EPS_LABEL {
                niepsilons += 1;
            }
            if tr.olabel == EPS_LABEL {
                noepsilons += 1;
            }
        }
        inner.upsert(id, move |entry| {
            entry.trs = Some(CachedTrs {
                trs,
                niepsilons,
                noepsilons,
            });
        });
        if self.opts.gc {
            inner.evict_over_budget(self.opts.gc_limit, id);
        }
    }

    fn get_final_weight(&self, id: StateId) -> CacheStatus<Option<W>> {
        let mut inner = self.inner.lock().unwrap();
        if self.opts.gc {
            inner.touch(id);
        }
        match inner.entries.get(&id).and_then(|e| e.final_weight.as_ref()) {
            Some(w) => CacheStatus::Computed(w.clone()),
            None => CacheStatus::NotComputed,
        }
    }

    fn insert_final_weight(&self, id: StateId, weight: Option<W>) {
        let mut inner = self.inner.lock().unwrap();
        inner.known = inner.known.max(id + 1);
        inner.upsert(id, move |entry| {
            entry.final_weight = Some(weight);
        });
        if self.opts.gc {
            inner.evict_over_budget(self.opts.gc_limit, id);
        }
    }

    fn num_known_states(&self) -> usize {
        self.inner.lock().unwrap().known
    }

    fn num_trs(&self, id: StateId) -> Option<usize> {
        let inner = self.inner.lock().unwrap();
        inner
            .entries
            .get(&id)
            .and_then(|e| e.trs.as_ref())
            .map(|c| c.trs.len())
    }

    fn num_input_epsilons(&self, id: StateId) -> Option<usize> {
        let inner = self.inner.lock().unwrap();
        inner
            .entries
            .get(&id)
            .and_then(|e| e.trs.as_ref())
            .map(|c| c.niepsilons)
    }

    fn num_output_epsilons(&self, id: StateId) -> Option<usize> {
        let inner = self.inner.lock().unwrap();
        inner
            .entries
            .get(&id)
            .and_then(|e| e.trs.as_ref())
            .map(|c| c.noepsilons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semirings::TropicalWeight;
    use crate::Transition;

    fn trs_of(n: usize) -> TrsVec<TropicalWeight> {
        TrsVec::from(
            (0..n)
                .map(|i| Transition::new(i, i, TropicalWeight::one(), i + 1))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_simple_cache_roundtrip() {
        let cache = SimpleHashMapCache::<TropicalWeight>::new();
        assert_eq!(cache.get_start(), CacheStatus::NotComputed);
        cache.insert_start(Some(0));
        assert_eq!(cache.get_start(), CacheStatus::Computed(Some(0)));
        cache.insert_trs(0, trs_of(3));
        assert_eq!(cache.num_trs(0), Some(3));
        // Destinations 1..=3 have been discovered.
        assert_eq!(cache.num_known_states(), 4);
    }

    #[test]
    fn test_vec_cache_roundtrip() {
        let cache = SimpleVecCache::<TropicalWeight>::new();
        cache.insert_start(Some(0));
        cache.insert_trs(2, trs_of(2));
        cache.insert_final_weight(1, Some(TropicalWeight::one()));
        assert_eq!(cache.get_trs(0), CacheStatus::NotComputed);
        assert!(matches!(cache.get_trs(2), CacheStatus::Computed(_)));
        assert_eq!(
            cache.get_final_weight(1),
            CacheStatus::Computed(Some(TropicalWeight::one()))
        );
        assert_eq!(cache.num_input_epsilons(2), Some(1));
        assert_eq!(cache.num_known_states(), 3);
    }

    #[test]
    fn test_lru_cache_evicts_over_budget() {
        let cache = GcLruCache::<TropicalWeight>::new(CacheOptions {
            gc: true,
            gc_limit: 400,
        });
        cache.insert_start(Some(0));
        for id in 0..10 {
            cache.insert_trs(id, trs_of(4));
        }
        // The oldest entries must be gone, the newest present.
        assert_eq!(cache.get_trs(0), CacheStatus::NotComputed);
        assert!(matches!(cache.get_trs(9), CacheStatus::Computed(_)));
    }

    #[test]
    fn test_no_gc_cache_grows() {
        let cache = GcLruCache::<TropicalWeight>::new(CacheOptions {
            gc: false,
            gc_limit: 1,
        });
        for id in 0..10 {
            cache.insert_trs(id, trs_of(4));
        }
        assert!(matches!(cache.get_trs(0), CacheStatus::Computed(_)));
    }
}
