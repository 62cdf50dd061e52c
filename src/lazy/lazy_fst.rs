use std::marker::PhantomData;
use std::sync::Arc;

use anyhow::Result;

use crate::fst_properties::FstProperties;
use crate::fst_traits::{CoreFst, Fst, FstIterData, FstIterator, MutableFst, StateIterator};
use crate::lazy::{CacheStatus, FstCache, FstOp};
use crate::semirings::Semiring;
use crate::symbol_table::SymbolTable;
use crate::trs::{Transitions, TrsVec};
use crate::StateId;

/// Delayed FST: computes each state's transitions and final weight on
/// first demand through an [`FstOp`] and stores them in an [`FstCache`].
///
/// Shares nothing with user-held sources except `Arc` clones taken at
/// construction, so later mutation of the originals cannot invalidate the
/// view.
#[derive(Debug)]
pub struct LazyFst<W: Semiring, Op: FstOp<W>, Cache: FstCache<W>> {
    op: Op,
    cache: Cache,
    isymt: Option<Arc<SymbolTable>>,
    osymt: Option<Arc<SymbolTable>>,
    w: PhantomData<W>,
}

impl<W: Semiring, Op: FstOp<W>, Cache: FstCache<W>> LazyFst<W, Op, Cache> {
    pub fn from_op_and_cache(
        op: Op,
        cache: Cache,
        isymt: Option<Arc<SymbolTable>>,
        osymt: Option<Arc<SymbolTable>>,
    ) -> Self {
        Self {
            op,
            cache,
            isymt,
            osymt,
            w: PhantomData,
        }
    }

    pub fn op(&self) -> &Op {
        &self.op
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub(crate) fn start_result(&self) -> Result<Option<StateId>> {
        match self.cache.get_start() {
            CacheStatus::Computed(start) => Ok(start),
            CacheStatus::NotComputed => {
                let start = self.op.compute_start()?;
                self.cache.insert_start(start);
                Ok(start)
            }
        }
    }

    pub(crate) fn trs_result(&self, state_id: StateId) -> Result<TrsVec<W>> {
        match self.cache.get_trs(state_id) {
            CacheStatus::Computed(trs) => Ok(trs),
            CacheStatus::NotComputed => {
                let trs = self.op.compute_trs(state_id)?;
                self.cache.insert_trs(state_id, trs.clone());
                Ok(trs)
            }
        }
    }

    fn final_weight_result(&self, state_id: StateId) -> Result<Option<W>> {
        match self.cache.get_final_weight(state_id) {
            CacheStatus::Computed(weight) => Ok(weight),
            CacheStatus::NotComputed => {
                let weight = self.op.compute_final_weight(state_id)?;
                self.cache.insert_final_weight(state_id, weight.clone());
                Ok(weight)
            }
        }
    }

    /// Expands every reachable state breadth-first into a mutable FST.
    pub fn compute<F2: MutableFst<W>>(&self) -> Result<F2> {
        let mut fst_out = F2::new();
        let start = match self.start_result()? {
            Some(start) => start,
            None => return Ok(fst_out),
        };
        let mut queue = std::collections::VecDeque::new();
        let mut visited = vec![];
        let grow = |fst_out: &mut F2, visited: &mut Vec<bool>, state: StateId| {
            while fst_out.num_states() <= state {
                fst_out.add_state();
            }
            if visited.len() <= state {
                visited.resize(state + 1, false);
            }
        };
        grow(&mut fst_out, &mut visited, start);
        fst_out.set_start(start)?;
        visited[start] = true;
        queue.push_back(start);
        while let Some(state) = queue.pop_front() {
            let trs = self.trs_result(state)?;
            for tr in trs.trs() {
                grow(&mut fst_out, &mut visited, tr.nextstate);
                if !visited[tr.nextstate] {
                    visited[tr.nextstate] = true;
                    queue.push_back(tr.nextstate);
                }
                fst_out.add_tr(state, tr.clone())?;
            }
            if let Some(weight) = self.final_weight_result(state)? {
                fst_out.set_final(state, weight)?;
            }
        }
        if let Some(symt) = &self.isymt {
            fst_out.set_input_symbols(Arc::clone(symt));
        }
        if let Some(symt) = &self.osymt {
            fst_out.set_output_symbols(Arc::clone(symt));
        }
        fst_out.set_properties_with_mask(self.op.properties(), FstProperties::copy_properties());
        Ok(fst_out)
    }
}

impl<W: Semiring, Op: FstOp<W>, Cache: FstCache<W>> CoreFst<W> for LazyFst<W, Op, Cache> {
    type TRS = TrsVec<W>;

    fn start(&self) -> Option<StateId> {
        self.start_result().expect("lazy fst: compute_start failed")
    }

    fn final_weight(&self, state_id: StateId) -> Result<Option<W>> {
        self.final_weight_result(state_id)
    }

    unsafe fn final_weight_unchecked(&self, state_id: StateId) -> Option<W> {
        self.final_weight_result(state_id)
            .expect("lazy fst: compute_final_weight failed")
    }

    fn num_trs(&self, state_id: StateId) -> Result<usize> {
        match self.cache.num_trs(state_id) {
            Some(n) => Ok(n),
            None => Ok(self.trs_result(state_id)?.len()),
        }
    }

    unsafe fn num_trs_unchecked(&self, state_id: StateId) -> usize {
        self.num_trs(state_id)
            .expect("lazy fst: compute_trs failed")
    }

    fn get_trs(&self, state_id: StateId) -> Result<Self::TRS> {
        self.trs_result(state_id)
    }

    unsafe fn get_trs_unchecked(&self, state_id: StateId) -> Self::TRS {
        self.trs_result(state_id)
            .expect("lazy fst: compute_trs failed")
    }

    fn properties(&self) -> FstProperties {
        self.op.properties()
    }

    fn num_input_epsilons(&self, state_id: StateId) -> Result<usize> {
        if let Some(n) = self.cache.num_input_epsilons(state_id) {
            return Ok(n);
        }
        self.trs_result(state_id)?;
        Ok(self.cache.num_input_epsilons(state_id).unwrap_or(0))
    }

    fn num_output_epsilons(&self, state_id: StateId) -> Result<usize> {
        if let Some(n) = self.cache.num_output_epsilons(state_id) {
            return Ok(n);
        }
        self.trs_result(state_id)?;
        Ok(self.cache.num_output_epsilons(state_id).unwrap_or(0))
    }
}

/// Iterator over the states of a lazy FST, expanding the frontier as it
/// advances. Ids are dense, so sweeping `0..num_known_states` while
/// expanding each visited state reaches every state discoverable from the
/// start.
pub struct StatesIteratorLazyFst<'a, F> {
    pub(crate) fst: &'a F,
    pub(crate) state: StateId,
}

impl<'a, W, Op, Cache> Iterator for StatesIteratorLazyFst<'a, LazyFst<W, Op, Cache>>
where
    W: Semiring,
    Op: FstOp<W>,
    Cache: FstCache<W>,
{
    type Item = StateId;

    fn next(&mut self) -> Option<StateId> {
        if self.state == 0 {
            // Force the start state into the cache.
            self.fst.start();
        }
        if self.state < self.fst.cache.num_known_states() {
            let state = self.state;
            // Expanding discovers this state's successors.
            let _ = self.fst.trs_result(state);
            self.state += 1;
            Some(state)
        } else {
            None
        }
    }
}

impl<'a, W, Op, Cache> StateIterator<'a> for LazyFst<W, Op, Cache>
where
    W: Semiring,
    Op: FstOp<W> + 'a,
    Cache: FstCache<W> + 'a,
{
    type Iter = StatesIteratorLazyFst<'a, LazyFst<W, Op, Cache>>;

    fn states_iter(&'a self) -> Self::Iter {
        StatesIteratorLazyFst {
            fst: self,
            state: 0,
        }
    }
}

/// Iterator behind [`FstIterator`] for [`LazyFst`].
pub struct FstIteratorLazyFst<'a, F> {
    states: StatesIteratorLazyFst<'a, F>,
}

impl<'a, W, Op, Cache> Iterator for FstIteratorLazyFst<'a, LazyFst<W, Op, Cache>>
where
    W: Semiring,
    Op: FstOp<W>,
    Cache: FstCache<W>,
{
    type Item = FstIterData<W, TrsVec<W>>;

    fn next(&mut self) -> Option<Self::Item> {
        let state_id = self.states.next()?;
        let fst = self.states.fst;
        let trs = fst.trs_result(state_id).ok()?;
        let final_weight = fst.final_weight_result(state_id).ok()?;
        Some(FstIterData {
            state_id,
            num_trs: trs.len(),
            trs,
            final_weight,
        })
    }
}

impl<'a, W, Op, Cache> FstIterator<'a, W> for LazyFst<W, Op, Cache>
where
    W: Semiring,
    Op: FstOp<W> + 'a,
    Cache: FstCache<W> + 'a,
{
    type FstIter = FstIteratorLazyFst<'a, LazyFst<W, Op, Cache>>;

    fn fst_iter(&'a self) -> Self::FstIter {
        FstIteratorLazyFst {
            states: StatesIteratorLazyFst {
                fst: self,
                state: 0,
            },
        }
    }
}

impl<W, Op, Cache> Fst<W> for LazyFst<W, Op, Cache>
where
    W: Semiring,
    Op: FstOp<W> + 'static,
    Cache: FstCache<W> + 'static,
{
    fn input_symbols(&self) -> Option<&Arc<SymbolTable>> {
        self.isymt.as_ref()
    }

    fn output_symbols(&self) -> Option<&Arc<SymbolTable>> {
        self.osymt.as_ref()
    }

    fn set_input_symbols(&mut self, symt: Arc<SymbolTable>) {
        self.isymt = Some(symt);
    }

    fn set_output_symbols(&mut self, symt: Arc<SymbolTable>) {
        self.osymt = Some(symt);
    }

    fn take_input_symbols(&mut self) -> Option<Arc<SymbolTable>> {
        self.isymt.take()
    }

    fn take_output_symbols(&mut self) -> Option<Arc<SymbolTable>> {
        self.osymt.take()
    }
}
