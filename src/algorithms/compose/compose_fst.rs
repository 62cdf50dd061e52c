use std::sync::Arc;

use anyhow::Result;

use crate::algorithms::compose::compose_filters::{ComposeFilter, SequenceComposeFilter};
use crate::algorithms::compose::matchers::{GenericMatcher, Matcher};
use crate::algorithms::compose::{ComposeFstOp, ComposeFstOpOptions, ComposeStateTuple};
use crate::fst_properties::FstProperties;
use crate::fst_traits::{
    CoreFst, ExpandedFst, Fst, FstIterator, MutableFst, StateIterator,
};
use crate::lazy::{LazyFst, SimpleHashMapCache, StateTable};
use crate::semirings::Semiring;
use crate::symbol_table::SymbolTable;
use crate::trs::TrsVec;
use crate::StateId;

/// Delayed composition of two transducers; states and transitions of the
/// three-way product come into existence on first access.
#[derive(Debug)]
pub struct ComposeFst<W: Semiring, CF: ComposeFilter<W>>(
    LazyFst<W, ComposeFstOp<W, CF>, SimpleHashMapCache<W>>,
);

fn create_base<W: Semiring, F1: ExpandedFst<W>, F2: ExpandedFst<W>>(
    fst1: Arc<F1>,
    fst2: Arc<F2>,
) -> Result<ComposeFstOp<W, SequenceComposeFilter<W, GenericMatcher<W, F1>, GenericMatcher<W, F2>>>>
{
    let opts = ComposeFstOpOptions::<
        GenericMatcher<_, _>,
        GenericMatcher<_, _>,
        SequenceComposeFilter<_, _, _>,
        _,
    >::default();
    ComposeFstOp::new(fst1, fst2, opts)
}

impl<W: Semiring, CF: ComposeFilter<W>> ComposeFst<W, CF> {
    pub fn new_with_options(
        fst1: Arc<<CF::M1 as Matcher<W>>::F>,
        fst2: Arc<<CF::M2 as Matcher<W>>::F>,
        opts: ComposeFstOpOptions<CF::M1, CF::M2, CF, StateTable<ComposeStateTuple<CF::FS>>>,
    ) -> Result<Self> {
        let isymt = fst1.input_symbols().cloned();
        let osymt = fst2.output_symbols().cloned();
        let compose_op = ComposeFstOp::new(fst1, fst2, opts)?;
        let fst_cache = SimpleHashMapCache::new();
        let fst = LazyFst::from_op_and_cache(compose_op, fst_cache, isymt, osymt);
        Ok(ComposeFst(fst))
    }

    pub fn new(
        fst1: Arc<<CF::M1 as Matcher<W>>::F>,
        fst2: Arc<<CF::M2 as Matcher<W>>::F>,
    ) -> Result<Self> {
        Self::new_with_options(fst1, fst2, ComposeFstOpOptions::default())
    }

    /// Turns the delayed FST into a static one.
    pub fn compute<F2: MutableFst<W>>(&self) -> Result<F2> {
        self.0.compute()
    }
}

impl<W: Semiring, F1: ExpandedFst<W>, F2: ExpandedFst<W>>
    ComposeFst<W, SequenceComposeFilter<W, GenericMatcher<W, F1>, GenericMatcher<W, F2>>>
{
    /// Composition with the default matchers and epsilon filter.
    pub fn new_auto(fst1: Arc<F1>, fst2: Arc<F2>) -> Result<Self> {
        let isymt = fst1.input_symbols().cloned();
        let osymt = fst2.output_symbols().cloned();
        let compose_op = create_base(fst1, fst2)?;
        let fst_cache = SimpleHashMapCache::new();
        let fst = LazyFst::from_op_and_cache(compose_op, fst_cache, isymt, osymt);
        Ok(ComposeFst(fst))
    }
}

impl<W, CF> CoreFst<W> for ComposeFst<W, CF>
where
    W: Semiring,
    CF: ComposeFilter<W>,
{
    type TRS = TrsVec<W>;

    fn start(&self) -> Option<StateId> {
        self.0.start()
    }

    fn final_weight(&self, state_id: StateId) -> Result<Option<W>> {
        self.0.final_weight(state_id)
    }

    unsafe fn final_weight_unchecked(&self, state_id: StateId) -> Option<W> {
        self.0.final_weight_unchecked(state_id)
    }

    fn num_trs(&self, state_id: StateId) -> Result<usize> {
        self.0.num_trs(state_id)
    }

    unsafe fn num_trs_unchecked(&self, state_id: StateId) -> usize {
        self.0.num_trs_unchecked(state_id)
    }

    fn get_trs(&self, state_id: StateId) -> Result<Self::TRS> {
        self.0.get_trs(state_id)
    }

    unsafe fn get_trs_unchecked(&self, state_id: StateId) -> Self::TRS {
        self.0.get_trs_unchecked(state_id)
    }

    fn properties(&self) -> FstProperties {
        self.0.properties()
    }

    fn num_input_epsilons(&self, state_id: StateId) -> Result<usize> {
        self.0.num_input_epsilons(state_id)
    }

    fn num_output_epsilons(&self, state_id: StateId) -> Result<usize> {
        self.0.num_output_epsilons(state_id)
    }
}

impl<'a, W, CF> StateIterator<'a> for ComposeFst<W, CF>
where
    W: Semiring,
    CF: ComposeFilter<W> + 'a,
{
    type Iter =
        <LazyFst<W, ComposeFstOp<W, CF>, SimpleHashMapCache<W>> as StateIterator<'a>>::Iter;

    fn states_iter(&'a self) -> Self::Iter {
        self.0.states_iter()
    }
}

impl<'a, W, CF> FstIterator<'a, W> for ComposeFst<W, CF>
where
    W: Semiring,
    CF: ComposeFilter<W> + 'a,
{
    type FstIter =
        <LazyFst<W, ComposeFstOp<W, CF>, SimpleHashMapCache<W>> as FstIterator<'a, W>>::FstIter;

    fn fst_iter(&'a self) -> Self::FstIter {
        self.0.fst_iter()
    }
}

impl<W, CF> Fst<W> for ComposeFst<W, CF>
where
    W: Semiring,
    CF: ComposeFilter<W> + 'static,
{
    fn input_symbols(&self) -> Option<&Arc<SymbolTable>> {
        self.0.input_symbols()
    }

    fn output_symbols(&self) -> Option<&Arc<SymbolTable>> {
        self.0.output_symbols()
    }

    fn set_input_symbols(&mut self, symt: Arc<SymbolTable>) {
        self.0.set_input_symbols(symt)
    }

    fn set_output_symbols(&mut self, symt: Arc<SymbolTable>) {
        self.0.set_output_symbols(symt)
    }

    fn take_input_symbols(&mut self) -> Option<Arc<SymbolTable>> {
        self.0.take_input_symbols()
    }

    fn take_output_symbols(&mut self) -> Option<Arc<SymbolTable>> {
        self.0.take_output_symbols()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst_impls::VectorFst;
    use crate::fst_traits::Fst;
    use crate::semirings::TropicalWeight;
    use crate::utils::transducer;

    #[test]
    fn test_compose_fst_delayed() -> Result<()> {
        let a: VectorFst<TropicalWeight> = transducer(&[1], &[2], TropicalWeight::new(1.0));
        let b: VectorFst<TropicalWeight> = transducer(&[2], &[3], TropicalWeight::new(2.0));
        let composed = ComposeFst::new_auto(Arc::new(a), Arc::new(b))?;
        let computed: VectorFst<TropicalWeight> = composed.compute()?;
        let paths: Vec<_> = computed.paths_iter().collect();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].ilabels, vec![1]);
        assert_eq!(paths[0].olabels, vec![3]);
        assert_eq!(paths[0].weight, TropicalWeight::new(3.0));
        Ok(())
    }
}
