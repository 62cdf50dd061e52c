use crate::semirings::Semiring;
use crate::StateId;

/// Iteration over the state ids of an FST.
pub trait StateIterator<'a> {
    type Iter: Iterator<Item = StateId>;

    fn states_iter(&'a self) -> Self::Iter;
}

/// Data yielded per state by [`FstIterator`].
#[derive(Debug, Clone, PartialEq)]
pub struct FstIterData<W, TRS> {
    pub state_id: StateId,
    pub trs: TRS,
    pub final_weight: Option<W>,
    pub num_trs: usize,
}

/// Iteration over states together with their transitions and final weight.
pub trait FstIterator<'a, W: Semiring>: crate::fst_traits::CoreFst<W> {
    type FstIter: Iterator<Item = FstIterData<W, Self::TRS>>;

    fn fst_iter(&'a self) -> Self::FstIter;
}
