use std::borrow::Borrow;
use std::fmt::Debug;
use std::ops::Deref;
use std::sync::Arc;

use crate::semirings::Semiring;
use crate::transition::Transition;

/// Handle on the outgoing transitions of a state.
///
/// Cloning the handle is cheap and the underlying slice is immutable, which
/// lets delayed FSTs hand out a state's transitions while remaining free to
/// evict their cache entry: an outstanding handle keeps the data alive.
pub trait Transitions<W: Semiring>: Borrow<[Transition<W>]> + Clone + Debug {
    fn trs(&self) -> &[Transition<W>] {
        self.borrow()
    }

    fn len(&self) -> usize {
        self.trs().len()
    }

    fn is_empty(&self) -> bool {
        self.trs().is_empty()
    }

    /// Copies the transitions into an owned, shared vector.
    fn to_trs_vec(&self) -> TrsVec<W> {
        TrsVec(Arc::new(self.trs().to_vec()))
    }
}

/// Shared vector of transitions, the canonical [`Transitions`] carrier.
#[derive(Debug, PartialEq)]
pub struct TrsVec<W>(pub Arc<Vec<Transition<W>>>);

impl<W: Semiring> TrsVec<W> {
    pub fn push(&mut self, tr: Transition<W>) {
        Arc::make_mut(&mut self.0).push(tr)
    }

    pub fn clear(&mut self) {
        Arc::make_mut(&mut self.0).clear()
    }
}

impl<W: Semiring> Transitions<W> for TrsVec<W> {
    fn to_trs_vec(&self) -> TrsVec<W> {
        self.clone()
    }
}

impl<W: Semiring> Clone for TrsVec<W> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<W: Semiring> Borrow<[Transition<W>]> for TrsVec<W> {
    fn borrow(&self) -> &[Transition<W>] {
        self.0.as_slice()
    }
}

impl<W: Semiring> Deref for TrsVec<W> {
    type Target = [Transition<W>];

    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

impl<W: Semiring> Default for TrsVec<W> {
    fn default() -> Self {
        Self(Arc::new(vec![]))
    }
}

impl<W: Semiring> From<Vec<Transition<W>>> for TrsVec<W> {
    fn from(trs: Vec<Transition<W>>) -> Self {
        Self(Arc::new(trs))
    }
}

/// Window into a flat, shared transition array; the [`Transitions`] carrier
/// of [`ConstFst`](crate::fst_impls::ConstFst).
#[derive(Debug)]
pub struct TrsConst<W> {
    pub(crate) trs: Arc<Vec<Transition<W>>>,
    pub(crate) pos: usize,
    pub(crate) n: usize,
}

impl<W: Semiring> Transitions<W> for TrsConst<W> {}

impl<W: Semiring> Clone for TrsConst<W> {
    fn clone(&self) -> Self {
        Self {
            trs: Arc::clone(&self.trs),
            pos: self.pos,
            n: self.n,
        }
    }
}

impl<W: Semiring> Borrow<[Transition<W>]> for TrsConst<W> {
    fn borrow(&self) -> &[Transition<W>] {
        &self.trs[self.pos..self.pos + self.n]
    }
}

impl<W: Semiring> Default for TrsConst<W> {
    fn default() -> Self {
        Self {
            trs: Arc::new(vec![]),
            pos: 0,
            n: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semirings::{Semiring, TropicalWeight};

    #[test]
    fn test_trs_vec_shared() {
        let mut trs = TrsVec::default();
        trs.push(Transition::new(1, 1, TropicalWeight::new(0.3), 0));
        let snapshot = trs.clone();
        trs.push(Transition::new(2, 2, TropicalWeight::new(0.4), 1));
        // The clone taken before the push is unaffected (copy-on-write).
        assert_eq!(snapshot.len(), 1);
        assert_eq!(trs.len(), 2);
    }
}
