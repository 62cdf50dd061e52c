use std::marker::PhantomData;

use crate::fst_traits::{CoreFst, Fst};
use crate::semirings::Semiring;
use crate::trs::Transitions;
use crate::{Label, StateId, EPS_LABEL};

/// An accepting path: the epsilon-free input and output label sequences and
/// the accumulated weight (transition weights times the final weight).
#[derive(Debug, Clone, PartialEq)]
pub struct FstPath<W: Semiring> {
    pub ilabels: Vec<Label>,
    pub olabels: Vec<Label>,
    pub weight: W,
}

impl<W: Semiring> FstPath<W> {
    pub fn new(ilabels: Vec<Label>, olabels: Vec<Label>, weight: W) -> Self {
        Self {
            ilabels,
            olabels,
            weight,
        }
    }
}

impl<W: Semiring> Default for FstPath<W> {
    fn default() -> Self {
        Self {
            ilabels: vec![],
            olabels: vec![],
            weight: W::one(),
        }
    }
}

/// Depth-first enumeration of the accepting paths of an FST. Transitions
/// that would re-enter a state already on the current path are skipped, so
/// the enumeration terminates on any FST and is exhaustive on acyclic ones.
pub struct PathsIterator<W: Semiring> {
    paths: std::vec::IntoIter<FstPath<W>>,
}

impl<W: Semiring> PathsIterator<W> {
    pub fn new<F: Fst<W>>(fst: &F) -> Self {
        let mut paths = vec![];
        if let Some(start) = fst.start() {
            let mut on_path = vec![start];
            let mut ilabels = vec![];
            let mut olabels = vec![];
            collect_paths(
                fst,
                start,
                &mut on_path,
                &mut ilabels,
                &mut olabels,
                W::one(),
                &mut paths,
            );
        }
        Self {
            paths: paths.into_iter(),
        }
    }
}

fn collect_paths<W: Semiring, F: Fst<W>>(
    fst: &F,
    state: StateId,
    on_path: &mut Vec<StateId>,
    ilabels: &mut Vec<Label>,
    olabels: &mut Vec<Label>,
    weight: W,
    paths: &mut Vec<FstPath<W>>,
) {
    if let Ok(Some(final_weight)) = fst.final_weight(state) {
        paths.push(FstPath::new(
            ilabels.clone(),
            olabels.clone(),
            weight.times(&final_weight),
        ));
    }
    let trs = match fst.get_trs(state) {
        Ok(trs) => trs,
        Err(_) => return,
    };
    for tr in trs.trs() {
        if on_path.contains(&tr.nextstate) {
            continue;
        }
        if tr.ilabel != EPS_LABEL {
            ilabels.push(tr.ilabel);
        }
        if tr.olabel != EPS_LABEL {
            olabels.push(tr.olabel);
        }
        on_path.push(tr.nextstate);
        collect_paths(
            fst,
            tr.nextstate,
            on_path,
            ilabels,
            olabels,
            weight.times(&tr.weight),
            paths,
        );
        on_path.pop();
        if tr.ilabel != EPS_LABEL {
            ilabels.pop();
        }
        if tr.olabel != EPS_LABEL {
            olabels.pop();
        }
    }
}

impl<W: Semiring> Iterator for PathsIterator<W> {
    type Item = FstPath<W>;

    fn next(&mut self) -> Option<Self::Item> {
        self.paths.next()
    }
}

/// Iterates over `(state, final_weight)` for the final states of an FST.
pub struct FinalStatesIterator<'a, W: Semiring, F: Fst<W>> {
    fst: &'a F,
    state: StateId,
    w: PhantomData<W>,
}

impl<'a, W: Semiring, F: Fst<W>> FinalStatesIterator<'a, W, F> {
    pub fn new(fst: &'a F) -> Self {
        Self {
            fst,
            state: 0,
            w: PhantomData,
        }
    }
}

impl<'a, W: Semiring, F: Fst<W>> Iterator for FinalStatesIterator<'a, W, F> {
    type Item = (StateId, W);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let s = self.state;
            match self.fst.final_weight(s) {
                Err(_) => return None,
                Ok(Some(w)) => {
                    self.state += 1;
                    return Some((s, w));
                }
                Ok(None) => {
                    self.state += 1;
                }
            }
        }
    }
}
