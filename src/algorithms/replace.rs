use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use anyhow::{format_err, Result};

use crate::fst_properties::op_properties::replace_properties;
use crate::fst_properties::FstProperties;
use crate::fst_traits::{ExpandedFst, Fst, MutableFst};
use crate::lazy::{FstOp, LazyFst, SimpleHashMapCache, StateTable};
use crate::semirings::Semiring;
use crate::trs::{Transitions, TrsVec};
use crate::{Label, StateId, Transition, EPS_LABEL};

/// Delayed recursive replacement: an FST whose transitions labeled with
/// non-terminals expand into the machines bound to those labels, with
/// returns to the calling site on their final states. The rational
/// combinators (union, concatenation, closure) are shallow instances.
pub type ReplaceFst<W, F> = LazyFst<W, ReplaceFstOp<W, F>, SimpleHashMapCache<W>>;

/// Options of a replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaceFstConfig {
    /// Label of the machine expansion starts in.
    pub root: Label,
    /// Replace the output label of a call transition by epsilon; when
    /// false the non-terminal stays visible on the output side.
    pub epsilon_on_replace: bool,
}

impl ReplaceFstConfig {
    pub fn new(root: Label) -> Self {
        Self {
            root,
            epsilon_on_replace: true,
        }
    }
}

/// Expansion state: which machine, which of its states, and the stack of
/// return points of the pending calls. The rational operators never nest,
/// so their stacks stay at depth ≤ 1.
type ReplaceStateTuple = (usize, StateId, Vec<(usize, StateId)>);

/// Expansion operator behind [`ReplaceFst`].
pub struct ReplaceFstOp<W: Semiring, F: Fst<W>> {
    fst_list: Vec<(Label, Arc<F>)>,
    label_to_index: HashMap<Label, usize>,
    root: usize,
    epsilon_on_replace: bool,
    state_table: StateTable<ReplaceStateTuple>,
    properties: FstProperties,
    w: std::marker::PhantomData<W>,
}

impl<W: Semiring, F: Fst<W>> Debug for ReplaceFstOp<W, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ReplaceFstOp")
            .field("fst_list", &self.fst_list)
            .field("root", &self.root)
            .field("epsilon_on_replace", &self.epsilon_on_replace)
            .finish()
    }
}

impl<W: Semiring, F: Fst<W>> ReplaceFstOp<W, F> {
    pub fn new(fst_list: Vec<(Label, Arc<F>)>, config: ReplaceFstConfig) -> Result<Self> {
        let label_to_index: HashMap<Label, usize> = fst_list
            .iter()
            .enumerate()
            .map(|(i, (label, _))| (*label, i))
            .collect();
        let root = *label_to_index
            .get(&config.root)
            .ok_or_else(|| format_err!("ReplaceFst: no machine bound to root label {}", config.root))?;
        let properties = replace_properties(
            fst_list
                .get(root)
                .map(|(_, f)| f.properties())
                .unwrap_or_else(FstProperties::empty),
        );
        Ok(Self {
            fst_list,
            label_to_index,
            root,
            epsilon_on_replace: config.epsilon_on_replace,
            state_table: StateTable::new(),
            properties,
            w: std::marker::PhantomData,
        })
    }

    fn machine(&self, index: usize) -> &Arc<F> {
        &self.fst_list[index].1
    }

    /// Call transition: enter the machine bound to the non-terminal with a
    /// return point pushed onto the stack; an empty callee contributes
    /// nothing.
    fn call_tr(
        &self,
        tr: &Transition<W>,
        index: usize,
        callee: usize,
        stack: &[(usize, StateId)],
    ) -> Option<Transition<W>> {
        let callee_start = self.machine(callee).start()?;
        let mut stack = stack.to_vec();
        stack.push((index, tr.nextstate));
        let dest = self
            .state_table
            .find_id((callee, callee_start, stack));
        let olabel = if self.epsilon_on_replace {
            EPS_LABEL
        } else {
            tr.olabel
        };
        Some(Transition::new(tr.ilabel, olabel, tr.weight.clone(), dest))
    }
}

impl<W: Semiring, F: Fst<W>> FstOp<W> for ReplaceFstOp<W, F> {
    fn compute_start(&self) -> Result<Option<StateId>> {
        match self.machine(self.root).start() {
            Some(start) => Ok(Some(self.state_table.find_id((self.root, start, vec![])))),
            None => Ok(None),
        }
    }

    fn compute_trs(&self, id: StateId) -> Result<TrsVec<W>> {
        let (index, state, stack) = self.state_table.find_tuple(id);
        let mut trs = vec![];
        let machine = self.machine(index);
        for tr in machine.get_trs(state)?.trs() {
            match self.label_to_index.get(&tr.olabel).copied() {
                Some(callee) if tr.olabel != EPS_LABEL => {
                    if let Some(call) = self.call_tr(tr, index, callee, &stack) {
                        trs.push(call);
                    }
                }
                _ => {
                    let dest = self
                        .state_table
                        .find_id((index, tr.nextstate, stack.clone()));
                    trs.push(Transition::new(
                        tr.ilabel,
                        tr.olabel,
                        tr.weight.clone(),
                        dest,
                    ));
                }
            }
        }
        // Return transition: a final state of a callee resumes the caller.
        if let Some(final_weight) = machine.final_weight(state)? {
            if let Some((ret_index, ret_state)) = stack.last() {
                let mut popped = stack.clone();
                popped.pop();
                let dest = self.state_table.find_id((*ret_index, *ret_state, popped));
                trs.push(Transition::new(EPS_LABEL, EPS_LABEL, final_weight, dest));
            }
        }
        Ok(TrsVec::from(trs))
    }

    fn compute_final_weight(&self, id: StateId) -> Result<Option<W>> {
        let (index, state, stack) = self.state_table.find_tuple(id);
        if !stack.is_empty() {
            return Ok(None);
        }
        self.machine(index).final_weight(state)
    }

    fn properties(&self) -> FstProperties {
        self.properties
    }
}

/// Builds a [`ReplaceFst`] over a list of labeled machines.
pub fn replace_fst<W: Semiring, F: Fst<W>>(
    fst_list: Vec<(Label, F)>,
    config: ReplaceFstConfig,
) -> Result<ReplaceFst<W, F>> {
    let (isymt, osymt) = fst_list
        .iter()
        .find(|(label, _)| *label == config.root)
        .map(|(_, f)| (f.input_symbols().cloned(), f.output_symbols().cloned()))
        .unwrap_or((None, None));
    let fst_list = fst_list
        .into_iter()
        .map(|(label, f)| (label, Arc::new(f)))
        .collect();
    let op = ReplaceFstOp::new(fst_list, config)?;
    Ok(LazyFst::from_op_and_cache(
        op,
        SimpleHashMapCache::new(),
        isymt,
        osymt,
    ))
}

/// Eager replacement into a mutable FST.
pub fn replace<W, F1, F2>(
    fst_list: Vec<(Label, F1)>,
    config: ReplaceFstConfig,
) -> Result<F2>
where
    W: Semiring,
    F1: ExpandedFst<W> + 'static,
    F2: MutableFst<W>,
{
    replace_fst(fst_list, config)?.compute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst_impls::VectorFst;
    use crate::semirings::TropicalWeight;
    use crate::utils::acceptor;
    use crate::NO_LABEL;

    #[test]
    fn test_replace_substitutes_nonterminal() -> Result<()> {
        let nt = NO_LABEL - 1;
        // Root: reads 1, then calls the sub-machine, then reads 3.
        let mut root = VectorFst::<TropicalWeight>::new();
        let s0 = root.add_state();
        let s1 = root.add_state();
        let s2 = root.add_state();
        let s3 = root.add_state();
        root.set_start(s0)?;
        root.set_final(s3, TropicalWeight::one())?;
        root.add_tr(s0, Transition::new(1, 1, TropicalWeight::one(), s1))?;
        root.add_tr(s1, Transition::new(EPS_LABEL, nt, TropicalWeight::one(), s2))?;
        root.add_tr(s2, Transition::new(3, 3, TropicalWeight::one(), s3))?;
        let sub: VectorFst<TropicalWeight> = acceptor(&[7, 8], TropicalWeight::one());

        let root_label = NO_LABEL - 2;
        let replaced: VectorFst<TropicalWeight> = replace(
            vec![(root_label, root), (nt, sub)],
            ReplaceFstConfig::new(root_label),
        )?;
        let paths: Vec<_> = replaced.paths_iter().collect();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].ilabels, vec![1, 7, 8, 3]);
        Ok(())
    }

    #[test]
    fn test_replace_empty_callee_kills_path() -> Result<()> {
        let nt = NO_LABEL - 1;
        let mut root = VectorFst::<TropicalWeight>::new();
        let s0 = root.add_state();
        let s1 = root.add_state();
        root.set_start(s0)?;
        root.set_final(s1, TropicalWeight::one())?;
        root.add_tr(s0, Transition::new(EPS_LABEL, nt, TropicalWeight::one(), s1))?;
        let empty = VectorFst::<TropicalWeight>::new();
        let root_label = NO_LABEL - 2;
        let replaced: VectorFst<TropicalWeight> = replace(
            vec![(root_label, root), (nt, empty)],
            ReplaceFstConfig::new(root_label),
        )?;
        assert_eq!(replaced.paths_iter().count(), 0);
        Ok(())
    }
}
