use std::sync::Arc;

use anyhow::Result;
use superslice::Ext;

use crate::algorithms::compose::matchers::{
    matched_label, MatchType, Matcher, MatcherFlags,
};
use crate::fst_properties::FstProperties;
use crate::fst_traits::Fst;
use crate::semirings::Semiring;
use crate::transition::Transition;
use crate::trs::Transitions;
use crate::{Label, StateId};

/// Matcher binary-searching label-sorted transitions. When the required
/// sort property is not known of the FST it degrades to a linear scan, so
/// it is always correct and merely slower on unsorted input.
#[derive(Debug)]
pub struct SortedMatcher<W: Semiring, F: Fst<W>> {
    fst: Arc<F>,
    match_type: MatchType,
    sorted: bool,
    w: std::marker::PhantomData<W>,
}

impl<W: Semiring, F: Fst<W>> Matcher<W> for SortedMatcher<W, F> {
    type F = F;
    type Iter = std::vec::IntoIter<Transition<W>>;

    fn new(fst: Arc<F>, match_type: MatchType) -> Result<Self> {
        let required = match match_type {
            MatchType::MatchOutput => FstProperties::O_LABEL_SORTED,
            _ => FstProperties::I_LABEL_SORTED,
        };
        let sorted = fst.properties().contains(required);
        Ok(Self {
            fst,
            match_type,
            sorted,
            w: std::marker::PhantomData,
        })
    }

    fn iter_match(&self, state: StateId, label: Label) -> Result<Self::Iter> {
        let trs = self.fst.get_trs(state)?;
        let slice = trs.trs();
        let matches: Vec<_> = if self.sorted {
            let range = match self.match_type {
                MatchType::MatchOutput => slice.equal_range_by(|tr| tr.olabel.cmp(&label)),
                _ => slice.equal_range_by(|tr| tr.ilabel.cmp(&label)),
            };
            slice[range].to_vec()
        } else {
            slice
                .iter()
                .filter(|tr| matched_label(tr, self.match_type) == label)
                .cloned()
                .collect()
        };
        Ok(matches.into_iter())
    }

    fn match_type(&self) -> MatchType {
        self.match_type
    }

    fn flags(&self) -> MatcherFlags {
        MatcherFlags::empty()
    }

    fn fst(&self) -> &Arc<F> {
        &self.fst
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::tr_sort::{ilabel_compare, tr_sort};
    use crate::fst_impls::VectorFst;
    use crate::fst_traits::MutableFst;
    use crate::semirings::TropicalWeight;

    #[test]
    fn test_sorted_matcher_binary_search() -> Result<()> {
        let mut fst = VectorFst::<TropicalWeight>::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        fst.set_start(s0)?;
        fst.set_final(s1, TropicalWeight::one())?;
        for label in [5, 1, 3, 3] {
            fst.add_tr(s0, Transition::new(label, label, TropicalWeight::one(), s1))?;
        }
        tr_sort(&mut fst, ilabel_compare);
        let matcher = SortedMatcher::new(Arc::new(fst), MatchType::MatchInput)?;
        assert!(matcher.sorted);
        assert_eq!(matcher.iter_match(s0, 3)?.count(), 2);
        assert_eq!(matcher.iter_match(s0, 5)?.count(), 1);
        assert_eq!(matcher.iter_match(s0, 2)?.count(), 0);
        Ok(())
    }

    #[test]
    fn test_sorted_matcher_falls_back_when_unsorted() -> Result<()> {
        let mut fst = VectorFst::<TropicalWeight>::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        fst.set_start(s0)?;
        fst.set_final(s1, TropicalWeight::one())?;
        fst.add_tr(s0, Transition::new(5, 5, TropicalWeight::one(), s1))?;
        fst.add_tr(s0, Transition::new(1, 1, TropicalWeight::one(), s1))?;
        let matcher = SortedMatcher::new(Arc::new(fst), MatchType::MatchInput)?;
        assert!(!matcher.sorted);
        assert_eq!(matcher.iter_match(s0, 1)?.count(), 1);
        Ok(())
    }
}
