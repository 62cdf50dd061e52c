use std::sync::Arc;

use anyhow::Result;

use crate::algorithms::compose::matchers::{
    matched_label, MatchType, Matcher, MatcherFlags,
};
use crate::fst_traits::Fst;
use crate::semirings::Semiring;
use crate::transition::Transition;
use crate::trs::Transitions;
use crate::{Label, StateId};

/// Matcher scanning the state's transitions linearly; works on any FST
/// with no sortedness requirement.
#[derive(Debug)]
pub struct GenericMatcher<W: Semiring, F: Fst<W>> {
    fst: Arc<F>,
    match_type: MatchType,
    w: std::marker::PhantomData<W>,
}

impl<W: Semiring, F: Fst<W>> Matcher<W> for GenericMatcher<W, F> {
    type F = F;
    type Iter = std::vec::IntoIter<Transition<W>>;

    fn new(fst: Arc<F>, match_type: MatchType) -> Result<Self> {
        Ok(Self {
            fst,
            match_type,
            w: std::marker::PhantomData,
        })
    }

    fn iter_match(&self, state: StateId, label: Label) -> Result<Self::Iter> {
        let trs = self.fst.get_trs(state)?;
        let matches: Vec<_> = trs
            .trs()
            .iter()
            .filter(|tr| matched_label(tr, self.match_type) == label)
            .cloned()
            .collect();
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
    use crate::fst_impls::VectorFst;
    use crate::fst_traits::MutableFst;
    use crate::semirings::TropicalWeight;

    #[test]
    fn test_generic_matcher() -> Result<()> {
        let mut fst = VectorFst::<TropicalWeight>::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        fst.set_start(s0)?;
        fst.set_final(s1, TropicalWeight::one())?;
        fst.add_tr(s0, Transition::new(1, 3, TropicalWeight::one(), s1))?;
        fst.add_tr(s0, Transition::new(2, 4, TropicalWeight::one(), s1))?;
        let matcher = GenericMatcher::new(Arc::new(fst), MatchType::MatchInput)?;
        assert_eq!(matcher.iter_match(s0, 2)?.count(), 1);
        assert_eq!(matcher.iter_match(s0, 9)?.count(), 0);
        let matcher2 = GenericMatcher::new(Arc::clone(matcher.fst()), MatchType::MatchOutput)?;
        assert_eq!(matcher2.iter_match(s0, 4)?.count(), 1);
        Ok(())
    }
}
