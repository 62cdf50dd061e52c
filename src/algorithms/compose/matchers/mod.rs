pub use self::generic_matcher::GenericMatcher;
pub use self::phi_matcher::PhiMatcher;
pub use self::rho_matcher::RhoMatcher;
pub use self::sigma_matcher::SigmaMatcher;
pub use self::sorted_matcher::SortedMatcher;

mod generic_matcher;
mod phi_matcher;
mod rho_matcher;
mod sigma_matcher;
mod sorted_matcher;

use std::fmt::Debug;
use std::sync::Arc;

use anyhow::Result;
use bitflags::bitflags;

use crate::fst_traits::{CoreFst, Fst};
use crate::semirings::Semiring;
use crate::transition::Transition;
use crate::{Label, StateId, EPS_LABEL};

/// Side of the transitions a matcher matches the query label against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
    MatchInput,
    MatchOutput,
    /// The matcher can serve either side.
    MatchBoth,
    MatchNone,
}

bitflags! {
    /// Capabilities and requirements advertised by a matcher.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MatcherFlags: u32 {
        /// Composition must fail if no transition matches.
        const REQUIRE_MATCH = 0b1;
        /// The matcher realises failure-transition semantics.
        const PHI_MATCHER = 0b10;
        const RHO_MATCHER = 0b100;
        const SIGMA_MATCHER = 0b1000;
        /// The matcher can answer reachability queries about the future.
        const LOOKAHEAD_MATCHER = 0b1_0000;
    }
}

/// How a special-label matcher rewrites the labels of the transitions it
/// returns for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatcherRewriteMode {
    /// Rewrite the matched side (and the other side when it carries the
    /// same special label) to the query label.
    Auto,
    Always,
    Never,
}

/// Answers "which transitions of state `s` carry label `ℓ` on my side".
///
/// Queries are immutable and return owned transitions, so a matcher can be
/// shared by a compose filter and queried while the filter is advanced.
/// `iter_match(s, EPS_LABEL)` yields only literal epsilon transitions; the
/// compose engine introduces the implicit epsilon self-loops itself.
pub trait Matcher<W: Semiring>: Debug {
    type F: Fst<W>;
    type Iter: Iterator<Item = Transition<W>>;

    fn new(fst: Arc<Self::F>, match_type: MatchType) -> Result<Self>
    where
        Self: Sized;

    fn iter_match(&self, state: StateId, label: Label) -> Result<Self::Iter>;

    fn final_weight(&self, state: StateId) -> Result<Option<W>> {
        self.fst().final_weight(state)
    }

    fn match_type(&self) -> MatchType;

    fn flags(&self) -> MatcherFlags;

    fn fst(&self) -> &Arc<Self::F>;
}

/// Label of a transition on the matched side.
pub(crate) fn matched_label<W: Semiring>(tr: &Transition<W>, match_type: MatchType) -> Label {
    match match_type {
        MatchType::MatchOutput => tr.olabel,
        _ => tr.ilabel,
    }
}

/// Rewrites a special-labeled transition for the query `label`.
pub(crate) fn rewrite_tr<W: Semiring>(
    tr: &mut Transition<W>,
    match_type: MatchType,
    special: Label,
    label: Label,
    mode: MatcherRewriteMode,
) {
    if mode == MatcherRewriteMode::Never || label == EPS_LABEL {
        return;
    }
    match match_type {
        MatchType::MatchOutput => {
            tr.olabel = label;
            if tr.ilabel == special && mode != MatcherRewriteMode::Never {
                tr.ilabel = label;
            }
        }
        _ => {
            tr.ilabel = label;
            if tr.olabel == special {
                tr.olabel = label;
            }
        }
    }
}
