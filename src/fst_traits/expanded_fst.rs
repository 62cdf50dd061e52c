use std::ops::Range;

use anyhow::Result;

use crate::fst_properties::{compute_fst_properties, FstProperties};
use crate::fst_traits::Fst;
use crate::semirings::Semiring;
use crate::StateId;

/// An FST whose states are all materialised, so their number is known.
pub trait ExpandedFst<W: Semiring>: Fst<W> + Clone + PartialEq {
    fn num_states(&self) -> usize;

    fn states_range(&self) -> Range<StateId> {
        0..self.num_states()
    }

    fn is_empty(&self) -> bool {
        self.num_states() == 0
    }

    /// `Properties(mask, test = true)`: returns the bits of `mask`, running
    /// the full single-pass computation for any that are not already known.
    /// The result is not cached through a shared reference; mutable FSTs
    /// cache via
    /// [`compute_and_update_properties`](crate::fst_traits::MutableFst::compute_and_update_properties).
    fn properties_check(&self, mask: FstProperties) -> Result<FstProperties> {
        let known = self.properties().known_properties();
        if (mask - FstProperties::binary_properties() - known).is_empty() {
            Ok(self.properties() & mask)
        } else {
            Ok((self.properties() | compute_fst_properties(self)?) & mask)
        }
    }

    /// Total number of transitions.
    fn num_all_trs(&self) -> usize {
        self.states_range()
            .map(|s| unsafe { self.num_trs_unchecked(s) })
            .sum()
    }
}
