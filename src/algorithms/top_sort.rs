use anyhow::Result;

use crate::algorithms::dfs_visit::top_order;
use crate::algorithms::state_sort::state_sort;
use crate::fst_properties::FstProperties;
use crate::fst_traits::MutableFst;
use crate::semirings::Semiring;

/// Topologically sorts an acyclic FST in place, renumbering states so that
/// every transition goes from a lower to a higher id. Returns `false`
/// without mutating when the FST is cyclic.
pub fn top_sort<W: Semiring, F: MutableFst<W>>(fst: &mut F) -> Result<bool> {
    match top_order(fst)? {
        None => Ok(false),
        Some(order) => {
            state_sort(fst, &order)?;
            fst.set_properties_with_mask(
                FstProperties::TOP_SORTED | FstProperties::ACYCLIC | FstProperties::INITIAL_ACYCLIC,
                FstProperties::TOP_SORTED
                    | FstProperties::NOT_TOP_SORTED
                    | FstProperties::ACYCLIC
                    | FstProperties::CYCLIC
                    | FstProperties::INITIAL_ACYCLIC
                    | FstProperties::INITIAL_CYCLIC,
            );
            Ok(true)
        }
    }
}
