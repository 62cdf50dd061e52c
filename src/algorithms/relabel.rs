use std::collections::HashMap;

use anyhow::Result;

use crate::fst_properties::op_properties::relabel_properties;
use crate::fst_traits::MutableFst;
use crate::semirings::Semiring;
use crate::{Label, StateId};

/// Replaces labels in place according to `(old, new)` pair lists, one per
/// side. Labels without an entry are left alone.
pub fn relabel<W: Semiring, F: MutableFst<W>>(
    fst: &mut F,
    ipairs: &[(Label, Label)],
    opairs: &[(Label, Label)],
) -> Result<()> {
    let imap: HashMap<Label, Label> = ipairs.iter().copied().collect();
    let omap: HashMap<Label, Label> = opairs.iter().copied().collect();
    let props = fst.properties();
    for state in 0..fst.num_states() as StateId {
        let mut trs = fst.pop_trs(state)?;
        for tr in trs.iter_mut() {
            if let Some(&new) = imap.get(&tr.ilabel) {
                tr.ilabel = new;
            }
            if let Some(&new) = omap.get(&tr.olabel) {
                tr.olabel = new;
            }
        }
        for tr in trs {
            fst.add_tr(state, tr)?;
        }
    }
    fst.set_properties(relabel_properties(props));
    Ok(())
}
