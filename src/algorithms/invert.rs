use anyhow::Result;

use crate::fst_properties::op_properties::invert_properties;
use crate::fst_traits::MutableFst;
use crate::semirings::Semiring;

/// Swaps input and output labels on every transition in place, so the FST
/// recognizes the inverse relation. Symbol tables are swapped along.
pub fn invert<W: Semiring, F: MutableFst<W>>(fst: &mut F) -> Result<()> {
    let props = fst.properties();
    for state in fst.states_range() {
        let mut trs = fst.pop_trs(state)?;
        for tr in trs.iter_mut() {
            std::mem::swap(&mut tr.ilabel, &mut tr.olabel);
        }
        for tr in trs {
            fst.add_tr(state, tr)?;
        }
    }
    let isymt = fst.take_input_symbols();
    let osymt = fst.take_output_symbols();
    if let Some(symt) = osymt {
        fst.set_input_symbols(symt);
    }
    if let Some(symt) = isymt {
        fst.set_output_symbols(symt);
    }
    fst.set_properties(invert_properties(props));
    Ok(())
}
