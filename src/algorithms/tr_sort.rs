use std::cmp::Ordering;

use crate::fst_properties::FstProperties;
use crate::fst_traits::MutableFst;
use crate::semirings::Semiring;
use crate::Transition;

/// Comparator ordering transitions by input label.
pub fn ilabel_compare<W: Semiring>(a: &Transition<W>, b: &Transition<W>) -> Ordering {
    a.ilabel.cmp(&b.ilabel)
}

/// Comparator ordering transitions by output label.
pub fn olabel_compare<W: Semiring>(a: &Transition<W>, b: &Transition<W>) -> Ordering {
    a.olabel.cmp(&b.olabel)
}

/// Stably sorts the transitions of every state with the given comparator.
/// Sorting by [`ilabel_compare`] / [`olabel_compare`] establishes the
/// corresponding label-sorted property, which the sorted matcher needs for
/// binary search.
pub fn tr_sort<W: Semiring, F: MutableFst<W>, C>(fst: &mut F, comp: C)
where
    C: Fn(&Transition<W>, &Transition<W>) -> Ordering + Copy,
{
    let mut ilabel_sorted = true;
    let mut olabel_sorted = true;
    for state in fst.states_range() {
        // States always exist; pop_trs cannot fail here.
        let mut trs = match fst.pop_trs(state) {
            Ok(trs) => trs,
            Err(_) => continue,
        };
        trs.sort_by(comp);
        for window in trs.windows(2) {
            if window[0].ilabel > window[1].ilabel {
                ilabel_sorted = false;
            }
            if window[0].olabel > window[1].olabel {
                olabel_sorted = false;
            }
        }
        for tr in trs {
            // The states referenced already exist.
            let _ = fst.add_tr(state, tr);
        }
    }
    let mut props = FstProperties::empty();
    if ilabel_sorted {
        props |= FstProperties::I_LABEL_SORTED;
    } else {
        props |= FstProperties::NOT_I_LABEL_SORTED;
    }
    if olabel_sorted {
        props |= FstProperties::O_LABEL_SORTED;
    } else {
        props |= FstProperties::NOT_O_LABEL_SORTED;
    }
    fst.set_properties_with_mask(
        props,
        FstProperties::I_LABEL_SORTED
            | FstProperties::NOT_I_LABEL_SORTED
            | FstProperties::O_LABEL_SORTED
            | FstProperties::NOT_O_LABEL_SORTED,
    );
}
