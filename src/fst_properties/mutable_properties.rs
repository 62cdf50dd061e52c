use crate::fst_properties::FstProperties;
use crate::semirings::Semiring;
use crate::transition::Transition;
use crate::{StateId, EPS_LABEL};

/// Properties that remain valid after `set_start`.
pub fn set_start_properties(inprops: FstProperties) -> FstProperties {
    let keep = FstProperties::binary_properties()
        | FstProperties::ACCEPTOR
        | FstProperties::NOT_ACCEPTOR
        | FstProperties::I_DETERMINISTIC
        | FstProperties::NOT_I_DETERMINISTIC
        | FstProperties::O_DETERMINISTIC
        | FstProperties::NOT_O_DETERMINISTIC
        | FstProperties::EPSILONS
        | FstProperties::NO_EPSILONS
        | FstProperties::I_EPSILONS
        | FstProperties::NO_I_EPSILONS
        | FstProperties::O_EPSILONS
        | FstProperties::NO_O_EPSILONS
        | FstProperties::I_LABEL_SORTED
        | FstProperties::NOT_I_LABEL_SORTED
        | FstProperties::O_LABEL_SORTED
        | FstProperties::NOT_O_LABEL_SORTED
        | FstProperties::WEIGHTED
        | FstProperties::UNWEIGHTED
        | FstProperties::CYCLIC
        | FstProperties::ACYCLIC
        | FstProperties::INITIAL_CYCLIC
        | FstProperties::WEIGHTED_CYCLES
        | FstProperties::UNWEIGHTED_CYCLES
        | FstProperties::COACCESSIBLE
        | FstProperties::NOT_COACCESSIBLE;
    inprops & keep
}

/// Properties that remain valid after `set_final` (or clearing a final
/// weight).
pub fn set_final_properties<W: Semiring>(
    inprops: FstProperties,
    old_weight: Option<&W>,
    new_weight: Option<&W>,
) -> FstProperties {
    let mut outprops = inprops;
    if let Some(old) = old_weight {
        if !old.is_zero() && !old.is_one() {
            outprops -= FstProperties::WEIGHTED;
        }
    }
    if let Some(new) = new_weight {
        if !new.is_zero() && !new.is_one() {
            outprops |= FstProperties::WEIGHTED;
            outprops -= FstProperties::UNWEIGHTED;
        }
    }
    outprops
        & (FstProperties::binary_properties()
            | FstProperties::ACCEPTOR
            | FstProperties::NOT_ACCEPTOR
            | FstProperties::I_DETERMINISTIC
            | FstProperties::NOT_I_DETERMINISTIC
            | FstProperties::O_DETERMINISTIC
            | FstProperties::NOT_O_DETERMINISTIC
            | FstProperties::EPSILONS
            | FstProperties::NO_EPSILONS
            | FstProperties::I_EPSILONS
            | FstProperties::NO_I_EPSILONS
            | FstProperties::O_EPSILONS
            | FstProperties::NO_O_EPSILONS
            | FstProperties::I_LABEL_SORTED
            | FstProperties::NOT_I_LABEL_SORTED
            | FstProperties::O_LABEL_SORTED
            | FstProperties::NOT_O_LABEL_SORTED
            | FstProperties::WEIGHTED
            | FstProperties::UNWEIGHTED
            | FstProperties::CYCLIC
            | FstProperties::ACYCLIC
            | FstProperties::INITIAL_CYCLIC
            | FstProperties::INITIAL_ACYCLIC
            | FstProperties::TOP_SORTED
            | FstProperties::NOT_TOP_SORTED
            | FstProperties::ACCESSIBLE
            | FstProperties::NOT_ACCESSIBLE
            | FstProperties::WEIGHTED_CYCLES
            | FstProperties::UNWEIGHTED_CYCLES)
}

/// Properties that remain valid after `add_state`. The new state is
/// isolated, so every all-states assertion involving reachability is lost
/// while the negative sides survive.
pub fn add_state_properties(inprops: FstProperties) -> FstProperties {
    let keep = FstProperties::binary_properties()
        | FstProperties::ACCEPTOR
        | FstProperties::NOT_ACCEPTOR
        | FstProperties::I_DETERMINISTIC
        | FstProperties::NOT_I_DETERMINISTIC
        | FstProperties::O_DETERMINISTIC
        | FstProperties::NOT_O_DETERMINISTIC
        | FstProperties::EPSILONS
        | FstProperties::NO_EPSILONS
        | FstProperties::I_EPSILONS
        | FstProperties::NO_I_EPSILONS
        | FstProperties::O_EPSILONS
        | FstProperties::NO_O_EPSILONS
        | FstProperties::I_LABEL_SORTED
        | FstProperties::NOT_I_LABEL_SORTED
        | FstProperties::O_LABEL_SORTED
        | FstProperties::NOT_O_LABEL_SORTED
        | FstProperties::WEIGHTED
        | FstProperties::UNWEIGHTED
        | FstProperties::CYCLIC
        | FstProperties::ACYCLIC
        | FstProperties::INITIAL_CYCLIC
        | FstProperties::INITIAL_ACYCLIC
        | FstProperties::TOP_SORTED
        | FstProperties::NOT_TOP_SORTED
        | FstProperties::NOT_ACCESSIBLE
        | FstProperties::NOT_COACCESSIBLE
        | FstProperties::NOT_STRING
        | FstProperties::WEIGHTED_CYCLES
        | FstProperties::UNWEIGHTED_CYCLES;
    inprops & keep
}

/// Properties that remain valid after appending `tr` at `state`, refined
/// against the previous last transition of that state. Keeping the sort and
/// determinism bits exactly when the appended transition preserves them is
/// what lets `tr_sort` + `add_tr` loops stay O(1) per query.
pub fn add_tr_properties<W: Semiring>(
    inprops: FstProperties,
    state: StateId,
    tr: &Transition<W>,
    prev_tr: Option<&Transition<W>>,
) -> FstProperties {
    let mut outprops = inprops;

    if tr.ilabel != tr.olabel {
        outprops |= FstProperties::NOT_ACCEPTOR;
        outprops -= FstProperties::ACCEPTOR;
    }
    if tr.ilabel == EPS_LABEL {
        outprops |= FstProperties::I_EPSILONS;
        outprops -= FstProperties::NO_I_EPSILONS;
        if tr.olabel == EPS_LABEL {
            outprops |= FstProperties::EPSILONS;
            outprops -= FstProperties::NO_EPSILONS;
        }
    }
    if tr.olabel == EPS_LABEL {
        outprops |= FstProperties::O_EPSILONS;
        outprops -= FstProperties::NO_O_EPSILONS;
    }
    if let Some(prev) = prev_tr {
        if prev.ilabel > tr.ilabel {
            outprops |= FstProperties::NOT_I_LABEL_SORTED;
            outprops -= FstProperties::I_LABEL_SORTED;
        }
        if prev.olabel > tr.olabel {
            outprops |= FstProperties::NOT_O_LABEL_SORTED;
            outprops -= FstProperties::O_LABEL_SORTED;
        }
        if prev.ilabel == tr.ilabel {
            outprops |= FstProperties::NOT_I_DETERMINISTIC;
            outprops -= FstProperties::I_DETERMINISTIC;
        }
        if prev.olabel == tr.olabel {
            outprops |= FstProperties::NOT_O_DETERMINISTIC;
            outprops -= FstProperties::O_DETERMINISTIC;
        }
    }
    // Comparing only against the previous transition is sound for the
    // determinism bits only while sortedness keeps duplicates adjacent.
    if !outprops.contains(FstProperties::I_LABEL_SORTED) {
        outprops -= FstProperties::I_DETERMINISTIC;
    }
    if !outprops.contains(FstProperties::O_LABEL_SORTED) {
        outprops -= FstProperties::O_DETERMINISTIC;
    }
    if !tr.weight.is_zero() && !tr.weight.is_one() {
        outprops |= FstProperties::WEIGHTED;
        outprops -= FstProperties::UNWEIGHTED;
    }
    if tr.nextstate <= state {
        outprops |= FstProperties::NOT_TOP_SORTED;
        outprops -= FstProperties::TOP_SORTED;
        if tr.nextstate == state {
            outprops |= FstProperties::CYCLIC;
            outprops -= FstProperties::ACYCLIC;
        }
    }

    // A new edge can connect previously unconnected structure or create a
    // cycle through existing paths; only the still-safe bits survive.
    let keep = FstProperties::binary_properties()
        | FstProperties::ACCEPTOR
        | FstProperties::NOT_ACCEPTOR
        | FstProperties::I_DETERMINISTIC
        | FstProperties::NOT_I_DETERMINISTIC
        | FstProperties::O_DETERMINISTIC
        | FstProperties::NOT_O_DETERMINISTIC
        | FstProperties::EPSILONS
        | FstProperties::NO_EPSILONS
        | FstProperties::I_EPSILONS
        | FstProperties::NO_I_EPSILONS
        | FstProperties::O_EPSILONS
        | FstProperties::NO_O_EPSILONS
        | FstProperties::I_LABEL_SORTED
        | FstProperties::NOT_I_LABEL_SORTED
        | FstProperties::O_LABEL_SORTED
        | FstProperties::NOT_O_LABEL_SORTED
        | FstProperties::WEIGHTED
        | FstProperties::UNWEIGHTED
        | FstProperties::NOT_TOP_SORTED
        | FstProperties::CYCLIC
        | FstProperties::INITIAL_CYCLIC
        | FstProperties::ACCESSIBLE
        | FstProperties::COACCESSIBLE;
    let conditional = if tr.nextstate > state {
        // Forward edges cannot create cycles or break a topological order.
        FstProperties::ACYCLIC
            | FstProperties::INITIAL_ACYCLIC
            | FstProperties::TOP_SORTED
            | FstProperties::WEIGHTED_CYCLES
            | FstProperties::UNWEIGHTED_CYCLES
    } else {
        FstProperties::empty()
    };
    outprops & (keep | conditional)
}

/// Properties that remain valid after deleting a set of states.
pub fn delete_states_properties(inprops: FstProperties) -> FstProperties {
    let keep = FstProperties::binary_properties()
        | FstProperties::ACCEPTOR
        | FstProperties::NOT_ACCEPTOR
        | FstProperties::I_DETERMINISTIC
        | FstProperties::O_DETERMINISTIC
        | FstProperties::NO_EPSILONS
        | FstProperties::NO_I_EPSILONS
        | FstProperties::NO_O_EPSILONS
        | FstProperties::I_LABEL_SORTED
        | FstProperties::O_LABEL_SORTED
        | FstProperties::UNWEIGHTED
        | FstProperties::ACYCLIC
        | FstProperties::INITIAL_ACYCLIC
        | FstProperties::UNWEIGHTED_CYCLES;
    inprops & keep
}

/// Properties after deleting every state: the empty FST's properties.
pub fn delete_all_states_properties() -> FstProperties {
    FstProperties::empty_fst_properties()
}

/// Properties that remain valid after deleting some transitions of a state.
pub fn delete_trs_properties(inprops: FstProperties) -> FstProperties {
    let keep = FstProperties::binary_properties()
        | FstProperties::ACCEPTOR
        | FstProperties::NOT_ACCEPTOR
        | FstProperties::I_DETERMINISTIC
        | FstProperties::O_DETERMINISTIC
        | FstProperties::NO_EPSILONS
        | FstProperties::NO_I_EPSILONS
        | FstProperties::NO_O_EPSILONS
        | FstProperties::I_LABEL_SORTED
        | FstProperties::O_LABEL_SORTED
        | FstProperties::UNWEIGHTED
        | FstProperties::ACYCLIC
        | FstProperties::INITIAL_ACYCLIC
        | FstProperties::TOP_SORTED
        | FstProperties::UNWEIGHTED_CYCLES;
    inprops & keep
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semirings::{Semiring, TropicalWeight};

    #[test]
    fn test_add_tr_keeps_sorted_when_in_order() {
        let props = FstProperties::I_LABEL_SORTED;
        let prev = Transition::new(1, 1, TropicalWeight::one(), 1);
        let tr = Transition::new(2, 2, TropicalWeight::one(), 2);
        let out = add_tr_properties(props, 0, &tr, Some(&prev));
        assert!(out.contains(FstProperties::I_LABEL_SORTED));
    }

    #[test]
    fn test_add_tr_clears_sorted_when_out_of_order() {
        let props = FstProperties::I_LABEL_SORTED;
        let prev = Transition::new(3, 3, TropicalWeight::one(), 1);
        let tr = Transition::new(2, 2, TropicalWeight::one(), 2);
        let out = add_tr_properties(props, 0, &tr, Some(&prev));
        assert!(!out.contains(FstProperties::I_LABEL_SORTED));
        assert!(out.contains(FstProperties::NOT_I_LABEL_SORTED));
    }

    #[test]
    fn test_self_loop_sets_cyclic() {
        let tr = Transition::new(1, 1, TropicalWeight::one(), 0);
        let out = add_tr_properties(FstProperties::ACYCLIC, 0, &tr, None);
        assert!(out.contains(FstProperties::CYCLIC));
        assert!(!out.contains(FstProperties::ACYCLIC));
    }
}
