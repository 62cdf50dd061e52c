//! Pure property-propagation functions, one per combinator. Every bit a
//! function asserts must hold of the combinator's output whenever the
//! corresponding input bits hold of its inputs; unknown bits are simply
//! dropped.

use crate::fst_properties::FstProperties;

fn error_of(p: FstProperties) -> FstProperties {
    p & FstProperties::ERROR
}

/// Properties of `compose(p1, p2)`; also used by intersect and difference.
pub fn compose_properties(p1: FstProperties, p2: FstProperties) -> FstProperties {
    let mut out = error_of(p1 | p2);
    // States are created on demand from the composed start.
    out |= FstProperties::ACCESSIBLE;
    out |= (FstProperties::ACYCLIC | FstProperties::INITIAL_ACYCLIC) & p1 & p2;
    if p1.contains(FstProperties::ACCEPTOR) && p2.contains(FstProperties::ACCEPTOR) {
        out |= FstProperties::ACCEPTOR;
        out |= (FstProperties::NO_EPSILONS
            | FstProperties::NO_I_EPSILONS
            | FstProperties::NO_O_EPSILONS)
            & p1
            & p2;
        if (p1 & p2).contains(FstProperties::NO_I_EPSILONS) {
            out |= (FstProperties::I_DETERMINISTIC | FstProperties::O_DETERMINISTIC) & p1 & p2;
        }
    }
    out
}

/// Properties of `union(p1, p2)` built with a fresh epsilon-fanout start.
pub fn union_properties(p1: FstProperties, p2: FstProperties) -> FstProperties {
    let mut out = error_of(p1 | p2);
    out |= (FstProperties::ACCEPTOR
        | FstProperties::UNWEIGHTED
        | FstProperties::ACYCLIC
        | FstProperties::ACCESSIBLE
        | FstProperties::COACCESSIBLE
        | FstProperties::UNWEIGHTED_CYCLES)
        & p1
        & p2;
    out |= (FstProperties::NOT_ACCEPTOR
        | FstProperties::WEIGHTED
        | FstProperties::CYCLIC
        | FstProperties::NOT_ACCESSIBLE
        | FstProperties::NOT_COACCESSIBLE
        | FstProperties::NOT_I_DETERMINISTIC
        | FstProperties::NOT_O_DETERMINISTIC
        | FstProperties::NOT_TOP_SORTED
        | FstProperties::WEIGHTED_CYCLES
        | FstProperties::I_EPSILONS
        | FstProperties::O_EPSILONS
        | FstProperties::EPSILONS
        | FstProperties::NOT_STRING)
        & (p1 | p2);
    out |= FstProperties::INITIAL_ACYCLIC;
    out
}

/// Properties of `concat(p1, p2)` built with epsilon bridges from the
/// final states of the first operand to the start of the second.
pub fn concat_properties(p1: FstProperties, p2: FstProperties) -> FstProperties {
    let mut out = error_of(p1 | p2);
    out |= (FstProperties::ACCEPTOR
        | FstProperties::UNWEIGHTED
        | FstProperties::ACYCLIC
        | FstProperties::UNWEIGHTED_CYCLES)
        & p1
        & p2;
    out |= (FstProperties::NOT_ACCEPTOR
        | FstProperties::WEIGHTED
        | FstProperties::CYCLIC
        | FstProperties::NOT_ACCESSIBLE
        | FstProperties::NOT_COACCESSIBLE
        | FstProperties::NOT_TOP_SORTED
        | FstProperties::WEIGHTED_CYCLES
        | FstProperties::I_EPSILONS
        | FstProperties::O_EPSILONS
        | FstProperties::EPSILONS
        | FstProperties::NOT_STRING)
        & (p1 | p2);
    out |= FstProperties::INITIAL_ACYCLIC & p1;
    out
}

/// Properties of `closure(p)`; `star` adds an empty-string accepting start.
pub fn closure_properties(p: FstProperties, _star: bool) -> FstProperties {
    let mut out = error_of(p);
    out |= (FstProperties::ACCEPTOR
        | FstProperties::UNWEIGHTED
        | FstProperties::ACCESSIBLE
        | FstProperties::COACCESSIBLE)
        & p;
    out |= (FstProperties::NOT_ACCEPTOR
        | FstProperties::WEIGHTED
        | FstProperties::CYCLIC
        | FstProperties::NOT_ACCESSIBLE
        | FstProperties::NOT_COACCESSIBLE
        | FstProperties::NOT_I_DETERMINISTIC
        | FstProperties::NOT_O_DETERMINISTIC
        | FstProperties::NOT_TOP_SORTED
        | FstProperties::I_EPSILONS
        | FstProperties::O_EPSILONS
        | FstProperties::EPSILONS
        | FstProperties::NOT_STRING)
        & p;
    out
}

/// Properties of the delayed complement of a deterministic, unweighted,
/// epsilon-free acceptor.
pub fn complement_properties(p: FstProperties) -> FstProperties {
    error_of(p)
        | FstProperties::ACCEPTOR
        | FstProperties::UNWEIGHTED
        | FstProperties::NO_EPSILONS
        | FstProperties::NO_I_EPSILONS
        | FstProperties::NO_O_EPSILONS
        | FstProperties::UNWEIGHTED_CYCLES
}

/// Properties of `invert(p)`: the input and output sides swap roles.
pub fn invert_properties(p: FstProperties) -> FstProperties {
    let mut out = p
        & !(FstProperties::I_DETERMINISTIC
            | FstProperties::NOT_I_DETERMINISTIC
            | FstProperties::O_DETERMINISTIC
            | FstProperties::NOT_O_DETERMINISTIC
            | FstProperties::I_EPSILONS
            | FstProperties::NO_I_EPSILONS
            | FstProperties::O_EPSILONS
            | FstProperties::NO_O_EPSILONS
            | FstProperties::I_LABEL_SORTED
            | FstProperties::NOT_I_LABEL_SORTED
            | FstProperties::O_LABEL_SORTED
            | FstProperties::NOT_O_LABEL_SORTED);
    let pairs = [
        (FstProperties::I_DETERMINISTIC, FstProperties::O_DETERMINISTIC),
        (
            FstProperties::NOT_I_DETERMINISTIC,
            FstProperties::NOT_O_DETERMINISTIC,
        ),
        (FstProperties::I_EPSILONS, FstProperties::O_EPSILONS),
        (FstProperties::NO_I_EPSILONS, FstProperties::NO_O_EPSILONS),
        (FstProperties::I_LABEL_SORTED, FstProperties::O_LABEL_SORTED),
        (
            FstProperties::NOT_I_LABEL_SORTED,
            FstProperties::NOT_O_LABEL_SORTED,
        ),
    ];
    for (i_bit, o_bit) in pairs {
        if p.contains(i_bit) {
            out |= o_bit;
        }
        if p.contains(o_bit) {
            out |= i_bit;
        }
    }
    out
}

/// Properties of `project(p)`: the kept side is copied onto the other.
pub fn project_properties(p: FstProperties, project_input: bool) -> FstProperties {
    let mut out = p
        & !(FstProperties::NOT_ACCEPTOR
            | FstProperties::I_DETERMINISTIC
            | FstProperties::NOT_I_DETERMINISTIC
            | FstProperties::O_DETERMINISTIC
            | FstProperties::NOT_O_DETERMINISTIC
            | FstProperties::I_EPSILONS
            | FstProperties::NO_I_EPSILONS
            | FstProperties::O_EPSILONS
            | FstProperties::NO_O_EPSILONS
            | FstProperties::I_LABEL_SORTED
            | FstProperties::NOT_I_LABEL_SORTED
            | FstProperties::O_LABEL_SORTED
            | FstProperties::NOT_O_LABEL_SORTED);
    out |= FstProperties::ACCEPTOR;
    let (det, ndet, eps, noeps, sorted, nsorted) = if project_input {
        (
            FstProperties::I_DETERMINISTIC,
            FstProperties::NOT_I_DETERMINISTIC,
            FstProperties::I_EPSILONS,
            FstProperties::NO_I_EPSILONS,
            FstProperties::I_LABEL_SORTED,
            FstProperties::NOT_I_LABEL_SORTED,
        )
    } else {
        (
            FstProperties::O_DETERMINISTIC,
            FstProperties::NOT_O_DETERMINISTIC,
            FstProperties::O_EPSILONS,
            FstProperties::NO_O_EPSILONS,
            FstProperties::O_LABEL_SORTED,
            FstProperties::NOT_O_LABEL_SORTED,
        )
    };
    if p.contains(det) {
        out |= FstProperties::I_DETERMINISTIC | FstProperties::O_DETERMINISTIC;
    }
    if p.contains(ndet) {
        out |= FstProperties::NOT_I_DETERMINISTIC | FstProperties::NOT_O_DETERMINISTIC;
    }
    if p.contains(eps) {
        out |= FstProperties::I_EPSILONS | FstProperties::O_EPSILONS | FstProperties::EPSILONS;
        out -= FstProperties::NO_EPSILONS;
    }
    if p.contains(noeps) {
        out |= FstProperties::NO_I_EPSILONS
            | FstProperties::NO_O_EPSILONS
            | FstProperties::NO_EPSILONS;
        out -= FstProperties::EPSILONS;
    }
    if p.contains(sorted) {
        out |= FstProperties::I_LABEL_SORTED | FstProperties::O_LABEL_SORTED;
    }
    if p.contains(nsorted) {
        out |= FstProperties::NOT_I_LABEL_SORTED | FstProperties::NOT_O_LABEL_SORTED;
    }
    out
}

/// Properties surviving an arbitrary relabeling: everything that does not
/// depend on the identity of the labels.
pub fn relabel_properties(p: FstProperties) -> FstProperties {
    p & (FstProperties::ERROR
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
        | FstProperties::COACCESSIBLE
        | FstProperties::NOT_COACCESSIBLE
        | FstProperties::STRING
        | FstProperties::NOT_STRING
        | FstProperties::WEIGHTED_CYCLES
        | FstProperties::UNWEIGHTED_CYCLES)
}

/// Properties of `reverse(p)` with its superinitial state.
pub fn reverse_properties(p: FstProperties) -> FstProperties {
    let mut out = error_of(p);
    out |= (FstProperties::ACCEPTOR
        | FstProperties::NOT_ACCEPTOR
        | FstProperties::CYCLIC
        | FstProperties::WEIGHTED
        | FstProperties::WEIGHTED_CYCLES
        | FstProperties::UNWEIGHTED_CYCLES
        | FstProperties::I_EPSILONS
        | FstProperties::O_EPSILONS
        | FstProperties::EPSILONS)
        & p;
    if p.contains(FstProperties::COACCESSIBLE) {
        out |= FstProperties::ACCESSIBLE;
    }
    if p.contains(FstProperties::ACCESSIBLE) && p.contains(FstProperties::COACCESSIBLE) {
        out |= FstProperties::COACCESSIBLE;
    }
    out
}

/// Properties of a weighted subset construction.
pub fn determinize_properties(p: FstProperties) -> FstProperties {
    let mut out = error_of(p);
    out |= FstProperties::I_DETERMINISTIC | FstProperties::ACCESSIBLE;
    out |= (FstProperties::ACYCLIC | FstProperties::INITIAL_ACYCLIC) & p;
    if p.contains(FstProperties::ACCEPTOR) {
        out |= FstProperties::ACCEPTOR;
        out |= (FstProperties::NO_I_EPSILONS | FstProperties::NO_O_EPSILONS
            | FstProperties::NO_EPSILONS)
            & p;
    }
    out
}

/// Properties after removal of double-epsilon transitions.
pub fn rm_epsilon_properties(p: FstProperties) -> FstProperties {
    let mut out = error_of(p);
    out |= FstProperties::NO_EPSILONS;
    out |= (FstProperties::ACCEPTOR
        | FstProperties::NOT_ACCEPTOR
        | FstProperties::ACYCLIC
        | FstProperties::INITIAL_ACYCLIC
        | FstProperties::UNWEIGHTED)
        & p;
    out
}

/// Properties of the n-best output tree.
pub fn shortest_path_properties(nshortest: usize) -> FstProperties {
    let mut out = FstProperties::ACYCLIC
        | FstProperties::INITIAL_ACYCLIC
        | FstProperties::ACCESSIBLE
        | FstProperties::COACCESSIBLE
        | FstProperties::UNWEIGHTED_CYCLES;
    if nshortest == 1 {
        out |= FstProperties::I_DETERMINISTIC | FstProperties::O_DETERMINISTIC;
    }
    out
}

/// Properties surviving a pure reweighting (pushing included): the whole
/// graph structure, nothing about the weights.
pub fn reweight_properties(p: FstProperties) -> FstProperties {
    p & (FstProperties::ERROR
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
        | FstProperties::CYCLIC
        | FstProperties::ACYCLIC
        | FstProperties::INITIAL_CYCLIC
        | FstProperties::INITIAL_ACYCLIC
        | FstProperties::TOP_SORTED
        | FstProperties::NOT_TOP_SORTED
        | FstProperties::ACCESSIBLE
        | FstProperties::NOT_ACCESSIBLE
        | FstProperties::COACCESSIBLE
        | FstProperties::NOT_COACCESSIBLE
        | FstProperties::STRING
        | FstProperties::NOT_STRING)
}

/// Properties of the replace expansion; only what holds of any reachable
/// product of the component machines is claimed.
pub fn replace_properties(root: FstProperties) -> FstProperties {
    error_of(root) | FstProperties::ACCESSIBLE
}

/// Properties surviving a weight-only map that may change weight values
/// but neither labels nor topology.
pub fn weight_map_properties(p: FstProperties) -> FstProperties {
    p & !(FstProperties::WEIGHTED
        | FstProperties::UNWEIGHTED
        | FstProperties::WEIGHTED_CYCLES
        | FstProperties::UNWEIGHTED_CYCLES)
}

/// Properties of the factored expansion of composite weights.
pub fn factor_weight_properties(p: FstProperties) -> FstProperties {
    error_of(p) | (FstProperties::ACCESSIBLE & p) | (FstProperties::ACYCLIC & p)
}
