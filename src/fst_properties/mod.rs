pub use self::compute::compute_fst_properties;
pub use self::mutable_properties::{
    add_state_properties, add_tr_properties, delete_all_states_properties,
    delete_states_properties, delete_trs_properties, set_final_properties, set_start_properties,
};

mod compute;
mod mutable_properties;
pub mod op_properties;

use bitflags::bitflags;

bitflags! {
    /// Capability facts about an FST, two bits per ternary property (a
    /// `yes` bit and a `no` bit; neither set means unknown) plus single
    /// bits for the binary ones. Every asserted bit must hold of the graph
    /// at the moment it is read.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FstProperties: u64 {
        /// The FST is an ExpandedFst.
        const EXPANDED = 0x1;
        /// The FST is a MutableFst.
        const MUTABLE = 0x2;
        /// An error was detected while constructing or operating on the FST.
        const ERROR = 0x4;

        /// ilabel == olabel on every transition.
        const ACCEPTOR = 0x10;
        const NOT_ACCEPTOR = 0x20;

        /// No state has two transitions with the same input label.
        const I_DETERMINISTIC = 0x40;
        const NOT_I_DETERMINISTIC = 0x80;

        const O_DETERMINISTIC = 0x100;
        const NOT_O_DETERMINISTIC = 0x200;

        /// Some transition has both labels epsilon.
        const EPSILONS = 0x400;
        const NO_EPSILONS = 0x800;

        const I_EPSILONS = 0x1000;
        const NO_I_EPSILONS = 0x2000;

        const O_EPSILONS = 0x4000;
        const NO_O_EPSILONS = 0x8000;

        /// Transitions of every state are sorted by input label.
        const I_LABEL_SORTED = 0x1_0000;
        const NOT_I_LABEL_SORTED = 0x2_0000;

        const O_LABEL_SORTED = 0x4_0000;
        const NOT_O_LABEL_SORTED = 0x8_0000;

        /// Some transition or final weight is neither One nor Zero.
        const WEIGHTED = 0x10_0000;
        const UNWEIGHTED = 0x20_0000;

        const CYCLIC = 0x40_0000;
        const ACYCLIC = 0x80_0000;

        /// The start state lies on a cycle.
        const INITIAL_CYCLIC = 0x100_0000;
        const INITIAL_ACYCLIC = 0x200_0000;

        /// Every transition goes from a lower to a higher state id.
        const TOP_SORTED = 0x400_0000;
        const NOT_TOP_SORTED = 0x800_0000;

        /// Every state is reachable from the start state.
        const ACCESSIBLE = 0x1000_0000;
        const NOT_ACCESSIBLE = 0x2000_0000;

        /// A final state is reachable from every state.
        const COACCESSIBLE = 0x4000_0000;
        const NOT_COACCESSIBLE = 0x8000_0000;

        /// One accessible path from start to a final state covers every
        /// state.
        const STRING = 0x1_0000_0000;
        const NOT_STRING = 0x2_0000_0000;

        /// Some cycle carries a weight other than One.
        const WEIGHTED_CYCLES = 0x4_0000_0000;
        const UNWEIGHTED_CYCLES = 0x8_0000_0000;
    }
}

impl FstProperties {
    /// Binary (non-ternary) property bits.
    pub fn binary_properties() -> FstProperties {
        FstProperties::EXPANDED | FstProperties::MUTABLE | FstProperties::ERROR
    }

    /// All `yes` bits of the ternary properties.
    pub fn pos_trinary_properties() -> FstProperties {
        FstProperties::ACCEPTOR
            | FstProperties::I_DETERMINISTIC
            | FstProperties::O_DETERMINISTIC
            | FstProperties::EPSILONS
            | FstProperties::I_EPSILONS
            | FstProperties::O_EPSILONS
            | FstProperties::I_LABEL_SORTED
            | FstProperties::O_LABEL_SORTED
            | FstProperties::WEIGHTED
            | FstProperties::CYCLIC
            | FstProperties::INITIAL_CYCLIC
            | FstProperties::TOP_SORTED
            | FstProperties::ACCESSIBLE
            | FstProperties::COACCESSIBLE
            | FstProperties::STRING
            | FstProperties::WEIGHTED_CYCLES
    }

    /// All `no` bits of the ternary properties.
    pub fn neg_trinary_properties() -> FstProperties {
        FstProperties::NOT_ACCEPTOR
            | FstProperties::NOT_I_DETERMINISTIC
            | FstProperties::NOT_O_DETERMINISTIC
            | FstProperties::NO_EPSILONS
            | FstProperties::NO_I_EPSILONS
            | FstProperties::NO_O_EPSILONS
            | FstProperties::NOT_I_LABEL_SORTED
            | FstProperties::NOT_O_LABEL_SORTED
            | FstProperties::UNWEIGHTED
            | FstProperties::ACYCLIC
            | FstProperties::INITIAL_ACYCLIC
            | FstProperties::NOT_TOP_SORTED
            | FstProperties::NOT_ACCESSIBLE
            | FstProperties::NOT_COACCESSIBLE
            | FstProperties::NOT_STRING
            | FstProperties::UNWEIGHTED_CYCLES
    }

    pub fn trinary_properties() -> FstProperties {
        Self::pos_trinary_properties() | Self::neg_trinary_properties()
    }

    pub fn all_properties() -> FstProperties {
        Self::binary_properties() | Self::trinary_properties()
    }

    /// Properties meaningfully copied from one representation of the same
    /// graph to another.
    pub fn copy_properties() -> FstProperties {
        Self::all_properties() - (FstProperties::EXPANDED | FstProperties::MUTABLE)
    }

    /// Bits that are *known*: for each ternary property, both bits of the
    /// pair are returned when either is set.
    pub fn known_properties(self) -> FstProperties {
        let mut known = Self::binary_properties();
        for (yes, no) in Self::trinary_pairs() {
            if self.intersects(yes | no) {
                known |= yes | no;
            }
        }
        known
    }

    /// The sixteen `(yes, no)` ternary pairs.
    pub fn trinary_pairs() -> [(FstProperties, FstProperties); 16] {
        [
            (FstProperties::ACCEPTOR, FstProperties::NOT_ACCEPTOR),
            (
                FstProperties::I_DETERMINISTIC,
                FstProperties::NOT_I_DETERMINISTIC,
            ),
            (
                FstProperties::O_DETERMINISTIC,
                FstProperties::NOT_O_DETERMINISTIC,
            ),
            (FstProperties::EPSILONS, FstProperties::NO_EPSILONS),
            (FstProperties::I_EPSILONS, FstProperties::NO_I_EPSILONS),
            (FstProperties::O_EPSILONS, FstProperties::NO_O_EPSILONS),
            (
                FstProperties::I_LABEL_SORTED,
                FstProperties::NOT_I_LABEL_SORTED,
            ),
            (
                FstProperties::O_LABEL_SORTED,
                FstProperties::NOT_O_LABEL_SORTED,
            ),
            (FstProperties::WEIGHTED, FstProperties::UNWEIGHTED),
            (FstProperties::CYCLIC, FstProperties::ACYCLIC),
            (
                FstProperties::INITIAL_CYCLIC,
                FstProperties::INITIAL_ACYCLIC,
            ),
            (FstProperties::TOP_SORTED, FstProperties::NOT_TOP_SORTED),
            (FstProperties::ACCESSIBLE, FstProperties::NOT_ACCESSIBLE),
            (FstProperties::COACCESSIBLE, FstProperties::NOT_COACCESSIBLE),
            (FstProperties::STRING, FstProperties::NOT_STRING),
            (
                FstProperties::WEIGHTED_CYCLES,
                FstProperties::UNWEIGHTED_CYCLES,
            ),
        ]
    }

    /// True when no ternary pair has both of its bits set.
    pub fn is_consistent(self) -> bool {
        Self::trinary_pairs()
            .iter()
            .all(|(yes, no)| !(self.contains(*yes) && self.contains(*no)))
    }

    /// Properties of the empty FST (no states): vacuously deterministic,
    /// epsilon-free, sorted, acyclic and unweighted.
    pub fn empty_fst_properties() -> FstProperties {
        FstProperties::ACCEPTOR
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
            | FstProperties::ACCESSIBLE
            | FstProperties::COACCESSIBLE
            | FstProperties::STRING
            | FstProperties::UNWEIGHTED_CYCLES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_properties() {
        let props = FstProperties::ACCEPTOR | FstProperties::CYCLIC;
        let known = props.known_properties();
        assert!(known.contains(FstProperties::ACCEPTOR | FstProperties::NOT_ACCEPTOR));
        assert!(known.contains(FstProperties::CYCLIC | FstProperties::ACYCLIC));
        assert!(!known.contains(FstProperties::WEIGHTED));
    }

    #[test]
    fn test_consistency() {
        assert!(FstProperties::empty_fst_properties().is_consistent());
        let bad = FstProperties::ACCEPTOR | FstProperties::NOT_ACCEPTOR;
        assert!(!bad.is_consistent());
    }
}
