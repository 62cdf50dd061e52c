pub use self::determinize_fsa_op::{DeterminizeFsa, DeterminizeFsaOp};
pub use self::determinize_static::{
    determinize, determinize_fsa, determinize_with_config, DeterminizeConfig,
};
pub use self::divisors::{
    CommonDivisor, DefaultCommonDivisor, GallicCommonDivisor, LabelCommonDivisor,
};
pub(crate) use self::element::{DeterminizeElement, WeightedSubset};

mod determinize_fsa_op;
mod determinize_static;
mod divisors;
mod element;

/// Determinization type.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub enum DeterminizeType {
    /// Input transducer is known to be functional (or error).
    DeterminizeFunctional,
    /// Input transducer is NOT known to be functional.
    DeterminizeNonFunctional,
    /// Input transducer is not known to be functional but only keep the
    /// min of ambiguous outputs.
    DeterminizeDisambiguate,
}
