pub use self::error_weight::ErrorWeight;
pub use self::expectation_weight::{ExpectationWeight, ModuleOver};
pub use self::float_weight::Float;
pub use self::gallic_weight::GallicWeight;
pub use self::lexicographic_weight::LexicographicWeight;
pub use self::log_weight::{Log64Weight, LogWeight, LogWeightGeneric};
pub use self::minmax_weight::MinMaxWeight;
pub use self::power_weight::PowerWeight;
pub use self::product_weight::ProductWeight;
pub use self::real_weight::{Real64Weight, RealWeight, RealWeightGeneric};
pub use self::semiring::{
    CompleteSemiring, DivideType, Semiring, SemiringProperties, SerializableSemiring,
    StarSemiring, WeaklyDivisibleSemiring, WeightQuantize,
};
pub use self::signed_log_weight::SignedLogWeight;
pub use self::sparse_power_weight::SparsePowerWeight;
pub use self::string_weight::{
    StringWeightLeft, StringWeightRestrict, StringWeightRight, StringWeightVariant,
};
pub use self::tropical_weight::TropicalWeight;

mod error_weight;
mod expectation_weight;
mod float_weight;
mod gallic_weight;
mod lexicographic_weight;
mod log_weight;
mod minmax_weight;
mod power_weight;
mod product_weight;
mod real_weight;
mod semiring;
mod signed_log_weight;
mod sparse_power_weight;
mod string_weight;
mod tropical_weight;
