//! Graph algorithms and combinators over the FST traits: composition with
//! pluggable matchers and epsilon filters, the rational operations, and
//! the optimization passes (connect, determinize, epsilon removal,
//! shortest distance and path, pushing, sorting).

pub use self::closure::{closure, ClosureFst, ClosureType};
pub use self::complement::ComplementFst;
pub use self::concat::{concat, ConcatFst};
pub use self::connect::{condense, connect};
pub use self::determinize::{determinize, determinize_with_config, DeterminizeConfig, DeterminizeType};
pub use self::difference::difference;
pub use self::encode::{decode, encode, EncodeMapper, EncodeType};
pub use self::fst_convert::{fst_convert, fst_convert_from_ref};
pub use self::intersect::intersect;
pub use self::invert::invert;
pub use self::isomorphic::isomorphic;
pub use self::project::{project, ProjectType};
pub use self::push::{push, push_weights, PushType};
pub use self::queues::{
    AutoQueue, FifoQueue, LifoQueue, NaturalShortestFirstQueue, Queue, QueueType, StateOrderQueue,
    TopOrderQueue,
};
pub use self::relabel::relabel;
pub use self::replace::{replace, replace_fst, ReplaceFst, ReplaceFstConfig};
pub use self::reverse::reverse;
pub use self::reweight::{reweight, ReweightType};
pub use self::rm_epsilon::rm_epsilon;
pub use self::shortest_distance::{
    shortest_distance, shortest_distance_with_config, ShortestDistanceConfig,
};
pub use self::shortest_path::{shortest_path, shortest_path_with_config, ShortestPathConfig};
pub use self::state_sort::state_sort;
pub use self::top_sort::top_sort;
pub use self::tr_sort::{ilabel_compare, olabel_compare, tr_sort};
pub use self::tr_sum::{tr_sum, tr_unique};
pub use self::union::{union, UnionFst};

pub mod compose;
pub mod determinize;
pub mod dfs_visit;
pub mod factor_weight;
pub mod lookahead_matchers;
pub mod tr_mappers;
pub mod weight_converters;

mod closure;
mod complement;
mod concat;
mod connect;
mod difference;
mod encode;
mod fst_convert;
mod intersect;
mod invert;
mod isomorphic;
mod project;
mod push;
mod queues;
mod relabel;
mod replace;
mod reverse;
mod reweight;
mod rm_epsilon;
mod shortest_distance;
mod shortest_path;
mod state_sort;
mod top_sort;
mod tr_sort;
mod tr_sum;
mod union;
