//! Pair registry: one pool per unordered asset pair.

mod pair_registry;

pub use pair_registry::{PairRegistry, PoolHandle};
