//! Pool identifiers, registry entries and reserve snapshots.

use core::fmt;

use super::{Amount, AssetId, PairKey};

/// Creation-sequence index of a pool in the registry.
///
/// Ids are dense, start at zero, and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PoolId(u64);

impl PoolId {
    /// Wraps a raw index.
    #[must_use]
    pub const fn new(index: u64) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pool#{}", self.0)
    }
}

/// One entry of the registry's enumerable pool list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolInfo {
    /// Lower asset of the pair.
    pub asset_low: AssetId,
    /// Higher asset of the pair.
    pub asset_high: AssetId,
    /// Handle id of the pool.
    pub pool_id: PoolId,
}

impl PoolInfo {
    /// Builds the entry for a freshly created pool.
    #[must_use]
    pub fn new(pair: &PairKey, pool_id: PoolId) -> Self {
        Self {
            asset_low: pair.low().clone(),
            asset_high: pair.high().clone(),
            pool_id,
        }
    }
}

/// Result of `get_reserves`: reserves in canonical low/high order and the
/// time of the last state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reserves {
    /// Reserve of the low asset.
    pub reserve_low: Amount,
    /// Reserve of the high asset.
    pub reserve_high: Amount,
    /// Seconds timestamp of the last successful operation.
    pub last_update_time: u64,
}

impl Reserves {
    /// Empty reserves, also reported for unknown pools.
    pub const EMPTY: Self = Self {
        reserve_low: Amount::ZERO,
        reserve_high: Amount::ZERO,
        last_update_time: 0,
    };

    /// Returns `true` when either side is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.reserve_low.is_zero() || self.reserve_high.is_zero()
    }
}
