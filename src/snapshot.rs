//! Point-in-time export of exchange state.
//!
//! The layout mirrors how the state would be persisted: a pool table keyed
//! by canonical [`PairKey`], a share-balance table keyed by
//! `(pool, holder)`, and the registry list in creation order.  With the `serde` feature the
//! snapshot serializes to any serde format.

use crate::domain::{Amount, PairKey, PoolId, PoolInfo, Principal, Shares};

/// Everything [`Exchange::snapshot`](crate::exchange::Exchange::snapshot)
/// exports.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExchangeSnapshot {
    /// Protocol fee recipient.
    pub fee_to: Option<Principal>,
    /// Fee administrator.
    pub fee_to_setter: Principal,
    /// Registry list in creation order.
    pub registry: Vec<PoolInfo>,
    /// Pool table, one row per pair, sorted by [`PairKey`].
    pub pools: Vec<PoolRecord>,
    /// Non-zero share balances, sorted by pool then holder.
    pub share_balances: Vec<ShareBalanceRecord>,
}

/// One row of the pool table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolRecord {
    /// Canonical pair, the row key.
    pub pair: PairKey,
    /// Pool id.
    pub pool_id: PoolId,
    /// Low reserve.
    pub reserve_low: Amount,
    /// High reserve.
    pub reserve_high: Amount,
    /// Time of the last state change.
    pub last_update_time: u64,
    /// Reserve product recorded at the last state change.
    pub cumulative_product: u128,
    /// Reserve product at the last liquidity event with the fee on.
    pub k_last: u128,
    /// Total share supply.
    pub total_supply: Shares,
    /// Locked shares.
    pub locked: Shares,
}

/// One row of the share-balance table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShareBalanceRecord {
    /// Pool the shares belong to.
    pub pool_id: PoolId,
    /// Holder.
    pub holder: Principal,
    /// Balance.
    pub shares: Shares,
}

impl ExchangeSnapshot {
    /// Row of the pool table for `pair`.
    #[must_use]
    pub fn pool(&self, pair: &PairKey) -> Option<&PoolRecord> {
        self.pools
            .binary_search_by(|r| r.pair.cmp(pair))
            .ok()
            .and_then(|i| self.pools.get(i))
    }

    /// Balance of `holder` in `pool_id`; zero if absent.
    #[must_use]
    pub fn share_balance(&self, pool_id: PoolId, holder: &Principal) -> Shares {
        self.share_balances
            .iter()
            .find(|r| r.pool_id == pool_id && &r.holder == holder)
            .map_or(Shares::ZERO, |r| r.shares)
    }
}
