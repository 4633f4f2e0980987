//! Per-pool escrow.

use std::collections::BTreeMap;

use super::Funds;
use crate::domain::{Amount, AssetId, PoolId};
use crate::error::AmmError;

/// The isolated balance sheet backing one pool's reserves.
///
/// Only the owning pool can move funds in or out; everything else gets a
/// read-only view through [`Custody::balance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Custody {
    id: PoolId,
    balances: BTreeMap<AssetId, u128>,
}

impl Custody {
    pub(crate) fn new(id: PoolId) -> Self {
        Self {
            id,
            balances: BTreeMap::new(),
        }
    }

    /// Identifier of the pool this custody belongs to.
    #[must_use]
    pub const fn id(&self) -> PoolId {
        self.id
    }

    /// Balance currently held for `asset`.
    #[must_use]
    pub fn balance(&self, asset: &AssetId) -> u128 {
        self.balances.get(asset).copied().unwrap_or(0)
    }

    /// Takes ownership of `funds`.
    ///
    /// Balances are `u128` while every deposit is bounded by `u64`, so the
    /// saturating add is unreachable in practice.
    pub(crate) fn deposit(&mut self, funds: Funds) {
        let (asset, amount) = funds.into_parts();
        let entry = self.balances.entry(asset).or_insert(0);
        *entry = entry.saturating_add(u128::from(amount.get()));
    }

    /// Releases `amount` of `asset`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientLiquidity`] if the held balance is
    /// smaller than `amount`.  That only happens if pool bookkeeping has
    /// diverged from custody.
    pub(crate) fn withdraw(&mut self, asset: &AssetId, amount: Amount) -> Result<Funds, AmmError> {
        let held = self.balance(asset);
        let Some(remaining) = held.checked_sub(u128::from(amount.get())) else {
            tracing::error!(
                pool = %self.id,
                %asset,
                held = %held,
                requested = %amount,
                "custody shortfall"
            );
            return Err(AmmError::InsufficientLiquidity);
        };
        self.balances.insert(asset.clone(), remaining);
        Ok(Funds::issue(asset.clone(), amount))
    }
}
