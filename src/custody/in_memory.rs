//! Thread-safe in-memory asset host.

use std::collections::HashMap;

use parking_lot::Mutex;

use super::Funds;
use crate::domain::{Amount, AssetId, Principal};
use crate::error::AmmError;
use crate::traits::AssetTransfer;

/// A simple asset host that keeps every owner's balances in memory.
///
/// Useful for tests, simulations and as a reference for real host
/// integrations.
///
/// # Examples
///
/// ```
/// use pairswap::custody::InMemoryAssets;
/// use pairswap::domain::{Amount, AssetId, Principal};
/// use pairswap::traits::AssetTransfer;
///
/// let host = InMemoryAssets::new();
/// let alice = Principal::new("alice").unwrap();
/// let usdc = AssetId::new("USDC").unwrap();
///
/// host.fund(&alice, &usdc, Amount::new(1_000));
/// let funds = host.debit(&alice, &usdc, Amount::new(400)).unwrap();
/// assert_eq!(host.balance(&alice, &usdc), 600);
/// host.credit(&alice, funds);
/// assert_eq!(host.balance(&alice, &usdc), 1_000);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryAssets {
    balances: Mutex<HashMap<(Principal, AssetId), u128>>,
}

impl InMemoryAssets {
    /// Creates a host with no balances.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` of `asset` to `owner` out of thin air.
    pub fn fund(&self, owner: &Principal, asset: &AssetId, amount: Amount) {
        let mut balances = self.balances.lock();
        let entry = balances
            .entry((owner.clone(), asset.clone()))
            .or_insert(0);
        *entry = entry.saturating_add(u128::from(amount.get()));
    }

    /// Balance of `asset` held by `owner`.
    #[must_use]
    pub fn balance(&self, owner: &Principal, asset: &AssetId) -> u128 {
        self.balances
            .lock()
            .get(&(owner.clone(), asset.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of every owner's balance of `asset`.
    #[must_use]
    pub fn total(&self, asset: &AssetId) -> u128 {
        self.balances
            .lock()
            .iter()
            .filter(|((_, a), _)| a == asset)
            .map(|(_, v)| *v)
            .sum()
    }
}

impl AssetTransfer for InMemoryAssets {
    fn debit(&self, owner: &Principal, asset: &AssetId, amount: Amount) -> Result<Funds, AmmError> {
        let mut balances = self.balances.lock();
        let key = (owner.clone(), asset.clone());
        let held = balances.get(&key).copied().unwrap_or(0);
        let remaining = held
            .checked_sub(u128::from(amount.get()))
            .ok_or(AmmError::InsufficientFunds)?;
        balances.insert(key, remaining);
        Ok(Funds::issue(asset.clone(), amount))
    }

    fn credit(&self, owner: &Principal, funds: Funds) {
        let (asset, amount) = funds.into_parts();
        let mut balances = self.balances.lock();
        let entry = balances.entry((owner.clone(), asset)).or_insert(0);
        *entry = entry.saturating_add(u128::from(amount.get()));
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn principal(name: &str) -> Principal {
        let Ok(p) = Principal::new(name) else {
            panic!("valid principal");
        };
        p
    }

    fn asset(id: &str) -> AssetId {
        let Ok(a) = AssetId::new(id) else {
            panic!("valid asset id");
        };
        a
    }

    #[test]
    fn debit_requires_balance() {
        let host = InMemoryAssets::new();
        let alice = principal("alice");
        let usdc = asset("USDC");
        host.fund(&alice, &usdc, Amount::new(10));
        assert!(matches!(
            host.debit(&alice, &usdc, Amount::new(11)),
            Err(AmmError::InsufficientFunds)
        ));
        assert_eq!(host.balance(&alice, &usdc), 10);
    }

    #[test]
    fn credit_moves_between_owners() {
        let host = InMemoryAssets::new();
        let alice = principal("alice");
        let bob = principal("bob");
        let usdc = asset("USDC");
        host.fund(&alice, &usdc, Amount::new(10));
        let Ok(funds) = host.debit(&alice, &usdc, Amount::new(7)) else {
            panic!("debit within balance");
        };
        host.credit(&bob, funds);
        assert_eq!(host.balance(&alice, &usdc), 3);
        assert_eq!(host.balance(&bob, &usdc), 7);
        assert_eq!(host.total(&usdc), 10);
    }

    #[test]
    fn balances_are_per_asset() {
        let host = InMemoryAssets::new();
        let alice = principal("alice");
        host.fund(&alice, &asset("USDC"), Amount::new(5));
        assert_eq!(host.balance(&alice, &asset("ETH")), 0);
        assert_eq!(host.total(&asset("ETH")), 0);
    }
}
