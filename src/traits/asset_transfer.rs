//! Host asset-transfer capability.

use std::sync::Arc;

use crate::custody::Funds;
use crate::domain::{Amount, AssetId, Principal};
use crate::error::AmmError;

/// Debit/credit primitives for the real underlying assets.
///
/// The engine never touches host balances directly.  It asks the host to
/// debit an owner, receiving [`Funds`], and later hands [`Funds`] back to be
/// credited.
///
/// # Contract
///
/// - `debit` either removes exactly `amount` from `owner` and returns
///   funds carrying that amount, or fails without side effects.
/// - `credit` always succeeds; the funds become part of `owner`'s balance.
pub trait AssetTransfer: Send + Sync {
    /// Removes `amount` of `asset` from `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientFunds`] if `owner` holds less than
    /// `amount`.
    fn debit(&self, owner: &Principal, asset: &AssetId, amount: Amount) -> Result<Funds, AmmError>;

    /// Adds `funds` to `owner`.
    fn credit(&self, owner: &Principal, funds: Funds);
}

impl<T: AssetTransfer + ?Sized> AssetTransfer for Arc<T> {
    fn debit(&self, owner: &Principal, asset: &AssetId, amount: Amount) -> Result<Funds, AmmError> {
        (**self).debit(owner, asset, amount)
    }

    fn credit(&self, owner: &Principal, funds: Funds) {
        (**self).credit(owner, funds);
    }
}
