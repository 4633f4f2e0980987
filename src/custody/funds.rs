//! Owned, non-duplicable asset amounts.

use crate::domain::{Amount, AssetId};

/// An amount of one asset in flight between a host and a pool.
///
/// `Funds` cannot be copied or cloned.  Every value must end up in exactly
/// one place: [`Custody::deposit`](super::Custody::deposit),
/// [`AssetTransfer::credit`](crate::traits::AssetTransfer::credit), or
/// [`Funds::into_parts`].  Dropping non-empty funds reports a leak through
/// `tracing::error!`.
#[derive(Debug)]
#[must_use = "funds must be deposited or credited back"]
pub struct Funds {
    asset: AssetId,
    amount: Amount,
}

impl Funds {
    /// Brings `amount` of `asset` into existence.
    ///
    /// Only asset hosts should call this, from inside their
    /// [`AssetTransfer::debit`](crate::traits::AssetTransfer::debit)
    /// implementation after removing the same amount from an owner.
    pub fn issue(asset: AssetId, amount: Amount) -> Self {
        Self { asset, amount }
    }

    /// Empty funds of `asset`.
    pub fn empty(asset: AssetId) -> Self {
        Self::issue(asset, Amount::ZERO)
    }

    /// The asset carried.
    #[must_use]
    pub const fn asset(&self) -> &AssetId {
        &self.asset
    }

    /// The amount carried.
    #[must_use]
    pub const fn amount(&self) -> Amount {
        self.amount
    }

    /// Whether the amount is zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.amount.is_zero()
    }

    /// Consumes the funds, handing the raw parts to the caller.
    ///
    /// The caller takes over responsibility for the amount.
    #[must_use]
    pub fn into_parts(mut self) -> (AssetId, Amount) {
        let amount = std::mem::take(&mut self.amount);
        (self.asset.clone(), amount)
    }
}

impl Drop for Funds {
    fn drop(&mut self) {
        if !self.amount.is_zero() {
            tracing::error!(
                asset = %self.asset,
                amount = %self.amount,
                "funds dropped without being deposited or credited"
            );
        }
    }
}
