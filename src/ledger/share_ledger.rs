//! Per-pool LP share ledger.

use std::collections::HashMap;

use crate::domain::{Principal, Shares};
use crate::error::AmmError;
use crate::math::CheckedArithmetic;

/// Fungible ledger of LP shares for a single pool.
///
/// Tracks one balance per holder plus a `locked` bucket that no principal
/// owns.  Shares minted into the locked bucket can never be burned, which
/// gives every initialised pool a permanent supply floor.
///
/// # Invariant
///
/// `sum(balances) + locked == total_supply` after every public call.
/// Failed calls leave the ledger untouched.
///
/// # Examples
///
/// ```
/// use pairswap::domain::{Principal, Shares};
/// use pairswap::ledger::ShareLedger;
///
/// let alice = Principal::new("alice").unwrap();
/// let mut ledger = ShareLedger::new();
/// ledger.mint_locked(Shares::new(1_000)).unwrap();
/// ledger.mint(&alice, Shares::new(99_000)).unwrap();
///
/// assert_eq!(ledger.total_supply(), Shares::new(100_000));
/// assert_eq!(ledger.balance_of(&alice), Shares::new(99_000));
/// assert!(ledger.burn(&alice, Shares::new(99_001)).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareLedger {
    balances: HashMap<Principal, Shares>,
    locked: Shares,
    total_supply: Shares,
}

impl ShareLedger {
    /// Creates an empty ledger with zero supply.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total shares in existence, locked ones included.
    #[must_use]
    pub const fn total_supply(&self) -> Shares {
        self.total_supply
    }

    /// Shares held by no principal.
    #[must_use]
    pub const fn locked(&self) -> Shares {
        self.locked
    }

    /// Balance of `holder`; zero for unknown holders.
    #[must_use]
    pub fn balance_of(&self, holder: &Principal) -> Shares {
        self.balances.get(holder).copied().unwrap_or(Shares::ZERO)
    }

    /// Number of principals with a non-zero balance.
    #[must_use]
    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }

    /// Iterates over every `(holder, balance)` with a non-zero balance.
    pub fn holders(&self) -> impl Iterator<Item = (&Principal, Shares)> + '_ {
        self.balances.iter().map(|(p, s)| (p, *s))
    }

    /// Mints `amount` new shares to `holder`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the total supply would exceed
    /// `u64::MAX`.
    pub fn mint(&mut self, holder: &Principal, amount: Shares) -> Result<(), AmmError> {
        if amount.is_zero() {
            return Ok(());
        }
        let supply = self.total_supply.safe_add(&amount)?;
        // a holder balance never exceeds supply, so this cannot overflow
        let balance = self.balance_of(holder).safe_add(&amount)?;
        self.total_supply = supply;
        self.balances.insert(holder.clone(), balance);
        Ok(())
    }

    /// Mints `amount` shares into the locked bucket.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the total supply would exceed
    /// `u64::MAX`.
    pub fn mint_locked(&mut self, amount: Shares) -> Result<(), AmmError> {
        let supply = self.total_supply.safe_add(&amount)?;
        let locked = self.locked.safe_add(&amount)?;
        self.total_supply = supply;
        self.locked = locked;
        Ok(())
    }

    /// Burns `amount` shares held by `holder`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientShareBalance`] if `holder` owns fewer
    /// than `amount` shares.
    pub fn burn(&mut self, holder: &Principal, amount: Shares) -> Result<(), AmmError> {
        let balance = self.balance_of(holder);
        let remaining = balance
            .checked_sub(&amount)
            .ok_or(AmmError::InsufficientShareBalance)?;
        let supply = self.total_supply.safe_sub(&amount)?;
        self.total_supply = supply;
        self.set_balance(holder, remaining);
        Ok(())
    }

    /// Moves `amount` shares from `from` to `to`.  Supply is unchanged.
    ///
    /// # Errors
    ///
    /// - [`AmmError::ZeroAmount`] if `amount` is zero.
    /// - [`AmmError::InsufficientShareBalance`] if `from` owns fewer than
    ///   `amount` shares.
    pub fn transfer(
        &mut self,
        from: &Principal,
        to: &Principal,
        amount: Shares,
    ) -> Result<(), AmmError> {
        if amount.is_zero() {
            return Err(AmmError::ZeroAmount);
        }
        let from_balance = self
            .balance_of(from)
            .checked_sub(&amount)
            .ok_or(AmmError::InsufficientShareBalance)?;
        if from == to {
            return Ok(());
        }
        let to_balance = self.balance_of(to).safe_add(&amount)?;
        self.set_balance(from, from_balance);
        self.set_balance(to, to_balance);
        Ok(())
    }

    /// Recomputes the balance sum and checks it against the supply.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvariantViolation`] if
    /// `sum(balances) + locked != total_supply`.
    pub fn check_invariant(&self) -> Result<(), AmmError> {
        let held: u128 = self
            .balances
            .values()
            .map(|s| u128::from(s.get()))
            .sum();
        let accounted = held + u128::from(self.locked.get());
        if accounted == u128::from(self.total_supply.get()) {
            Ok(())
        } else {
            Err(AmmError::InvariantViolation(
                "share balances do not sum to total supply",
            ))
        }
    }

    fn set_balance(&mut self, holder: &Principal, balance: Shares) {
        if balance.is_zero() {
            self.balances.remove(holder);
        } else {
            self.balances.insert(holder.clone(), balance);
        }
    }
}
