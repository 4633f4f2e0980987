//! Validated operation plans produced by the `prepare_*` pool methods.
//!
//! A plan is the complete arithmetic outcome of an operation against one
//! specific pool state.  It is only meaningful while that state is
//! unchanged, which the exchange guarantees by holding the pool lock from
//! `prepare_*` to `settle_*`.

use crate::custody::Funds;
use crate::domain::{Amount, Shares, SwapDirection};
use crate::error::AmmError;

/// Outcome of [`Pool::prepare_deposit`](super::Pool::prepare_deposit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct DepositPlan {
    pub(crate) amount_low: Amount,
    pub(crate) amount_high: Amount,
    pub(crate) minted: Shares,
    pub(crate) locked: Shares,
    pub(crate) protocol_fee: Shares,
}

impl DepositPlan {
    /// Low-asset amount to deposit.
    pub const fn amount_low(&self) -> Amount {
        self.amount_low
    }

    /// High-asset amount to deposit.
    pub const fn amount_high(&self) -> Amount {
        self.amount_high
    }

    /// Shares the provider will receive.
    pub const fn minted(&self) -> Shares {
        self.minted
    }

    /// Shares that will be locked forever (first deposit only).
    pub const fn locked(&self) -> Shares {
        self.locked
    }

    /// Shares owed to the protocol fee recipient.
    pub const fn protocol_fee(&self) -> Shares {
        self.protocol_fee
    }
}

/// Outcome of [`Pool::prepare_withdrawal`](super::Pool::prepare_withdrawal).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct WithdrawalPlan {
    pub(crate) burned: Shares,
    pub(crate) amount_low: Amount,
    pub(crate) amount_high: Amount,
    pub(crate) protocol_fee: Shares,
}

impl WithdrawalPlan {
    /// Shares that will be burned.
    pub const fn burned(&self) -> Shares {
        self.burned
    }

    /// Low-asset amount to pay out.
    pub const fn amount_low(&self) -> Amount {
        self.amount_low
    }

    /// High-asset amount to pay out.
    pub const fn amount_high(&self) -> Amount {
        self.amount_high
    }

    /// Shares owed to the protocol fee recipient.
    pub const fn protocol_fee(&self) -> Shares {
        self.protocol_fee
    }
}

/// Outcome of [`Pool::prepare_swap`](super::Pool::prepare_swap).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct SwapPlan {
    pub(crate) direction: SwapDirection,
    pub(crate) amount_in: Amount,
    pub(crate) amount_out: Amount,
}

impl SwapPlan {
    /// Side sold into the pool.
    pub const fn direction(&self) -> SwapDirection {
        self.direction
    }

    /// Amount the pool will receive.
    pub const fn amount_in(&self) -> Amount {
        self.amount_in
    }

    /// Amount the pool will pay out.
    pub const fn amount_out(&self) -> Amount {
        self.amount_out
    }
}

/// A settlement that did not apply.
///
/// Carries every [`Funds`] the settle step was handed so the caller can
/// credit them back.
#[derive(Debug)]
pub(crate) struct Reverted {
    pub(crate) error: AmmError,
    pub(crate) refund: Vec<Funds>,
}

impl Reverted {
    pub(crate) fn new(error: AmmError, refund: Vec<Funds>) -> Self {
        Self { error, refund }
    }
}
