//! Outcomes of committed pool operations.

use super::{Amount, PoolId, Shares, SwapDirection};

/// The outcome of a committed swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwapResult {
    /// Pool the swap executed against.
    pub pool_id: PoolId,
    /// Side sold into the pool.
    pub direction: SwapDirection,
    /// Amount received by the pool.
    pub amount_in: Amount,
    /// Amount paid out by the pool.
    pub amount_out: Amount,
}

/// The outcome of a committed deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DepositResult {
    /// Pool that received the deposit.
    pub pool_id: PoolId,
    /// Low-asset amount deposited.
    pub amount_low: Amount,
    /// High-asset amount deposited.
    pub amount_high: Amount,
    /// Shares minted to the provider.
    pub minted: Shares,
    /// Shares permanently locked (non-zero only on a first deposit).
    pub locked: Shares,
    /// Shares minted to the protocol fee recipient before the deposit.
    pub protocol_fee: Shares,
}

/// The outcome of a committed withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WithdrawalResult {
    /// Pool the liquidity was removed from.
    pub pool_id: PoolId,
    /// Shares burned from the holder.
    pub burned: Shares,
    /// Low-asset amount paid out.
    pub amount_low: Amount,
    /// High-asset amount paid out.
    pub amount_high: Amount,
    /// Shares minted to the protocol fee recipient before the withdrawal.
    pub protocol_fee: Shares,
}
