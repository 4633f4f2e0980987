//! Swap direction and swap constraints.

use core::fmt;

use super::{Amount, AssetId, PairKey};
use crate::error::AmmError;

/// Which side of the pair is sold into the pool.
///
/// Sides always refer to the canonical low/high order of the
/// [`PairKey`], never to caller-supplied argument order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SwapDirection {
    /// Sell the low asset, receive the high asset.
    LowToHigh,
    /// Sell the high asset, receive the low asset.
    HighToLow,
}

impl SwapDirection {
    /// Derives the direction from the asset being sold.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::AssetNotInPair`] if `asset_in` is not in `pair`.
    pub fn from_input(pair: &PairKey, asset_in: &AssetId) -> Result<Self, AmmError> {
        if asset_in == pair.low() {
            Ok(Self::LowToHigh)
        } else if asset_in == pair.high() {
            Ok(Self::HighToLow)
        } else {
            Err(AmmError::AssetNotInPair)
        }
    }

    /// Returns the opposite direction.
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::LowToHigh => Self::HighToLow,
            Self::HighToLow => Self::LowToHigh,
        }
    }

    /// Returns the asset sold into the pool.
    #[must_use]
    pub fn asset_in(self, pair: &PairKey) -> &AssetId {
        match self {
            Self::LowToHigh => pair.low(),
            Self::HighToLow => pair.high(),
        }
    }

    /// Returns the asset paid out of the pool.
    #[must_use]
    pub fn asset_out(self, pair: &PairKey) -> &AssetId {
        self.reverse().asset_in(pair)
    }
}

impl fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LowToHigh => write!(f, "low->high"),
            Self::HighToLow => write!(f, "high->low"),
        }
    }
}

/// The constraint that drives a swap, including the caller's slippage
/// bound.
///
/// # Examples
///
/// ```
/// use pairswap::domain::{Amount, SwapSpec};
///
/// let spec = SwapSpec::exact_in(Amount::new(1_000), Amount::new(900));
/// assert_eq!(spec.amount(), Amount::new(1_000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SwapSpec {
    /// Sell exactly `amount_in`, receive at least `min_amount_out`.
    ExactIn {
        /// Input sold into the pool.
        amount_in: Amount,
        /// Slippage guard on the output.
        min_amount_out: Amount,
    },
    /// Receive exactly `amount_out`, pay at most `max_amount_in`.
    ExactOut {
        /// Output paid by the pool.
        amount_out: Amount,
        /// Slippage guard on the input.
        max_amount_in: Amount,
    },
}

impl SwapSpec {
    /// Creates an exact-input specification.
    pub const fn exact_in(amount_in: Amount, min_amount_out: Amount) -> Self {
        Self::ExactIn {
            amount_in,
            min_amount_out,
        }
    }

    /// Creates an exact-output specification.
    pub const fn exact_out(amount_out: Amount, max_amount_in: Amount) -> Self {
        Self::ExactOut {
            amount_out,
            max_amount_in,
        }
    }

    /// Returns `true` for [`SwapSpec::ExactIn`].
    #[must_use]
    pub const fn is_exact_in(&self) -> bool {
        matches!(self, Self::ExactIn { .. })
    }

    /// The fixed side of the swap.
    pub const fn amount(&self) -> Amount {
        match self {
            Self::ExactIn { amount_in, .. } => *amount_in,
            Self::ExactOut { amount_out, .. } => *amount_out,
        }
    }
}

impl fmt::Display for SwapSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExactIn {
                amount_in,
                min_amount_out,
            } => write!(f, "ExactIn({amount_in}, min_out={min_amount_out})"),
            Self::ExactOut {
                amount_out,
                max_amount_in,
            } => write!(f, "ExactOut({amount_out}, max_in={max_amount_in})"),
        }
    }
}
