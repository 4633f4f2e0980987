//! Unified error types for the pairswap engine.
//!
//! Every fallible operation in the crate returns [`AmmError`].  Errors are
//! typed failures reported to the caller: none are retried internally and
//! none abort the process.  An operation that returns `Err` has applied no
//! state change.
//!
//! The presentation layer can use [`AmmError::kind`] to group failures,
//! [`AmmError::code`] for a stable catalog code and [`AmmError::remedy`]
//! for a suggested next step.

use core::fmt;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, AmmError>;

/// All failure modes of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum AmmError {
    // -- registry -------------------------------------------------------------
    /// A pool is already registered for this pair key.
    #[error("a pool already exists for this asset pair")]
    PoolAlreadyExists,

    /// No pool is registered for the requested pair or id.
    #[error("pool not found")]
    PoolNotFound,

    /// Both sides of the requested pair are the same asset.
    #[error("a pool requires two distinct assets")]
    IdenticalAssets,

    /// A configuration parameter is out of range.
    #[error("invalid pool configuration: {0}")]
    InvalidPoolConfiguration(&'static str),

    /// An asset identifier failed validation.
    #[error("invalid asset identifier: {0}")]
    InvalidAssetId(&'static str),

    /// A principal identifier failed validation.
    #[error("invalid principal: {0}")]
    InvalidPrincipal(&'static str),

    /// The asset is not one of the two assets of the pool.
    #[error("asset is not part of the pool pair")]
    AssetNotInPair,

    // -- liquidity ------------------------------------------------------------
    /// A deposit would mint zero (or negative) shares.
    #[error("insufficient liquidity minted")]
    InsufficientLiquidityMinted,

    /// A withdrawal would pay out zero of either asset.
    #[error("insufficient liquidity burned")]
    InsufficientLiquidityBurned,

    /// Reserves (or custody) cannot cover the request.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// The holder owns fewer shares than requested.
    #[error("insufficient share balance")]
    InsufficientShareBalance,

    // -- swap -----------------------------------------------------------------
    /// The output is zero or below the caller's minimum.
    #[error("insufficient output amount")]
    InsufficientOutputAmount,

    /// The input amount is zero or below the caller's minimum.
    #[error("insufficient input amount")]
    InsufficientInputAmount,

    /// The required input exceeds the caller's maximum.
    #[error("excessive input amount")]
    ExcessiveInputAmount,

    /// A zero amount was supplied where a positive one is required.
    #[error("amount must be greater than zero")]
    ZeroAmount,

    // -- arithmetic -----------------------------------------------------------
    /// An intermediate or final value does not fit its type.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// Division by a zero denominator.
    #[error("division by zero")]
    DivisionByZero,

    /// An integer square root does not fit in 64 bits.
    #[error("square root does not fit in 64 bits")]
    SqrtOverflow,

    // -- authorization --------------------------------------------------------
    /// The caller is not the fee administrator.
    #[error("caller is not authorized")]
    NotAuthorized,

    // -- custody --------------------------------------------------------------
    /// The host asset ledger cannot debit the requested amount.
    #[error("insufficient funds")]
    InsufficientFunds,

    /// Internal bookkeeping no longer matches custody; signals a bug.
    #[error("invariant violation: {0}")]
    InvariantViolation(&'static str),

    /// The pool lock could not be acquired before the configured timeout.
    #[error("pool is busy, retry later")]
    PoolBusy,
}

/// Coarse grouping of [`AmmError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Pair lookup, creation and identifier validation.
    Registry,
    /// Share minting, burning and reserve sufficiency.
    Liquidity,
    /// Swap pricing and slippage bounds.
    Swap,
    /// Overflow, division and square-root failures.
    Arithmetic,
    /// Admin-only operations.
    Authorization,
    /// Host funds, custody bookkeeping and lock contention.
    Custody,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Registry => "registry",
            Self::Liquidity => "liquidity",
            Self::Swap => "swap",
            Self::Arithmetic => "arithmetic",
            Self::Authorization => "authorization",
            Self::Custody => "custody",
        };
        f.write_str(label)
    }
}

impl AmmError {
    /// Returns the group this error belongs to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::PoolAlreadyExists
            | Self::PoolNotFound
            | Self::IdenticalAssets
            | Self::InvalidPoolConfiguration(_)
            | Self::InvalidAssetId(_)
            | Self::InvalidPrincipal(_)
            | Self::AssetNotInPair => ErrorKind::Registry,
            Self::InsufficientLiquidityMinted
            | Self::InsufficientLiquidityBurned
            | Self::InsufficientLiquidity
            | Self::InsufficientShareBalance => ErrorKind::Liquidity,
            Self::InsufficientOutputAmount
            | Self::InsufficientInputAmount
            | Self::ExcessiveInputAmount
            | Self::ZeroAmount => ErrorKind::Swap,
            Self::Overflow(_) | Self::DivisionByZero | Self::SqrtOverflow => {
                ErrorKind::Arithmetic
            }
            Self::NotAuthorized => ErrorKind::Authorization,
            Self::InsufficientFunds | Self::InvariantViolation(_) | Self::PoolBusy => {
                ErrorKind::Custody
            }
        }
    }

    /// Stable catalog code, suitable for logs and client-side lookups.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::PoolAlreadyExists => "AMM-0001",
            Self::PoolNotFound => "AMM-0002",
            Self::IdenticalAssets => "AMM-0003",
            Self::InvalidPoolConfiguration(_) => "AMM-0004",
            Self::InvalidAssetId(_) => "AMM-0005",
            Self::InvalidPrincipal(_) => "AMM-0006",
            Self::AssetNotInPair => "AMM-0007",
            Self::InsufficientLiquidityMinted => "AMM-0101",
            Self::InsufficientLiquidityBurned => "AMM-0102",
            Self::InsufficientLiquidity => "AMM-0103",
            Self::InsufficientShareBalance => "AMM-0104",
            Self::InsufficientOutputAmount => "AMM-0201",
            Self::InsufficientInputAmount => "AMM-0202",
            Self::ExcessiveInputAmount => "AMM-0203",
            Self::ZeroAmount => "AMM-0204",
            Self::Overflow(_) => "AMM-0301",
            Self::DivisionByZero => "AMM-0302",
            Self::SqrtOverflow => "AMM-0303",
            Self::NotAuthorized => "AMM-0401",
            Self::InsufficientFunds => "AMM-0501",
            Self::InvariantViolation(_) => "AMM-0502",
            Self::PoolBusy => "AMM-0503",
        }
    }

    /// Suggested remedy for the end user, where one exists.
    #[must_use]
    pub const fn remedy(&self) -> Option<&'static str> {
        match self {
            Self::PoolAlreadyExists => Some("use the existing pool for this pair"),
            Self::PoolNotFound => Some("create the pool before trading or depositing"),
            Self::IdenticalAssets => Some("choose two different assets"),
            Self::InsufficientLiquidityMinted => Some("deposit a larger amount of both assets"),
            Self::InsufficientLiquidityBurned => Some("withdraw a larger share amount"),
            Self::InsufficientLiquidity => Some("reduce the requested amount"),
            Self::InsufficientShareBalance => Some("withdraw at most your share balance"),
            Self::InsufficientOutputAmount => {
                Some("raise slippage tolerance or increase the input amount")
            }
            Self::InsufficientInputAmount | Self::ZeroAmount => {
                Some("increase the input amount")
            }
            Self::ExcessiveInputAmount => Some("raise the maximum input or request less output"),
            Self::InsufficientFunds => Some("top up the account balance"),
            Self::PoolBusy => Some("retry the operation"),
            Self::InvalidPoolConfiguration(_)
            | Self::InvalidAssetId(_)
            | Self::InvalidPrincipal(_)
            | Self::AssetNotInPair
            | Self::Overflow(_)
            | Self::DivisionByZero
            | Self::SqrtOverflow
            | Self::NotAuthorized
            | Self::InvariantViolation(_) => None,
        }
    }
}
