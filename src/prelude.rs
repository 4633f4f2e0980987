//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use pairswap::prelude::*;
//! ```

pub use crate::config::ExchangeConfig;
pub use crate::custody::{Funds, InMemoryAssets};
pub use crate::domain::{
    Amount, AssetId, DepositResult, PairKey, PoolId, PoolInfo, Principal, Reserves, Shares,
    SwapDirection, SwapResult, SwapSpec, WithdrawalResult,
};
pub use crate::error::{AmmError, ErrorKind, Result};
pub use crate::events::{PoolEvent, RecordingEventSink, TracingEventSink};
pub use crate::exchange::Exchange;
pub use crate::math::CheckedArithmetic;
pub use crate::registry::{PairRegistry, PoolHandle};
pub use crate::traits::{AssetTransfer, Clock, EventSink, ManualClock, SystemClock};
