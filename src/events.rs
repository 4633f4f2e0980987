//! Structured facts emitted after each committed state change.
//!
//! The engine only produces these; indexing them is the host's business.
//! Two sinks ship with the crate: [`TracingEventSink`] logs every event and
//! [`RecordingEventSink`] keeps them in memory.

use parking_lot::Mutex;

use crate::domain::{Amount, AssetId, PoolId, Principal, Shares, SwapDirection};
use crate::traits::EventSink;

/// A committed change to exchange state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum PoolEvent {
    /// A pool was created for a new pair.
    PoolCreated {
        /// New pool.
        pool_id: PoolId,
        /// Lower asset of the pair.
        asset_low: AssetId,
        /// Higher asset of the pair.
        asset_high: AssetId,
        /// Number of pools after creation.
        pool_count: u64,
    },
    /// Liquidity was deposited.
    LiquidityAdded {
        /// Target pool.
        pool_id: PoolId,
        /// Depositor, who received the minted shares.
        provider: Principal,
        /// Low-asset amount deposited.
        amount_low: Amount,
        /// High-asset amount deposited.
        amount_high: Amount,
        /// Shares minted to the provider.
        minted: Shares,
    },
    /// Liquidity was withdrawn.
    LiquidityRemoved {
        /// Source pool.
        pool_id: PoolId,
        /// Holder whose shares were burned.
        provider: Principal,
        /// Shares burned.
        burned: Shares,
        /// Low-asset amount paid out.
        amount_low: Amount,
        /// High-asset amount paid out.
        amount_high: Amount,
    },
    /// A swap executed.
    Swapped {
        /// Pool traded against.
        pool_id: PoolId,
        /// Trader.
        trader: Principal,
        /// Side sold into the pool.
        direction: SwapDirection,
        /// Amount received by the pool.
        amount_in: Amount,
        /// Amount paid out by the pool.
        amount_out: Amount,
    },
    /// Reserves after a state change.
    Synced {
        /// Pool whose reserves changed.
        pool_id: PoolId,
        /// New low reserve.
        reserve_low: Amount,
        /// New high reserve.
        reserve_high: Amount,
    },
    /// LP shares changed hands.
    SharesTransferred {
        /// Pool the shares belong to.
        pool_id: PoolId,
        /// Sender.
        from: Principal,
        /// Recipient.
        to: Principal,
        /// Shares moved.
        amount: Shares,
    },
    /// The protocol fee recipient changed.
    FeeToChanged {
        /// Recipient before the change.
        previous: Option<Principal>,
        /// Recipient after the change.
        current: Option<Principal>,
    },
    /// The fee administrator changed.
    FeeToSetterChanged {
        /// Administrator before the change.
        previous: Principal,
        /// Administrator after the change.
        current: Principal,
    },
}

impl PoolEvent {
    /// Short snake-case name of the event.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PoolCreated { .. } => "pool_created",
            Self::LiquidityAdded { .. } => "liquidity_added",
            Self::LiquidityRemoved { .. } => "liquidity_removed",
            Self::Swapped { .. } => "swapped",
            Self::Synced { .. } => "synced",
            Self::SharesTransferred { .. } => "shares_transferred",
            Self::FeeToChanged { .. } => "fee_to_changed",
            Self::FeeToSetterChanged { .. } => "fee_to_setter_changed",
        }
    }

    /// The pool the event concerns, if any.
    #[must_use]
    pub const fn pool_id(&self) -> Option<PoolId> {
        match self {
            Self::PoolCreated { pool_id, .. }
            | Self::LiquidityAdded { pool_id, .. }
            | Self::LiquidityRemoved { pool_id, .. }
            | Self::Swapped { pool_id, .. }
            | Self::Synced { pool_id, .. }
            | Self::SharesTransferred { pool_id, .. } => Some(*pool_id),
            Self::FeeToChanged { .. } | Self::FeeToSetterChanged { .. } => None,
        }
    }
}

/// Logs every event at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: PoolEvent) {
        tracing::info!(event = event.name(), ?event, "pool event");
    }
}

/// Keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<PoolEvent>>,
}

impl RecordingEventSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<PoolEvent> {
        self.events.lock().clone()
    }

    /// Removes and returns everything recorded so far.
    pub fn drain(&self) -> Vec<PoolEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: PoolEvent) {
        self.events.lock().push(event);
    }
}
