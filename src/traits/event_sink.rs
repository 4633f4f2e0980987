//! Structured-fact consumer.

use std::sync::Arc;

use crate::events::PoolEvent;

/// Receives one [`PoolEvent`] per committed state change.
///
/// Pool events are emitted while the pool lock is still held, so the sink
/// sees each pool's events in commit order.  A slow sink stalls that pool;
/// sinks must not call back into the exchange.
pub trait EventSink: Send + Sync {
    /// Consumes one event.
    fn emit(&self, event: PoolEvent);
}

impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    fn emit(&self, event: PoolEvent) {
        (**self).emit(event);
    }
}
