//! Seams the host environment plugs into.
//!
//! - [`AssetTransfer`]: debits and credits of the real underlying assets.
//! - [`EventSink`]: consumer of structured facts about committed changes.
//! - [`Clock`]: time source for `last_update_time`.

mod asset_transfer;
mod clock;
mod event_sink;

pub use asset_transfer::AssetTransfer;
pub use clock::{Clock, ManualClock, SystemClock};
pub use event_sink::EventSink;
