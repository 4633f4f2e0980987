//! Asset custody: owned funds, per-pool escrow and an in-memory host.
//!
//! Pools never see raw host balances.  Assets arrive as [`Funds`] debited by
//! an [`AssetTransfer`](crate::traits::AssetTransfer) host, are parked in the
//! pool's [`Custody`], and leave again as [`Funds`] to be credited.

#[allow(clippy::module_inception)]
mod custody;
mod funds;
mod in_memory;

pub use custody::Custody;
pub use funds::Funds;
pub use in_memory::InMemoryAssets;
