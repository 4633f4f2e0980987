//! Per-pair constant-product pool.
//!
//! [`Pool`] owns the reserves, the [`ShareLedger`](crate::ledger::ShareLedger)
//! and the [`Custody`](crate::custody::Custody) of one asset pair.  Public
//! callers can inspect a pool and price operations through the `prepare_*`
//! methods; applying them goes through [`Exchange`](crate::exchange::Exchange).

mod plans;
#[allow(clippy::module_inception)]
mod pool;

pub(crate) use plans::Reverted;
pub use plans::{DepositPlan, SwapPlan, WithdrawalPlan};
pub use pool::Pool;
