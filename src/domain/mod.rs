//! Fundamental domain value types used throughout the engine.
//!
//! Assets, pair keys, amounts, shares, principals, swap specifications and
//! the result records of committed operations.  All identifier types use
//! newtypes with validated constructors to enforce their invariants.

mod amount;
mod asset_id;
mod pair_key;
mod pool_info;
mod principal;
mod shares;
mod swap_result;
mod swap_spec;

pub use amount::Amount;
pub use asset_id::{AssetId, MAX_ASSET_ID_LEN};
pub use pair_key::PairKey;
pub use pool_info::{PoolId, PoolInfo, Reserves};
pub use principal::{Principal, MAX_PRINCIPAL_LEN};
pub use shares::Shares;
pub use swap_result::{DepositResult, SwapResult, WithdrawalResult};
pub use swap_spec::{SwapDirection, SwapSpec};
