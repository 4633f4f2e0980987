//! Integer arithmetic for constant-product pricing.
//!
//! Everything here is pure and total over `u64` inputs: functions either
//! return a value or an [`AmmError`](crate::error::AmmError), never panic
//! and never wrap.  Wide intermediates are computed in `u128`.
//!
//! | Function | Purpose |
//! |----------|---------|
//! | [`integer_sqrt`] | Initial share issuance, protocol-fee growth |
//! | [`safe_mul_div`] | Proportional scaling |
//! | [`get_amount_out`] / [`get_amount_in`] | Fee-adjusted swap pricing |
//! | [`quote`] / [`optimal_deposit`] | Ratio-matched deposits |

mod checked;
mod mul_div;
mod pricing;
mod sqrt;

pub use checked::CheckedArithmetic;
pub use mul_div::safe_mul_div;
pub use pricing::{
    get_amount_in, get_amount_out, optimal_deposit, quote, FEE_DENOMINATOR, FEE_NUMERATOR,
};
pub use sqrt::integer_sqrt;

/// Shares permanently locked by the first deposit into a pool.
pub const MINIMUM_LIQUIDITY: u64 = 1_000;
