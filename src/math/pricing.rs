//! Fee-adjusted constant-product pricing.
//!
//! The pool keeps `reserve_in × reserve_out` from decreasing.  A 0.30% fee
//! is taken from the input before pricing:
//!
//! ```text
//! amount_in_with_fee = amount_in × 997
//! amount_out         = amount_in_with_fee × reserve_out
//!                      / (reserve_in × 1000 + amount_in_with_fee)
//! ```
//!
//! All division floors, and [`get_amount_in`] adds one unit, so every
//! rounding decision favours the pool.

use super::safe_mul_div;
use crate::error::AmmError;

/// Fee-adjusted share of the input that is priced (parts per thousand).
pub const FEE_NUMERATOR: u128 = 997;

/// Denominator of [`FEE_NUMERATOR`].
pub const FEE_DENOMINATOR: u128 = 1_000;

/// Output paid for selling `amount_in` into a pool with the given reserves.
///
/// # Errors
///
/// - [`AmmError::InsufficientInputAmount`] if `amount_in == 0`.
/// - [`AmmError::InsufficientLiquidity`] if either reserve is zero.
/// - [`AmmError::InsufficientOutputAmount`] if the output floors to zero.
/// - [`AmmError::Overflow`] if an intermediate exceeds 128 bits.
///
/// # Examples
///
/// ```
/// use pairswap::math::get_amount_out;
///
/// assert_eq!(get_amount_out(1_000, 10_000, 10_000), Ok(906));
/// ```
pub fn get_amount_out(amount_in: u64, reserve_in: u64, reserve_out: u64) -> Result<u64, AmmError> {
    if amount_in == 0 {
        return Err(AmmError::InsufficientInputAmount);
    }
    if reserve_in == 0 || reserve_out == 0 {
        return Err(AmmError::InsufficientLiquidity);
    }
    let amount_in_with_fee = u128::from(amount_in) * FEE_NUMERATOR;
    let numerator = amount_in_with_fee
        .checked_mul(u128::from(reserve_out))
        .ok_or(AmmError::Overflow("amount_out numerator"))?;
    let denominator = u128::from(reserve_in) * FEE_DENOMINATOR + amount_in_with_fee;
    let amount_out = numerator / denominator;
    if amount_out == 0 {
        return Err(AmmError::InsufficientOutputAmount);
    }
    u64::try_from(amount_out).map_err(|_| AmmError::Overflow("amount_out exceeds 64 bits"))
}

/// Input required to receive exactly `amount_out` from a pool.
///
/// Computed as `reserve_in × amount_out × 1000 / ((reserve_out − amount_out) × 997) + 1`.
/// The trailing `+ 1` guarantees that feeding the result back through
/// [`get_amount_out`] never yields less than `amount_out`.
///
/// # Errors
///
/// - [`AmmError::InsufficientOutputAmount`] if `amount_out == 0`.
/// - [`AmmError::InsufficientLiquidity`] if either reserve is zero or
///   `amount_out >= reserve_out`.
/// - [`AmmError::Overflow`] if an intermediate or the result overflows.
///
/// # Examples
///
/// ```
/// use pairswap::math::get_amount_in;
///
/// assert_eq!(get_amount_in(906, 10_000, 10_000), Ok(1_000));
/// ```
pub fn get_amount_in(amount_out: u64, reserve_in: u64, reserve_out: u64) -> Result<u64, AmmError> {
    if amount_out == 0 {
        return Err(AmmError::InsufficientOutputAmount);
    }
    if reserve_in == 0 || reserve_out == 0 || amount_out >= reserve_out {
        return Err(AmmError::InsufficientLiquidity);
    }
    let numerator = (u128::from(reserve_in) * u128::from(amount_out))
        .checked_mul(FEE_DENOMINATOR)
        .ok_or(AmmError::Overflow("amount_in numerator"))?;
    let denominator = u128::from(reserve_out - amount_out) * FEE_NUMERATOR;
    let amount_in = numerator / denominator + 1;
    u64::try_from(amount_in).map_err(|_| AmmError::Overflow("amount_in exceeds 64 bits"))
}

/// Scales `amount_a` by the pool ratio: `amount_a × reserve_b / reserve_a`.
///
/// Used to size a non-initialising deposit to the existing ratio.
///
/// # Errors
///
/// - [`AmmError::ZeroAmount`] if `amount_a == 0`.
/// - [`AmmError::InsufficientLiquidity`] if either reserve is zero.
/// - [`AmmError::Overflow`] if the result does not fit in `u64`.
///
/// # Examples
///
/// ```
/// use pairswap::math::quote;
///
/// assert_eq!(quote(1_000, 5_000, 10_000), Ok(2_000));
/// ```
pub fn quote(amount_a: u64, reserve_a: u64, reserve_b: u64) -> Result<u64, AmmError> {
    if amount_a == 0 {
        return Err(AmmError::ZeroAmount);
    }
    if reserve_a == 0 || reserve_b == 0 {
        return Err(AmmError::InsufficientLiquidity);
    }
    safe_mul_div(amount_a, reserve_b, reserve_a)
}

/// Sizes a deposit to the current pool ratio.
///
/// Starting from the caller's desired amounts, returns the largest pair
/// `(low, high)` that matches the reserve ratio without exceeding either
/// desired amount.  An empty pool accepts the desired amounts as-is.
///
/// # Errors
///
/// - [`AmmError::InsufficientInputAmount`] if the sized amount of either
///   side falls below the caller's minimum.
/// - Any error from [`quote`].
pub fn optimal_deposit(
    desired_low: u64,
    desired_high: u64,
    min_low: u64,
    min_high: u64,
    reserve_low: u64,
    reserve_high: u64,
) -> Result<(u64, u64), AmmError> {
    if reserve_low == 0 && reserve_high == 0 {
        return Ok((desired_low, desired_high));
    }
    let high_optimal = quote(desired_low, reserve_low, reserve_high)?;
    if high_optimal <= desired_high {
        if high_optimal < min_high {
            return Err(AmmError::InsufficientInputAmount);
        }
        return Ok((desired_low, high_optimal));
    }
    let low_optimal = quote(desired_high, reserve_high, reserve_low)?;
    if low_optimal > desired_low || low_optimal < min_low {
        return Err(AmmError::InsufficientInputAmount);
    }
    Ok((low_optimal, desired_high))
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- get_amount_out -------------------------------------------------------

    #[test]
    fn amount_out_reference_value() {
        assert_eq!(get_amount_out(1_000, 10_000, 10_000), Ok(906));
    }

    #[test]
    fn amount_out_zero_input() {
        assert_eq!(
            get_amount_out(0, 10_000, 10_000),
            Err(AmmError::InsufficientInputAmount)
        );
    }

    #[test]
    fn amount_out_empty_reserve() {
        assert_eq!(
            get_amount_out(1, 0, 10_000),
            Err(AmmError::InsufficientLiquidity)
        );
        assert_eq!(
            get_amount_out(1, 10_000, 0),
            Err(AmmError::InsufficientLiquidity)
        );
    }

    #[test]
    fn amount_out_floors_to_zero() {
        // 997 * 1 / (1_000_000 * 1000 + 997) == 0
        assert_eq!(
            get_amount_out(1, 1_000_000, 1),
            Err(AmmError::InsufficientOutputAmount)
        );
    }

    #[test]
    fn amount_out_overflow() {
        assert!(matches!(
            get_amount_out(u64::MAX, u64::MAX, u64::MAX),
            Err(AmmError::Overflow(_))
        ));
    }

    #[test]
    fn amount_out_never_drains_reserve() {
        assert_eq!(get_amount_out(u64::MAX / 1_000, 1_000, 1_000), Ok(999));
    }

    // -- get_amount_in --------------------------------------------------------

    #[test]
    fn amount_in_reference_value() {
        assert_eq!(get_amount_in(906, 10_000, 10_000), Ok(1_000));
    }

    #[test]
    fn amount_in_round_trips_through_amount_out() {
        for out in [1_u64, 10, 500, 906, 5_000, 9_999] {
            let amount_in = get_amount_in(out, 10_000, 10_000);
            let back = amount_in.and_then(|a| get_amount_out(a, 10_000, 10_000));
            assert!(
                matches!(back, Ok(b) if b >= out),
                "out={out} in={amount_in:?} back={back:?}"
            );
        }
    }

    #[test]
    fn amount_in_rejects_draining_output() {
        assert_eq!(
            get_amount_in(10_000, 10_000, 10_000),
            Err(AmmError::InsufficientLiquidity)
        );
        assert_eq!(
            get_amount_in(10_001, 10_000, 10_000),
            Err(AmmError::InsufficientLiquidity)
        );
    }

    #[test]
    fn amount_in_zero_output() {
        assert_eq!(
            get_amount_in(0, 10_000, 10_000),
            Err(AmmError::InsufficientOutputAmount)
        );
    }

    #[test]
    fn amount_in_result_overflow() {
        // reserve_in huge, nearly all of reserve_out requested
        assert!(matches!(
            get_amount_in(u64::MAX - 1, u64::MAX, u64::MAX),
            Err(AmmError::Overflow(_))
        ));
    }

    // -- quote ----------------------------------------------------------------

    #[test]
    fn quote_reference_value() {
        assert_eq!(quote(1_000, 5_000, 10_000), Ok(2_000));
    }

    #[test]
    fn quote_rejects_zero() {
        assert_eq!(quote(0, 5_000, 10_000), Err(AmmError::ZeroAmount));
        assert_eq!(quote(1, 0, 10_000), Err(AmmError::InsufficientLiquidity));
    }

    // -- optimal_deposit ------------------------------------------------------

    #[test]
    fn optimal_deposit_empty_pool_takes_desired() {
        assert_eq!(optimal_deposit(10, 20, 0, 0, 0, 0), Ok((10, 20)));
    }

    #[test]
    fn optimal_deposit_trims_high_side() {
        // ratio 1:2, desired 100:500 → 100:200
        assert_eq!(
            optimal_deposit(100, 500, 0, 0, 1_000, 2_000),
            Ok((100, 200))
        );
    }

    #[test]
    fn optimal_deposit_trims_low_side() {
        // ratio 1:2, desired 100:100 → 50:100
        assert_eq!(optimal_deposit(100, 100, 0, 0, 1_000, 2_000), Ok((50, 100)));
    }

    #[test]
    fn optimal_deposit_enforces_minimums() {
        assert_eq!(
            optimal_deposit(100, 500, 0, 250, 1_000, 2_000),
            Err(AmmError::InsufficientInputAmount)
        );
        assert_eq!(
            optimal_deposit(100, 100, 60, 0, 1_000, 2_000),
            Err(AmmError::InsufficientInputAmount)
        );
    }
}
