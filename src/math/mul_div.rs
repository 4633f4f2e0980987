//! Overflow-checked multiply-then-divide.

use crate::error::AmmError;

/// Computes `floor(a * b / c)` through a 128-bit intermediate.
///
/// # Errors
///
/// - [`AmmError::DivisionByZero`] if `c == 0`.
/// - [`AmmError::Overflow`] if the product wraps or the quotient does not
///   fit back into `u64`.
///
/// # Examples
///
/// ```
/// use pairswap::math::safe_mul_div;
///
/// assert_eq!(safe_mul_div(1_000, 10_000, 5_000), Ok(2_000));
/// assert!(safe_mul_div(u64::MAX, 2, 1).is_err());
/// ```
pub fn safe_mul_div(a: u64, b: u64, c: u64) -> Result<u64, AmmError> {
    if c == 0 {
        return Err(AmmError::DivisionByZero);
    }
    let (a, b, c) = (u128::from(a), u128::from(b), u128::from(c));
    let product = a
        .checked_mul(b)
        .ok_or(AmmError::Overflow("mul_div product"))?;
    if b != 0 && product / b != a {
        return Err(AmmError::Overflow("mul_div product wrapped"));
    }
    u64::try_from(product / c).map_err(|_| AmmError::Overflow("mul_div quotient exceeds 64 bits"))
}
