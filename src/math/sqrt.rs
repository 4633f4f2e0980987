//! Integer square root.

use crate::error::AmmError;

/// Floor of `√y`, computed with the Babylonian method.
///
/// Iteration starts at `y / 2 + 1` and stops as soon as the next iterate is
/// no smaller than the current one.  Inputs below 4 short-circuit to 0 or 1.
///
/// # Errors
///
/// Returns [`AmmError::SqrtOverflow`] if the root does not fit in `u64`.
///
/// # Examples
///
/// ```
/// use pairswap::math::integer_sqrt;
///
/// assert_eq!(integer_sqrt(10_000), Ok(100));
/// assert_eq!(integer_sqrt(2), Ok(1));
/// ```
pub fn integer_sqrt(y: u128) -> Result<u64, AmmError> {
    let root = if y < 4 {
        u128::from(y != 0)
    } else {
        let mut z = y;
        let mut x = y / 2 + 1;
        while x < z {
            z = x;
            x = (y / x + x) / 2;
        }
        z
    };
    u64::try_from(root).map_err(|_| AmmError::SqrtOverflow)
}
