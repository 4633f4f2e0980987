//! Canonical, order-independent key of an asset pair.

use core::fmt;

use super::AssetId;
use crate::error::AmmError;

/// An unordered pair of distinct assets, stored as `(low, high)` under the
/// [`AssetId`] total order.
///
/// `PairKey::new(a, b) == PairKey::new(b, a)` for all distinct `a` and `b`,
/// which is what lets the registry reject a second pool for the same pair
/// regardless of argument order.
///
/// # Examples
///
/// ```
/// use pairswap::domain::{AssetId, PairKey};
///
/// let usdc = AssetId::new("USDC").expect("valid");
/// let weth = AssetId::new("WETH").expect("valid");
///
/// let key = PairKey::new(weth.clone(), usdc.clone()).expect("distinct assets");
/// assert_eq!(key.low(), &usdc);
/// assert_eq!(key.high(), &weth);
/// assert_eq!(key, PairKey::new(usdc, weth).expect("distinct assets"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawPairKey"))]
pub struct PairKey {
    low: AssetId,
    high: AssetId,
}

/// Wire form of a [`PairKey`] before the canonical-order check.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawPairKey {
    low: AssetId,
    high: AssetId,
}

#[cfg(feature = "serde")]
impl TryFrom<RawPairKey> for PairKey {
    type Error = AmmError;

    fn try_from(raw: RawPairKey) -> Result<Self, Self::Error> {
        if raw.low > raw.high {
            return Err(AmmError::InvalidAssetId("pair is not in canonical order"));
        }
        Self::new(raw.low, raw.high)
    }
}

impl PairKey {
    /// Creates the canonical key for `a` and `b`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::IdenticalAssets`] if `a == b`.
    pub fn new(a: AssetId, b: AssetId) -> Result<Self, AmmError> {
        if a == b {
            return Err(AmmError::IdenticalAssets);
        }
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        Ok(Self { low, high })
    }

    /// Returns the lower asset.
    #[must_use]
    pub const fn low(&self) -> &AssetId {
        &self.low
    }

    /// Returns the higher asset.
    #[must_use]
    pub const fn high(&self) -> &AssetId {
        &self.high
    }

    /// Returns `true` if `asset` is one side of this pair.
    #[must_use]
    pub fn contains(&self, asset: &AssetId) -> bool {
        self.low == *asset || self.high == *asset
    }

    /// Returns the counterpart of `asset` in this pair.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::AssetNotInPair`] if `asset` is not in the pair.
    pub fn other(&self, asset: &AssetId) -> Result<&AssetId, AmmError> {
        if *asset == self.low {
            Ok(&self.high)
        } else if *asset == self.high {
            Ok(&self.low)
        } else {
            Err(AmmError::AssetNotInPair)
        }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.low, self.high)
    }
}
