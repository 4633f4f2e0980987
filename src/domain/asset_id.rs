//! Canonical identity of a fungible asset.

use core::fmt;

use crate::error::AmmError;

/// Maximum length of an asset identifier, in bytes.
pub const MAX_ASSET_ID_LEN: usize = 128;

/// An opaque, globally unique identifier for a fungible asset type,
/// for example a namespaced symbol such as `"0x1::coin::USDC"`.
///
/// The total order is the lexicographic byte order of the canonical
/// identifier string.  It does not depend on any caller or type system, so
/// every caller derives the same [`PairKey`](super::PairKey) for a pair.
///
/// # Examples
///
/// ```
/// use pairswap::domain::AssetId;
///
/// let usdc = AssetId::new("0x1::coin::USDC").expect("valid id");
/// let weth = AssetId::new("0x1::coin::WETH").expect("valid id");
/// assert!(usdc < weth);
/// assert_eq!(usdc.as_str(), "0x1::coin::USDC");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct AssetId(String);

impl AssetId {
    /// Creates an `AssetId` from its canonical identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidAssetId`] if the identifier is empty,
    /// longer than [`MAX_ASSET_ID_LEN`] bytes, or contains whitespace or
    /// control characters.
    pub fn new(id: impl Into<String>) -> Result<Self, AmmError> {
        let id = id.into();
        if id.is_empty() {
            return Err(AmmError::InvalidAssetId("identifier is empty"));
        }
        if id.len() > MAX_ASSET_ID_LEN {
            return Err(AmmError::InvalidAssetId("identifier is too long"));
        }
        if id.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(AmmError::InvalidAssetId(
                "identifier contains whitespace or control characters",
            ));
        }
        Ok(Self(id))
    }

    /// Returns the canonical identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the identifier bytes that define the total order.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AssetId {
    type Error = AmmError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for AssetId {
    type Error = AmmError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AssetId> for String {
    fn from(value: AssetId) -> Self {
        value.0
    }
}
