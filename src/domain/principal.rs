//! Caller and holder identities.

use core::fmt;

use crate::error::AmmError;

/// Maximum length of a principal identifier, in bytes.
pub const MAX_PRINCIPAL_LEN: usize = 128;

/// An authenticated identity: the caller of an operation, the holder of
/// LP shares, or the fee administrator.
///
/// Authentication is the host's job; the engine only compares principals
/// for equality.
///
/// # Examples
///
/// ```
/// use pairswap::domain::Principal;
///
/// let alice = Principal::new("alice").expect("valid");
/// assert_eq!(alice.as_str(), "alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Principal(String);

impl Principal {
    /// Creates a principal from its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidPrincipal`] if the identifier is empty,
    /// too long, or contains whitespace or control characters.
    pub fn new(id: impl Into<String>) -> Result<Self, AmmError> {
        let id = id.into();
        if id.is_empty() {
            return Err(AmmError::InvalidPrincipal("identifier is empty"));
        }
        if id.len() > MAX_PRINCIPAL_LEN {
            return Err(AmmError::InvalidPrincipal("identifier is too long"));
        }
        if id.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(AmmError::InvalidPrincipal(
                "identifier contains whitespace or control characters",
            ));
        }
        Ok(Self(id))
    }

    /// Returns the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Principal {
    type Error = AmmError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Principal {
    type Error = AmmError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Principal> for String {
    fn from(value: Principal) -> Self {
        value.0
    }
}
