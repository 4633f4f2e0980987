//! Exchange-wide configuration.

use core::time::Duration;

use crate::domain::Principal;
use crate::error::AmmError;
use crate::math::MINIMUM_LIQUIDITY;

/// Declarative parameters for an [`Exchange`](crate::exchange::Exchange).
///
/// # Validation
///
/// - `minimum_liquidity` must be non-zero.
/// - `lock_timeout_ms`, when present, must be non-zero.
///
/// Deserialized configs are not validated until handed to
/// [`Exchange::new`](crate::exchange::Exchange::new) or checked with
/// [`validate()`](Self::validate).
///
/// # Examples
///
/// ```
/// use pairswap::config::ExchangeConfig;
/// use pairswap::domain::Principal;
///
/// let admin = Principal::new("admin").unwrap();
/// let config = ExchangeConfig::with_defaults(admin);
/// assert_eq!(config.minimum_liquidity(), 1_000);
/// assert!(config.fee_to().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExchangeConfig {
    fee_to_setter: Principal,
    #[cfg_attr(feature = "serde", serde(default))]
    fee_to: Option<Principal>,
    #[cfg_attr(feature = "serde", serde(default = "default_minimum_liquidity"))]
    minimum_liquidity: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    lock_timeout_ms: Option<u64>,
}

#[cfg(feature = "serde")]
const fn default_minimum_liquidity() -> u64 {
    MINIMUM_LIQUIDITY
}

impl ExchangeConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidPoolConfiguration`] if
    /// `minimum_liquidity` is zero or `lock_timeout_ms` is `Some(0)`.
    pub fn new(
        fee_to_setter: Principal,
        fee_to: Option<Principal>,
        minimum_liquidity: u64,
        lock_timeout_ms: Option<u64>,
    ) -> Result<Self, AmmError> {
        let config = Self {
            fee_to_setter,
            fee_to,
            minimum_liquidity,
            lock_timeout_ms,
        };
        config.validate()?;
        Ok(config)
    }

    /// Default configuration: no protocol fee, locks wait indefinitely.
    #[must_use]
    pub const fn with_defaults(fee_to_setter: Principal) -> Self {
        Self {
            fee_to_setter,
            fee_to: None,
            minimum_liquidity: MINIMUM_LIQUIDITY,
            lock_timeout_ms: None,
        }
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidPoolConfiguration`] if
    /// `minimum_liquidity` is zero or `lock_timeout_ms` is `Some(0)`.
    pub fn validate(&self) -> Result<(), AmmError> {
        if self.minimum_liquidity == 0 {
            return Err(AmmError::InvalidPoolConfiguration(
                "minimum_liquidity must be non-zero",
            ));
        }
        if self.lock_timeout_ms == Some(0) {
            return Err(AmmError::InvalidPoolConfiguration(
                "lock_timeout_ms must be non-zero when set",
            ));
        }
        Ok(())
    }

    /// Sets the protocol fee recipient.
    #[must_use]
    pub fn fee_to_recipient(mut self, fee_to: Principal) -> Self {
        self.fee_to = Some(fee_to);
        self
    }

    /// Sets how long pool operations wait for the pool lock.
    #[must_use]
    pub fn lock_timeout_after(mut self, timeout: Duration) -> Self {
        self.lock_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Returns the fee administrator.
    #[must_use]
    pub const fn fee_to_setter(&self) -> &Principal {
        &self.fee_to_setter
    }

    /// Returns the protocol fee recipient, if any.
    #[must_use]
    pub const fn fee_to(&self) -> Option<&Principal> {
        self.fee_to.as_ref()
    }

    /// Returns the number of shares locked by a pool's first deposit.
    #[must_use]
    pub const fn minimum_liquidity(&self) -> u64 {
        self.minimum_liquidity
    }

    /// Returns the pool lock timeout, or `None` to wait indefinitely.
    #[must_use]
    pub fn lock_timeout(&self) -> Option<Duration> {
        self.lock_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn admin() -> Principal {
        let Ok(p) = Principal::new("admin") else {
            panic!("valid principal");
        };
        p
    }

    #[test]
    fn defaults() {
        let config = ExchangeConfig::with_defaults(admin());
        assert!(config.validate().is_ok());
        assert_eq!(config.minimum_liquidity(), MINIMUM_LIQUIDITY);
        assert_eq!(config.lock_timeout(), None);
        assert_eq!(config.fee_to_setter(), &admin());
    }

    #[test]
    fn zero_minimum_liquidity_rejected() {
        let result = ExchangeConfig::new(admin(), None, 0, None);
        assert!(matches!(
            result,
            Err(AmmError::InvalidPoolConfiguration(_))
        ));
    }

    #[test]
    fn zero_lock_timeout_rejected() {
        let result = ExchangeConfig::new(admin(), None, 1_000, Some(0));
        assert!(matches!(
            result,
            Err(AmmError::InvalidPoolConfiguration(_))
        ));
    }

    #[test]
    fn builders() {
        let config = ExchangeConfig::with_defaults(admin())
            .fee_to_recipient(admin())
            .lock_timeout_after(Duration::from_millis(250));
        assert_eq!(config.fee_to(), Some(&admin()));
        assert_eq!(config.lock_timeout(), Some(Duration::from_millis(250)));
        assert!(config.validate().is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn parses_json_with_defaults() {
        let json = r#"{ "fee_to_setter": "admin" }"#;
        let Ok(config) = serde_json::from_str::<ExchangeConfig>(json) else {
            panic!("config parses");
        };
        assert_eq!(config, ExchangeConfig::with_defaults(admin()));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn rejects_invalid_principal_in_json() {
        let json = r#"{ "fee_to_setter": "" }"#;
        assert!(serde_json::from_str::<ExchangeConfig>(json).is_err());
    }
}
