//! Declarative exchange configuration.
//!
//! [`ExchangeConfig`] carries the fee administrator, the optional protocol
//! fee recipient, the first-deposit share lock and the pool lock timeout.

mod exchange_config;

pub use exchange_config::ExchangeConfig;
