//! # pairswap
//!
//! Constant-product automated market maker engine: paired reserves of two
//! fungible assets, fee-adjusted `x · y = k` pricing, LP share accounting
//! and a registry that keeps exactly one pool per unordered asset pair.
//!
//! The crate is a library.  Asset movements, event delivery and time are
//! supplied by the host through the seams in [`traits`].
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `serde` | yes | `Serialize`/`Deserialize` for domain types, config, events and snapshots |
//!
//! # Quick Start
//!
//! ```rust
//! use pairswap::prelude::*;
//!
//! let admin = Principal::new("admin").expect("valid principal");
//! let alice = Principal::new("alice").expect("valid principal");
//! let usdc = AssetId::new("USDC").expect("valid asset");
//! let weth = AssetId::new("WETH").expect("valid asset");
//!
//! // 1. A host holding the real balances
//! let assets = InMemoryAssets::new();
//! assets.fund(&alice, &usdc, Amount::new(10_000_000));
//! assets.fund(&alice, &weth, Amount::new(10_000_000));
//!
//! // 2. The exchange
//! let exchange = Exchange::new(
//!     ExchangeConfig::with_defaults(admin),
//!     assets,
//!     TracingEventSink,
//!     SystemClock,
//! )
//! .expect("valid config");
//!
//! // 3. Create a pool and seed it
//! let pool = exchange.create_pool(weth.clone(), usdc.clone()).expect("new pair");
//! exchange
//!     .add_liquidity(&alice, pool, Amount::new(1_000_000), Amount::new(1_000_000))
//!     .expect("deposit");
//!
//! // 4. Swap 10 000 USDC (the low asset) for WETH
//! let result = exchange
//!     .swap(&alice, pool, Amount::new(10_000), SwapDirection::LowToHigh, Amount::new(9_000))
//!     .expect("swap");
//! assert_eq!(result.amount_out, Amount::new(9_871));
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Exchange    │  validates, locks, debits/credits the host, emits events
//! └──────┬──────┘
//!        │ PoolHandle (Arc<Mutex<Pool>>)
//!        ▼
//! ┌─────────────┐
//! │  Registry    │  PairKey → pool, creation-ordered list, fee admin
//! └──────┬──────┘
//!        ▼
//! ┌─────────────┐
//! │    Pool      │  prepare_* / settle_*, protocol fee, audit
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┬─────────────┬─────────────┐
//! │    Math      │ ShareLedger │  Custody    │
//! └─────────────┴─────────────┴─────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Newtype value types: [`AssetId`](domain::AssetId), [`PairKey`](domain::PairKey), [`Amount`](domain::Amount), [`Shares`](domain::Shares), … |
//! | [`math`]   | `integer_sqrt`, `safe_mul_div`, swap pricing, quoting |
//! | [`ledger`] | Per-pool [`ShareLedger`](ledger::ShareLedger) |
//! | [`custody`] | [`Funds`](custody::Funds), per-pool [`Custody`](custody::Custody), [`InMemoryAssets`](custody::InMemoryAssets) |
//! | [`pool`]   | [`Pool`](pool::Pool) state machine |
//! | [`registry`] | [`PairRegistry`](registry::PairRegistry) and [`PoolHandle`](registry::PoolHandle) |
//! | [`exchange`] | [`Exchange`](exchange::Exchange), the public service boundary |
//! | [`traits`] | Host seams: [`AssetTransfer`](traits::AssetTransfer), [`EventSink`](traits::EventSink), [`Clock`](traits::Clock) |
//! | [`events`] | [`PoolEvent`](events::PoolEvent) and bundled sinks |
//! | [`config`] | [`ExchangeConfig`](config::ExchangeConfig) |
//! | [`snapshot`] | [`ExchangeSnapshot`](snapshot::ExchangeSnapshot) state export |
//! | [`error`]  | [`AmmError`](error::AmmError) unified error enum |
//! | [`prelude`] | Convenience re-exports |

pub mod config;
pub mod custody;
pub mod domain;
pub mod error;
pub mod events;
pub mod exchange;
pub mod ledger;
pub mod math;
pub mod pool;
pub mod prelude;
pub mod registry;
pub mod snapshot;
pub mod traits;

#[cfg(test)]
#[allow(clippy::panic)]
mod proptest_properties;
