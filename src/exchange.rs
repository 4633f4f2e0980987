//! The exchange: registry, pools and host seams behind one API.
//!
//! Every mutating call follows the same shape:
//!
//! 1. resolve the pool handle and read the fee recipient (registry lock);
//! 2. lock the pool, `prepare_*` a plan, debit the host, `settle_*`;
//! 3. emit events while the pool is still locked, so each pool's events
//!    reach the sink in commit order;
//! 4. release the pool lock and credit outputs.
//!
//! A failure at any step before settlement completes leaves the pool
//! untouched and returns any debited funds to their owner.
//!
//! The host's [`AssetTransfer`] and the [`EventSink`] are called while the
//! pool lock is held and must not call back into the exchange.

use core::time::Duration;
use tracing::{error, info, warn};

use crate::config::ExchangeConfig;
use crate::domain::{
    Amount, AssetId, DepositResult, PoolId, PoolInfo, Principal, Reserves, Shares, SwapDirection,
    SwapResult, SwapSpec, WithdrawalResult,
};
use crate::error::AmmError;
use crate::events::PoolEvent;
use crate::math::optimal_deposit;
use crate::pool::{Pool, Reverted};
use crate::registry::{PairRegistry, PoolHandle};
use crate::snapshot::{ExchangeSnapshot, PoolRecord, ShareBalanceRecord};
use crate::traits::{AssetTransfer, Clock, EventSink};

/// Constant-product exchange over any number of asset pairs.
///
/// # Examples
///
/// ```
/// use pairswap::prelude::*;
///
/// let admin = Principal::new("admin").unwrap();
/// let alice = Principal::new("alice").unwrap();
/// let usdc = AssetId::new("USDC").unwrap();
/// let weth = AssetId::new("WETH").unwrap();
///
/// let assets = InMemoryAssets::new();
/// assets.fund(&alice, &usdc, Amount::new(1_000_000));
/// assets.fund(&alice, &weth, Amount::new(1_000_000));
///
/// let exchange = Exchange::new(
///     ExchangeConfig::with_defaults(admin),
///     assets,
///     RecordingEventSink::new(),
///     ManualClock::new(1),
/// )
/// .unwrap();
///
/// let pool = exchange.create_pool(usdc.clone(), weth.clone()).unwrap();
/// let added = exchange
///     .add_liquidity(&alice, pool, Amount::new(100_000), Amount::new(100_000))
///     .unwrap();
/// assert_eq!(added.minted, Shares::new(99_000));
///
/// let swapped = exchange
///     .swap(&alice, pool, Amount::new(1_000), SwapDirection::LowToHigh, Amount::new(1))
///     .unwrap();
/// assert_eq!(swapped.amount_out, Amount::new(987));
/// ```
#[derive(Debug)]
pub struct Exchange<A, E, C> {
    registry: PairRegistry,
    assets: A,
    events: E,
    clock: C,
    lock_timeout: Option<Duration>,
}

impl<A: AssetTransfer, E: EventSink, C: Clock> Exchange<A, E, C> {
    /// Builds an exchange with an empty registry.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidPoolConfiguration`] if `config` fails
    /// validation.
    pub fn new(config: ExchangeConfig, assets: A, events: E, clock: C) -> Result<Self, AmmError> {
        config.validate()?;
        info!(
            fee_to_setter = %config.fee_to_setter(),
            minimum_liquidity = config.minimum_liquidity(),
            "exchange initialised"
        );
        Ok(Self {
            registry: PairRegistry::from_config(&config),
            assets,
            events,
            clock,
            lock_timeout: config.lock_timeout(),
        })
    }

    /// The underlying pair registry.
    #[must_use]
    pub const fn registry(&self) -> &PairRegistry {
        &self.registry
    }

    /// The host asset capability.
    #[must_use]
    pub const fn assets(&self) -> &A {
        &self.assets
    }

    /// The event sink.
    #[must_use]
    pub const fn events(&self) -> &E {
        &self.events
    }

    fn handle(&self, pool_id: PoolId) -> Result<PoolHandle, AmmError> {
        self.registry.handle(pool_id).ok_or(AmmError::PoolNotFound)
    }

    fn rejected(op: &'static str, pool_id: Option<PoolId>, err: AmmError) -> AmmError {
        if matches!(err, AmmError::InvariantViolation(_)) {
            error!(op, pool = ?pool_id, %err, code = err.code(), "accounting invariant broken");
        } else {
            warn!(op, pool = ?pool_id, %err, code = err.code(), "operation rejected");
        }
        err
    }

    fn refund(&self, owner: &Principal, reverted: Reverted) -> AmmError {
        for funds in reverted.refund {
            self.assets.credit(owner, funds);
        }
        reverted.error
    }

    /// Resolves `pool_id`, reads the fee recipient and the clock, then runs
    /// `f` with the pool locked.
    fn with_pool<T>(
        &self,
        op: &'static str,
        pool_id: PoolId,
        f: impl FnOnce(&mut Pool, Option<&Principal>, u64) -> Result<T, AmmError>,
    ) -> Result<T, AmmError> {
        let outcome = (|| {
            let handle = self.handle(pool_id)?;
            let fee_to = self.registry.fee_to();
            let now = self.clock.now();
            let mut pool = handle.acquire(self.lock_timeout)?;
            f(&mut *pool, fee_to.as_ref(), now)
        })();
        outcome.map_err(|err| Self::rejected(op, Some(pool_id), err))
    }

    fn emit_sync(&self, pool_id: PoolId, reserves: Reserves) {
        self.events.emit(PoolEvent::Synced {
            pool_id,
            reserve_low: reserves.reserve_low,
            reserve_high: reserves.reserve_high,
        });
    }

    // -- registry -------------------------------------------------------------

    /// Creates the pool for the unordered pair `{a, b}`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::IdenticalAssets`] if `a == b`.
    /// - [`AmmError::PoolAlreadyExists`] if the pair already has a pool.
    pub fn create_pool(&self, a: AssetId, b: AssetId) -> Result<PoolId, AmmError> {
        let handle = self
            .registry
            .create_pool_with(a, b, |handle, pool_count| {
                self.events.emit(PoolEvent::PoolCreated {
                    pool_id: handle.id(),
                    asset_low: handle.pair().low().clone(),
                    asset_high: handle.pair().high().clone(),
                    pool_count,
                });
            })
            .map_err(|err| Self::rejected("create_pool", None, err))?;
        Ok(handle.id())
    }

    /// Pool id for `{a, b}` in either order.
    #[must_use]
    pub fn get_pool(&self, a: &AssetId, b: &AssetId) -> Option<PoolId> {
        self.registry.get_pool(a, b).map(|h| h.id())
    }

    /// Page of the registry list in creation order.
    #[must_use]
    pub fn list_pools(&self, start: usize, limit: usize) -> Vec<PoolInfo> {
        self.registry.list_pools(start, limit)
    }

    /// Reserves of `pool_id`; [`Reserves::EMPTY`] for unknown pools.
    #[must_use]
    pub fn get_reserves(&self, pool_id: PoolId) -> Reserves {
        self.registry
            .handle(pool_id)
            .map_or(Reserves::EMPTY, |h| h.reserves())
    }

    /// Shares of `pool_id` held by `holder`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolNotFound`] for unknown pools.
    pub fn share_balance(&self, pool_id: PoolId, holder: &Principal) -> Result<Shares, AmmError> {
        Ok(self.handle(pool_id)?.lock().share_balance(holder))
    }

    /// Total shares of `pool_id`, locked ones included.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolNotFound`] for unknown pools.
    pub fn share_supply(&self, pool_id: PoolId) -> Result<Shares, AmmError> {
        Ok(self.handle(pool_id)?.lock().total_supply())
    }

    // -- liquidity ------------------------------------------------------------

    /// Deposits exactly `(amount_low, amount_high)` and mints shares to
    /// `provider`.
    ///
    /// Off-ratio deposits mint against the smaller side; the excess stays
    /// in the pool.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PoolNotFound`] for unknown pools.
    /// - [`AmmError::InsufficientLiquidityMinted`] if no shares would be
    ///   minted.
    /// - [`AmmError::InsufficientFunds`] if the host cannot debit
    ///   `provider`.
    /// - [`AmmError::PoolBusy`] if the lock wait timed out.
    pub fn add_liquidity(
        &self,
        provider: &Principal,
        pool_id: PoolId,
        amount_low: Amount,
        amount_high: Amount,
    ) -> Result<DepositResult, AmmError> {
        self.deposit("add_liquidity", provider, pool_id, |_| {
            Ok((amount_low, amount_high))
        })
    }

    /// Deposits up to `(desired_low, desired_high)`, sized to the current
    /// pool ratio, and mints shares to `provider`.
    ///
    /// # Errors
    ///
    /// As [`add_liquidity`](Self::add_liquidity), plus
    /// [`AmmError::InsufficientInputAmount`] if the sized amounts fall below
    /// `(min_low, min_high)`.
    pub fn add_liquidity_optimal(
        &self,
        provider: &Principal,
        pool_id: PoolId,
        desired: (Amount, Amount),
        minimum: (Amount, Amount),
    ) -> Result<DepositResult, AmmError> {
        self.deposit("add_liquidity_optimal", provider, pool_id, |reserves| {
            let (low, high) = optimal_deposit(
                desired.0.get(),
                desired.1.get(),
                minimum.0.get(),
                minimum.1.get(),
                reserves.reserve_low.get(),
                reserves.reserve_high.get(),
            )?;
            Ok((Amount::new(low), Amount::new(high)))
        })
    }

    fn deposit(
        &self,
        op: &'static str,
        provider: &Principal,
        pool_id: PoolId,
        size: impl FnOnce(Reserves) -> Result<(Amount, Amount), AmmError>,
    ) -> Result<DepositResult, AmmError> {
        self.with_pool(op, pool_id, |pool, fee_to, now| {
            let (amount_low, amount_high) = size(pool.reserves())?;
            let plan = pool.prepare_deposit(amount_low, amount_high, fee_to)?;
            let funds_low = self
                .assets
                .debit(provider, pool.pair().low(), plan.amount_low())?;
            let funds_high = match self
                .assets
                .debit(provider, pool.pair().high(), plan.amount_high())
            {
                Ok(funds) => funds,
                Err(err) => {
                    self.assets.credit(provider, funds_low);
                    return Err(err);
                }
            };
            let result = pool
                .settle_deposit(plan, provider, fee_to, funds_low, funds_high, now)
                .map_err(|reverted| self.refund(provider, reverted))?;

            info!(
                pool = %pool_id,
                %provider,
                amount_low = %result.amount_low,
                amount_high = %result.amount_high,
                minted = %result.minted,
                protocol_fee = %result.protocol_fee,
                "liquidity added"
            );
            self.events.emit(PoolEvent::LiquidityAdded {
                pool_id,
                provider: provider.clone(),
                amount_low: result.amount_low,
                amount_high: result.amount_high,
                minted: result.minted,
            });
            self.emit_sync(pool_id, pool.reserves());
            Ok(result)
        })
    }

    /// Burns `shares` of `provider` and pays out the proportional reserves.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PoolNotFound`] for unknown pools.
    /// - [`AmmError::InsufficientShareBalance`] if `provider` holds fewer
    ///   shares.
    /// - [`AmmError::InsufficientLiquidityBurned`] if either side would pay
    ///   zero.
    /// - [`AmmError::PoolBusy`] if the lock wait timed out.
    pub fn remove_liquidity(
        &self,
        provider: &Principal,
        pool_id: PoolId,
        shares: Shares,
    ) -> Result<WithdrawalResult, AmmError> {
        let (result, out_low, out_high) =
            self.with_pool("remove_liquidity", pool_id, |pool, fee_to, now| {
                let plan = pool.prepare_withdrawal(provider, shares, fee_to)?;
                let (result, out_low, out_high) =
                    pool.settle_withdrawal(plan, provider, fee_to, now)?;

                info!(
                    pool = %pool_id,
                    %provider,
                    burned = %result.burned,
                    amount_low = %result.amount_low,
                    amount_high = %result.amount_high,
                    "liquidity removed"
                );
                self.events.emit(PoolEvent::LiquidityRemoved {
                    pool_id,
                    provider: provider.clone(),
                    burned: result.burned,
                    amount_low: result.amount_low,
                    amount_high: result.amount_high,
                });
                self.emit_sync(pool_id, pool.reserves());
                Ok((result, out_low, out_high))
            })?;
        self.assets.credit(provider, out_low);
        self.assets.credit(provider, out_high);
        Ok(result)
    }

    // -- swaps ----------------------------------------------------------------

    /// Sells exactly `amount_in` of the `direction` input asset.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PoolNotFound`] for unknown pools.
    /// - [`AmmError::InsufficientOutputAmount`] if the output is below
    ///   `min_amount_out`.
    /// - [`AmmError::InsufficientFunds`] if the host cannot debit `trader`.
    /// - Any pricing error from [`crate::math::get_amount_out`].
    pub fn swap(
        &self,
        trader: &Principal,
        pool_id: PoolId,
        amount_in: Amount,
        direction: SwapDirection,
        min_amount_out: Amount,
    ) -> Result<SwapResult, AmmError> {
        self.execute_swap(
            "swap",
            trader,
            pool_id,
            direction,
            SwapSpec::exact_in(amount_in, min_amount_out),
        )
    }

    /// Buys exactly `amount_out` of the `direction` output asset.
    ///
    /// # Errors
    ///
    /// - [`AmmError::ExcessiveInputAmount`] if the required input exceeds
    ///   `max_amount_in`.
    /// - Otherwise as [`swap`](Self::swap).
    pub fn swap_exact_out(
        &self,
        trader: &Principal,
        pool_id: PoolId,
        amount_out: Amount,
        direction: SwapDirection,
        max_amount_in: Amount,
    ) -> Result<SwapResult, AmmError> {
        self.execute_swap(
            "swap_exact_out",
            trader,
            pool_id,
            direction,
            SwapSpec::exact_out(amount_out, max_amount_in),
        )
    }

    fn execute_swap(
        &self,
        op: &'static str,
        trader: &Principal,
        pool_id: PoolId,
        direction: SwapDirection,
        spec: SwapSpec,
    ) -> Result<SwapResult, AmmError> {
        let (result, funds_out) = self.with_pool(op, pool_id, |pool, _, now| {
            let plan = pool.prepare_swap(direction, spec)?;
            let funds_in =
                self.assets
                    .debit(trader, direction.asset_in(pool.pair()), plan.amount_in())?;
            let (result, funds_out) = pool
                .settle_swap(plan, funds_in, now)
                .map_err(|reverted| self.refund(trader, reverted))?;

            info!(
                pool = %pool_id,
                %trader,
                %direction,
                amount_in = %result.amount_in,
                amount_out = %result.amount_out,
                "swap executed"
            );
            self.events.emit(PoolEvent::Swapped {
                pool_id,
                trader: trader.clone(),
                direction,
                amount_in: result.amount_in,
                amount_out: result.amount_out,
            });
            self.emit_sync(pool_id, pool.reserves());
            Ok((result, funds_out))
        })?;
        self.assets.credit(trader, funds_out);
        Ok(result)
    }

    // -- shares ---------------------------------------------------------------

    /// Moves `amount` LP shares of `pool_id` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PoolNotFound`] for unknown pools.
    /// - [`AmmError::ZeroAmount`] if `amount` is zero.
    /// - [`AmmError::InsufficientShareBalance`] if `from` holds fewer shares.
    pub fn transfer_shares(
        &self,
        pool_id: PoolId,
        from: &Principal,
        to: &Principal,
        amount: Shares,
    ) -> Result<(), AmmError> {
        self.with_pool("transfer_shares", pool_id, |pool, _, _| {
            pool.transfer_shares(from, to, amount)?;
            self.events.emit(PoolEvent::SharesTransferred {
                pool_id,
                from: from.clone(),
                to: to.clone(),
                amount,
            });
            Ok(())
        })
    }

    // -- administration -------------------------------------------------------

    /// Protocol fee recipient, if any.
    #[must_use]
    pub fn fee_to(&self) -> Option<Principal> {
        self.registry.fee_to()
    }

    /// Fee administrator.
    #[must_use]
    pub fn fee_to_setter(&self) -> Principal {
        self.registry.fee_to_setter()
    }

    /// Sets or clears the protocol fee recipient.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::NotAuthorized`] unless `caller` is the fee
    /// administrator.
    pub fn set_fee_to(&self, caller: &Principal, fee_to: Option<Principal>) -> Result<(), AmmError> {
        let previous = self
            .registry
            .set_fee_to(caller, fee_to.clone())
            .map_err(|err| Self::rejected("set_fee_to", None, err))?;
        info!(%caller, ?previous, current = ?fee_to, "fee recipient changed");
        self.events.emit(PoolEvent::FeeToChanged {
            previous,
            current: fee_to,
        });
        Ok(())
    }

    /// Hands fee administration to `fee_to_setter`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::NotAuthorized`] unless `caller` is the current
    /// fee administrator.
    pub fn set_fee_to_setter(
        &self,
        caller: &Principal,
        fee_to_setter: Principal,
    ) -> Result<(), AmmError> {
        let previous = self
            .registry
            .set_fee_to_setter(caller, fee_to_setter.clone())
            .map_err(|err| Self::rejected("set_fee_to_setter", None, err))?;
        info!(%previous, current = %fee_to_setter, "fee administrator changed");
        self.events.emit(PoolEvent::FeeToSetterChanged {
            previous,
            current: fee_to_setter,
        });
        Ok(())
    }

    // -- inspection -----------------------------------------------------------

    /// Checks the accounting invariants of `pool_id`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PoolNotFound`] for unknown pools.
    /// - [`AmmError::InvariantViolation`] naming the broken invariant.
    pub fn audit(&self, pool_id: PoolId) -> Result<(), AmmError> {
        self.with_pool("audit", pool_id, |pool, _, _| pool.audit())
    }

    /// Audits every pool, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first [`AmmError::InvariantViolation`] found.
    pub fn audit_all(&self) -> Result<(), AmmError> {
        self.registry
            .handles()
            .iter()
            .try_for_each(|handle| self.audit(handle.id()))
    }

    /// Exports registry, pool and share tables.
    ///
    /// Pools are locked one at a time, so the snapshot is consistent per
    /// pool but not across pools under concurrent writes.
    #[must_use]
    pub fn snapshot(&self) -> ExchangeSnapshot {
        let handles = self.registry.handles();
        let mut snapshot = ExchangeSnapshot {
            fee_to: self.registry.fee_to(),
            fee_to_setter: self.registry.fee_to_setter(),
            registry: handles.iter().map(PoolHandle::info).collect(),
            pools: Vec::with_capacity(handles.len()),
            share_balances: Vec::new(),
        };
        for handle in &handles {
            let pool = handle.lock();
            let reserves = pool.reserves();
            snapshot.pools.push(PoolRecord {
                pair: pool.pair().clone(),
                pool_id: pool.id(),
                reserve_low: reserves.reserve_low,
                reserve_high: reserves.reserve_high,
                last_update_time: reserves.last_update_time,
                cumulative_product: pool.cumulative_product(),
                k_last: pool.k_last(),
                total_supply: pool.total_supply(),
                locked: pool.shares().locked(),
            });
            snapshot
                .share_balances
                .extend(pool.shares().holders().map(|(holder, shares)| {
                    ShareBalanceRecord {
                        pool_id: pool.id(),
                        holder: holder.clone(),
                        shares,
                    }
                }));
        }
        snapshot.pools.sort_by(|a, b| a.pair.cmp(&b.pair));
        snapshot
            .share_balances
            .sort_by(|a, b| (a.pool_id, &a.holder).cmp(&(b.pool_id, &b.holder)));
        snapshot
    }
}
