//! Canonical pair → pool index with fee administration.

use core::time::Duration;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard, RwLock};
use tracing::{info, warn};

use crate::config::ExchangeConfig;
use crate::domain::{AssetId, PairKey, PoolId, PoolInfo, Principal, Reserves, Shares};
use crate::error::AmmError;
use crate::pool::Pool;

/// Shared, lockable reference to one pool.
///
/// A handle is the pool's unit of mutual exclusion: every operation on the
/// pool holds its lock for the whole operation.  Handles to different
/// pools never contend.
#[derive(Debug, Clone)]
pub struct PoolHandle {
    id: PoolId,
    pair: PairKey,
    pool: Arc<Mutex<Pool>>,
}

impl PoolHandle {
    fn new(pool: Pool) -> Self {
        Self {
            id: pool.id(),
            pair: pool.pair().clone(),
            pool: Arc::new(Mutex::new(pool)),
        }
    }

    /// Pool identifier.
    #[must_use]
    pub const fn id(&self) -> PoolId {
        self.id
    }

    /// Canonical pair of the pool.
    #[must_use]
    pub const fn pair(&self) -> &PairKey {
        &self.pair
    }

    /// Blocks until the pool lock is free.
    pub fn lock(&self) -> MutexGuard<'_, Pool> {
        self.pool.lock()
    }

    /// Waits at most `timeout` for the pool lock.
    #[must_use]
    pub fn try_lock_for(&self, timeout: Duration) -> Option<MutexGuard<'_, Pool>> {
        self.pool.try_lock_for(timeout)
    }

    /// Locks the pool, waiting indefinitely or up to `timeout`.
    pub(crate) fn acquire(&self, timeout: Option<Duration>) -> Result<MutexGuard<'_, Pool>, AmmError> {
        match timeout {
            None => Ok(self.lock()),
            Some(timeout) => self.try_lock_for(timeout).ok_or_else(|| {
                warn!(pool = %self.id, ?timeout, "pool lock wait timed out");
                AmmError::PoolBusy
            }),
        }
    }

    /// Snapshot of the pool's reserves.
    #[must_use]
    pub fn reserves(&self) -> Reserves {
        self.lock().reserves()
    }

    /// Registry entry for this pool.
    #[must_use]
    pub fn info(&self) -> PoolInfo {
        PoolInfo::new(&self.pair, self.id)
    }
}

#[derive(Debug)]
struct RegistryState {
    by_pair: HashMap<PairKey, PoolHandle>,
    pools: Vec<PoolHandle>,
    fee_to: Option<Principal>,
    fee_to_setter: Principal,
}

/// Process-wide registry of pools, deduplicated by unordered asset pair.
///
/// # Locking
///
/// Registry state sits behind one `RwLock`.  Pool creation takes the write
/// lock, so concurrent creations of the same pair serialize and exactly one
/// succeeds.  The registry lock is never acquired while a pool lock is
/// held.
///
/// # Examples
///
/// ```
/// use pairswap::domain::{AssetId, Principal};
/// use pairswap::registry::PairRegistry;
///
/// let registry = PairRegistry::new(Principal::new("admin").unwrap(), None, 1_000);
/// let usdc = AssetId::new("USDC").unwrap();
/// let weth = AssetId::new("WETH").unwrap();
///
/// let handle = registry.create_pool(weth.clone(), usdc.clone()).unwrap();
/// let found = registry.get_pool(&usdc, &weth).unwrap();
/// assert_eq!(handle.id(), found.id());
/// assert!(registry.create_pool(usdc, weth).is_err());
/// ```
#[derive(Debug)]
pub struct PairRegistry {
    state: RwLock<RegistryState>,
    minimum_liquidity: Shares,
}

impl PairRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new(fee_to_setter: Principal, fee_to: Option<Principal>, minimum_liquidity: u64) -> Self {
        Self {
            state: RwLock::new(RegistryState {
                by_pair: HashMap::new(),
                pools: Vec::new(),
                fee_to,
                fee_to_setter,
            }),
            minimum_liquidity: Shares::new(minimum_liquidity),
        }
    }

    /// Creates an empty registry from a validated configuration.
    #[must_use]
    pub fn from_config(config: &ExchangeConfig) -> Self {
        Self::new(
            config.fee_to_setter().clone(),
            config.fee_to().cloned(),
            config.minimum_liquidity(),
        )
    }

    /// Creates the pool for the unordered pair `{a, b}`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::IdenticalAssets`] if `a == b`.
    /// - [`AmmError::PoolAlreadyExists`] if the pair already has a pool.
    pub fn create_pool(&self, a: AssetId, b: AssetId) -> Result<PoolHandle, AmmError> {
        self.create_pool_with(a, b, |_, _| {})
    }

    /// As [`create_pool`](Self::create_pool), running `on_created` with the
    /// new handle and the resulting pool count before the registry write
    /// lock is released.
    ///
    /// No other caller can observe the new pool until `on_created`
    /// returns.
    ///
    /// # Errors
    ///
    /// As [`create_pool`](Self::create_pool).
    pub fn create_pool_with(
        &self,
        a: AssetId,
        b: AssetId,
        on_created: impl FnOnce(&PoolHandle, u64),
    ) -> Result<PoolHandle, AmmError> {
        let pair = PairKey::new(a, b)?;
        let mut state = self.state.write();
        if state.by_pair.contains_key(&pair) {
            warn!(%pair, "pool already exists");
            return Err(AmmError::PoolAlreadyExists);
        }
        let index = u64::try_from(state.pools.len())
            .map_err(|_| AmmError::Overflow("pool count exceeds 64 bits"))?;
        let handle = PoolHandle::new(Pool::new(
            PoolId::new(index),
            pair.clone(),
            self.minimum_liquidity,
        ));
        state.by_pair.insert(pair.clone(), handle.clone());
        state.pools.push(handle.clone());
        info!(pool = %handle.id(), %pair, "pool created");
        on_created(&handle, index + 1);
        Ok(handle)
    }

    /// Looks up the pool for `{a, b}` in either argument order.
    #[must_use]
    pub fn get_pool(&self, a: &AssetId, b: &AssetId) -> Option<PoolHandle> {
        let pair = PairKey::new(a.clone(), b.clone()).ok()?;
        self.state.read().by_pair.get(&pair).cloned()
    }

    /// Looks up a pool by id.
    #[must_use]
    pub fn handle(&self, id: PoolId) -> Option<PoolHandle> {
        let index = usize::try_from(id.get()).ok()?;
        self.state.read().pools.get(index).cloned()
    }

    /// Pools in creation order, `[start, start + limit)` clipped to the
    /// list length.  Empty when `start` is past the end.
    #[must_use]
    pub fn list_pools(&self, start: usize, limit: usize) -> Vec<PoolInfo> {
        let state = self.state.read();
        let len = state.pools.len();
        if start >= len {
            return Vec::new();
        }
        let end = start.saturating_add(limit).min(len);
        state.pools[start..end].iter().map(PoolHandle::info).collect()
    }

    /// Every handle in creation order.
    #[must_use]
    pub fn handles(&self) -> Vec<PoolHandle> {
        self.state.read().pools.clone()
    }

    /// Number of pools created so far.
    #[must_use]
    pub fn pool_count(&self) -> usize {
        self.state.read().pools.len()
    }

    /// Current protocol fee recipient.
    #[must_use]
    pub fn fee_to(&self) -> Option<Principal> {
        self.state.read().fee_to.clone()
    }

    /// Current fee administrator.
    #[must_use]
    pub fn fee_to_setter(&self) -> Principal {
        self.state.read().fee_to_setter.clone()
    }

    /// Replaces the protocol fee recipient, returning the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::NotAuthorized`] unless `caller` is the fee
    /// administrator.
    pub fn set_fee_to(
        &self,
        caller: &Principal,
        fee_to: Option<Principal>,
    ) -> Result<Option<Principal>, AmmError> {
        let mut state = self.state.write();
        if *caller != state.fee_to_setter {
            warn!(%caller, "set_fee_to rejected");
            return Err(AmmError::NotAuthorized);
        }
        Ok(std::mem::replace(&mut state.fee_to, fee_to))
    }

    /// Replaces the fee administrator, returning the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::NotAuthorized`] unless `caller` is the current
    /// fee administrator.
    pub fn set_fee_to_setter(
        &self,
        caller: &Principal,
        fee_to_setter: Principal,
    ) -> Result<Principal, AmmError> {
        let mut state = self.state.write();
        if *caller != state.fee_to_setter {
            warn!(%caller, "set_fee_to_setter rejected");
            return Err(AmmError::NotAuthorized);
        }
        Ok(std::mem::replace(&mut state.fee_to_setter, fee_to_setter))
    }
}
