//! Constant-product pool for one canonical asset pair.
//!
//! The pool prices swaps so that `reserve_low × reserve_high` never
//! decreases, issues LP shares against deposits, and keeps the backing
//! assets in its own [`Custody`].
//!
//! # Two-phase operations
//!
//! Every mutation is split in two:
//!
//! 1. `prepare_*` takes `&self`, performs all validation and arithmetic,
//!    and returns a plan.  It never mutates.
//! 2. `settle_*` takes `&mut self` and applies a plan together with the
//!    [`Funds`] it moves.  It re-checks every fallible step before the
//!    first write, so a rejected settlement leaves the pool untouched.
//!
//! Callers hold the pool lock across both phases.
//!
//! # Protocol fee
//!
//! When a fee recipient is configured, each liquidity event first mints
//! the recipient 1/6 of the growth in `√k` since the previous liquidity
//! event:
//!
//! ```text
//! fee = supply × (√k − √k_last) / (5 × √k + √k_last)
//! ```

use tracing::debug;

use super::plans::{DepositPlan, Reverted, SwapPlan, WithdrawalPlan};
use crate::custody::{Custody, Funds};
use crate::domain::{
    Amount, AssetId, DepositResult, PairKey, PoolId, Principal, Reserves, Shares, SwapDirection,
    SwapResult, SwapSpec, WithdrawalResult,
};
use crate::error::AmmError;
use crate::ledger::ShareLedger;
use crate::math::{get_amount_in, get_amount_out, integer_sqrt, safe_mul_div, CheckedArithmetic};

/// Reserve state, share ledger and custody of one asset pair.
///
/// Reserves always follow the canonical low/high order of the
/// [`PairKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    id: PoolId,
    pair: PairKey,
    reserve_low: Amount,
    reserve_high: Amount,
    last_update_time: u64,
    cumulative_product: u128,
    k_last: u128,
    minimum_liquidity: Shares,
    shares: ShareLedger,
    custody: Custody,
}

impl Pool {
    /// Allocates an empty pool with zero reserves, zero supply and a fresh
    /// custody.
    pub(crate) fn new(id: PoolId, pair: PairKey, minimum_liquidity: Shares) -> Self {
        Self {
            id,
            pair,
            reserve_low: Amount::ZERO,
            reserve_high: Amount::ZERO,
            last_update_time: 0,
            cumulative_product: 0,
            k_last: 0,
            minimum_liquidity,
            shares: ShareLedger::new(),
            custody: Custody::new(id),
        }
    }

    /// Pool identifier.
    #[must_use]
    pub const fn id(&self) -> PoolId {
        self.id
    }

    /// Canonical asset pair.
    #[must_use]
    pub const fn pair(&self) -> &PairKey {
        &self.pair
    }

    /// Current reserves and the time of the last state change.
    #[must_use]
    pub const fn reserves(&self) -> Reserves {
        Reserves {
            reserve_low: self.reserve_low,
            reserve_high: self.reserve_high,
            last_update_time: self.last_update_time,
        }
    }

    /// `reserve_low × reserve_high` as recorded at the last update.
    #[must_use]
    pub const fn cumulative_product(&self) -> u128 {
        self.cumulative_product
    }

    /// Reserve product after the last liquidity event while the protocol
    /// fee was on; zero otherwise.
    #[must_use]
    pub const fn k_last(&self) -> u128 {
        self.k_last
    }

    /// Shares locked by the first deposit.
    #[must_use]
    pub const fn minimum_liquidity(&self) -> Shares {
        self.minimum_liquidity
    }

    /// Outstanding LP shares, locked ones included.
    #[must_use]
    pub const fn total_supply(&self) -> Shares {
        self.shares.total_supply()
    }

    /// LP shares held by `holder`.
    #[must_use]
    pub fn share_balance(&self, holder: &Principal) -> Shares {
        self.shares.balance_of(holder)
    }

    /// Read-only view of the share ledger.
    #[must_use]
    pub const fn shares(&self) -> &ShareLedger {
        &self.shares
    }

    /// Read-only view of the custody.
    #[must_use]
    pub const fn custody(&self) -> &Custody {
        &self.custody
    }

    /// `(reserve_in, reserve_out)` for a swap in `direction`.
    const fn oriented(&self, direction: SwapDirection) -> (Amount, Amount) {
        match direction {
            SwapDirection::LowToHigh => (self.reserve_low, self.reserve_high),
            SwapDirection::HighToLow => (self.reserve_high, self.reserve_low),
        }
    }

    /// Shares owed to the protocol for `√k` growth since `k_last`.
    fn protocol_fee(&self, fee_on: bool) -> Result<Shares, AmmError> {
        if !fee_on || self.k_last == 0 {
            return Ok(Shares::ZERO);
        }
        let root_k = integer_sqrt(self.reserve_low.widening_mul(&self.reserve_high))?;
        let root_k_last = integer_sqrt(self.k_last)?;
        if root_k <= root_k_last {
            return Ok(Shares::ZERO);
        }
        let numerator = u128::from(self.shares.total_supply().get())
            .checked_mul(u128::from(root_k - root_k_last))
            .ok_or(AmmError::Overflow("protocol fee numerator"))?;
        let denominator = u128::from(root_k) * 5 + u128::from(root_k_last);
        u64::try_from(numerator / denominator)
            .map(Shares::new)
            .map_err(|_| AmmError::Overflow("protocol fee exceeds 64 bits"))
    }

    fn next_k_last(fee_on: bool, reserve_low: Amount, reserve_high: Amount) -> u128 {
        if fee_on {
            reserve_low.widening_mul(&reserve_high)
        } else {
            0
        }
    }

    fn sync(&mut self, reserve_low: Amount, reserve_high: Amount, now: u64) {
        self.reserve_low = reserve_low;
        self.reserve_high = reserve_high;
        self.last_update_time = now;
        self.cumulative_product = reserve_low.widening_mul(&reserve_high);
    }

    fn funds_match(funds: &Funds, asset: &AssetId, amount: Amount) -> bool {
        funds.asset() == asset && funds.amount() == amount
    }

    // -- deposit --------------------------------------------------------------

    /// Computes the shares a deposit of `(amount_low, amount_high)` mints.
    ///
    /// The first deposit mints `√(amount_low × amount_high)` shares, of
    /// which [`minimum_liquidity`](Self::minimum_liquidity) are locked
    /// forever.  Later deposits mint the smaller of the two proportional
    /// contributions, so off-ratio excess is donated to the pool.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientLiquidityMinted`] if no shares would be
    ///   minted to the provider.
    /// - [`AmmError::Overflow`] if reserves or supply would exceed `u64`.
    pub fn prepare_deposit(
        &self,
        amount_low: Amount,
        amount_high: Amount,
        fee_to: Option<&Principal>,
    ) -> Result<DepositPlan, AmmError> {
        let protocol_fee = self.protocol_fee(fee_to.is_some())?;
        let supply = self.shares.total_supply().safe_add(&protocol_fee)?;

        let (minted, locked) = if supply.is_zero() {
            let root = integer_sqrt(amount_low.widening_mul(&amount_high))?;
            let minted = root
                .checked_sub(self.minimum_liquidity.get())
                .ok_or(AmmError::InsufficientLiquidityMinted)?;
            (Shares::new(minted), self.minimum_liquidity)
        } else {
            let by_low = safe_mul_div(amount_low.get(), supply.get(), self.reserve_low.get())?;
            let by_high = safe_mul_div(amount_high.get(), supply.get(), self.reserve_high.get())?;
            (Shares::new(by_low.min(by_high)), Shares::ZERO)
        };
        if minted.is_zero() {
            return Err(AmmError::InsufficientLiquidityMinted);
        }

        supply.safe_add(&locked)?.safe_add(&minted)?;
        self.reserve_low.safe_add(&amount_low)?;
        self.reserve_high.safe_add(&amount_high)?;

        debug!(
            pool = %self.id,
            %amount_low,
            %amount_high,
            %minted,
            %locked,
            %protocol_fee,
            "deposit planned"
        );
        Ok(DepositPlan {
            amount_low,
            amount_high,
            minted,
            locked,
            protocol_fee,
        })
    }

    /// Applies a deposit plan, taking custody of both funds.
    pub(crate) fn settle_deposit(
        &mut self,
        plan: DepositPlan,
        provider: &Principal,
        fee_to: Option<&Principal>,
        funds_low: Funds,
        funds_high: Funds,
        now: u64,
    ) -> Result<DepositResult, Reverted> {
        if !Self::funds_match(&funds_low, self.pair.low(), plan.amount_low)
            || !Self::funds_match(&funds_high, self.pair.high(), plan.amount_high)
        {
            return Err(Reverted::new(
                AmmError::InvariantViolation("deposit funds do not match plan"),
                vec![funds_low, funds_high],
            ));
        }

        let checked = (|| {
            let reserve_low = self.reserve_low.safe_add(&plan.amount_low)?;
            let reserve_high = self.reserve_high.safe_add(&plan.amount_high)?;
            self.shares
                .total_supply()
                .safe_add(&plan.protocol_fee)?
                .safe_add(&plan.locked)?
                .safe_add(&plan.minted)?;
            Ok::<_, AmmError>((reserve_low, reserve_high))
        })();
        let (reserve_low, reserve_high) = match checked {
            Ok(r) => r,
            Err(error) => return Err(Reverted::new(error, vec![funds_low, funds_high])),
        };

        let minted = (|| {
            if let Some(recipient) = fee_to {
                self.shares.mint(recipient, plan.protocol_fee)?;
            }
            self.shares.mint_locked(plan.locked)?;
            self.shares.mint(provider, plan.minted)
        })();
        if let Err(error) = minted {
            return Err(Reverted::new(error, vec![funds_low, funds_high]));
        }

        self.custody.deposit(funds_low);
        self.custody.deposit(funds_high);
        self.sync(reserve_low, reserve_high, now);
        self.k_last = Self::next_k_last(fee_to.is_some(), reserve_low, reserve_high);

        Ok(DepositResult {
            pool_id: self.id,
            amount_low: plan.amount_low,
            amount_high: plan.amount_high,
            minted: plan.minted,
            locked: plan.locked,
            protocol_fee: plan.protocol_fee,
        })
    }

    // -- withdrawal -----------------------------------------------------------

    /// Computes the assets returned for burning `burned` shares of `holder`.
    ///
    /// Each side pays `burned × reserve / total_supply`, floored.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientShareBalance`] if `holder` owns fewer than
    ///   `burned` shares.
    /// - [`AmmError::InsufficientLiquidityBurned`] if either side floors to
    ///   zero.
    pub fn prepare_withdrawal(
        &self,
        holder: &Principal,
        burned: Shares,
        fee_to: Option<&Principal>,
    ) -> Result<WithdrawalPlan, AmmError> {
        if self.shares.balance_of(holder) < burned {
            return Err(AmmError::InsufficientShareBalance);
        }
        if burned.is_zero() {
            return Err(AmmError::InsufficientLiquidityBurned);
        }
        let protocol_fee = self.protocol_fee(fee_to.is_some())?;
        let supply = self.shares.total_supply().safe_add(&protocol_fee)?;

        let amount_low = safe_mul_div(burned.get(), self.reserve_low.get(), supply.get())?;
        let amount_high = safe_mul_div(burned.get(), self.reserve_high.get(), supply.get())?;
        if amount_low == 0 || amount_high == 0 {
            return Err(AmmError::InsufficientLiquidityBurned);
        }

        debug!(
            pool = %self.id,
            %burned,
            amount_low,
            amount_high,
            %protocol_fee,
            "withdrawal planned"
        );
        Ok(WithdrawalPlan {
            burned,
            amount_low: Amount::new(amount_low),
            amount_high: Amount::new(amount_high),
            protocol_fee,
        })
    }

    /// Applies a withdrawal plan, returning `(result, funds_low, funds_high)`.
    pub(crate) fn settle_withdrawal(
        &mut self,
        plan: WithdrawalPlan,
        holder: &Principal,
        fee_to: Option<&Principal>,
        now: u64,
    ) -> Result<(WithdrawalResult, Funds, Funds), AmmError> {
        let fee_to_holder = fee_to == Some(holder);
        let available = if fee_to_holder {
            self.shares.balance_of(holder).safe_add(&plan.protocol_fee)?
        } else {
            self.shares.balance_of(holder)
        };
        if available < plan.burned {
            return Err(AmmError::InsufficientShareBalance);
        }
        let reserve_low = self.reserve_low.safe_sub(&plan.amount_low)?;
        let reserve_high = self.reserve_high.safe_sub(&plan.amount_high)?;
        if self.custody.balance(self.pair.low()) < u128::from(plan.amount_low.get())
            || self.custody.balance(self.pair.high()) < u128::from(plan.amount_high.get())
        {
            return Err(AmmError::InvariantViolation("custody below reserves"));
        }
        self.shares.total_supply().safe_add(&plan.protocol_fee)?;

        if let Some(recipient) = fee_to {
            self.shares.mint(recipient, plan.protocol_fee)?;
        }
        self.shares.burn(holder, plan.burned)?;
        let out_low = self.custody.withdraw(self.pair.low(), plan.amount_low)?;
        let out_high = match self.custody.withdraw(self.pair.high(), plan.amount_high) {
            Ok(funds) => funds,
            Err(error) => {
                self.custody.deposit(out_low);
                return Err(error);
            }
        };
        self.sync(reserve_low, reserve_high, now);
        self.k_last = Self::next_k_last(fee_to.is_some(), reserve_low, reserve_high);

        let result = WithdrawalResult {
            pool_id: self.id,
            burned: plan.burned,
            amount_low: plan.amount_low,
            amount_high: plan.amount_high,
            protocol_fee: plan.protocol_fee,
        };
        Ok((result, out_low, out_high))
    }

    // -- swap -----------------------------------------------------------------

    /// Prices a swap in `direction`.
    ///
    /// Exact-in swaps use [`get_amount_out`] and honour the minimum output.
    /// Exact-out swaps use [`get_amount_in`] and honour the maximum input.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientOutputAmount`] if the output is below
    ///   `min_amount_out`.
    /// - [`AmmError::ExcessiveInputAmount`] if the required input exceeds
    ///   `max_amount_in`.
    /// - [`AmmError::InsufficientLiquidity`] if the pool cannot pay out.
    /// - Any pricing error from [`crate::math`].
    pub fn prepare_swap(
        &self,
        direction: SwapDirection,
        spec: SwapSpec,
    ) -> Result<SwapPlan, AmmError> {
        let (reserve_in, reserve_out) = self.oriented(direction);
        let (amount_in, amount_out) = match spec {
            SwapSpec::ExactIn {
                amount_in,
                min_amount_out,
            } => {
                let out = get_amount_out(amount_in.get(), reserve_in.get(), reserve_out.get())?;
                if out < min_amount_out.get() {
                    return Err(AmmError::InsufficientOutputAmount);
                }
                (amount_in, Amount::new(out))
            }
            SwapSpec::ExactOut {
                amount_out,
                max_amount_in,
            } => {
                let needed = get_amount_in(amount_out.get(), reserve_in.get(), reserve_out.get())?;
                if needed > max_amount_in.get() {
                    return Err(AmmError::ExcessiveInputAmount);
                }
                (Amount::new(needed), amount_out)
            }
        };

        let new_in = reserve_in.safe_add(&amount_in)?;
        let new_out = reserve_out
            .checked_sub(&amount_out)
            .ok_or(AmmError::InsufficientLiquidity)?;
        if new_in.widening_mul(&new_out) < reserve_in.widening_mul(&reserve_out) {
            return Err(AmmError::InvariantViolation("constant product decreased"));
        }

        debug!(pool = %self.id, %direction, %amount_in, %amount_out, "swap planned");
        Ok(SwapPlan {
            direction,
            amount_in,
            amount_out,
        })
    }

    /// Applies a swap plan, taking custody of `funds_in` and returning the
    /// output funds.
    pub(crate) fn settle_swap(
        &mut self,
        plan: SwapPlan,
        funds_in: Funds,
        now: u64,
    ) -> Result<(SwapResult, Funds), Reverted> {
        let asset_in = plan.direction.asset_in(&self.pair).clone();
        let asset_out = plan.direction.asset_out(&self.pair).clone();
        if !Self::funds_match(&funds_in, &asset_in, plan.amount_in) {
            return Err(Reverted::new(
                AmmError::InvariantViolation("swap funds do not match plan"),
                vec![funds_in],
            ));
        }

        let (reserve_in, reserve_out) = self.oriented(plan.direction);
        let checked = reserve_in.safe_add(&plan.amount_in).and_then(|new_in| {
            reserve_out
                .checked_sub(&plan.amount_out)
                .map(|new_out| (new_in, new_out))
                .ok_or(AmmError::InsufficientLiquidity)
        });
        let (new_in, new_out) = match checked {
            Ok(r) => r,
            Err(error) => return Err(Reverted::new(error, vec![funds_in])),
        };

        let funds_out = match self.custody.withdraw(&asset_out, plan.amount_out) {
            Ok(funds) => funds,
            Err(error) => return Err(Reverted::new(error, vec![funds_in])),
        };
        self.custody.deposit(funds_in);
        match plan.direction {
            SwapDirection::LowToHigh => self.sync(new_in, new_out, now),
            SwapDirection::HighToLow => self.sync(new_out, new_in, now),
        }

        let result = SwapResult {
            pool_id: self.id,
            direction: plan.direction,
            amount_in: plan.amount_in,
            amount_out: plan.amount_out,
        };
        Ok((result, funds_out))
    }

    /// Moves LP shares between holders.
    pub(crate) fn transfer_shares(
        &mut self,
        from: &Principal,
        to: &Principal,
        amount: Shares,
    ) -> Result<(), AmmError> {
        self.shares.transfer(from, to, amount)
    }

    // -- audit ----------------------------------------------------------------

    /// Checks the pool's accounting invariants.
    ///
    /// - share balances plus locked shares equal total supply;
    /// - an initialised pool has exactly the minimum liquidity locked;
    /// - custody holds exactly the reserves;
    /// - the reserve product is at least the recorded product.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvariantViolation`] naming the first broken
    /// invariant.
    pub fn audit(&self) -> Result<(), AmmError> {
        self.shares.check_invariant()?;
        let supply = self.shares.total_supply();
        let expected_locked = if supply.is_zero() {
            Shares::ZERO
        } else {
            self.minimum_liquidity
        };
        if self.shares.locked() != expected_locked {
            return Err(AmmError::InvariantViolation(
                "locked shares differ from minimum liquidity",
            ));
        }
        if self.custody.balance(self.pair.low()) != u128::from(self.reserve_low.get())
            || self.custody.balance(self.pair.high()) != u128::from(self.reserve_high.get())
        {
            return Err(AmmError::InvariantViolation(
                "custody balances differ from reserves",
            ));
        }
        if self.reserve_low.widening_mul(&self.reserve_high) < self.cumulative_product {
            return Err(AmmError::InvariantViolation(
                "reserve product below recorded product",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::math::MINIMUM_LIQUIDITY;

    fn asset(id: &str) -> AssetId {
        let Ok(a) = AssetId::new(id) else {
            panic!("valid asset id");
        };
        a
    }

    fn principal(name: &str) -> Principal {
        let Ok(p) = Principal::new(name) else {
            panic!("valid principal");
        };
        p
    }

    fn empty_pool() -> Pool {
        let Ok(pair) = PairKey::new(asset("AAA"), asset("BBB")) else {
            panic!("distinct assets");
        };
        Pool::new(PoolId::new(0), pair, Shares::new(MINIMUM_LIQUIDITY))
    }

    fn deposit(
        pool: &mut Pool,
        who: &Principal,
        low: u64,
        high: u64,
        fee_to: Option<&Principal>,
    ) -> DepositResult {
        let Ok(plan) = pool.prepare_deposit(Amount::new(low), Amount::new(high), fee_to) else {
            panic!("deposit plan");
        };
        let funds_low = Funds::issue(pool.pair().low().clone(), plan.amount_low());
        let funds_high = Funds::issue(pool.pair().high().clone(), plan.amount_high());
        match pool.settle_deposit(plan, who, fee_to, funds_low, funds_high, 1) {
            Ok(result) => result,
            Err(reverted) => panic!("deposit reverted: {}", reverted.error),
        }
    }

    fn swap(pool: &mut Pool, direction: SwapDirection, spec: SwapSpec) -> SwapResult {
        let Ok(plan) = pool.prepare_swap(direction, spec) else {
            panic!("swap plan");
        };
        let funds_in = Funds::issue(direction.asset_in(pool.pair()).clone(), plan.amount_in());
        match pool.settle_swap(plan, funds_in, 2) {
            Ok((result, out)) => {
                assert_eq!(out.amount(), result.amount_out);
                let _ = out.into_parts();
                result
            }
            Err(reverted) => panic!("swap reverted: {}", reverted.error),
        }
    }

    fn funded_pool(low: u64, high: u64) -> (Pool, Principal) {
        let lp = principal("lp");
        let mut pool = empty_pool();
        let _ = deposit(&mut pool, &lp, low, high, None);
        (pool, lp)
    }

    // -- deposit --------------------------------------------------------------

    #[test]
    fn new_pool_is_empty() {
        let pool = empty_pool();
        assert_eq!(pool.reserves(), Reserves::EMPTY);
        assert_eq!(pool.total_supply(), Shares::ZERO);
        assert!(pool.audit().is_ok());
    }

    #[test]
    fn first_deposit_locks_minimum_liquidity() {
        let lp = principal("lp");
        let mut pool = empty_pool();
        let result = deposit(&mut pool, &lp, 100_000, 100_000, None);
        assert_eq!(result.minted, Shares::new(99_000));
        assert_eq!(result.locked, Shares::new(1_000));
        assert_eq!(pool.total_supply(), Shares::new(100_000));
        assert_eq!(pool.share_balance(&lp), Shares::new(99_000));
        assert_eq!(pool.reserves().reserve_low, Amount::new(100_000));
        assert_eq!(pool.reserves().last_update_time, 1);
        assert!(pool.audit().is_ok());
    }

    #[test]
    fn first_deposit_at_minimum_is_rejected() {
        let pool = empty_pool();
        assert_eq!(
            pool.prepare_deposit(Amount::new(1_000), Amount::new(1_000), None),
            Err(AmmError::InsufficientLiquidityMinted)
        );
        assert_eq!(
            pool.prepare_deposit(Amount::new(10), Amount::new(10), None),
            Err(AmmError::InsufficientLiquidityMinted)
        );
        assert_eq!(
            pool.prepare_deposit(Amount::ZERO, Amount::new(1_000_000), None),
            Err(AmmError::InsufficientLiquidityMinted)
        );
    }

    #[test]
    fn proportional_deposit_takes_smaller_side() {
        let (mut pool, lp) = funded_pool(100_000, 100_000);
        let result = deposit(&mut pool, &lp, 10_000, 20_000, None);
        assert_eq!(result.minted, Shares::new(10_000));
        assert_eq!(result.locked, Shares::ZERO);
        assert_eq!(pool.reserves().reserve_high, Amount::new(120_000));
        assert_eq!(pool.share_balance(&lp), Shares::new(109_000));
        assert!(pool.audit().is_ok());
    }

    #[test]
    fn zero_sided_deposit_mints_nothing() {
        let (pool, _) = funded_pool(100_000, 100_000);
        assert_eq!(
            pool.prepare_deposit(Amount::new(10_000), Amount::ZERO, None),
            Err(AmmError::InsufficientLiquidityMinted)
        );
    }

    #[test]
    fn deposit_reserve_overflow() {
        let (pool, _) = funded_pool(100_000, 100_000);
        assert!(matches!(
            pool.prepare_deposit(Amount::MAX, Amount::MAX, None),
            Err(AmmError::Overflow(_))
        ));
    }

    #[test]
    fn mismatched_deposit_funds_are_refunded() {
        let lp = principal("lp");
        let mut pool = empty_pool();
        let Ok(plan) = pool.prepare_deposit(Amount::new(100_000), Amount::new(100_000), None)
        else {
            panic!("deposit plan");
        };
        let before = pool.clone();
        let funds_low = Funds::issue(pool.pair().low().clone(), Amount::new(99_999));
        let funds_high = Funds::issue(pool.pair().high().clone(), Amount::new(100_000));
        let Err(reverted) = pool.settle_deposit(plan, &lp, None, funds_low, funds_high, 1) else {
            panic!("expected revert");
        };
        assert!(matches!(reverted.error, AmmError::InvariantViolation(_)));
        let refunded: u64 = reverted
            .refund
            .into_iter()
            .map(|f| f.into_parts().1.get())
            .sum();
        assert_eq!(refunded, 199_999);
        assert_eq!(pool, before);
    }

    // -- withdrawal -----------------------------------------------------------

    #[test]
    fn withdrawal_round_trip_is_exact_on_balanced_pool() {
        let (mut pool, _) = funded_pool(100_000, 100_000);
        let bob = principal("bob");
        let added = deposit(&mut pool, &bob, 10_000, 10_000, None);
        let Ok(plan) = pool.prepare_withdrawal(&bob, added.minted, None) else {
            panic!("withdrawal plan");
        };
        let Ok((result, out_low, out_high)) = pool.settle_withdrawal(plan, &bob, None, 5) else {
            panic!("withdrawal settles");
        };
        assert_eq!(result.amount_low, Amount::new(10_000));
        assert_eq!(result.amount_high, Amount::new(10_000));
        assert_eq!(out_low.into_parts().1, Amount::new(10_000));
        assert_eq!(out_high.into_parts().1, Amount::new(10_000));
        assert_eq!(pool.share_balance(&bob), Shares::ZERO);
        assert_eq!(pool.reserves().last_update_time, 5);
        assert!(pool.audit().is_ok());
    }

    #[test]
    fn full_withdrawal_leaves_locked_reserves() {
        let (mut pool, lp) = funded_pool(100_000, 100_000);
        let Ok(plan) = pool.prepare_withdrawal(&lp, Shares::new(99_000), None) else {
            panic!("withdrawal plan");
        };
        let Ok((_, out_low, out_high)) = pool.settle_withdrawal(plan, &lp, None, 3) else {
            panic!("withdrawal settles");
        };
        let _ = (out_low.into_parts(), out_high.into_parts());
        assert_eq!(pool.total_supply(), Shares::new(1_000));
        assert_eq!(pool.reserves().reserve_low, Amount::new(1_000));
        assert!(pool.audit().is_ok());
    }

    #[test]
    fn withdrawal_beyond_balance_is_rejected() {
        let (pool, lp) = funded_pool(100_000, 100_000);
        assert_eq!(
            pool.prepare_withdrawal(&lp, Shares::new(99_001), None),
            Err(AmmError::InsufficientShareBalance)
        );
        assert_eq!(
            pool.prepare_withdrawal(&principal("nobody"), Shares::new(1), None),
            Err(AmmError::InsufficientShareBalance)
        );
    }

    #[test]
    fn withdrawal_of_zero_or_dust_is_rejected() {
        let (pool, lp) = funded_pool(4_000_000, 1);
        assert_eq!(
            pool.prepare_withdrawal(&lp, Shares::ZERO, None),
            Err(AmmError::InsufficientLiquidityBurned)
        );
        // 1 × 1 / 2000 floors to zero on the high side
        assert_eq!(
            pool.prepare_withdrawal(&lp, Shares::new(1), None),
            Err(AmmError::InsufficientLiquidityBurned)
        );
    }

    // -- swap -----------------------------------------------------------------

    #[test]
    fn swap_exact_in_low_to_high() {
        let (mut pool, _) = funded_pool(10_000, 10_000);
        let result = swap(
            &mut pool,
            SwapDirection::LowToHigh,
            SwapSpec::exact_in(Amount::new(1_000), Amount::new(900)),
        );
        assert_eq!(result.amount_out, Amount::new(906));
        let reserves = pool.reserves();
        assert_eq!(reserves.reserve_low, Amount::new(11_000));
        assert_eq!(reserves.reserve_high, Amount::new(9_094));
        assert_eq!(reserves.last_update_time, 2);
        assert_eq!(pool.cumulative_product(), 11_000 * 9_094);
        assert!(pool.audit().is_ok());
    }

    #[test]
    fn swap_exact_in_high_to_low() {
        let (mut pool, _) = funded_pool(10_000, 10_000);
        let result = swap(
            &mut pool,
            SwapDirection::HighToLow,
            SwapSpec::exact_in(Amount::new(1_000), Amount::ZERO),
        );
        assert_eq!(result.amount_out, Amount::new(906));
        assert_eq!(pool.reserves().reserve_low, Amount::new(9_094));
        assert_eq!(pool.reserves().reserve_high, Amount::new(11_000));
    }

    #[test]
    fn swap_slippage_guard() {
        let (pool, _) = funded_pool(10_000, 10_000);
        assert_eq!(
            pool.prepare_swap(
                SwapDirection::LowToHigh,
                SwapSpec::exact_in(Amount::new(1_000), Amount::new(907)),
            ),
            Err(AmmError::InsufficientOutputAmount)
        );
    }

    #[test]
    fn swap_exact_out() {
        let (mut pool, _) = funded_pool(10_000, 10_000);
        assert_eq!(
            pool.prepare_swap(
                SwapDirection::LowToHigh,
                SwapSpec::exact_out(Amount::new(906), Amount::new(999)),
            ),
            Err(AmmError::ExcessiveInputAmount)
        );
        let result = swap(
            &mut pool,
            SwapDirection::LowToHigh,
            SwapSpec::exact_out(Amount::new(906), Amount::new(1_000)),
        );
        assert_eq!(result.amount_in, Amount::new(1_000));
        assert_eq!(result.amount_out, Amount::new(906));
    }

    #[test]
    fn swap_exact_out_cannot_drain() {
        let (pool, _) = funded_pool(10_000, 10_000);
        assert_eq!(
            pool.prepare_swap(
                SwapDirection::LowToHigh,
                SwapSpec::exact_out(Amount::new(10_000), Amount::MAX),
            ),
            Err(AmmError::InsufficientLiquidity)
        );
    }

    #[test]
    fn swap_on_empty_pool() {
        let pool = empty_pool();
        assert_eq!(
            pool.prepare_swap(
                SwapDirection::LowToHigh,
                SwapSpec::exact_in(Amount::new(1), Amount::ZERO),
            ),
            Err(AmmError::InsufficientLiquidity)
        );
    }

    #[test]
    fn product_grows_over_repeated_swaps() {
        let (mut pool, _) = funded_pool(1_000_000, 1_000_000);
        let mut k = pool.cumulative_product();
        for i in 0..20_u64 {
            let direction = if i % 2 == 0 {
                SwapDirection::LowToHigh
            } else {
                SwapDirection::HighToLow
            };
            let _ = swap(
                &mut pool,
                direction,
                SwapSpec::exact_in(Amount::new(10_000 + i * 100), Amount::ZERO),
            );
            assert!(pool.cumulative_product() > k);
            k = pool.cumulative_product();
        }
        assert!(pool.audit().is_ok());
    }

    #[test]
    fn mismatched_swap_funds_are_refunded() {
        let (mut pool, _) = funded_pool(10_000, 10_000);
        let Ok(plan) = pool.prepare_swap(
            SwapDirection::LowToHigh,
            SwapSpec::exact_in(Amount::new(1_000), Amount::ZERO),
        ) else {
            panic!("swap plan");
        };
        let before = pool.clone();
        let wrong_side = Funds::issue(pool.pair().high().clone(), Amount::new(1_000));
        let Err(reverted) = pool.settle_swap(plan, wrong_side, 9) else {
            panic!("expected revert");
        };
        assert_eq!(reverted.refund.len(), 1);
        for funds in reverted.refund {
            let _ = funds.into_parts();
        }
        assert_eq!(pool, before);
    }

    // -- protocol fee ---------------------------------------------------------

    #[test]
    fn protocol_fee_accrues_on_growth() {
        let lp = principal("lp");
        let treasury = principal("treasury");
        let mut pool = empty_pool();
        let _ = deposit(&mut pool, &lp, 100_000, 100_000, Some(&treasury));
        assert_eq!(pool.k_last(), 10_000_000_000);

        let _ = swap(
            &mut pool,
            SwapDirection::LowToHigh,
            SwapSpec::exact_in(Amount::new(10_000), Amount::ZERO),
        );
        // k = 110_000 × 90_934; √k = 100_013; fee = 100_000 × 13 / 600_065
        let result = deposit(&mut pool, &lp, 11_000, 10_000, Some(&treasury));
        assert_eq!(result.protocol_fee, Shares::new(2));
        assert_eq!(pool.share_balance(&treasury), Shares::new(2));
        assert!(pool.audit().is_ok());
    }

    #[test]
    fn protocol_fee_off_clears_k_last() {
        let lp = principal("lp");
        let treasury = principal("treasury");
        let mut pool = empty_pool();
        let _ = deposit(&mut pool, &lp, 100_000, 100_000, Some(&treasury));
        assert!(pool.k_last() > 0);
        let result = deposit(&mut pool, &lp, 1_000, 1_000, None);
        assert_eq!(result.protocol_fee, Shares::ZERO);
        assert_eq!(pool.k_last(), 0);
    }

    #[test]
    fn protocol_fee_zero_without_growth() {
        let lp = principal("lp");
        let treasury = principal("treasury");
        let mut pool = empty_pool();
        let _ = deposit(&mut pool, &lp, 100_000, 100_000, Some(&treasury));
        let result = deposit(&mut pool, &lp, 1_000, 1_000, Some(&treasury));
        assert_eq!(result.protocol_fee, Shares::ZERO);
        assert_eq!(pool.share_balance(&treasury), Shares::ZERO);
    }

    // -- transfer -------------------------------------------------------------

    #[test]
    fn transfer_keeps_audit_clean() {
        let (mut pool, lp) = funded_pool(100_000, 100_000);
        let bob = principal("bob");
        assert!(pool.transfer_shares(&lp, &bob, Shares::new(500)).is_ok());
        assert_eq!(pool.share_balance(&bob), Shares::new(500));
        assert!(pool.audit().is_ok());
    }
}
