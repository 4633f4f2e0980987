//! Property-based tests using `proptest` for pool invariants.
//!
//! 1. **Pair symmetry**: `PairKey::new(a, b) == PairKey::new(b, a)`.
//! 2. **Invariant preservation**: `reserve_low × reserve_high` never
//!    decreases across swaps.
//! 3. **Swap reversibility**: a round trip returns no more than was sold.
//! 4. **Exact-out inverse**: `get_amount_in` is the smallest sufficient
//!    input.
//! 5. **Liquidity conservation**: add then remove returns at most the
//!    deposit.
//! 6. **Ledger supply**: balances plus locked always equal total supply.
//! 7. **Square root floor**: `r² ≤ y < (r + 1)²`.

use proptest::prelude::*;

use crate::custody::Funds;
use crate::domain::{
    Amount, AssetId, PairKey, PoolId, Principal, Shares, SwapDirection, SwapSpec,
};
use crate::ledger::ShareLedger;
use crate::math::{get_amount_in, get_amount_out, integer_sqrt, MINIMUM_LIQUIDITY};
use crate::pool::Pool;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

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

fn release(funds: Funds) -> u64 {
    funds.into_parts().1.get()
}

/// A pool seeded by `"seed"` with `(low, high)`.
fn seeded_pool(low: u64, high: u64) -> Pool {
    let Ok(pair) = PairKey::new(asset("AAA"), asset("BBB")) else {
        panic!("distinct assets");
    };
    let mut pool = Pool::new(PoolId::new(0), pair, Shares::new(MINIMUM_LIQUIDITY));
    let Ok(plan) = pool.prepare_deposit(Amount::new(low), Amount::new(high), None) else {
        panic!("seed deposit plan");
    };
    let funds_low = Funds::issue(pool.pair().low().clone(), plan.amount_low());
    let funds_high = Funds::issue(pool.pair().high().clone(), plan.amount_high());
    if let Err(reverted) = pool.settle_deposit(plan, &principal("seed"), None, funds_low, funds_high, 1)
    {
        panic!("seed deposit reverted: {}", reverted.error);
    }
    pool
}

/// Runs an exact-in swap; `None` when the pool rejects it.
fn swap_in(pool: &mut Pool, direction: SwapDirection, amount: u64) -> Option<u64> {
    let plan = pool
        .prepare_swap(direction, SwapSpec::exact_in(Amount::new(amount), Amount::ZERO))
        .ok()?;
    let funds_in = Funds::issue(direction.asset_in(pool.pair()).clone(), plan.amount_in());
    match pool.settle_swap(plan, funds_in, 2) {
        Ok((_, out)) => Some(release(out)),
        Err(reverted) => {
            for funds in reverted.refund {
                release(funds);
            }
            None
        }
    }
}

fn product(pool: &Pool) -> u128 {
    let reserves = pool.reserves();
    reserves.reserve_low.widening_mul(&reserves.reserve_high)
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// Reserve values in range [10_000, 10_000_000_000].
fn reserve_strategy() -> impl Strategy<Value = u64> {
    10_000u64..=10_000_000_000u64
}

/// Identifier strings without whitespace.
fn id_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9:_]{1,24}"
}

fn direction_strategy() -> impl Strategy<Value = SwapDirection> {
    prop_oneof![Just(SwapDirection::LowToHigh), Just(SwapDirection::HighToLow)]
}

#[derive(Debug, Clone)]
enum LedgerOp {
    Mint(usize, u64),
    Burn(usize, u64),
    Transfer(usize, usize, u64),
}

fn ledger_op_strategy() -> impl Strategy<Value = LedgerOp> {
    prop_oneof![
        (0usize..4, 0u64..1_000_000).prop_map(|(h, a)| LedgerOp::Mint(h, a)),
        (0usize..4, 0u64..1_000_000).prop_map(|(h, a)| LedgerOp::Burn(h, a)),
        (0usize..4, 0usize..4, 0u64..1_000_000).prop_map(|(f, t, a)| LedgerOp::Transfer(f, t, a)),
    ]
}

// ---------------------------------------------------------------------------
// Property 1: Pair symmetry
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_pair_key_symmetric(a in id_strategy(), b in id_strategy()) {
        prop_assume!(a != b);
        let (Ok(ab), Ok(ba)) = (
            PairKey::new(asset(&a), asset(&b)),
            PairKey::new(asset(&b), asset(&a)),
        ) else {
            panic!("distinct assets form a pair");
        };
        prop_assert_eq!(&ab, &ba);
        prop_assert!(ab.low() < ab.high());
    }
}

// ---------------------------------------------------------------------------
// Property 2: Invariant preservation
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_product_never_decreases(
        rl in reserve_strategy(),
        rh in reserve_strategy(),
        swaps in prop::collection::vec((direction_strategy(), 1u64..1_000_000), 1..8),
    ) {
        let mut pool = seeded_pool(rl, rh);
        let mut k_before = product(&pool);

        for (direction, amount) in swaps {
            if swap_in(&mut pool, direction, amount).is_none() {
                continue;
            }
            let k_after = product(&pool);
            prop_assert!(k_after >= k_before, "k decreased: {} -> {}", k_before, k_after);
            prop_assert!(pool.audit().is_ok());
            k_before = k_after;
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: Swap reversibility
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_round_trip_loses_value(
        rl in reserve_strategy(),
        rh in reserve_strategy(),
        fraction in 1u64..=100,
    ) {
        let amount = (rl / 1_000 * fraction / 100).max(1);
        let mut pool = seeded_pool(rl, rh);

        let Some(received) = swap_in(&mut pool, SwapDirection::LowToHigh, amount) else {
            return Ok(());
        };
        if received == 0 {
            return Ok(());
        }
        let Some(back) = swap_in(&mut pool, SwapDirection::HighToLow, received) else {
            return Ok(());
        };
        prop_assert!(back <= amount, "round trip gained: {} > {}", back, amount);
    }
}

// ---------------------------------------------------------------------------
// Property 4: Exact-out inverse
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_amount_in_is_minimal(
        reserve_in in reserve_strategy(),
        reserve_out in reserve_strategy(),
        out_fraction in 1u64..=500,
    ) {
        let amount_out = (reserve_out / 1_000 * out_fraction / 1_000).max(1);
        let Ok(needed) = get_amount_in(amount_out, reserve_in, reserve_out) else {
            return Ok(());
        };
        let Ok(got) = get_amount_out(needed, reserve_in, reserve_out) else {
            panic!("pricing the required input");
        };
        prop_assert!(got >= amount_out);
        if needed > 1 {
            let short = get_amount_out(needed - 1, reserve_in, reserve_out).unwrap_or(0);
            prop_assert!(short <= amount_out);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 5: Liquidity conservation
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_add_then_remove_returns_at_most_deposit(
        rl in reserve_strategy(),
        rh in reserve_strategy(),
        add_low in 1_000u64..100_000_000,
        add_high in 1_000u64..100_000_000,
    ) {
        let mut pool = seeded_pool(rl, rh);
        let lp = principal("lp");

        let Ok(plan) = pool.prepare_deposit(Amount::new(add_low), Amount::new(add_high), None) else {
            return Ok(());
        };
        let funds_low = Funds::issue(pool.pair().low().clone(), plan.amount_low());
        let funds_high = Funds::issue(pool.pair().high().clone(), plan.amount_high());
        let Ok(added) = pool.settle_deposit(plan, &lp, None, funds_low, funds_high, 3) else {
            panic!("deposit settles after a successful plan");
        };

        let Ok(plan) = pool.prepare_withdrawal(&lp, added.minted, None) else {
            return Ok(());
        };
        let Ok((removed, out_low, out_high)) = pool.settle_withdrawal(plan, &lp, None, 4) else {
            panic!("withdrawal settles after a successful plan");
        };
        prop_assert_eq!(release(out_low), removed.amount_low.get());
        prop_assert_eq!(release(out_high), removed.amount_high.get());
        prop_assert!(removed.amount_low <= added.amount_low);
        prop_assert!(removed.amount_high <= added.amount_high);
        prop_assert_eq!(pool.share_balance(&lp), Shares::ZERO);
        prop_assert!(pool.audit().is_ok());
    }
}

// ---------------------------------------------------------------------------
// Property 6: Ledger supply
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_ledger_supply_matches_balances(
        ops in prop::collection::vec(ledger_op_strategy(), 1..32),
    ) {
        let holders = [principal("h0"), principal("h1"), principal("h2"), principal("h3")];
        let mut ledger = ShareLedger::new();
        prop_assert!(ledger.mint_locked(Shares::new(MINIMUM_LIQUIDITY)).is_ok());

        for op in ops {
            let _ = match op {
                LedgerOp::Mint(h, a) => ledger.mint(&holders[h], Shares::new(a)),
                LedgerOp::Burn(h, a) => ledger.burn(&holders[h], Shares::new(a)),
                LedgerOp::Transfer(f, t, a) => {
                    ledger.transfer(&holders[f], &holders[t], Shares::new(a))
                }
            };
            let sum: u64 = ledger.holders().map(|(_, s)| s.get()).sum();
            prop_assert_eq!(sum + ledger.locked().get(), ledger.total_supply().get());
            prop_assert!(ledger.check_invariant().is_ok());
        }
    }
}

// ---------------------------------------------------------------------------
// Property 7: Square root floor
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn prop_integer_sqrt_is_floor(y in any::<u128>()) {
        let Ok(r) = integer_sqrt(y) else {
            panic!("every u128 has a u64 root");
        };
        let r = u128::from(r);
        prop_assert!(r * r <= y);
        if let Some(next) = (r + 1).checked_mul(r + 1) {
            prop_assert!(next > y);
        }
    }
}
