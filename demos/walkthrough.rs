//! Constant-product exchange walkthrough.
//!
//! Creates a pool, seeds it, trades in both directions, turns on the
//! protocol fee, exits, and prints the resulting state.
//!
//! # Run
//!
//! ```bash
//! RUST_LOG=pairswap=debug cargo run --example walkthrough
//! ```

use pairswap::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pairswap=info")),
        )
        .init();

    println!("=== Constant Product Exchange (x · y = k) ===\n");

    // ── 1. Participants and assets ──────────────────────────────────────
    let admin = Principal::new("admin")?;
    let treasury = Principal::new("treasury")?;
    let alice = Principal::new("alice")?;
    let bob = Principal::new("bob")?;
    let usdc = AssetId::new("0x1::coin::USDC")?;
    let weth = AssetId::new("0x1::coin::WETH")?;

    let assets = InMemoryAssets::new();
    assets.fund(&alice, &usdc, Amount::new(5_000_000));
    assets.fund(&alice, &weth, Amount::new(5_000_000));
    assets.fund(&bob, &usdc, Amount::new(100_000));

    // ── 2. Exchange with the protocol fee on ────────────────────────────
    let exchange = Exchange::new(
        ExchangeConfig::with_defaults(admin.clone()),
        assets,
        RecordingEventSink::new(),
        SystemClock,
    )?;
    exchange.set_fee_to(&admin, Some(treasury.clone()))?;

    // ── 3. Create and seed the pool ─────────────────────────────────────
    let pool = exchange.create_pool(weth.clone(), usdc.clone())?;
    let added = exchange.add_liquidity(&alice, pool, Amount::new(1_000_000), Amount::new(1_000_000))?;
    println!("Pool {pool} created for {usdc} / {weth}");
    println!("  Minted to alice: {}", added.minted);
    println!("  Locked forever:  {}", added.locked);

    // ── 4. Trade ────────────────────────────────────────────────────────
    let sold = exchange.swap(&bob, pool, Amount::new(50_000), SwapDirection::LowToHigh, Amount::new(45_000))?;
    println!("\n--- bob sells {} USDC ---", sold.amount_in);
    println!("  Received WETH: {}", sold.amount_out);

    let bought = exchange.swap_exact_out(
        &bob,
        pool,
        Amount::new(20_000),
        SwapDirection::HighToLow,
        Amount::new(25_000),
    )?;
    println!("\n--- bob buys {} USDC back ---", bought.amount_out);
    println!("  Paid WETH: {}", bought.amount_in);

    let reserves = exchange.get_reserves(pool);
    println!("\nReserves: {} USDC / {} WETH", reserves.reserve_low, reserves.reserve_high);

    // ── 5. Exit ─────────────────────────────────────────────────────────
    let removed = exchange.remove_liquidity(&alice, pool, added.minted)?;
    println!("\n--- alice removes {} shares ---", removed.burned);
    println!("  USDC out:      {}", removed.amount_low);
    println!("  WETH out:      {}", removed.amount_high);
    println!("  Protocol fee:  {} shares", removed.protocol_fee);
    println!("  Treasury owns: {} shares", exchange.share_balance(pool, &treasury)?);

    // ── 6. Verify and export ────────────────────────────────────────────
    exchange.audit_all()?;
    let snapshot = exchange.snapshot();
    println!("\nSnapshot: {} pool(s), {} share balance(s)", snapshot.pools.len(), snapshot.share_balances.len());
    println!("Events emitted: {}", exchange.events().len());
    for event in exchange.events().events() {
        println!("  {}", event.name());
    }

    Ok(())
}
