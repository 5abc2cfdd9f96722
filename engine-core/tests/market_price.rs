mod common;

use crate::common::*;
use engine_core::prelude::*;

/// Before any two-sided limit liquidity has rested on both books, the
/// market-price estimate starts at (and stays at) zero.
#[test]
fn market_price_starts_at_zero_with_one_sided_liquidity() {
    let engine = engine();
    engine.place(trader(1, 1000), 1, Side::Buy, false, 100, 10);
    assert_eq!(engine.market_price(), 0);
}

/// Once both books carry at least two limit orders each, the demand/
/// supply intersection publishes a nonzero estimate, and a subsequently
/// placed market order prices off it rather than off its own (sentinel)
/// limit price.
#[test]
fn market_order_prices_off_the_published_estimate() {
    let engine = engine();

    // Seed two-sided limit liquidity so the estimator has two distinct
    // points on each line.
    engine.place(trader(1, 0), 1, Side::Sell, false, 95, 5);
    engine.place(trader(2, 0), 2, Side::Sell, false, 115, 15);
    engine.place(trader(3, 1_000_000), 3, Side::Buy, false, 110, 5);
    engine.place(trader(4, 1_000_000), 4, Side::Buy, false, 90, 15);

    let estimate = engine.market_price();
    assert!(estimate > 0, "crossing demand/supply lines should yield a positive estimate");

    // A market sell against a resting limit buy settles at the mid of
    // the buy's limit price and the live estimate, not at the estimate
    // alone, which is a reliable way to observe the estimate fed in.
    engine.place(trader(5, 1_000_000), 5, Side::Buy, false, 200, 1);
    engine.place(trader(6, 0), 6, Side::Sell, true, 0, 1);

    let tx = engine.last_transaction();
    assert_eq!(tx.exchange_id_buyer, 5);
    assert_eq!(tx.price, (200 + engine.market_price()) / 2);
}
