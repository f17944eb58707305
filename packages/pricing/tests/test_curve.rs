use soroban_sdk::Env;
use strikepool_math::{MIN_TICK_DISTANCE, WAD};
use strikepool_pricing::{
    amount_of_ticks, ask_liquidity, bid_liquidity, max_trade_size, mean_price, next_price,
};

fn tick_price(n: u128) -> u128 {
    n * MIN_TICK_DISTANCE
}

#[test]
fn test_amount_of_ticks() {
    assert_eq!(amount_of_ticks(tick_price(250), tick_price(750)), 500);
    assert_eq!(amount_of_ticks(tick_price(1), tick_price(1000)), 999);
    assert_eq!(amount_of_ticks(tick_price(500), tick_price(501)), 1);
}

#[test]
fn test_liquidity_split_at_market() {
    let env = Env::default();
    let rate = 2 * WAD;
    // market a quarter of the way into [0.25, 0.75]
    let ask = ask_liquidity(&env, rate, tick_price(375), tick_price(750));
    let bid = bid_liquidity(&env, rate, tick_price(375), tick_price(250));
    assert_eq!(ask, 750 * WAD);
    assert_eq!(bid, 250 * WAD);
    assert_eq!(ask + bid, rate * 500);
}

#[test]
fn test_max_trade_size_by_direction() {
    let env = Env::default();
    let rate = 2 * WAD;
    let buy = max_trade_size(&env, rate, tick_price(375), tick_price(250), tick_price(750), true);
    let sell =
        max_trade_size(&env, rate, tick_price(375), tick_price(250), tick_price(750), false);
    assert_eq!(buy, 750 * WAD);
    assert_eq!(sell, 250 * WAD);
}

#[test]
fn test_next_price_linear() {
    let env = Env::default();
    // 500 contracts at 2 per tick moves the price 250 ticks up
    let next = next_price(
        &env,
        2 * WAD,
        tick_price(250),
        tick_price(250),
        tick_price(750),
        500 * WAD,
        true,
    );
    assert_eq!(next, tick_price(500));

    let back = next_price(
        &env,
        2 * WAD,
        tick_price(500),
        tick_price(250),
        tick_price(750),
        500 * WAD,
        false,
    );
    assert_eq!(back, tick_price(250));
}

#[test]
fn test_next_price_empty_range_jumps_to_boundary() {
    let env = Env::default();
    let up = next_price(&env, 0, tick_price(400), tick_price(250), tick_price(750), WAD, true);
    let down = next_price(&env, 0, tick_price(400), tick_price(250), tick_price(750), WAD, false);
    assert_eq!(up, tick_price(750));
    assert_eq!(down, tick_price(250));
}

#[test]
fn test_mean_price_midpoint() {
    assert_eq!(mean_price(tick_price(250), tick_price(500)), tick_price(375));
    assert_eq!(mean_price(WAD, WAD), WAD);
}
