// ============================================================================
// Pricing curve
// ============================================================================
//
// Inside an active range [lower, upper) with per-tick liquidity `rate`, the
// price is a linear function of cumulative traded size. All prices are wad
// values on the tick lattice; sizes are wad contract amounts.

use soroban_sdk::Env;

use strikepool_math::{mul_div, wad_avg, MIN_TICK_DISTANCE};

/// Number of lattice ticks spanned by [lower, upper). Exact by
/// construction, both bounds sit on the lattice.
pub fn amount_of_ticks(lower: u128, upper: u128) -> u128 {
    (upper - lower) / MIN_TICK_DISTANCE
}

/// Contracts available to buyers between the market price and `upper`.
pub fn ask_liquidity(env: &Env, rate: u128, market: u128, upper: u128) -> u128 {
    mul_div(env, rate, upper - market, MIN_TICK_DISTANCE)
}

/// Contracts available to sellers between `lower` and the market price.
pub fn bid_liquidity(env: &Env, rate: u128, market: u128, lower: u128) -> u128 {
    mul_div(env, rate, market - lower, MIN_TICK_DISTANCE)
}

/// Largest size tradable inside the active range without crossing a tick.
pub fn max_trade_size(
    env: &Env,
    rate: u128,
    market: u128,
    lower: u128,
    upper: u128,
    is_buy: bool,
) -> u128 {
    if is_buy {
        ask_liquidity(env, rate, market, upper)
    } else {
        bid_liquidity(env, rate, market, lower)
    }
}

/// Market price after trading `size` contracts inside the active range.
/// With no liquidity the price jumps straight to the range boundary.
pub fn next_price(
    env: &Env,
    rate: u128,
    market: u128,
    lower: u128,
    upper: u128,
    size: u128,
    is_buy: bool,
) -> u128 {
    if rate == 0 {
        return if is_buy { upper } else { lower };
    }
    let moved = mul_div(env, size, MIN_TICK_DISTANCE, rate);
    if is_buy {
        market + moved
    } else {
        market - moved
    }
}

/// Average fill price over a linear sweep from `a` to `b`.
pub fn mean_price(a: u128, b: u128) -> u128 {
    wad_avg(a, b)
}
