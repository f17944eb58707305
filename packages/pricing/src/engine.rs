use soroban_sdk::{Env, Vec};

use strikepool_math::{
    mul_div, wad_add, wad_div, wad_max, wad_mul, wad_sub, COLLATERAL_FEE_RATE,
    MAX_TICK_PRICE, MAX_TRADE_ITERATIONS, MIN_TICK_DISTANCE, MIN_TICK_PRICE, PREMIUM_FEE_RATE,
    PROTOCOL_FEE_SHARE,
};
use strikepool_tick::{add_delta, cross_tick, next_above, prev_below, Tick};

use crate::curve::{max_trade_size, mean_price, next_price};

// ============================================================
// TRADE STATE
// ============================================================

/// Trade state passed from the contract. Holds the minimal pool state the
/// engine reads and advances; the contract persists it after a live trade
/// and discards it after a quote.
#[derive(Clone)]
pub struct TradeState {
    /// Lower bound of the active range (tick price, wad)
    pub current_tick: u128,
    /// Market price inside the active range (wad)
    pub market_price: u128,
    /// Per-tick liquidity of the active range (contracts, wad)
    pub liquidity_rate: u128,
    /// Portion of `liquidity_rate` backed by maker-held longs
    pub long_rate: u128,
    /// Portion of `liquidity_rate` backed by maker-written shorts
    pub short_rate: u128,
    /// Monotone per-tick fee accumulator (collateral wad)
    pub global_fee_rate: u128,
    /// Undistributed protocol fees (collateral wad)
    pub protocol_fees: u128,
}

/// Totals of one engine run. All amounts are unsigned; the contract applies
/// direction from `is_buy`.
#[derive(Clone)]
pub struct TradeResult {
    /// Contracts actually filled. A live trade fills the full size or
    /// panics; a quote reports a short fill instead.
    pub size_filled: u128,
    /// Premium swept off the curve (collateral wad), fee excluded
    pub total_premium: u128,
    /// Taker fee charged on top of (buys) or out of (sells) the premium
    pub total_taker_fee: u128,
    /// Protocol share of the taker fee
    pub protocol_fee: u128,
    /// Longs released by (buys) or returned to (sells) maker inventory
    pub maker_longs: u128,
    /// Shorts written into (buys) or released from (sells) maker inventory
    pub maker_shorts: u128,
}

// ============================================================
// PUBLIC TRADE FUNCTIONS
// ============================================================

/// Execute a trade against the range liquidity, with callbacks for tick
/// storage access.
///
/// Fills `size` exactly or panics; crossing past either end of the lattice
/// means the book cannot absorb the order. `state` is advanced in place.
///
/// # Returns
/// Premium, fee and maker inventory totals for the whole fill.
pub fn trade_amm<F1, F2>(
    env: &Env,
    state: &mut TradeState,
    index: &Vec<u128>,
    read_tick: F1,
    write_tick: F2,
    size: u128,
    is_buy: bool,
    strike: u128,
    is_call: bool,
) -> TradeResult
where
    F1: Fn(&Env, u128) -> Tick,
    F2: Fn(&Env, u128, &Tick),
{
    trade_amm_internal(
        env, state, index, read_tick, write_tick, size, is_buy, strike, is_call, true, false,
    )
}

/// Quote a trade without touching storage. Runs the exact same loop as
/// [`trade_amm`] against a copy of the state, so quoted numbers match a
/// live trade at the same state to the wei. Where a trade would panic for
/// lack of liquidity, the quote reports `size_filled < size`.
pub fn quote_amm<F1>(
    env: &Env,
    state: &TradeState,
    index: &Vec<u128>,
    read_tick: F1,
    size: u128,
    is_buy: bool,
    strike: u128,
    is_call: bool,
) -> TradeResult
where
    F1: Fn(&Env, u128) -> Tick,
{
    let mut sim_state = state.clone();
    trade_amm_internal(
        env,
        &mut sim_state,
        index,
        read_tick,
        |_, _, _| {},
        size,
        is_buy,
        strike,
        is_call,
        false,
        true,
    )
}

/// Taker fee for a fill: the larger of 3% of the premium and 0.3% of the
/// notional, both in collateral units.
pub fn taker_fee(env: &Env, premium: u128, size: u128, strike: u128, is_call: bool) -> u128 {
    let notional = scale_to_collateral(env, size, strike, is_call);
    wad_max(
        wad_mul(env, premium, PREMIUM_FEE_RATE),
        wad_mul(env, notional, COLLATERAL_FEE_RATE),
    )
}

// ============================================================
// INTERNAL TRADE LOOP
// ============================================================

fn scale_to_collateral(env: &Env, amount: u128, strike: u128, is_call: bool) -> u128 {
    if is_call {
        amount
    } else {
        wad_mul(env, amount, strike)
    }
}

fn trade_amm_internal<F1, F2>(
    env: &Env,
    state: &mut TradeState,
    index: &Vec<u128>,
    read_tick: F1,
    write_tick: F2,
    size: u128,
    is_buy: bool,
    strike: u128,
    is_call: bool,
    allow_panic: bool,
    dry_run: bool,
) -> TradeResult
where
    F1: Fn(&Env, u128) -> Tick,
    F2: Fn(&Env, u128, &Tick),
{
    if size == 0 {
        panic!("trade size must be positive");
    }

    let mut remaining = size;
    let mut result = TradeResult {
        size_filled: 0,
        total_premium: 0,
        total_taker_fee: 0,
        protocol_fee: 0,
        maker_longs: 0,
        maker_shorts: 0,
    };

    // A pool that has never been seeded carries no market price, so
    // there is nothing to fill against on either side.
    if state.market_price == 0 {
        if allow_panic {
            if is_buy {
                panic!("insufficient ask liquidity");
            }
            panic!("insufficient bid liquidity");
        }
        return result;
    }

    let mut iterations = 0u32;
    while remaining > 0 {
        iterations += 1;
        if iterations > MAX_TRADE_ITERATIONS {
            if allow_panic {
                panic!("trade crossed too many ticks");
            }
            break;
        }

        // Bounds of the active range
        let lower = state.current_tick;
        let upper = match next_above(index, state.current_tick) {
            Some(t) => t,
            None => MAX_TICK_PRICE,
        };

        let max_size = max_trade_size(
            env,
            state.liquidity_rate,
            state.market_price,
            lower,
            upper,
            is_buy,
        );
        let step = if remaining < max_size { remaining } else { max_size };

        if step > 0 {
            // Snap to the boundary when the range is swept clean, so the
            // crossing below starts exactly on the tick.
            let next = if step == max_size {
                if is_buy {
                    upper
                } else {
                    lower
                }
            } else {
                next_price(
                    env,
                    state.liquidity_rate,
                    state.market_price,
                    lower,
                    upper,
                    step,
                    is_buy,
                )
            };

            let quote_price = mean_price(state.market_price, next);
            let premium =
                scale_to_collateral(env, wad_mul(env, quote_price, step), strike, is_call);
            let fee = taker_fee(env, premium, step, strike, is_call);
            let protocol_step = wad_mul(env, fee, PROTOCOL_FEE_SHARE);
            let rebate = wad_sub(fee, protocol_step);

            // Maker rebate accrues per unit of per-tick liquidity
            state.global_fee_rate =
                wad_add(state.global_fee_rate, wad_div(env, rebate, state.liquidity_rate));

            // Split the step between long-backed and short-backed liquidity
            let distance = if is_buy {
                next - state.market_price
            } else {
                state.market_price - next
            };
            let long_portion = mul_div(env, state.long_rate, distance, MIN_TICK_DISTANCE);
            let long_portion = if long_portion > step { step } else { long_portion };
            result.maker_longs = wad_add(result.maker_longs, long_portion);
            result.maker_shorts = wad_add(result.maker_shorts, step - long_portion);

            result.total_premium = wad_add(result.total_premium, premium);
            result.total_taker_fee = wad_add(result.total_taker_fee, fee);
            result.protocol_fee = wad_add(result.protocol_fee, protocol_step);

            result.size_filled = wad_add(result.size_filled, step);
            remaining -= step;
            state.market_price = next;
        } else if state.liquidity_rate == 0 {
            // Empty range: the price jumps to the boundary without a fill
            state.market_price = if is_buy { upper } else { lower };
        }

        if remaining == 0 {
            break;
        }

        // The range is exhausted; cross into the next one
        if is_buy {
            if upper >= MAX_TICK_PRICE {
                if allow_panic {
                    panic!("insufficient ask liquidity");
                }
                break;
            }
            let mut tick = read_tick(env, upper);
            let (delta, long_delta, short_delta) = cross_tick(&mut tick, state.global_fee_rate);
            if !dry_run {
                write_tick(env, upper, &tick);
            }
            state.liquidity_rate = add_delta(state.liquidity_rate, delta);
            state.long_rate = add_delta(state.long_rate, long_delta);
            state.short_rate = add_delta(state.short_rate, short_delta);
            state.current_tick = upper;
        } else {
            if lower <= MIN_TICK_PRICE {
                if allow_panic {
                    panic!("insufficient bid liquidity");
                }
                break;
            }
            let mut tick = read_tick(env, lower);
            let (delta, long_delta, short_delta) = cross_tick(&mut tick, state.global_fee_rate);
            if !dry_run {
                write_tick(env, lower, &tick);
            }
            state.liquidity_rate = add_delta(state.liquidity_rate, delta);
            state.long_rate = add_delta(state.long_rate, long_delta);
            state.short_rate = add_delta(state.short_rate, short_delta);
            state.current_tick = match prev_below(index, lower) {
                Some(t) => t,
                None => MIN_TICK_PRICE,
            };
        }
    }

    state.protocol_fees = wad_add(state.protocol_fees, result.protocol_fee);
    result
}
