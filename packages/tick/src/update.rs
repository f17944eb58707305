// Tick delta bookkeeping and crossing.

use crate::types::Tick;
use strikepool_math::{wad_sub};

/// Initialize a tick created lazily on first use.
///
/// A tick at or below the current tick has already been "passed" by the
/// price, so its external fee rate starts at the full global
/// accumulator; a tick above starts at zero. This is what makes the
/// crossing mirror arithmetically consistent.
pub fn new_tick(tick_price: u128, current_tick: u128, global_fee_rate: u128) -> Tick {
    let external_fee_rate = if tick_price <= current_tick {
        global_fee_rate
    } else {
        0
    };
    Tick {
        delta: 0,
        long_delta: 0,
        short_delta: 0,
        external_fee_rate,
        counter: 0,
    }
}

/// Apply a range order's per-tick liquidity change to one of its
/// endpoint ticks.
///
/// The sign stored on the tick depends on which side of the current
/// tick the endpoint sits, because crossing applies-then-flips:
///
/// ```text
///           current                        current
///              v                              v
///   ----|------+------|----      ----|--------+--|----
///     lower         upper          lower  upper
///     -delta        +... (see below)
/// ```
///
/// Endpoints above the current tick store the change a rightward
/// (buy) crossing must apply: `+delta` entering at `lower`, `-delta`
/// exiting at `upper`. Endpoints at or below the current tick store the
/// change a leftward (sell) crossing must apply: `-delta` exiting at
/// `lower`, `+delta` entering at `upper`.
pub fn apply_endpoint_delta(
    tick: &mut Tick,
    tick_price: u128,
    current_tick: u128,
    delta: i128,
    long_delta: i128,
    short_delta: i128,
    is_lower: bool,
) {
    let above_current = tick_price > current_tick;
    let sign = if is_lower == above_current { 1 } else { -1 };

    tick.delta += sign * delta;
    tick.long_delta += sign * long_delta;
    tick.short_delta += sign * short_delta;
}

/// Cross a tick: report the deltas the caller must fold into the pool
/// aggregates, flip the stored signs so the reverse crossing undoes
/// them, and mirror the external fee rate against the global
/// accumulator (the fee-growth-outside trick).
pub fn cross_tick(tick: &mut Tick, global_fee_rate: u128) -> (i128, i128, i128) {
    let applied = (tick.delta, tick.long_delta, tick.short_delta);

    tick.delta = -tick.delta;
    tick.long_delta = -tick.long_delta;
    tick.short_delta = -tick.short_delta;
    tick.external_fee_rate = wad_sub(global_fee_rate, tick.external_fee_rate);

    applied
}

/// Fold a signed crossing delta into an unsigned rate aggregate.
/// A negative result means the tick deltas no longer reconstruct the
/// rate, which is a hard inconsistency.
pub fn add_delta(rate: u128, delta: i128) -> u128 {
    if delta >= 0 {
        match rate.checked_add(delta as u128) {
            Some(v) => v,
            None => panic!("tick delta overflow"),
        }
    } else {
        match rate.checked_sub(delta.unsigned_abs()) {
            Some(v) => v,
            None => panic!("tick reconciliation: negative liquidity rate"),
        }
    }
}
