use strikepool_math::{MIN_TICK_DISTANCE, WAD};
use strikepool_tick::{add_delta, apply_endpoint_delta, cross_tick, new_tick, Tick};

fn tick_price(n: u128) -> u128 {
    n * MIN_TICK_DISTANCE
}

// ============================================================
// TICK CREATION
// ============================================================

#[test]
fn test_new_tick_external_fee_rate() {
    let global = 5 * WAD;

    // at or below current tick: starts at the global accumulator
    let below = new_tick(tick_price(100), tick_price(400), global);
    assert_eq!(below.external_fee_rate, global);
    let at = new_tick(tick_price(400), tick_price(400), global);
    assert_eq!(at.external_fee_rate, global);

    // above current tick: starts at zero
    let above = new_tick(tick_price(500), tick_price(400), global);
    assert_eq!(above.external_fee_rate, 0);
}

// ============================================================
// ENDPOINT DELTA BRANCHES
// ============================================================

#[test]
fn test_endpoint_deltas_range_above_current() {
    // current < lower < upper: buy crossings enter at lower, exit at upper
    let current = tick_price(100);
    let mut lower = Tick::default();
    let mut upper = Tick::default();

    apply_endpoint_delta(&mut lower, tick_price(250), current, 2, 0, 2, true);
    apply_endpoint_delta(&mut upper, tick_price(750), current, 2, 0, 2, false);

    assert_eq!(lower.delta, 2);
    assert_eq!(upper.delta, -2);
    assert_eq!(lower.short_delta, 2);
    assert_eq!(upper.short_delta, -2);
}

#[test]
fn test_endpoint_deltas_current_inside_range() {
    // lower <= current < upper: sell exits at lower, buy exits at upper
    let current = tick_price(500);
    let mut lower = Tick::default();
    let mut upper = Tick::default();

    apply_endpoint_delta(&mut lower, tick_price(250), current, 2, 2, 0, true);
    apply_endpoint_delta(&mut upper, tick_price(750), current, 2, 2, 0, false);

    assert_eq!(lower.delta, -2);
    assert_eq!(upper.delta, -2);
}

#[test]
fn test_endpoint_deltas_range_below_current() {
    // lower < upper <= current: sell crossings enter at upper, exit at lower
    let current = tick_price(800);
    let mut lower = Tick::default();
    let mut upper = Tick::default();

    apply_endpoint_delta(&mut lower, tick_price(250), current, 2, 2, 0, true);
    apply_endpoint_delta(&mut upper, tick_price(750), current, 2, 2, 0, false);

    assert_eq!(lower.delta, -2);
    assert_eq!(upper.delta, 2);
}

#[test]
fn test_endpoint_delta_withdrawal_reverses_deposit() {
    let current = tick_price(100);
    let mut lower = Tick::default();

    apply_endpoint_delta(&mut lower, tick_price(250), current, 5, 0, 5, true);
    apply_endpoint_delta(&mut lower, tick_price(250), current, -5, 0, -5, true);

    assert_eq!(lower, Tick::default());
}

// ============================================================
// CROSSING
// ============================================================

#[test]
fn test_cross_applies_and_flips() {
    let mut tick = Tick {
        delta: 3,
        long_delta: 1,
        short_delta: 2,
        external_fee_rate: 2 * WAD,
        counter: 1,
    };
    let global = 7 * WAD;

    let applied = cross_tick(&mut tick, global);

    assert_eq!(applied, (3, 1, 2));
    assert_eq!(tick.delta, -3);
    assert_eq!(tick.long_delta, -1);
    assert_eq!(tick.short_delta, -2);
    assert_eq!(tick.external_fee_rate, 5 * WAD);
}

#[test]
fn test_cross_twice_restores_tick() {
    // spec property: crossing and crossing back restores every field
    let original = Tick {
        delta: -4,
        long_delta: -4,
        short_delta: 0,
        external_fee_rate: 3 * WAD,
        counter: 2,
    };
    let mut tick = original.clone();
    let global = 9 * WAD;

    let (d1, l1, s1) = cross_tick(&mut tick, global);
    let (d2, l2, s2) = cross_tick(&mut tick, global);

    assert_eq!(tick, original);
    assert_eq!(d1 + d2, 0);
    assert_eq!(l1 + l2, 0);
    assert_eq!(s1 + s2, 0);
}

#[test]
fn test_cross_twice_restores_rates() {
    let mut tick = Tick {
        delta: 6,
        long_delta: 2,
        short_delta: 4,
        external_fee_rate: 0,
        counter: 1,
    };
    let global = WAD;
    let mut rate = 10u128;

    let (d, _, _) = cross_tick(&mut tick, global);
    rate = add_delta(rate, d);
    assert_eq!(rate, 16);

    let (d, _, _) = cross_tick(&mut tick, global);
    rate = add_delta(rate, d);
    assert_eq!(rate, 10);
}

// ============================================================
// DELTA FOLDING
// ============================================================

#[test]
fn test_add_delta() {
    assert_eq!(add_delta(10, 5), 15);
    assert_eq!(add_delta(10, -10), 0);
}

#[test]
#[should_panic(expected = "tick reconciliation: negative liquidity rate")]
fn test_add_delta_negative_rate_panics() {
    add_delta(3, -4);
}

// ============================================================
// REMOVABILITY
// ============================================================

#[test]
fn test_is_removable() {
    assert!(Tick::default().is_removable());

    let referenced = Tick {
        counter: 1,
        ..Tick::default()
    };
    assert!(!referenced.is_removable());

    let loaded = Tick {
        delta: 1,
        ..Tick::default()
    };
    assert!(!loaded.is_removable());
}
