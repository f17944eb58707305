use soroban_sdk::Env;
use strikepool_math::{MIN_TICK_DISTANCE, WAD};
use strikepool_position::{
    bid, collateral, collateral_to_contracts, contracts_to_collateral, liquidity_per_tick, longs,
    piecewise_linear, piecewise_quadratic, position_delta, shorts, OrderSpec, OrderType,
};

fn tick_price(n: u128) -> u128 {
    n * MIN_TICK_DISTANCE
}

fn call_spec(order_type: OrderType) -> OrderSpec {
    OrderSpec {
        lower: tick_price(250),
        upper: tick_price(750),
        order_type,
        strike: 1_000 * WAD,
        is_call: true,
    }
}

// ============================================================
// PIECEWISE PRIMITIVES
// ============================================================

#[test]
fn test_piecewise_linear_below_inside_above() {
    let env = Env::default();
    let spec = call_spec(OrderType::CollateralShort);
    assert_eq!(piecewise_linear(&env, &spec, tick_price(100)), 0);
    assert_eq!(piecewise_linear(&env, &spec, spec.lower), 0);
    assert_eq!(piecewise_linear(&env, &spec, tick_price(500)), WAD / 2);
    assert_eq!(piecewise_linear(&env, &spec, spec.upper), WAD);
    assert_eq!(piecewise_linear(&env, &spec, tick_price(900)), WAD);
}

#[test]
fn test_piecewise_quadratic_known_values() {
    let env = Env::default();
    let spec = call_spec(OrderType::CollateralShort);
    assert_eq!(piecewise_quadratic(&env, &spec, spec.lower), 0);
    // avg(0.5, 0.25) * 0.25 / 0.5 = 0.1875
    assert_eq!(
        piecewise_quadratic(&env, &spec, tick_price(500)),
        187_500 * WAD / 1_000_000
    );
    // saturates at avg(upper, lower) * 1 = 0.5
    assert_eq!(piecewise_quadratic(&env, &spec, tick_price(900)), WAD / 2);
}

// ============================================================
// ORDER DECOMPOSITION
// ============================================================

#[test]
fn test_bid_midpoint() {
    let env = Env::default();
    let spec = call_spec(OrderType::CollateralShort);
    let size = 1_000 * WAD;
    // 1000 contracts filled halfway at an average price of 0.375
    assert_eq!(bid(&env, &spec, size, tick_price(500)), 187 * WAD + WAD / 2);
}

#[test]
fn test_collateral_short_composition() {
    let env = Env::default();
    let spec = call_spec(OrderType::CollateralShort);
    let size = 1_000 * WAD;
    let price = tick_price(500);

    // half the size still locked, plus premiums collected so far
    assert_eq!(
        collateral(&env, &spec, size, price),
        500 * WAD + 187 * WAD + WAD / 2
    );
    assert_eq!(shorts(&env, &spec, size, price), 500 * WAD);
    assert_eq!(longs(&env, &spec, size, price), 0);
}

#[test]
fn test_collateral_short_use_premiums_composition() {
    let env = Env::default();
    let spec = call_spec(OrderType::CollateralShortUsePremiums);
    let size = 1_000 * WAD;
    let price = tick_price(500);

    // CS collateral minus the premiums still expected above `price`:
    // 500 locked - (500 - 187.5) pending = 187.5
    assert_eq!(collateral(&env, &spec, size, price), 187 * WAD + WAD / 2);
    assert_eq!(shorts(&env, &spec, size, price), 500 * WAD);
}

#[test]
fn test_csup_requires_no_collateral_when_untouched() {
    let env = Env::default();
    let spec = call_spec(OrderType::CollateralShortUsePremiums);
    let size = 1_000 * WAD;
    // fully below the range: locked size equals the pending premiums exactly
    // when the whole range trades at its average price
    let at_lower = collateral(&env, &spec, size, spec.lower);
    assert_eq!(at_lower, size - bid(&env, &spec, size, spec.upper));
}

#[test]
fn test_csup_collateral_clamps_at_upper_boundary() {
    let env = Env::default();
    let spec = OrderSpec {
        lower: tick_price(1),
        upper: WAD,
        order_type: OrderType::CollateralShortUsePremiums,
        strike: 1_700_000_000_000_000_000,
        is_call: false,
    };
    // One wei short of the upper bound: rounding can make the pending
    // premiums exceed the locked remainder by a wei. Collateral is zero
    // there, not an underflow.
    assert_eq!(collateral(&env, &spec, WAD, WAD - 1), 0);
    assert_eq!(collateral(&env, &spec, WAD, WAD), 0);
}

#[test]
fn test_long_collateral_composition() {
    let env = Env::default();
    let spec = call_spec(OrderType::LongCollateral);
    let size = 1_000 * WAD;
    let price = tick_price(500);

    assert_eq!(longs(&env, &spec, size, price), 500 * WAD);
    assert_eq!(shorts(&env, &spec, size, price), 0);
    // premiums paid out for the sold half
    assert_eq!(collateral(&env, &spec, size, price), 187 * WAD + WAD / 2);
}

#[test]
fn test_bid_order_fully_above() {
    let env = Env::default();
    let spec = call_spec(OrderType::LongCollateral);
    let size = 100 * WAD;
    // above the range the bid order holds only collateral
    assert_eq!(longs(&env, &spec, size, tick_price(900)), 0);
    assert_eq!(collateral(&env, &spec, size, tick_price(900)), 50 * WAD);
}

#[test]
fn test_put_collateral_scales_by_strike() {
    let env = Env::default();
    let mut spec = call_spec(OrderType::CollateralShort);
    spec.is_call = false;
    assert_eq!(
        contracts_to_collateral(&env, &spec, 2 * WAD),
        2_000 * WAD
    );
    assert_eq!(
        collateral_to_contracts(&env, &spec, 2_000 * WAD),
        2 * WAD
    );
    // fully unfilled put ask locks strike per contract
    assert_eq!(
        collateral(&env, &spec, 3 * WAD, tick_price(100)),
        3_000 * WAD
    );
}

#[test]
fn test_position_delta_from_empty_matches_parts() {
    let env = Env::default();
    let spec = call_spec(OrderType::CollateralShort);
    let size = 1_000 * WAD;
    let price = tick_price(500);
    let delta = position_delta(&env, &spec, 0, size as i128, price);
    assert_eq!(delta.collateral as u128, collateral(&env, &spec, size, price));
    assert_eq!(delta.longs, 0);
    assert_eq!(delta.shorts as u128, shorts(&env, &spec, size, price));
}

#[test]
fn test_position_delta_deposit_then_withdraw_nets_to_zero() {
    let env = Env::default();
    let spec = call_spec(OrderType::LongCollateral);
    let price = tick_price(600);
    let add = position_delta(&env, &spec, 200 * WAD, 300 * WAD as i128, price);
    let remove = position_delta(&env, &spec, 500 * WAD, -(300 * WAD as i128), price);
    assert_eq!(add.collateral, -remove.collateral);
    assert_eq!(add.longs, -remove.longs);
    assert_eq!(add.shorts, -remove.shorts);
}

// ============================================================
// LIQUIDITY RATE
// ============================================================

#[test]
fn test_liquidity_per_tick_even_split() {
    // 1000 contracts over 500 ticks
    let rate = liquidity_per_tick(1_000 * WAD, tick_price(250), tick_price(750)).unwrap();
    assert_eq!(rate, 2 * WAD);
}

#[test]
fn test_liquidity_per_tick_rejects_uneven_split() {
    // 7 units cannot spread over 3 ticks
    assert!(liquidity_per_tick(7, tick_price(250), tick_price(253)).is_err());
}

#[test]
fn test_liquidity_per_tick_single_tick() {
    let rate = liquidity_per_tick(5 * WAD, tick_price(500), tick_price(501)).unwrap();
    assert_eq!(rate, 5 * WAD);
}
