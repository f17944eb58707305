mod common;

use soroban_sdk::Env;
use strikepool_pool::types::{OrderType, PositionKey};
use strikepool_position::{LONG_TOKEN_ID, SHORT_TOKEN_ID};

use common::{tick, wad};

#[test]
fn test_rfq_fill_settles_both_parties() {
    let env = Env::default();
    env.mock_all_auths();

    let harness = common::setup_call_pool(&env);
    let provider = common::funded_account(&env, &harness, 500);
    let taker = common::funded_account(&env, &harness, 500);

    // 200 contracts at 0.4 off the curve
    let (premium, fee) = harness
        .client
        .fill_quote_rfq(&provider, &taker, &wad(200), &tick(400), &true);
    assert_eq!(premium, wad(80));
    // 3% of 80 beats 0.3% of 200
    assert_eq!(fee, 2_400_000_000_000_000_000);

    // Taker pays premium + fee and holds the longs
    assert_eq!(harness.client.balance_of(&taker, &LONG_TOKEN_ID), wad(200));
    assert_eq!(
        common::token_balance(&env, &harness.base, &taker),
        500 * 10i128.pow(common::TOKEN_DECIMALS) - 824_000_000
    );

    // Provider writes the shorts: locks 200, nets the 80 premium
    assert_eq!(harness.client.balance_of(&provider, &SHORT_TOKEN_ID), wad(200));
    assert_eq!(
        common::token_balance(&env, &harness.base, &provider),
        500 * 10i128.pow(common::TOKEN_DECIMALS) - 1_200_000_000
    );

    // No curve involved, the whole fee is protocol revenue
    let state = harness.client.get_pool_state();
    assert_eq!(state.protocol_fees, 2_400_000_000_000_000_000);
    assert_eq!(state.global_fee_rate, 0);
    assert_eq!(state.market_price, 0);
}

#[test]
fn test_rfq_fill_nets_existing_inventory() {
    let env = Env::default();
    env.mock_all_auths();

    let harness = common::setup_call_pool(&env);
    let provider = common::funded_account(&env, &harness, 500);
    let taker = common::funded_account(&env, &harness, 500);

    harness
        .client
        .fill_quote_rfq(&provider, &taker, &wad(200), &tick(400), &true);
    // Unwind at a different price: shorts close against fresh longs
    harness
        .client
        .fill_quote_rfq(&taker, &provider, &wad(200), &tick(300), &true);

    assert_eq!(harness.client.balance_of(&taker, &LONG_TOKEN_ID), 0);
    assert_eq!(harness.client.balance_of(&taker, &SHORT_TOKEN_ID), 0);
    assert_eq!(harness.client.balance_of(&provider, &LONG_TOKEN_ID), 0);
    assert_eq!(harness.client.balance_of(&provider, &SHORT_TOKEN_ID), 0);
}

#[test]
fn test_rfq_does_not_move_amm_book() {
    let env = Env::default();
    env.mock_all_auths();

    let harness = common::setup_call_pool(&env);
    let lp = common::seed_default_book(&env, &harness);
    let provider = common::funded_account(&env, &harness, 500);
    let taker = common::funded_account(&env, &harness, 500);

    harness
        .client
        .fill_quote_rfq(&provider, &taker, &wad(200), &tick(400), &true);

    let state = harness.client.get_pool_state();
    assert_eq!(state.market_price, tick(250));
    assert_eq!(state.global_fee_rate, 0);

    // Makers earn nothing from the off-curve fill
    let key = PositionKey {
        owner: lp.clone(),
        operator: lp,
        lower: tick(250),
        upper: tick(750),
        order_type: OrderType::CollateralShort,
    };
    assert_eq!(harness.client.get_position_info(&key).claimable_fees, 0);
}

#[test]
#[should_panic(expected = "order size must be positive")]
fn test_rfq_zero_size() {
    let env = Env::default();
    env.mock_all_auths();

    let harness = common::setup_call_pool(&env);
    let provider = common::funded_account(&env, &harness, 500);
    let taker = common::funded_account(&env, &harness, 500);
    harness
        .client
        .fill_quote_rfq(&provider, &taker, &0u128, &tick(400), &true);
}

#[test]
#[should_panic(expected = "market price outside caller bounds")]
fn test_rfq_zero_price() {
    let env = Env::default();
    env.mock_all_auths();

    let harness = common::setup_call_pool(&env);
    let provider = common::funded_account(&env, &harness, 500);
    let taker = common::funded_account(&env, &harness, 500);
    harness
        .client
        .fill_quote_rfq(&provider, &taker, &wad(100), &0u128, &true);
}

#[test]
#[should_panic(expected = "option has expired")]
fn test_rfq_after_expiry() {
    let env = Env::default();
    env.mock_all_auths();

    let harness = common::setup_call_pool(&env);
    let provider = common::funded_account(&env, &harness, 500);
    let taker = common::funded_account(&env, &harness, 500);
    common::advance_past_maturity(&env);
    harness
        .client
        .fill_quote_rfq(&provider, &taker, &wad(100), &tick(400), &true);
}
