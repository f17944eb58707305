#![allow(dead_code)]

use soroban_sdk::{
    contract, contractimpl, symbol_short, testutils::Address as _, testutils::Ledger, Address, Env,
};
use strikepool_math::WAD;
use strikepool_pool::{StrikePool, StrikePoolClient};

// Test constants
pub const STRIKE: u128 = 100 * WAD; // 100 quote per base
pub const TOKEN_DECIMALS: u32 = 7;
pub const START_TIME: u64 = 1_000_000;
pub const MATURITY: u64 = START_TIME + 30 * 86_400;

pub fn wad(x: u128) -> u128 {
    x * WAD
}

/// Tick price for a lattice index, e.g. `tick(250)` = 0.25.
pub fn tick(thousandths: u128) -> u128 {
    thousandths * (WAD / 1_000)
}

// ============================================================
// MOCK COLLABORATORS
// ============================================================

#[contract]
pub struct MockOracle;

#[contractimpl]
impl MockOracle {
    pub fn set_price(env: Env, price: u128) {
        env.storage().instance().set(&symbol_short!("price"), &price);
    }

    pub fn quote(env: Env, _base: Address, _quote: Address) -> u128 {
        env.storage()
            .instance()
            .get(&symbol_short!("price"))
            .unwrap_or(0)
    }

    pub fn quote_from(env: Env, _base: Address, _quote: Address, _target: u64) -> u128 {
        env.storage()
            .instance()
            .get(&symbol_short!("price"))
            .unwrap_or(0)
    }
}

#[contract]
pub struct MockUserSettings;

#[contractimpl]
impl MockUserSettings {
    pub fn set_authorized(env: Env, user: Address, operator: Address, authorized: bool) {
        env.storage()
            .persistent()
            .set(&(symbol_short!("auth"), user, operator), &authorized);
    }

    pub fn set_cost(env: Env, user: Address, cost: u128) {
        env.storage()
            .persistent()
            .set(&(symbol_short!("cost"), user), &cost);
    }

    pub fn is_authorized(env: Env, user: Address, operator: Address) -> bool {
        env.storage()
            .persistent()
            .get(&(symbol_short!("auth"), user, operator))
            .unwrap_or(false)
    }

    pub fn authorized_cost(env: Env, user: Address) -> u128 {
        env.storage()
            .persistent()
            .get(&(symbol_short!("cost"), user))
            .unwrap_or(0)
    }
}

// ============================================================
// SETUP
// ============================================================

pub struct PoolHarness<'a> {
    pub client: StrikePoolClient<'a>,
    pub base: Address,
    pub quote: Address,
    pub oracle: MockOracleClient<'a>,
    pub settings: MockUserSettingsClient<'a>,
    pub fee_receiver: Address,
    pub admin: Address,
}

/// Register a call pool at strike 100 maturing 30 days out, with mock
/// oracle and user-settings collaborators. The ledger clock starts at
/// `START_TIME`.
pub fn setup_call_pool(env: &Env) -> PoolHarness<'_> {
    env.ledger().with_mut(|li| li.timestamp = START_TIME);

    let admin = Address::generate(env);
    let fee_receiver = Address::generate(env);
    let base = create_token(env, &admin);
    let quote = create_token(env, &admin);

    let oracle_id = env.register(MockOracle, ());
    let oracle = MockOracleClient::new(env, &oracle_id);
    let settings_id = env.register(MockUserSettings, ());
    let settings = MockUserSettingsClient::new(env, &settings_id);

    let pool_id = env.register(StrikePool, ());
    let client = StrikePoolClient::new(env, &pool_id);

    client.initialize(
        &base,
        &quote,
        &TOKEN_DECIMALS,
        &TOKEN_DECIMALS,
        &oracle_id,
        &settings_id,
        &fee_receiver,
        &STRIKE,
        &MATURITY,
        &true,
    );

    PoolHarness {
        client,
        base,
        quote,
        oracle,
        settings,
        fee_receiver,
        admin,
    }
}

pub fn create_token(env: &Env, admin: &Address) -> Address {
    env.register_stellar_asset_contract_v2(admin.clone()).address()
}

pub fn mint_tokens(env: &Env, token: &Address, to: &Address, amount: i128) {
    use soroban_sdk::token::StellarAssetClient;
    StellarAssetClient::new(env, token).mint(to, &amount);
}

pub fn token_balance(env: &Env, token: &Address, who: &Address) -> i128 {
    soroban_sdk::token::Client::new(env, token).balance(who)
}

/// Funded account holding `tokens` whole units of the pool's base asset.
pub fn funded_account(env: &Env, harness: &PoolHarness, tokens: i128) -> Address {
    let who = Address::generate(env);
    mint_tokens(env, &harness.base, &who, tokens * 10i128.pow(TOKEN_DECIMALS));
    who
}

/// Move the ledger clock past the pool's maturity.
pub fn advance_past_maturity(env: &Env) {
    env.ledger().with_mut(|li| li.timestamp = MATURITY + 1);
}

/// Deposit options with no hints and no price bounds.
pub fn deposit_options() -> strikepool_pool::types::DepositOptions {
    strikepool_pool::types::DepositOptions {
        below_lower_hint: 0,
        below_upper_hint: 0,
        min_market_price: 0,
        max_market_price: u128::MAX,
        is_bid_if_stranded: false,
    }
}

/// Standard seeded book: a 1000-contract collateral/short order over
/// [0.25, 0.75), leaving the market price stranded at 0.25.
pub fn seed_default_book(env: &Env, harness: &PoolHarness) -> Address {
    use strikepool_pool::types::OrderType;
    let lp = funded_account(env, harness, 2_000);
    harness.client.deposit(
        &lp,
        &lp,
        &tick(250),
        &tick(750),
        &OrderType::CollateralShort,
        &wad(1_000),
        &deposit_options(),
    );
    lp
}
