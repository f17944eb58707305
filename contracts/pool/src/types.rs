// Pool Types - Using types from packages

use soroban_sdk::{contracttype, Address, Symbol};

// Re-export types from packages
pub use strikepool_position::{Delta, OrderType, PositionData, PositionKey};
pub use strikepool_tick::Tick;

// ============================================================
// POOL CONFIGURATION
// ============================================================

#[contracttype]
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Underlying token of the option pair
    pub base: Address,
    /// Denomination token of the option pair
    pub quote: Address,
    /// Decimals of the base token
    pub base_decimals: u32,
    /// Decimals of the quote token
    pub quote_decimals: u32,
    /// Oracle adapter quoting base in terms of quote
    pub oracle_adapter: Address,
    /// User-settings contract gating `_for` operations
    pub user_settings: Address,
    /// Receiver of accumulated protocol fees
    pub fee_receiver: Address,
    /// Strike price (wad)
    pub strike: u128,
    /// Maturity timestamp (unix seconds)
    pub maturity: u64,
    /// Calls collateralize base, puts collateralize quote
    pub is_call: bool,
}

// ============================================================
// POOL STATE
// ============================================================

#[contracttype]
#[derive(Clone, Debug)]
pub struct PoolState {
    /// Lower bound of the active tick range (wad price)
    pub current_tick: u128,
    /// Market price; zero until the first deposit resolves it
    pub market_price: u128,
    /// Per-tick liquidity of the active range (contracts, wad)
    pub liquidity_rate: u128,
    /// Portion of `liquidity_rate` backed by maker-held longs
    pub long_rate: u128,
    /// Portion of `liquidity_rate` backed by maker-written shorts
    pub short_rate: u128,
    /// Monotone maker-rebate accumulator per unit of per-tick liquidity
    pub global_fee_rate: u128,
    /// Undistributed protocol fees (collateral wad)
    pub protocol_fees: u128,
    /// Oracle price frozen at first post-maturity settlement; zero while unset
    pub settlement_price: u128,
}

// ============================================================
// CALL ARGUMENTS
// ============================================================

/// Execution controls for `deposit`, bundled to keep the entry point
/// within the host's argument limit.
#[contracttype]
#[derive(Clone, Debug)]
pub struct DepositOptions {
    /// Advisory index hint at or below `lower`; zero means none
    pub below_lower_hint: u128,
    /// Advisory index hint at or below `upper`; zero means none
    pub below_upper_hint: u128,
    /// Lowest market price the deposit may execute at
    pub min_market_price: u128,
    /// Highest market price the deposit may execute at
    pub max_market_price: u128,
    /// Boundary the market price snaps to when the book is stranded
    pub is_bid_if_stranded: bool,
}

// ============================================================
// VIEW RESULTS
// ============================================================

/// Per-position view: size plus its composition at the current market
/// price and the fees it could claim right now.
#[contracttype]
#[derive(Clone, Debug)]
pub struct PositionInfo {
    pub size: u128,
    pub collateral: u128,
    pub longs: u128,
    pub shorts: u128,
    pub claimable_fees: u128,
}

/// Structured quote result; `valid == false` carries a reason instead of
/// trapping the caller.
#[contracttype]
#[derive(Clone, Debug)]
pub struct QuoteResult {
    pub valid: bool,
    pub premium: u128,
    pub taker_fee: u128,
    pub error: Symbol,
}

impl QuoteResult {
    pub fn valid(env: &soroban_sdk::Env, premium: u128, taker_fee: u128) -> Self {
        Self {
            valid: true,
            premium,
            taker_fee,
            error: Symbol::new(env, "NONE"),
        }
    }

    pub fn invalid(error: Symbol) -> Self {
        Self {
            valid: false,
            premium: 0,
            taker_fee: 0,
            error,
        }
    }
}
