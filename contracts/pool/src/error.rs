// Error handling module:
// - contracterror codes for callers that match on typed failures
// - ErrorMsg panic strings for the abort paths inside operations

use soroban_sdk::contracterror;

// ============================================================
// CONTRACT ERRORS
// ============================================================

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum PoolError {
    // Initialization errors (100-199)
    /// Pool has already been initialized
    AlreadyInitialized = 100,
    /// Pool has not been initialized
    NotInitialized = 101,
    /// Strike must be positive
    InvalidStrike = 102,
    /// Maturity must lie in the future
    InvalidMaturity = 103,

    // Order validation errors (200-299)
    /// Tick range malformed: lower must be < upper, both on the lattice
    InvalidRange = 200,
    /// Order size must be positive
    InvalidSize = 201,
    /// Order size must divide evenly across its ticks
    UnevenSize = 202,
    /// Market price moved outside the caller's bounds
    PriceOutOfBounds = 203,

    // Position errors (300-399)
    /// No such position
    PositionNotFound = 300,
    /// Position balance too small for the request
    InsufficientBalance = 301,
    /// Withdrawal delay has not elapsed
    WithdrawalTooEarly = 302,

    // Trade errors (400-499)
    /// Not enough liquidity on the ask side
    InsufficientAskLiquidity = 400,
    /// Not enough liquidity on the bid side
    InsufficientBidLiquidity = 401,
    /// Premium limit violated
    PremiumLimitExceeded = 402,

    // Authorization errors (500-599)
    /// Operator is not authorized by the user
    OperatorNotAuthorized = 500,
    /// Reentrant call
    Reentrancy = 501,

    // Settlement errors (600-699)
    /// Option has not expired yet
    NotExpired = 600,
    /// Option has expired
    Expired = 601,
    /// Oracle returned an unusable price
    InvalidOraclePrice = 602,
}

// ============================================================
// ERROR MESSAGES (panic strings)
// ============================================================

pub struct ErrorMsg;

impl ErrorMsg {
    pub const ALREADY_INITIALIZED: &'static str = "pool already initialized";
    pub const NOT_INITIALIZED: &'static str = "pool not initialized";
    pub const INVALID_STRIKE: &'static str = "strike must be positive";
    pub const INVALID_MATURITY: &'static str = "maturity must be in the future";
    pub const INVALID_RANGE: &'static str = "invalid tick range: lower must be < upper on the lattice";
    pub const INVALID_SIZE: &'static str = "order size must be positive";
    pub const PRICE_OUT_OF_BOUNDS: &'static str = "market price outside caller bounds";
    pub const POSITION_NOT_FOUND: &'static str = "no such position";
    pub const INSUFFICIENT_BALANCE: &'static str = "position balance too small";
    pub const WITHDRAWAL_TOO_EARLY: &'static str = "withdrawal delay has not elapsed";
    pub const PREMIUM_LIMIT: &'static str = "premium limit violated";
    pub const INSUFFICIENT_LONGS: &'static str = "insufficient long balance";
    pub const INSUFFICIENT_SHORTS: &'static str = "insufficient short balance";
    pub const NOT_AUTHORIZED: &'static str = "operator not authorized by user";
    pub const REENTRANCY: &'static str = "reentrant call";
    pub const NOT_EXPIRED: &'static str = "option has not expired";
    pub const EXPIRED: &'static str = "option has expired";
    pub const INVALID_ORACLE_PRICE: &'static str = "oracle returned an unusable price";
    pub const RECONCILE_BOUND: &'static str = "tick reconciliation exceeded crossing bound";
    pub const COST_TOO_HIGH: &'static str = "automation cost exceeds authorized amount";
}
