// Constants module: one place for every protocol-level numeric bound.

// ============================================================
// FIXED-POINT SCALE
// ============================================================

/// One, in 18-decimal fixed point ("wad").
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// Signed one, in 18-decimal fixed point.
pub const WAD_I: i128 = 1_000_000_000_000_000_000;

/// Half of one wad, used for midpoint checks.
pub const HALF_WAD: u128 = WAD / 2;

// ============================================================
// TICK LATTICE
// ============================================================

/// Granularity of the price lattice (0.001).
pub const MIN_TICK_DISTANCE: u128 = WAD / 1_000;

/// Lowest quotable normalized price (0.001). Permanent lower sentinel
/// of the tick index.
pub const MIN_TICK_PRICE: u128 = MIN_TICK_DISTANCE;

/// Highest normalized price (1.0). Permanent upper sentinel.
pub const MAX_TICK_PRICE: u128 = WAD;

/// Number of lattice steps between the two sentinels.
pub const MAX_TICKS: u32 = 999;

// ============================================================
// FEES
// ============================================================

/// Taker fee as a fraction of the premium (3%).
pub const PREMIUM_FEE_RATE: u128 = 30_000_000_000_000_000;

/// Taker fee as a fraction of the traded size (0.3%).
pub const COLLATERAL_FEE_RATE: u128 = 3_000_000_000_000_000;

/// Protocol share of the net taker fee (50%). The remainder is the
/// maker rebate distributed through the global fee rate.
pub const PROTOCOL_FEE_SHARE: u128 = 500_000_000_000_000_000;

// ============================================================
// POOL ENGINE BOUNDS
// ============================================================

/// Seconds a deposit must age before it can be withdrawn.
pub const WITHDRAWAL_DELAY: u64 = 60;

/// A deposit or withdrawal may move `current_tick` by at most this many
/// crossings while reconciling with the market price. Exceeding the
/// bound signals corrupted tick state and must hard-fail.
pub const MAX_RECONCILE_CROSSINGS: u32 = 2;

/// Upper bound on trade-loop iterations. A trade can cross every active
/// tick at most once per direction; the cap only guards against a
/// stuck loop.
pub const MAX_TRADE_ITERATIONS: u32 = 4_096;

// ============================================================
// ORACLE ADAPTERS
// ============================================================

/// A feed answer older than this is considered stale (25 hours).
pub const STALE_PRICE_THRESHOLD: u64 = 25 * 3_600;

/// Grace period after a target timestamp during which a stale answer is
/// still rejected while waiting for a fresher one (12 hours).
pub const MAX_DELAY: u64 = 12 * 3_600;

/// Ring-buffer capacity of the TWAP adapter.
pub const TWAP_BUFFER_SIZE: u32 = 100;

// ============================================================
// EXP DOMAIN
// ============================================================

/// Euler's number in 18-decimal fixed point.
pub const E_WAD: i128 = 2_718_281_828_459_045_235;

/// `wad_exp` panics above this input; e^x would not fit a signed wad.
pub const EXP_MAX_INPUT: i128 = 46 * WAD_I;

/// `wad_exp` returns zero below this input; e^x underflows one wei.
pub const EXP_MIN_INPUT: i128 = -43 * WAD_I;
