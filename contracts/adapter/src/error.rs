// Panic messages shared by both adapters. Soroban reports these as
// contract errors; tests match on the string.

pub struct ErrorMsg;

impl ErrorMsg {
    pub const ALREADY_INITIALIZED: &'static str = "adapter already initialized";
    pub const NOT_INITIALIZED: &'static str = "adapter not initialized";
    pub const PAIR_UNSUPPORTED: &'static str = "no pricing path for pair";
    pub const INVALID_PRICE: &'static str = "feed returned an unusable price";
    pub const STALE_PRICE: &'static str = "feed price is stale";
    pub const NO_HISTORY: &'static str = "no price at or before target";
    pub const INVALID_WINDOW: &'static str = "twap window must be positive";
    pub const NO_OBSERVATIONS: &'static str = "no observations recorded";
}
