// Client trait for the external price feeds the registry adapter reads.
// Any contract honoring the interface can serve as a feed; rounds are
// append-only and indexed from zero.

use soroban_sdk::{contractclient, contracttype, Env};

/// One published price round.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoundData {
    pub answer: i128,
    pub timestamp: u64,
}

#[contractclient(name = "PriceFeedClient")]
pub trait PriceFeed {
    fn decimals(env: Env) -> u32;
    fn round_count(env: Env) -> u64;
    fn round(env: Env, round_id: u64) -> RoundData;
    fn latest_round(env: Env) -> RoundData;
}
