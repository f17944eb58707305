// Time-weighted average price adapter.
//
// A reporter pushes spot observations into a fixed ring buffer; each
// slot carries a running price-time cumulative so any window average is
// one subtraction and one division. Quotes average over the configured
// window ending at the requested time.

use soroban_sdk::{contract, contractimpl, contracttype, Address, Env};

use strikepool_math::{MAX_DELAY, STALE_PRICE_THRESHOLD, TWAP_BUFFER_SIZE};

use crate::error::ErrorMsg;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Observation {
    pub timestamp: u64,
    /// Spot price reported at `timestamp` (wad)
    pub price: u128,
    /// Integral of price over time up to `timestamp`
    pub cumulative: u128,
}

#[contracttype]
#[derive(Clone)]
enum DataKey {
    Reporter,
    /// Averaging window in seconds
    Window,
    NewestIndex,
    Observation(u32),
}

#[contract]
pub struct TwapAdapter;

#[contractimpl]
impl TwapAdapter {
    pub fn initialize(env: Env, reporter: Address, window: u64) {
        if env.storage().instance().has(&DataKey::Reporter) {
            panic!("{}", ErrorMsg::ALREADY_INITIALIZED);
        }
        if window == 0 {
            panic!("{}", ErrorMsg::INVALID_WINDOW);
        }
        env.storage().instance().set(&DataKey::Reporter, &reporter);
        env.storage().instance().set(&DataKey::Window, &window);
    }

    /// Record a spot observation. Overwrites the oldest slot once the
    /// ring is full.
    pub fn push(env: Env, price: u128) {
        let reporter: Address = match env.storage().instance().get(&DataKey::Reporter) {
            Some(reporter) => reporter,
            None => panic!("{}", ErrorMsg::NOT_INITIALIZED),
        };
        reporter.require_auth();
        if price == 0 {
            panic!("{}", ErrorMsg::INVALID_PRICE);
        }

        let now = env.ledger().timestamp();
        match newest(&env) {
            Some((index, last)) => {
                let elapsed = now.saturating_sub(last.timestamp);
                let obs = Observation {
                    timestamp: now,
                    price,
                    cumulative: last.cumulative + last.price * elapsed as u128,
                };
                let next = (index + 1) % TWAP_BUFFER_SIZE;
                write_observation(&env, next, &obs);
                set_newest_index(&env, next);
            }
            None => {
                let obs = Observation {
                    timestamp: now,
                    price,
                    cumulative: 0,
                };
                write_observation(&env, 0, &obs);
                set_newest_index(&env, 0);
            }
        }
    }

    pub fn get_latest(env: Env) -> Observation {
        match newest(&env) {
            Some((_, obs)) => obs,
            None => panic!("{}", ErrorMsg::NO_OBSERVATIONS),
        }
    }

    /// Average price over the window ending now.
    pub fn quote(env: Env, _base: Address, _quote: Address) -> u128 {
        let now = env.ledger().timestamp();
        let (_, latest) = match newest(&env) {
            Some(found) => found,
            None => panic!("{}", ErrorMsg::NO_OBSERVATIONS),
        };
        if now.saturating_sub(latest.timestamp) > STALE_PRICE_THRESHOLD {
            panic!("{}", ErrorMsg::STALE_PRICE);
        }
        twap_at(&env, now)
    }

    /// Average price over the window ending at `target`. Observations
    /// staler than the threshold are accepted only once `MAX_DELAY` has
    /// passed beyond the target.
    pub fn quote_from(env: Env, _base: Address, _quote: Address, target: u64) -> u128 {
        let now = env.ledger().timestamp();
        let at_target = match observation_at_or_before(&env, target) {
            Some(obs) => obs,
            None => panic!("{}", ErrorMsg::NO_HISTORY),
        };
        if target.saturating_sub(at_target.timestamp) > STALE_PRICE_THRESHOLD
            && now < target.saturating_add(MAX_DELAY)
        {
            panic!("{}", ErrorMsg::STALE_PRICE);
        }
        twap_at(&env, target)
    }
}

// ============================================================
// RING BUFFER
// ============================================================

fn newest(env: &Env) -> Option<(u32, Observation)> {
    let index: u32 = env.storage().persistent().get(&DataKey::NewestIndex)?;
    let obs = read_observation(env, index)?;
    Some((index, obs))
}

fn set_newest_index(env: &Env, index: u32) {
    env.storage().persistent().set(&DataKey::NewestIndex, &index);
}

fn read_observation(env: &Env, index: u32) -> Option<Observation> {
    env.storage()
        .persistent()
        .get(&DataKey::Observation(index % TWAP_BUFFER_SIZE))
}

fn write_observation(env: &Env, index: u32, obs: &Observation) {
    env.storage()
        .persistent()
        .set(&DataKey::Observation(index % TWAP_BUFFER_SIZE), obs);
}

/// Newest observation at or before `t`, walking the ring backward.
/// Falls back to the oldest slot when `t` predates the whole buffer.
fn observation_at_or_before(env: &Env, t: u64) -> Option<Observation> {
    let (newest_index, newest_obs) = newest(env)?;
    if newest_obs.timestamp <= t {
        return Some(newest_obs);
    }

    let mut oldest = newest_obs;
    for i in 1..TWAP_BUFFER_SIZE {
        let index = (newest_index + TWAP_BUFFER_SIZE - i) % TWAP_BUFFER_SIZE;
        match read_observation(env, index) {
            Some(obs) if obs.timestamp <= oldest.timestamp => {
                if obs.timestamp <= t {
                    return Some(obs);
                }
                oldest = obs;
            }
            _ => break,
        }
    }
    Some(oldest)
}

/// Price-time cumulative at `t`, extrapolating from the nearest
/// observation at or before it.
fn cumulative_at(env: &Env, t: u64) -> u128 {
    let obs = match observation_at_or_before(env, t) {
        Some(obs) => obs,
        None => panic!("{}", ErrorMsg::NO_OBSERVATIONS),
    };
    let elapsed = t.saturating_sub(obs.timestamp);
    obs.cumulative + obs.price * elapsed as u128
}

fn window(env: &Env) -> u64 {
    match env.storage().instance().get(&DataKey::Window) {
        Some(window) => window,
        None => panic!("{}", ErrorMsg::NOT_INITIALIZED),
    }
}

fn twap_at(env: &Env, end: u64) -> u128 {
    let window = window(env);
    let mut start = end.saturating_sub(window);
    let anchor = match observation_at_or_before(env, start) {
        Some(obs) => obs,
        None => panic!("{}", ErrorMsg::NO_OBSERVATIONS),
    };
    // The ring records nothing before its oldest slot. Averaging over
    // that gap would dilute the price toward zero, so the window is
    // capped at the recorded history.
    if anchor.timestamp > start {
        start = anchor.timestamp;
    }
    if start >= end {
        return anchor.price;
    }
    let span = (end - start) as u128;
    (cumulative_at(env, end) - cumulative_at(env, start)) / span
}
