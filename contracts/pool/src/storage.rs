// Pool storage module

use soroban_sdk::{contracttype, Address, Env, Vec};

use strikepool_tick::{new_index, Tick};

use crate::error::ErrorMsg;
use crate::types::{PoolConfig, PoolState, PositionData, PositionKey};

// ============================================================
// STORAGE KEYS
// ============================================================

#[contracttype]
pub enum DataKey {
    /// Pool configuration
    Config,
    /// Mutable pool state
    State,
    /// Initialization flag
    Initialized,
    /// Tick record by lattice price
    Tick(u128),
    /// Sorted vector of active tick prices
    TickIndex,
    /// Fee/claim state of a range order
    Position(PositionKey),
    /// Internal token ledger by (owner, token id)
    Balance(Address, u128),
    /// Operator address -> packed index
    OperatorIndex(Address),
    /// Packed index -> operator address
    OperatorAddress(u32),
    /// Number of interned operators
    OperatorCount,
    /// Reentrancy flag (instance storage)
    Guard,
}

// ============================================================
// TTL CONFIGURATION
// ============================================================

/// Persistent storage lifetime in ledgers (~1 year at 5s/ledger)
const PERSISTENT_LIFETIME: u32 = 6_307_200;
/// TTL bump threshold
const PERSISTENT_BUMP: u32 = 6_307_200;

/// Extend TTL for a persistent storage key
fn extend_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME, PERSISTENT_BUMP);
}

// ============================================================
// INITIALIZATION
// ============================================================

pub fn is_initialized(env: &Env) -> bool {
    env.storage().persistent().has(&DataKey::Initialized)
}

pub fn set_initialized(env: &Env) {
    env.storage().persistent().set(&DataKey::Initialized, &true);
    extend_ttl(env, &DataKey::Initialized);
}

// ============================================================
// CONFIG / STATE
// ============================================================

pub fn write_pool_config(env: &Env, config: &PoolConfig) {
    env.storage().persistent().set(&DataKey::Config, config);
    extend_ttl(env, &DataKey::Config);
}

pub fn read_pool_config(env: &Env) -> PoolConfig {
    match env.storage().persistent().get(&DataKey::Config) {
        Some(config) => config,
        None => panic!("{}", ErrorMsg::NOT_INITIALIZED),
    }
}

pub fn write_pool_state(env: &Env, state: &PoolState) {
    env.storage().persistent().set(&DataKey::State, state);
    extend_ttl(env, &DataKey::State);
}

pub fn read_pool_state(env: &Env) -> PoolState {
    match env.storage().persistent().get(&DataKey::State) {
        Some(state) => state,
        None => panic!("{}", ErrorMsg::NOT_INITIALIZED),
    }
}

// ============================================================
// TICKS
// ============================================================

pub fn read_tick(env: &Env, price: u128) -> Tick {
    env.storage()
        .persistent()
        .get(&DataKey::Tick(price))
        .unwrap_or_default()
}

pub fn write_tick(env: &Env, price: u128, tick: &Tick) {
    let key = DataKey::Tick(price);
    env.storage().persistent().set(&key, tick);
    extend_ttl(env, &key);
}

pub fn remove_tick(env: &Env, price: u128) {
    env.storage().persistent().remove(&DataKey::Tick(price));
}

pub fn read_tick_index(env: &Env) -> Vec<u128> {
    match env.storage().persistent().get(&DataKey::TickIndex) {
        Some(index) => index,
        None => new_index(env),
    }
}

pub fn write_tick_index(env: &Env, index: &Vec<u128>) {
    env.storage().persistent().set(&DataKey::TickIndex, index);
    extend_ttl(env, &DataKey::TickIndex);
}

// ============================================================
// POSITIONS
// ============================================================

pub fn read_position(env: &Env, key: &PositionKey) -> Option<PositionData> {
    env.storage().persistent().get(&DataKey::Position(key.clone()))
}

pub fn write_position(env: &Env, key: &PositionKey, data: &PositionData) {
    let skey = DataKey::Position(key.clone());
    env.storage().persistent().set(&skey, data);
    extend_ttl(env, &skey);
}

pub fn remove_position(env: &Env, key: &PositionKey) {
    env.storage()
        .persistent()
        .remove(&DataKey::Position(key.clone()));
}

// ============================================================
// INTERNAL TOKEN LEDGER
// ============================================================

pub fn read_balance(env: &Env, owner: &Address, token_id: u128) -> u128 {
    env.storage()
        .persistent()
        .get(&DataKey::Balance(owner.clone(), token_id))
        .unwrap_or(0)
}

pub fn write_balance(env: &Env, owner: &Address, token_id: u128, amount: u128) {
    let key = DataKey::Balance(owner.clone(), token_id);
    if amount == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &amount);
        extend_ttl(env, &key);
    }
}

/// Credit `amount` to a balance.
pub fn add_balance(env: &Env, owner: &Address, token_id: u128, amount: u128) {
    if amount == 0 {
        return;
    }
    let current = read_balance(env, owner, token_id);
    write_balance(env, owner, token_id, current + amount);
}

/// Debit `amount` from a balance, panicking with `msg` when it does not
/// cover the debit.
pub fn sub_balance(env: &Env, owner: &Address, token_id: u128, amount: u128, msg: &'static str) {
    if amount == 0 {
        return;
    }
    let current = read_balance(env, owner, token_id);
    if current < amount {
        panic!("{}", msg);
    }
    write_balance(env, owner, token_id, current - amount);
}

// ============================================================
// OPERATOR INTERNING
// ============================================================

/// Look up the packed index of an operator address, interning it on
/// first sight. Token ids embed this index because an `Address` has no
/// fixed-width integer form.
pub fn operator_index(env: &Env, operator: &Address) -> u32 {
    let key = DataKey::OperatorIndex(operator.clone());
    if let Some(idx) = env.storage().persistent().get(&key) {
        return idx;
    }
    let count: u32 = env
        .storage()
        .persistent()
        .get(&DataKey::OperatorCount)
        .unwrap_or(0);
    env.storage().persistent().set(&key, &count);
    extend_ttl(env, &key);
    let rev = DataKey::OperatorAddress(count);
    env.storage().persistent().set(&rev, operator);
    extend_ttl(env, &rev);
    env.storage()
        .persistent()
        .set(&DataKey::OperatorCount, &(count + 1));
    extend_ttl(env, &DataKey::OperatorCount);
    count
}

// ============================================================
// REENTRANCY GUARD
// ============================================================

pub fn guard_enter(env: &Env) {
    let entered: bool = env.storage().instance().get(&DataKey::Guard).unwrap_or(false);
    if entered {
        panic!("{}", ErrorMsg::REENTRANCY);
    }
    env.storage().instance().set(&DataKey::Guard, &true);
}

pub fn guard_exit(env: &Env) {
    env.storage().instance().set(&DataKey::Guard, &false);
}
