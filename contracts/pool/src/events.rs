// Pool events module
// All events use compact names to reduce storage/gas costs

use soroban_sdk::{Address, Env, Symbol};

use crate::types::PositionKey;

/// Emitted once when the pool is initialized
/// Topics: ("PoolInit",)
/// Data: (base, quote, strike, maturity, is_call)
pub fn emit_initialized(
    env: &Env,
    base: &Address,
    quote: &Address,
    strike: u128,
    maturity: u64,
    is_call: bool,
) {
    env.events().publish(
        (Symbol::new(env, "PoolInit"),),
        (base.clone(), quote.clone(), strike, maturity, is_call),
    );
}

/// Emitted on every deposit into a range order
/// Topics: ("Deposit", owner)
/// Data: (lower, upper, order_type, size, market_price)
pub fn emit_deposit(
    env: &Env,
    key: &PositionKey,
    size: u128,
    market_price: u128,
) {
    env.events().publish(
        (Symbol::new(env, "Deposit"), key.owner.clone()),
        (
            key.lower,
            key.upper,
            key.order_type.to_u8() as u32,
            size,
            market_price,
        ),
    );
}

/// Emitted on every withdrawal from a range order
/// Topics: ("Withdraw", owner)
/// Data: (lower, upper, order_type, size, fees_paid)
pub fn emit_withdraw(env: &Env, key: &PositionKey, size: u128, fees_paid: u128) {
    env.events().publish(
        (Symbol::new(env, "Withdraw"), key.owner.clone()),
        (key.lower, key.upper, key.order_type.to_u8() as u32, size, fees_paid),
    );
}

/// Emitted after a filled AMM trade
/// Topics: ("Trade", taker)
/// Data: (size, is_buy, premium, taker_fee, market_price)
pub fn emit_trade(
    env: &Env,
    taker: &Address,
    size: u128,
    is_buy: bool,
    premium: u128,
    taker_fee: u128,
    market_price: u128,
) {
    env.events().publish(
        (Symbol::new(env, "Trade"), taker.clone()),
        (size, is_buy, premium, taker_fee, market_price),
    );
}

/// Emitted after a peer-to-peer RFQ fill
/// Topics: ("RfqFill", provider, taker)
/// Data: (size, price, is_buy, premium, taker_fee)
pub fn emit_rfq_fill(
    env: &Env,
    provider: &Address,
    taker: &Address,
    size: u128,
    price: u128,
    is_buy: bool,
    premium: u128,
    taker_fee: u128,
) {
    env.events().publish(
        (Symbol::new(env, "RfqFill"), provider.clone(), taker.clone()),
        (size, price, is_buy, premium, taker_fee),
    );
}

/// Emitted when equal long and short legs are burned for collateral
/// Topics: ("Annihilate", owner)
/// Data: (size, collateral_released)
pub fn emit_annihilate(env: &Env, owner: &Address, size: u128, collateral: u128) {
    env.events().publish(
        (Symbol::new(env, "Annihilate"), owner.clone()),
        (size, collateral),
    );
}

/// Emitted when a long/short pair is written against fresh collateral
/// Topics: ("Write", underwriter)
/// Data: (long_receiver, size, collateral_locked)
pub fn emit_write(
    env: &Env,
    underwriter: &Address,
    long_receiver: &Address,
    size: u128,
    collateral: u128,
) {
    env.events().publish(
        (Symbol::new(env, "Write"), underwriter.clone()),
        (long_receiver.clone(), size, collateral),
    );
}

/// Emitted when the settlement price is frozen
/// Topics: ("Settled",)
/// Data: (settlement_price,)
pub fn emit_settlement_price(env: &Env, price: u128) {
    env.events()
        .publish((Symbol::new(env, "Settled"),), (price,));
}

/// Emitted when a long holder exercises
/// Topics: ("Exercise", holder)
/// Data: (size, payout)
pub fn emit_exercise(env: &Env, holder: &Address, size: u128, payout: u128) {
    env.events()
        .publish((Symbol::new(env, "Exercise"), holder.clone()), (size, payout));
}

/// Emitted when a short writer settles
/// Topics: ("Settle", holder)
/// Data: (size, residual)
pub fn emit_settle(env: &Env, holder: &Address, size: u128, residual: u128) {
    env.events()
        .publish((Symbol::new(env, "Settle"), holder.clone()), (size, residual));
}

/// Emitted when a range order is settled post-maturity
/// Topics: ("SettlePos", owner)
/// Data: (lower, upper, order_type, payout)
pub fn emit_settle_position(env: &Env, key: &PositionKey, payout: u128) {
    env.events().publish(
        (Symbol::new(env, "SettlePos"), key.owner.clone()),
        (key.lower, key.upper, key.order_type.to_u8() as u32, payout),
    );
}

/// Emitted when size moves between owners of the same range
/// Topics: ("TransferPos", from, to)
/// Data: (lower, upper, order_type, size)
pub fn emit_transfer_position(
    env: &Env,
    key: &PositionKey,
    to: &Address,
    size: u128,
) {
    env.events().publish(
        (Symbol::new(env, "TransferPos"), key.owner.clone(), to.clone()),
        (key.lower, key.upper, key.order_type.to_u8() as u32, size),
    );
}

/// Emitted when accrued maker fees are claimed
/// Topics: ("Claim", owner)
/// Data: (lower, upper, order_type, amount)
pub fn emit_claim(env: &Env, key: &PositionKey, amount: u128) {
    env.events().publish(
        (Symbol::new(env, "Claim"), key.owner.clone()),
        (key.lower, key.upper, key.order_type.to_u8() as u32, amount),
    );
}

/// Emitted when protocol fees are swept to the receiver
/// Topics: ("ProtoFees",)
/// Data: (receiver, amount)
pub fn emit_protocol_fees_claimed(env: &Env, receiver: &Address, amount: u128) {
    env.events().publish(
        (Symbol::new(env, "ProtoFees"),),
        (receiver.clone(), amount),
    );
}
