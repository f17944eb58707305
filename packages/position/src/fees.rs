// Maker fee settlement. The pool tracks a monotone per-tick fee rate for
// every range; a position banks the rate delta since it last touched the
// pool, scaled by its per-tick liquidity.

use soroban_sdk::Env;

use crate::types::PositionData;
use strikepool_math::{wad_add, wad_mul, wad_sub};

/// Fold the fee rate growth since the last settlement into the position's
/// claimable balance and stamp the new rate.
pub fn update_claimable_fees(
    env: &Env,
    data: &mut PositionData,
    fee_rate: u128,
    liquidity_per_tick: u128,
) {
    let growth = wad_sub(fee_rate, data.last_fee_rate);
    data.claimable_fees = wad_add(data.claimable_fees, wad_mul(env, growth, liquidity_per_tick));
    data.last_fee_rate = fee_rate;
}
