// Token id encoding for range-order balances.
//
// Layout, most significant first (80 bits used of the u128):
//
//   [version:8][operator-index:32][lower-tick:16][upper-tick:16][order-type:8]
//
// Tick fields hold lattice indices (price / MIN_TICK_DISTANCE), not wad
// prices. Operators are interned to a u32 index by the pool, since a
// Soroban Address has no canonical fixed-width integer form. The
// long/short option legs live in the version-0 id space, so range-order
// ids (version 1) can never collide with them.

use crate::types::OrderType;
use strikepool_math::{MAX_TICK_PRICE, MIN_TICK_DISTANCE, MIN_TICK_PRICE};

/// Current range-order id version.
pub const TOKEN_ID_VERSION: u8 = 1;

/// Reserved id of the short option leg.
pub const SHORT_TOKEN_ID: u128 = 0;

/// Reserved id of the long option leg.
pub const LONG_TOKEN_ID: u128 = 1;

const TYPE_SHIFT: u32 = 0;
const UPPER_SHIFT: u32 = 8;
const LOWER_SHIFT: u32 = 24;
const OPERATOR_SHIFT: u32 = 40;
const VERSION_SHIFT: u32 = 72;

/// Pack a range-order identity into one integer.
pub fn format_token_id(
    operator_index: u32,
    lower: u128,
    upper: u128,
    order_type: OrderType,
) -> u128 {
    let lower_idx = lower / MIN_TICK_DISTANCE;
    let upper_idx = upper / MIN_TICK_DISTANCE;

    ((TOKEN_ID_VERSION as u128) << VERSION_SHIFT)
        | ((operator_index as u128) << OPERATOR_SHIFT)
        | (lower_idx << LOWER_SHIFT)
        | (upper_idx << UPPER_SHIFT)
        | ((order_type.to_u8() as u128) << TYPE_SHIFT)
}

/// Unpack a range-order token id, validating every field.
pub fn parse_token_id(id: u128) -> Result<(u8, u32, u128, u128, OrderType), &'static str> {
    let version = (id >> VERSION_SHIFT) as u8;
    if version != TOKEN_ID_VERSION {
        return Err("unknown token id version");
    }
    if id >> (VERSION_SHIFT + 8) != 0 {
        return Err("token id out of range");
    }

    let operator_index = ((id >> OPERATOR_SHIFT) & 0xFFFF_FFFF) as u32;
    let lower = ((id >> LOWER_SHIFT) & 0xFFFF) * MIN_TICK_DISTANCE;
    let upper = ((id >> UPPER_SHIFT) & 0xFFFF) * MIN_TICK_DISTANCE;
    let order_type = OrderType::from_u8((id >> TYPE_SHIFT) as u8 & 0xFF)?;

    if lower < MIN_TICK_PRICE || upper > MAX_TICK_PRICE || lower >= upper {
        return Err("token id carries invalid tick range");
    }

    Ok((version, operator_index, lower, upper, order_type))
}
