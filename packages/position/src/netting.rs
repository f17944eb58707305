// Taker-side netting. A trader never holds long and short contracts at the
// same time: an incoming fill first closes the opposite leg, and only the
// remainder opens new exposure.

/// Split a fill of `size` contracts into (long change, short change) given
/// the taker's current balances. Buying closes shorts first, selling closes
/// longs first. Both outputs carry the sign of the balance change.
pub fn asset_delta(
    long_balance: u128,
    short_balance: u128,
    size: u128,
    is_buy: bool,
) -> (i128, i128) {
    if is_buy {
        let closed = if short_balance < size { short_balance } else { size };
        ((size - closed) as i128, -(closed as i128))
    } else {
        let closed = if long_balance < size { long_balance } else { size };
        (-(closed as i128), (size - closed) as i128)
    }
}
