// ============================================================================
// Range-order composition
// ============================================================================
//
// A range order of `size` contracts over [lower, upper] decomposes into a
// mix of collateral, long contracts and short contracts that depends only
// on where the market price sits relative to the range. `piecewise_linear`
// gives the traded-through proportion nu, `piecewise_quadratic` the
// average fill price integral used for the bid-side collateral.

use soroban_sdk::Env;

use crate::types::{Delta, OrderSpec, OrderType};
use strikepool_math::{
    mul_div, ticks_between, to_signed, wad_avg, wad_div, wad_mul, wad_sub, WAD,
};

/// Proportion of the range below `price`, clamped to [0, WAD].
pub fn piecewise_linear(env: &Env, spec: &OrderSpec, price: u128) -> u128 {
    if price <= spec.lower {
        0
    } else if price < spec.upper {
        mul_div(env, WAD, price - spec.lower, spec.upper - spec.lower)
    } else {
        WAD
    }
}

/// Integral of `piecewise_linear` from `lower` to `price`, divided by the
/// range width. Equals avg(a, lower) * (a - lower) / (upper - lower) with
/// `a = min(price, upper)`.
pub fn piecewise_quadratic(env: &Env, spec: &OrderSpec, price: u128) -> u128 {
    if price <= spec.lower {
        return 0;
    }
    let a = if price < spec.upper { price } else { spec.upper };
    let mean = wad_avg(a, spec.lower);
    mul_div(env, mean, a - spec.lower, spec.upper - spec.lower)
}

/// Collateral locked in the traded-through part of the order, i.e. the
/// premiums a bid order has paid out (or an ask order has collected) once
/// the market has moved to `price`. Denominated in collateral.
pub fn bid(env: &Env, spec: &OrderSpec, size: u128, price: u128) -> u128 {
    let quad = piecewise_quadratic(env, spec, price);
    contracts_to_collateral(env, spec, wad_mul(env, quad, size))
}

/// Collateral the position holds at `price`, in collateral units.
pub fn collateral(env: &Env, spec: &OrderSpec, size: u128, price: u128) -> u128 {
    let nu = piecewise_linear(env, spec, price);
    match spec.order_type {
        OrderType::LongCollateral => bid(env, spec, size, price),
        OrderType::CollateralShort => {
            let locked = contracts_to_collateral(env, spec, wad_mul(env, wad_sub(WAD, nu), size));
            locked + bid(env, spec, size, price)
        }
        OrderType::CollateralShortUsePremiums => {
            let locked = contracts_to_collateral(env, spec, wad_mul(env, wad_sub(WAD, nu), size));
            let spent = wad_sub(
                bid(env, spec, size, spec.upper),
                bid(env, spec, size, price),
            );
            // Truncation in `bid` can put `spent` a wei above `locked`
            // near the upper bound; the position holds no collateral
            // there either way.
            if spent >= locked {
                0
            } else {
                locked - spent
            }
        }
    }
}

/// Long contracts the position holds at `price`.
pub fn longs(env: &Env, spec: &OrderSpec, size: u128, price: u128) -> u128 {
    if spec.order_type.is_ask() {
        return 0;
    }
    let nu = piecewise_linear(env, spec, price);
    wad_mul(env, wad_sub(WAD, nu), size)
}

/// Short contracts the position holds at `price`.
pub fn shorts(env: &Env, spec: &OrderSpec, size: u128, price: u128) -> u128 {
    if spec.order_type.is_bid() {
        return 0;
    }
    let nu = piecewise_linear(env, spec, price);
    wad_mul(env, nu, size)
}

/// Convert an amount of contracts into collateral units. Puts collateralize
/// `strike` per contract, calls one unit per contract.
pub fn contracts_to_collateral(env: &Env, spec: &OrderSpec, amount: u128) -> u128 {
    if spec.is_call {
        amount
    } else {
        wad_mul(env, amount, spec.strike)
    }
}

/// Inverse of `contracts_to_collateral`.
pub fn collateral_to_contracts(env: &Env, spec: &OrderSpec, amount: u128) -> u128 {
    if spec.is_call {
        amount
    } else {
        wad_div(env, amount, spec.strike)
    }
}

/// Contracts of liquidity the order contributes per lattice tick. The size
/// must spread evenly over the range, so deposits and withdrawals adjust
/// every tick's rate by an exact amount.
pub fn liquidity_per_tick(size: u128, lower: u128, upper: u128) -> Result<u128, &'static str> {
    let ticks = ticks_between(lower, upper) as u128;
    let rate = size / ticks;
    if rate * ticks != size {
        return Err("order size must divide evenly across its ticks");
    }
    Ok(rate)
}

/// Signed asset change from resizing a position at `price` from
/// `current_balance` to `current_balance + size_delta` contracts. Computed
/// as a difference of full compositions so repeated resizes never drift
/// from the composition of the final balance.
pub fn position_delta(
    env: &Env,
    spec: &OrderSpec,
    current_balance: u128,
    size_delta: i128,
    price: u128,
) -> Delta {
    let new_balance = if size_delta >= 0 {
        current_balance + size_delta as u128
    } else {
        current_balance - size_delta.unsigned_abs()
    };
    Delta {
        collateral: to_signed(collateral(env, spec, new_balance, price))
            - to_signed(collateral(env, spec, current_balance, price)),
        longs: to_signed(longs(env, spec, new_balance, price))
            - to_signed(longs(env, spec, current_balance, price)),
        shorts: to_signed(shorts(env, spec, new_balance, price))
            - to_signed(shorts(env, spec, current_balance, price)),
    }
}
