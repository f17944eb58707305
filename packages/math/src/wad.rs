// SPDX-License-Identifier: MIT
// 18-decimal fixed-point ("wad") arithmetic.
//
// Unsigned values are raw u128, signed values raw i128, both scaled by
// 1e18. Multiplication and division run through U256/I256 host types so
// intermediates cannot overflow; results truncate toward zero. Every
// operation that could overflow or divide by zero panics.

use crate::constants::WAD;
use soroban_sdk::{Env, I256, U256};

// ============================================================
// CASTS
// ============================================================

/// Cast to signed, panicking if the value does not fit.
#[inline]
pub fn to_signed(x: u128) -> i128 {
    if x > i128::MAX as u128 {
        panic!("to_signed: overflow");
    }
    x as i128
}

/// Cast to unsigned, panicking on negative input.
#[inline]
pub fn to_unsigned(x: i128) -> u128 {
    if x < 0 {
        panic!("to_unsigned: negative");
    }
    x as u128
}

// ============================================================
// UNSIGNED WAD ARITHMETIC
// ============================================================

#[inline]
pub fn wad_add(a: u128, b: u128) -> u128 {
    match a.checked_add(b) {
        Some(v) => v,
        None => panic!("wad_add: overflow"),
    }
}

#[inline]
pub fn wad_sub(a: u128, b: u128) -> u128 {
    match a.checked_sub(b) {
        Some(v) => v,
        None => panic!("wad_sub: underflow"),
    }
}

/// (a * b) / 1e18, truncating.
pub fn wad_mul(env: &Env, a: u128, b: u128) -> u128 {
    mul_div(env, a, b, WAD)
}

/// (a * 1e18) / b, truncating. Panics if b is zero.
pub fn wad_div(env: &Env, a: u128, b: u128) -> u128 {
    mul_div(env, a, WAD, b)
}

/// (a * b) / denominator with a 256-bit intermediate.
pub fn mul_div(env: &Env, a: u128, b: u128, denominator: u128) -> u128 {
    if denominator == 0 {
        panic!("mul_div: divide by zero");
    }

    let product = U256::from_u128(env, a).mul(&U256::from_u128(env, b));
    let result = product.div(&U256::from_u128(env, denominator));

    match result.to_u128() {
        Some(v) => v,
        None => panic!("mul_div: overflow"),
    }
}

/// Overflow-free (a + b) / 2.
#[inline]
pub fn wad_avg(a: u128, b: u128) -> u128 {
    (a >> 1) + (b >> 1) + (a & b & 1)
}

#[inline]
pub fn wad_min(a: u128, b: u128) -> u128 {
    if a < b {
        a
    } else {
        b
    }
}

#[inline]
pub fn wad_max(a: u128, b: u128) -> u128 {
    if a > b {
        a
    } else {
        b
    }
}

/// Multiplicative inverse: 1e36 / x.
pub fn wad_inv(env: &Env, x: u128) -> u128 {
    wad_div(env, WAD, x)
}

// ============================================================
// SIGNED WAD ARITHMETIC
// ============================================================

#[inline]
pub fn swad_add(a: i128, b: i128) -> i128 {
    match a.checked_add(b) {
        Some(v) => v,
        None => panic!("swad_add: overflow"),
    }
}

#[inline]
pub fn swad_sub(a: i128, b: i128) -> i128 {
    match a.checked_sub(b) {
        Some(v) => v,
        None => panic!("swad_sub: overflow"),
    }
}

/// Signed (a * b) / 1e18, truncating toward zero.
pub fn swad_mul(env: &Env, a: i128, b: i128) -> i128 {
    // I256 division truncates toward zero, matching the unsigned path.
    let product = I256::from_i128(env, a).mul(&I256::from_i128(env, b));
    let result = product.div(&I256::from_i128(env, crate::constants::WAD_I));

    match result.to_i128() {
        Some(v) => v,
        None => panic!("swad_mul: overflow"),
    }
}

/// Signed (a * 1e18) / b, truncating toward zero. Panics if b is zero.
pub fn swad_div(env: &Env, a: i128, b: i128) -> i128 {
    if b == 0 {
        panic!("swad_div: divide by zero");
    }

    let scaled = I256::from_i128(env, a).mul(&I256::from_i128(env, crate::constants::WAD_I));
    let result = scaled.div(&I256::from_i128(env, b));

    match result.to_i128() {
        Some(v) => v,
        None => panic!("swad_div: overflow"),
    }
}

// ============================================================
// TOKEN DECIMAL CONVERSIONS
// ============================================================

const WAD_DECIMALS: u32 = 18;

fn pow10(exp: u32) -> u128 {
    match 10u128.checked_pow(exp) {
        Some(v) => v,
        None => panic!("pow10: overflow"),
    }
}

/// Convert a wad amount to a token's native decimal count, truncating.
/// Token interfaces take i128, so the result must fit.
pub fn to_token_amount(wad: u128, decimals: u32) -> i128 {
    let scaled = if decimals <= WAD_DECIMALS {
        wad / pow10(WAD_DECIMALS - decimals)
    } else {
        match wad.checked_mul(pow10(decimals - WAD_DECIMALS)) {
            Some(v) => v,
            None => panic!("to_token_amount: overflow"),
        }
    };
    to_signed(scaled)
}

/// Convert a token-native amount back to wad. Panics on negative input.
pub fn from_token_amount(amount: i128, decimals: u32) -> u128 {
    let raw = to_unsigned(amount);
    if decimals <= WAD_DECIMALS {
        match raw.checked_mul(pow10(WAD_DECIMALS - decimals)) {
            Some(v) => v,
            None => panic!("from_token_amount: overflow"),
        }
    } else {
        raw / pow10(decimals - WAD_DECIMALS)
    }
}

/// Rescale a raw integer between two decimal counts, truncating.
pub fn rescale(amount: u128, from_decimals: u32, to_decimals: u32) -> u128 {
    if from_decimals == to_decimals {
        amount
    } else if from_decimals < to_decimals {
        match amount.checked_mul(pow10(to_decimals - from_decimals)) {
            Some(v) => v,
            None => panic!("rescale: overflow"),
        }
    } else {
        amount / pow10(from_decimals - to_decimals)
    }
}
