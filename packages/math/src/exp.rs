// SPDX-License-Identifier: MIT
// Natural exponential on signed wads.
//
// e^x = e^n * e^r with n the integer part and r in [0, 1). The integer
// part is repeated multiplication by E_WAD through U256; the fractional
// part is a Taylor series whose intermediates stay inside i128 because
// both term and r are below one wad squared.

use crate::constants::{EXP_MAX_INPUT, EXP_MIN_INPUT, E_WAD, WAD_I};
use crate::wad::swad_div;
use soroban_sdk::{Env, U256};

/// Number of Taylor terms for the fractional part. Twenty terms of
/// r^k / k! with r < 1 leave an error below one wei.
const TAYLOR_TERMS: i128 = 20;

/// e^x for a signed wad x.
///
/// Returns 0 below EXP_MIN_INPUT (the result underflows one wei) and
/// panics above EXP_MAX_INPUT (the result exceeds i128 wad range).
pub fn wad_exp(env: &Env, x: i128) -> i128 {
    if x < EXP_MIN_INPUT {
        return 0;
    }
    if x > EXP_MAX_INPUT {
        panic!("wad_exp: overflow");
    }
    if x == 0 {
        return WAD_I;
    }
    if x < 0 {
        // e^-x fits comfortably for x in (EXP_MIN_INPUT, 0).
        return swad_div(env, WAD_I, wad_exp(env, -x));
    }

    let n = x / WAD_I;
    let r = x % WAD_I;

    // Fractional part: sum of r^k / k!.
    let mut term = WAD_I;
    let mut frac = WAD_I;
    for k in 1..=TAYLOR_TERMS {
        term = term * r / WAD_I / k;
        if term == 0 {
            break;
        }
        frac += term;
    }

    // Integer part folded in one wad factor at a time.
    let mut acc = U256::from_u128(env, frac as u128);
    let wad_256 = U256::from_u128(env, WAD_I as u128);
    let e_256 = U256::from_u128(env, E_WAD as u128);
    for _ in 0..n {
        acc = acc.mul(&e_256).div(&wad_256);
    }

    match acc.to_u128() {
        Some(v) if v <= i128::MAX as u128 => v as i128,
        _ => panic!("wad_exp: overflow"),
    }
}
