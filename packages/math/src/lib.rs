// Strikepool Math Package

#![no_std]

pub mod constants;
pub mod exp;
pub mod wad;

// Re-export commonly used items from constants
pub use constants::*;

// Re-export wad arithmetic
pub use wad::{
    from_token_amount, mul_div, rescale, swad_add, swad_div, swad_mul, swad_sub, to_signed,
    to_token_amount, to_unsigned, wad_add, wad_avg, wad_div, wad_inv, wad_max, wad_min, wad_mul,
    wad_sub,
};

pub use exp::wad_exp;

/// Whether a normalized price sits exactly on the tick lattice.
pub fn is_on_lattice(price: u128) -> bool {
    price >= MIN_TICK_PRICE && price <= MAX_TICK_PRICE && price % MIN_TICK_DISTANCE == 0
}

/// Lattice step count between two on-lattice prices.
pub fn ticks_between(lower: u128, upper: u128) -> u32 {
    if upper <= lower {
        panic!("ticks_between: inverted range");
    }
    ((upper - lower) / MIN_TICK_DISTANCE) as u32
}
