#![no_std]

pub mod fee_rate;
pub mod index;
pub mod types;
pub mod update;

pub use fee_rate::range_fee_rate;
pub use index::{insert, nearest_below, new_index, next_above, prev_below, resolve_reference};
pub use types::Tick;
pub use update::{add_delta, apply_endpoint_delta, cross_tick, new_tick};
