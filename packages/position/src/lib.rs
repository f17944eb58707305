#![no_std]

pub mod compose;
pub mod fees;
pub mod netting;
pub mod token_id;
pub mod types;

pub use compose::{
    bid, collateral, collateral_to_contracts, contracts_to_collateral, liquidity_per_tick, longs,
    piecewise_linear, piecewise_quadratic, position_delta, shorts,
};
pub use fees::update_claimable_fees;
pub use netting::asset_delta;
pub use token_id::{
    format_token_id, parse_token_id, LONG_TOKEN_ID, SHORT_TOKEN_ID, TOKEN_ID_VERSION,
};
pub use types::{Delta, OrderSpec, OrderType, PositionData, PositionKey};
