#![no_std]

pub mod curve;
pub mod engine;

pub use curve::{
    amount_of_ticks, ask_liquidity, bid_liquidity, max_trade_size, mean_price, next_price,
};
pub use engine::{quote_amm, taker_fee, trade_amm, TradeResult, TradeState};
