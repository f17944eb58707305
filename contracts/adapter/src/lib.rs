#![no_std]

mod error;

pub mod feed;
pub mod interfaces;
pub mod twap;

pub use feed::{Denomination, FeedAdapter, FeedAdapterClient, PricingPath, UsdRoute};
pub use interfaces::{PriceFeed, PriceFeedClient, RoundData};
pub use twap::{Observation, TwapAdapter, TwapAdapterClient};
