// Tick Types

use soroban_sdk::contracttype;

/// Record stored for each active tick on the price lattice.
///
/// `delta` is the signed liquidity-rate change applied when the tick is
/// crossed. Its stored sign is orientation-dependent: crossing flips it,
/// so crossing back undoes the first crossing exactly.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tick {
    /// Net liquidity-rate change on crossing
    pub delta: i128,
    /// Portion of `delta` contributed by bid-side (long-denominated) orders
    pub long_delta: i128,
    /// Portion of `delta` contributed by ask-side (collateral-denominated) orders
    pub short_delta: i128,
    /// Fee-rate accumulator snapshot "outside" this tick
    pub external_fee_rate: u128,
    /// Number of range orders referencing this tick as an endpoint
    pub counter: u32,
}

impl Default for Tick {
    fn default() -> Self {
        Self {
            delta: 0,
            long_delta: 0,
            short_delta: 0,
            external_fee_rate: 0,
            counter: 0,
        }
    }
}

impl Tick {
    /// A tick may be reclaimed once nothing references it and crossing
    /// it would be a no-op. Sentinels are never reclaimed.
    pub fn is_removable(&self) -> bool {
        self.counter == 0 && self.delta == 0 && self.long_delta == 0 && self.short_delta == 0
    }
}
