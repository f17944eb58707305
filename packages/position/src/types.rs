use soroban_sdk::{contracttype, Address};

/// Side of the book a range order serves.
///
/// Bid orders are long-denominated: they buy longs as the price falls
/// through their range. Ask orders are collateral-denominated: they
/// underwrite shorts as the price rises through their range.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OrderType {
    /// "LC": longs that convert to collateral as the price rises (bid side)
    LongCollateral = 0,
    /// "CS": collateral that converts to shorts, premiums held as collateral (ask side)
    CollateralShort = 1,
    /// "CSUP": like CS, but expected premiums are netted out of the
    /// required deposit up front
    CollateralShortUsePremiums = 2,
}

impl OrderType {
    pub fn is_bid(&self) -> bool {
        matches!(self, OrderType::LongCollateral)
    }

    pub fn is_ask(&self) -> bool {
        matches!(
            self,
            OrderType::CollateralShort | OrderType::CollateralShortUsePremiums
        )
    }

    pub fn to_u8(&self) -> u8 {
        match self {
            OrderType::LongCollateral => 0,
            OrderType::CollateralShort => 1,
            OrderType::CollateralShortUsePremiums => 2,
        }
    }

    pub fn from_u8(raw: u8) -> Result<Self, &'static str> {
        match raw {
            0 => Ok(OrderType::LongCollateral),
            1 => Ok(OrderType::CollateralShort),
            2 => Ok(OrderType::CollateralShortUsePremiums),
            _ => Err("unknown order type"),
        }
    }
}

/// Identity of a range order.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositionKey {
    pub owner: Address,
    pub operator: Address,
    /// Lower tick price (wad, on-lattice)
    pub lower: u128,
    /// Upper tick price (wad, on-lattice)
    pub upper: u128,
    pub order_type: OrderType,
}

/// Mutable fee/claim state of a range order. The order's size lives in
/// the token-balance ledger, keyed by the position's token id.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositionData {
    /// Range fee rate at the last interaction
    pub last_fee_rate: u128,
    /// Fees accrued but not yet claimed (collateral wad)
    pub claimable_fees: u128,
    /// Timestamp of the last deposit, for withdrawal-delay enforcement
    pub last_deposit: u64,
}

impl Default for PositionData {
    fn default() -> Self {
        Self {
            last_fee_rate: 0,
            claimable_fees: 0,
            last_deposit: 0,
        }
    }
}

/// Net collateral/long/short change implied by a position or balance
/// update. Positive values flow toward the pool on deposits and toward
/// the user on withdrawals.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Delta {
    pub collateral: i128,
    pub longs: i128,
    pub shorts: i128,
}

impl Delta {
    pub fn zero() -> Self {
        Self {
            collateral: 0,
            longs: 0,
            shorts: 0,
        }
    }
}

/// Price-independent description of a range order used by the
/// composition math: the tick range, its side, and the pool's
/// settlement parameters.
#[derive(Clone, Copy, Debug)]
pub struct OrderSpec {
    pub lower: u128,
    pub upper: u128,
    pub order_type: OrderType,
    /// Strike price (wad). Scales put collateral.
    pub strike: u128,
    pub is_call: bool,
}
