use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::ledger;
use crate::matcher;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Opposite side of the book, the one an incoming order sweeps.
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Whether an incoming order with `limit` crosses a resting level at
    /// `level`: a buy crosses levels at or below its limit, a sell crosses
    /// levels at or above it.
    pub fn crosses(self, limit: Price, level: Price) -> bool {
        match self {
            Side::Buy => limit >= level,
            Side::Sell => limit <= level,
        }
    }
}

pub type Price = Decimal;
pub type Quantity = u64;
/// Asset symbol, e.g. "BTC". The quote side of every trade is fixed to
/// [`ledger::QUOTE_CURRENCY`].
pub type Asset = String;

/// An in-flight limit order.
///
/// `quantity` is the remaining (unfilled) size and is decremented in place
/// while the matching sweep runs. A fully consumed order is never stored;
/// a partially consumed one is folded into a price level aggregate and the
/// order value itself is discarded.
#[derive(Debug, Clone)]
pub struct Order {
    pub user_id: ledger::UserId,
    pub side: Side,
    pub quantity: Quantity,
    pub price: Price,
    pub asset: Asset,
}

impl Order {
    pub fn new(
        user_id: ledger::UserId,
        side: Side,
        quantity: Quantity,
        price: Price,
        asset: Asset,
    ) -> Self {
        Order {
            user_id,
            side,
            quantity,
            price,
            asset,
        }
    }

    /// Defensive check applied even when the engine is called directly,
    /// bypassing the API layer's validation.
    pub fn validate(&self) -> Result<(), matcher::Error> {
        if self.quantity == 0 || self.price <= Decimal::ZERO {
            return Err(matcher::Error::InvalidOrder);
        }

        Ok(())
    }

    /// Notional value of the remaining size at the limit price, i.e. the
    /// quote currency amount a buy of this order could cost at most.
    pub fn notional(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

pub mod book;
