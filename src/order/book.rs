//! Order book types shared across the engine.
//!
//! The book holds two [`ladder::Ladder`]s, one per side, each keeping at
//! most one aggregate entry per distinct price. Snapshot rows are ordered
//! best-first (bids descending, asks ascending).

pub mod ladder;

use serde::Serialize;
use utoipa::ToSchema;

use crate::order::{Price, Quantity, Side};
use ladder::Ladder;

/// Aggregated resting quantity at a single price level, as reported to
/// callers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LevelSnapshot {
    /// Price level.
    #[schema(value_type = String)]
    pub price: Price,
    /// Total resting quantity at this price.
    pub quantity: Quantity,
}

/// Full-depth projection of both sides of the book, best prices first.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookSnapshot {
    /// Bids in descending price order.
    pub bids: Vec<LevelSnapshot>,
    /// Asks in ascending price order.
    pub asks: Vec<LevelSnapshot>,
}

/// Best price level of each side, if present.
#[derive(Debug, Copy, Clone, Serialize, ToSchema)]
pub struct TopOfBook {
    pub best_bid: Option<LevelSnapshot>,
    pub best_ask: Option<LevelSnapshot>,
}

/// The two price-ordered sides of a single-pair market.
#[derive(Debug)]
pub struct Book {
    bids: Ladder,
    asks: Ladder,
}

impl Default for Book {
    fn default() -> Self {
        Book::new()
    }
}

impl Book {
    pub fn new() -> Self {
        Book {
            bids: Ladder::new(Side::Buy),
            asks: Ladder::new(Side::Sell),
        }
    }

    /// The ladder holding resting orders of `side`.
    pub fn side(&self, side: Side) -> &Ladder {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut Ladder {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    pub fn snapshot(&self) -> BookSnapshot {
        BookSnapshot {
            bids: self.bids.snapshot(),
            asks: self.asks.snapshot(),
        }
    }

    pub fn top(&self) -> TopOfBook {
        TopOfBook {
            best_bid: self.bids.best().map(|l| LevelSnapshot {
                price: l.price,
                quantity: l.quantity,
            }),
            best_ask: self.asks.best().map(|l| LevelSnapshot {
                price: l.price,
                quantity: l.quantity,
            }),
        }
    }
}
