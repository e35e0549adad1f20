//! One side of the book: a price-ordered ladder of aggregate levels.
//!
//! Backed by a `BTreeMap<Price, PriceLevel>` holding at most one entry per
//! distinct price. The matching priority comparator is parameterized by the
//! side tag instead of duplicating a bid and an ask implementation: bids
//! traverse the map descending (best = highest price), asks ascending
//! (best = lowest). All mutations are O(log n) in the number of distinct
//! price levels.

use std::collections::BTreeMap;

use crate::ledger::UserId;
use crate::order::book::LevelSnapshot;
use crate::order::{Price, Quantity, Side};

/// Aggregate resting state at one price.
///
/// The owner is the user whose order first created the level; later orders
/// joining the same price add quantity but do not change it. Settlement
/// therefore attributes the whole aggregate to this representative owner
/// (see the module notes on `matcher`).
#[derive(Debug, Copy, Clone)]
pub struct PriceLevel {
    pub quantity: Quantity,
    pub owner: UserId,
}

/// Copy of a level together with its price, handed out by [`Ladder::best`]
/// so the caller can settle against it without borrowing the ladder.
#[derive(Debug, Copy, Clone)]
pub struct LevelView {
    pub price: Price,
    pub quantity: Quantity,
    pub owner: UserId,
}

#[derive(Debug)]
pub struct Ladder {
    side: Side,
    levels: BTreeMap<Price, PriceLevel>,
}

impl Ladder {
    pub fn new(side: Side) -> Self {
        Ladder {
            side,
            levels: BTreeMap::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Best level in matching priority order: highest price for bids,
    /// lowest for asks.
    pub fn best(&self) -> Option<LevelView> {
        let (price, level) = match self.side {
            Side::Buy => self.levels.last_key_value()?,
            Side::Sell => self.levels.first_key_value()?,
        };

        Some(LevelView {
            price: *price,
            quantity: level.quantity,
            owner: level.owner,
        })
    }

    /// Add `quantity` at `price`, creating the level if absent. An existing
    /// level keeps its original owner. The aggregate saturates at
    /// `u64::MAX`; the matcher rejects any order that would overflow a
    /// resting level before it reaches the book, so saturation is a
    /// backstop, never a silent wrap.
    pub fn upsert(&mut self, price: Price, quantity: Quantity, owner: UserId) {
        self.levels
            .entry(price)
            .and_modify(|level| level.quantity = level.quantity.saturating_add(quantity))
            .or_insert(PriceLevel { quantity, owner });
    }

    /// Resting quantity at `price`, if a level exists there.
    pub fn quantity_at(&self, price: Price) -> Option<Quantity> {
        self.levels.get(&price).map(|level| level.quantity)
    }

    /// Consume `quantity` from the level at `price`, removing the level when
    /// it reaches zero. Quantities beyond what rests at the level are
    /// ignored; the matching sweep only ever consumes up to the level size.
    pub fn consume(&mut self, price: Price, quantity: Quantity) {
        if let Some(level) = self.levels.get_mut(&price) {
            debug_assert!(quantity <= level.quantity);
            level.quantity = level.quantity.saturating_sub(quantity);
            if level.quantity == 0 {
                self.levels.remove(&price);
            }
        }
    }

    /// Drop the level at `price` entirely, returning it if present.
    pub fn remove(&mut self, price: Price) -> Option<PriceLevel> {
        self.levels.remove(&price)
    }

    /// Levels in matching priority order.
    pub fn iter_best_first(&self) -> Box<dyn Iterator<Item = LevelView> + '_> {
        let levels = self.levels.iter().map(|(price, level)| LevelView {
            price: *price,
            quantity: level.quantity,
            owner: level.owner,
        });

        match self.side {
            Side::Buy => Box::new(levels.rev()),
            Side::Sell => Box::new(levels),
        }
    }

    /// Depth rows in matching priority order.
    pub fn snapshot(&self) -> Vec<LevelSnapshot> {
        self.iter_best_first()
            .map(|l| LevelSnapshot {
                price: l.price,
                quantity: l.quantity,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn uid() -> UserId {
        Uuid::new_v4()
    }

    #[test]
    fn bids_order_descending_asks_ascending() {
        let owner = uid();
        let mut bids = Ladder::new(Side::Buy);
        let mut asks = Ladder::new(Side::Sell);
        for price in [dec!(10), dec!(30), dec!(20)] {
            bids.upsert(price, 1, owner);
            asks.upsert(price, 1, owner);
        }

        let bid_prices: Vec<_> = bids.iter_best_first().map(|l| l.price).collect();
        let ask_prices: Vec<_> = asks.iter_best_first().map(|l| l.price).collect();
        assert_eq!(bid_prices, vec![dec!(30), dec!(20), dec!(10)]);
        assert_eq!(ask_prices, vec![dec!(10), dec!(20), dec!(30)]);

        assert_eq!(bids.best().unwrap().price, dec!(30));
        assert_eq!(asks.best().unwrap().price, dec!(10));
    }

    #[test]
    fn upsert_aggregates_and_keeps_first_owner() {
        let first = uid();
        let second = uid();
        let mut ladder = Ladder::new(Side::Buy);
        ladder.upsert(dec!(100), 5, first);
        ladder.upsert(dec!(100), 7, second);

        assert_eq!(ladder.len(), 1, "same price must stay a single level");
        let best = ladder.best().unwrap();
        assert_eq!(best.quantity, 12);
        assert_eq!(best.owner, first, "owner is frozen at level creation");
    }

    #[test]
    fn upsert_saturates_instead_of_wrapping() {
        let owner = uid();
        let mut ladder = Ladder::new(Side::Sell);
        ladder.upsert(dec!(100), u64::MAX, owner);
        ladder.upsert(dec!(100), 1, owner);

        assert_eq!(ladder.len(), 1);
        assert_eq!(
            ladder.best().unwrap().quantity,
            u64::MAX,
            "aggregate must saturate, not wrap to a tiny value"
        );
    }

    #[test]
    fn consume_decrements_and_removes_empty_levels() {
        let owner = uid();
        let mut ladder = Ladder::new(Side::Sell);
        ladder.upsert(dec!(100), 10, owner);

        ladder.consume(dec!(100), 4);
        assert_eq!(ladder.best().unwrap().quantity, 6);

        ladder.consume(dec!(100), 6);
        assert!(ladder.is_empty(), "fully consumed level must be removed");
    }

    #[test]
    fn no_duplicate_prices_and_strict_ordering_after_mixed_mutations() {
        let owner = uid();
        let mut ladder = Ladder::new(Side::Buy);
        for price in [dec!(5), dec!(1), dec!(3), dec!(1), dec!(5), dec!(4)] {
            ladder.upsert(price, 2, owner);
        }
        ladder.consume(dec!(4), 2);

        let prices: Vec<_> = ladder.iter_best_first().map(|l| l.price).collect();
        let mut deduped = prices.clone();
        deduped.dedup();
        assert_eq!(prices, deduped, "no duplicate price levels");
        assert!(
            prices.windows(2).all(|w| w[0] > w[1]),
            "bid prices must be strictly descending, got {prices:?}"
        );
    }
}
