//! The matching engine: sweep, settle, rest.
//!
//! [`Matcher`] owns the book and the ledger and is the only place either is
//! mutated. A submitted order sweeps the opposite side of the book in price
//! priority, settling every consumed quantity through the ledger at the
//! resting level's price (maker price), and any remainder is folded into
//! the order's own side. Ledger settlement and book mutation happen
//! back-to-back inside the same synchronous call, so a caller holding the
//! matcher exclusively (see [`crate::seq::Sequencer`]) observes them as one
//! atomic step.
//!
//! Balance sufficiency is checked once, against the full requested size,
//! before the sweep starts; it is not re-validated per partial fill. Fills
//! against an aggregate level settle with the level's representative owner
//! for the whole consumed quantity.

use thiserror::Error;
use time::OffsetDateTime;
use tracing::debug;

use crate::ledger::{self, Ledger, User, QUOTE_CURRENCY};
use crate::order::book::{Book, BookSnapshot, TopOfBook};
use crate::order::{Asset, Order, Price, Side};
use crate::trade::{FillOutcome, Trade};
use rust_decimal::Decimal;

#[derive(Error, Debug)]
pub enum Error {
    /// Non-positive price or quantity. Rejected before any state change.
    #[error("order price and quantity must be positive")]
    InvalidOrder,
    /// The order's owner (or a deposit/query target) is not registered.
    #[error("user {0} is not registered")]
    UserNotFound(ledger::UserId),
    /// The owner cannot cover the full requested size.
    #[error("insufficient {0} balance for the requested size")]
    InsufficientBalance(Asset),
}

impl From<ledger::Error> for Error {
    fn from(value: ledger::Error) -> Self {
        match value {
            ledger::Error::UserNotFound(id) => Error::UserNotFound(id),
        }
    }
}

/// Single-pair matching engine over an order book and a balance ledger.
#[derive(Debug, Default)]
pub struct Matcher {
    book: Book,
    ledger: Ledger,
}

impl Matcher {
    pub fn new() -> Self {
        Matcher {
            book: Book::new(),
            ledger: Ledger::new(),
        }
    }

    /// Submit a limit order: validate, pre-check balance, sweep the opposite
    /// side best-first, and rest any unfilled remainder.
    pub fn submit_order(&mut self, order: Order) -> Result<FillOutcome, Error> {
        order.validate()?;
        self.ledger.resolve(order.user_id)?;
        self.check_balance(&order)?;

        // Resting can only add to the order's own side, which the sweep
        // never touches, so checking the aggregate bound up front covers
        // the whole submission.
        if let Some(resting) = self.book.side(order.side).quantity_at(order.price) {
            if resting.checked_add(order.quantity).is_none() {
                return Err(Error::InvalidOrder);
            }
        }

        let requested = order.quantity;
        let mut order = order;
        let mut fills = Vec::new();

        while order.quantity > 0 {
            let Some(best) = self.book.side(order.side.opposite()).best() else {
                break;
            };
            // Greedy price-priority sweep: the first non-crossing level ends
            // it, no deeper level can cross either.
            if !order.side.crosses(order.price, best.price) {
                break;
            }

            let quantity = order.quantity.min(best.quantity);
            let (buyer, seller) = match order.side {
                Side::Buy => (order.user_id, best.owner),
                Side::Sell => (best.owner, order.user_id),
            };
            self.ledger
                .swap_assets(buyer, seller, &order.asset, best.price, quantity)?;
            self.book
                .side_mut(order.side.opposite())
                .consume(best.price, quantity);
            order.quantity -= quantity;

            debug!(
                side = ?order.side,
                price = %best.price,
                quantity,
                "filled against resting level"
            );
            fills.push(Trade {
                counterparty: best.owner,
                price: best.price,
                quantity,
                timestamp: OffsetDateTime::now_utc(),
            });
        }

        if order.quantity > 0 {
            self.book
                .side_mut(order.side)
                .upsert(order.price, order.quantity, order.user_id);
        }

        Ok(FillOutcome {
            consumed: requested - order.quantity,
            remaining: order.quantity,
            fills,
        })
    }

    /// Pre-trade check of the full requested size: a buy must cover the
    /// notional in quote currency, a sell must hold the asset.
    fn check_balance(&self, order: &Order) -> Result<(), Error> {
        match order.side {
            Side::Buy => {
                if self.ledger.balance_of(order.user_id, QUOTE_CURRENCY)? < order.notional() {
                    return Err(Error::InsufficientBalance(QUOTE_CURRENCY.to_string()));
                }
            }
            Side::Sell => {
                let held = self.ledger.balance_of(order.user_id, &order.asset)?;
                if held < Decimal::from(order.quantity) {
                    return Err(Error::InsufficientBalance(order.asset.clone()));
                }
            }
        }

        Ok(())
    }

    pub fn snapshot(&self) -> BookSnapshot {
        self.book.snapshot()
    }

    pub fn top_of_book(&self) -> TopOfBook {
        self.book.top()
    }

    pub fn register_user(&mut self) -> User {
        self.ledger.register()
    }

    pub fn users(&self) -> Vec<User> {
        self.ledger.users()
    }

    /// Credit `amount` of `asset` to a user, returning the updated account.
    pub fn deposit(
        &mut self,
        id: ledger::UserId,
        asset: &str,
        amount: Price,
    ) -> Result<User, Error> {
        self.ledger.credit(id, asset, amount)?;
        Ok(self.ledger.resolve(id)?.clone())
    }

    pub fn balances(&self, id: ledger::UserId) -> Result<User, Error> {
        Ok(self.ledger.resolve(id)?.clone())
    }

    #[cfg(test)]
    fn balance(&self, id: ledger::UserId, asset: &str) -> Decimal {
        self.ledger.balance_of(id, asset).unwrap()
    }
}
