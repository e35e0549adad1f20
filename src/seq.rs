//! Exclusive admission in front of the matcher.
//!
//! Every caller-visible operation passes through [`Sequencer`], which admits
//! exactly one at a time: a submission's sweep, its ledger settlement, and
//! its resting upsert all happen under one admission, and a snapshot
//! admitted afterwards observes all of its effects. The critical section is
//! deliberately coarse (one mutex over the whole matcher): the market is a
//! single asset pair and a sweep is short, bounded, and never suspends, so
//! finer-grained locking buys nothing here.
//!
//! Admission is released on every path, including failures, by the guard's
//! RAII drop.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::ledger::{self, User};
use crate::matcher::{Error, Matcher};
use crate::order::book::{BookSnapshot, TopOfBook};
use crate::order::{Order, Price};
use crate::trade::FillOutcome;

/// Cloneable, thread-safe handle to the engine.
#[derive(Clone, Default)]
pub struct Sequencer {
    inner: Arc<Mutex<Matcher>>,
}

impl Sequencer {
    pub fn new(matcher: Matcher) -> Self {
        Sequencer {
            inner: Arc::new(Mutex::new(matcher)),
        }
    }

    // The matcher never unwinds between ledger and book mutation in
    // non-test code, so a poisoned lock still guards a consistent engine.
    fn admit(&self) -> MutexGuard<'_, Matcher> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn submit_order(&self, order: Order) -> Result<FillOutcome, Error> {
        self.admit().submit_order(order)
    }

    pub fn snapshot(&self) -> BookSnapshot {
        self.admit().snapshot()
    }

    pub fn top_of_book(&self) -> TopOfBook {
        self.admit().top_of_book()
    }

    pub fn register_user(&self) -> User {
        self.admit().register_user()
    }

    pub fn users(&self) -> Vec<User> {
        self.admit().users()
    }

    pub fn deposit(&self, id: ledger::UserId, asset: &str, amount: Price) -> Result<User, Error> {
        self.admit().deposit(id, asset, amount)
    }

    pub fn balances(&self, id: ledger::UserId) -> Result<User, Error> {
        self.admit().balances(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::QUOTE_CURRENCY;
    use crate::order::Side;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::thread;

    const ASSET: &str = "ETH";

    fn funded_user(seq: &Sequencer, usd: Decimal, asset: Decimal) -> ledger::UserId {
        let id = seq.register_user().id;
        seq.deposit(id, QUOTE_CURRENCY, usd).unwrap();
        seq.deposit(id, ASSET, asset).unwrap();
        id
    }

    #[test]
    fn operations_serialize_and_preserve_book_invariants() {
        let seq = Sequencer::new(Matcher::new());
        let users: Vec<_> = (0..8)
            .map(|_| funded_user(&seq, dec!(1000000), dec!(10000)))
            .collect();

        // Each thread hammers the engine with crossing buys and sells at a
        // small set of prices so sweeps and rests interleave heavily.
        let handles: Vec<_> = users
            .iter()
            .enumerate()
            .map(|(i, &user)| {
                let seq = seq.clone();
                thread::spawn(move || {
                    for round in 0..50u64 {
                        let side = if (i as u64 + round) % 2 == 0 {
                            Side::Buy
                        } else {
                            Side::Sell
                        };
                        let price = Decimal::from(98 + (round % 5));
                        let order =
                            Order::new(user, side, 1 + round % 3, price, ASSET.to_string());
                        seq.submit_order(order).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        // No crossed book once everything is admitted and completed.
        let top = seq.top_of_book();
        if let (Some(bid), Some(ask)) = (top.best_bid, top.best_ask) {
            assert!(bid.price < ask.price, "crossed: {bid:?} vs {ask:?}");
        }

        // Sides stay strictly ordered with one entry per price.
        let snap = seq.snapshot();
        assert!(snap.bids.windows(2).all(|w| w[0].price > w[1].price));
        assert!(snap.asks.windows(2).all(|w| w[0].price < w[1].price));

        // Closed system: every settlement moved value between users only.
        let usd_total: Decimal = users
            .iter()
            .map(|&u| seq.balances(u).unwrap().balance_of(QUOTE_CURRENCY))
            .sum();
        let asset_total: Decimal = users
            .iter()
            .map(|&u| seq.balances(u).unwrap().balance_of(ASSET))
            .sum();
        assert_eq!(usd_total, dec!(1000000) * Decimal::from(users.len() as u64));
        assert_eq!(asset_total, dec!(10000) * Decimal::from(users.len() as u64));
    }

    #[test]
    fn snapshot_after_submit_reflects_it() {
        let seq = Sequencer::new(Matcher::new());
        let user = funded_user(&seq, dec!(1000), dec!(10));

        seq.submit_order(Order::new(user, Side::Buy, 2, dec!(42), ASSET.to_string()))
            .unwrap();

        let snap = seq.snapshot();
        assert_eq!(snap.bids.len(), 1);
        assert_eq!(snap.bids[0].price, dec!(42));
        assert_eq!(snap.bids[0].quantity, 2);
    }

    #[test]
    fn failed_submission_releases_admission() {
        let seq = Sequencer::new(Matcher::new());
        let user = funded_user(&seq, dec!(0), dec!(0));

        let res = seq.submit_order(Order::new(user, Side::Buy, 1, dec!(1), ASSET.to_string()));
        assert!(res.is_err());

        // A follow-up operation must still be admitted.
        assert!(seq.snapshot().bids.is_empty());
    }
}
