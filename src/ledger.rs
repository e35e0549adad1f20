//! User directory and balance ledger.
//!
//! Holds every registered user together with a balance map keyed by asset
//! symbol. The engine settles trades here via [`Ledger::swap_assets`];
//! because counterparties were resolved when their orders entered the
//! system, settlement itself cannot fail and stays atomic with the book
//! mutation it accompanies.
//!
//! Balances are non-negative by policy, enforced by the pre-trade check in
//! the matcher, not here: `debit` deliberately lets a balance go negative
//! so a mid-sweep settlement can never abort half-applied. Under the
//! representative-owner aggregation (see `order::book::ladder`) the owner
//! of a topped-up level can be debited past its own contribution; that is
//! the documented attribution gap of the aggregate book, not a ledger bug.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::order::{Asset, Price, Quantity};

/// Symbol of the quote currency every trade settles against.
pub const QUOTE_CURRENCY: &str = "USD";

pub type UserId = Uuid;

#[derive(Error, Debug)]
pub enum Error {
    #[error("user {0} is not registered")]
    UserNotFound(UserId),
}

/// A registered account and its holdings.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct User {
    #[schema(value_type = String)]
    pub id: UserId,
    #[schema(value_type = Object)]
    pub balances: HashMap<Asset, Decimal>,
}

impl User {
    fn new() -> Self {
        User {
            id: Uuid::new_v4(),
            balances: HashMap::new(),
        }
    }

    pub fn balance_of(&self, asset: &str) -> Decimal {
        self.balances.get(asset).copied().unwrap_or(Decimal::ZERO)
    }
}

#[derive(Debug, Default)]
pub struct Ledger {
    users: HashMap<UserId, User>,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger::default()
    }

    /// Create a fresh user with empty balances and return a copy of it.
    pub fn register(&mut self) -> User {
        let user = User::new();
        self.users.insert(user.id, user.clone());
        user
    }

    /// Resolve a user id to its account.
    pub fn resolve(&self, id: UserId) -> Result<&User, Error> {
        self.users.get(&id).ok_or(Error::UserNotFound(id))
    }

    /// Every registered account with its balances.
    pub fn users(&self) -> Vec<User> {
        self.users.values().cloned().collect()
    }

    pub fn balance_of(&self, id: UserId, asset: &str) -> Result<Decimal, Error> {
        Ok(self.resolve(id)?.balance_of(asset))
    }

    pub fn credit(&mut self, id: UserId, asset: &str, amount: Decimal) -> Result<(), Error> {
        let user = self.users.get_mut(&id).ok_or(Error::UserNotFound(id))?;
        *user.balances.entry(asset.to_string()).or_default() += amount;

        Ok(())
    }

    pub fn debit(&mut self, id: UserId, asset: &str, amount: Decimal) -> Result<(), Error> {
        self.credit(id, asset, -amount)
    }

    /// Settle one trade of `quantity` units of `asset` at `price`: the buyer
    /// pays `price * quantity` in quote currency and receives the asset, the
    /// seller the reverse. Both users must already be registered.
    pub fn swap_assets(
        &mut self,
        buyer: UserId,
        seller: UserId,
        asset: &str,
        price: Price,
        quantity: Quantity,
    ) -> Result<(), Error> {
        // Fail before touching anything if either side is unknown.
        self.resolve(buyer)?;
        self.resolve(seller)?;

        let notional = price * Decimal::from(quantity);
        let size = Decimal::from(quantity);

        self.debit(buyer, QUOTE_CURRENCY, notional)?;
        self.credit(seller, QUOTE_CURRENCY, notional)?;
        self.credit(buyer, asset, size)?;
        self.debit(seller, asset, size)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn register_and_resolve() {
        let mut ledger = Ledger::new();
        let user = ledger.register();

        assert!(ledger.resolve(user.id).is_ok());
        assert!(matches!(
            ledger.resolve(Uuid::new_v4()),
            Err(Error::UserNotFound(_))
        ));
    }

    #[test]
    fn users_lists_every_registered_account() {
        let mut ledger = Ledger::new();
        let a = ledger.register().id;
        let b = ledger.register().id;

        let ids: Vec<_> = ledger.users().iter().map(|u| u.id).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&a) && ids.contains(&b));
    }

    #[test]
    fn credit_and_debit_adjust_balances() {
        let mut ledger = Ledger::new();
        let id = ledger.register().id;

        ledger.credit(id, "BTC", dec!(2.5)).unwrap();
        ledger.credit(id, "BTC", dec!(0.5)).unwrap();
        ledger.debit(id, "BTC", dec!(1)).unwrap();

        assert_eq!(ledger.balance_of(id, "BTC").unwrap(), dec!(2));
        assert_eq!(ledger.balance_of(id, QUOTE_CURRENCY).unwrap(), dec!(0));
    }

    #[test]
    fn swap_assets_conserves_totals() {
        let mut ledger = Ledger::new();
        let buyer = ledger.register().id;
        let seller = ledger.register().id;
        ledger.credit(buyer, QUOTE_CURRENCY, dec!(1000)).unwrap();
        ledger.credit(seller, "BTC", dec!(10)).unwrap();

        ledger
            .swap_assets(buyer, seller, "BTC", dec!(50), 4)
            .unwrap();

        assert_eq!(ledger.balance_of(buyer, QUOTE_CURRENCY).unwrap(), dec!(800));
        assert_eq!(ledger.balance_of(buyer, "BTC").unwrap(), dec!(4));
        assert_eq!(
            ledger.balance_of(seller, QUOTE_CURRENCY).unwrap(),
            dec!(200)
        );
        assert_eq!(ledger.balance_of(seller, "BTC").unwrap(), dec!(6));

        // Closed system: totals across both parties are unchanged.
        let usd_total = ledger.balance_of(buyer, QUOTE_CURRENCY).unwrap()
            + ledger.balance_of(seller, QUOTE_CURRENCY).unwrap();
        let btc_total =
            ledger.balance_of(buyer, "BTC").unwrap() + ledger.balance_of(seller, "BTC").unwrap();
        assert_eq!(usd_total, dec!(1000));
        assert_eq!(btc_total, dec!(10));
    }

    #[test]
    fn swap_assets_requires_both_parties() {
        let mut ledger = Ledger::new();
        let buyer = ledger.register().id;

        let res = ledger.swap_assets(buyer, Uuid::new_v4(), "BTC", dec!(1), 1);
        assert!(matches!(res, Err(Error::UserNotFound(_))));
        assert_eq!(
            ledger.balance_of(buyer, QUOTE_CURRENCY).unwrap(),
            dec!(0),
            "failed swap must not move any balance"
        );
    }
}
