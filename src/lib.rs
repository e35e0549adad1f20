#![deny(clippy::all)]

pub mod api;
pub mod config;
pub mod ledger;
pub mod matcher;
pub mod order;
pub mod trade;

pub mod seq;
