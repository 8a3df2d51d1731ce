//! tradeledger: applies daily trading signals to a durable position store
//! and an append-only event ledger, once per as-of date.
//!
//! Hexagonal layout: reconciliation logic in [`domain`], port traits in
//! [`ports`], file-backed implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
