//! Reconciliation domain: types, rules and the run orchestration.

pub mod signal;
pub mod position;
pub mod store;
pub mod event;
pub mod summary;
pub mod deriver;
pub mod transition;
pub mod guard;
pub mod reconcile;
pub mod config_validation;
pub mod error;
