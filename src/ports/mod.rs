//! Port traits: the seams between the reconciliation domain and storage.

pub mod config_port;
pub mod ledger_port;
pub mod signal_port;
pub mod store_port;
pub mod summary_port;
