//! File-backed implementations of the ports.

pub mod atomic_file;
pub mod file_config_adapter;
pub mod json_store_adapter;
pub mod jsonl_ledger_adapter;
pub mod jsonl_signal_adapter;
pub mod summary_file_adapter;
