//! Configuration validation.
//!
//! Runs before any state file is opened so that a bad configuration never
//! reaches the store or ledger.

use crate::domain::error::LedgerError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_positions_config(config: &dyn ConfigPort) -> Result<(), LedgerError> {
    validate_default_qty_entry(config)?;
    validate_strict_entry(config)?;
    Ok(())
}

fn validate_default_qty_entry(config: &dyn ConfigPort) -> Result<(), LedgerError> {
    match config.get_int("positions", "default_qty") {
        None => Ok(()),
        Some(Ok(qty)) => validate_default_qty(qty),
        Some(Err(raw)) => Err(LedgerError::ConfigInvalid {
            section: "positions".to_string(),
            key: "default_qty".to_string(),
            reason: format!("{raw:?} is not an integer"),
        }),
    }
}

fn validate_strict_entry(config: &dyn ConfigPort) -> Result<(), LedgerError> {
    match config.get_bool("positions", "strict") {
        Some(Err(raw)) => Err(LedgerError::ConfigInvalid {
            section: "positions".to_string(),
            key: "strict".to_string(),
            reason: format!("{raw:?} is not a boolean"),
        }),
        _ => Ok(()),
    }
}

pub fn validate_default_qty(qty: i64) -> Result<(), LedgerError> {
    if qty <= 0 {
        return Err(LedgerError::ConfigInvalid {
            section: "positions".to_string(),
            key: "default_qty".to_string(),
            reason: "default_qty must be positive".to_string(),
        });
    }
    Ok(())
}

/// Parse a run's as-of date. Only `YYYY-MM-DD` is accepted.
pub fn parse_asof(raw: &str) -> Result<NaiveDate, LedgerError> {
    let trimmed = raw.trim();
    let well_formed = trimmed.len() == 10 && trimmed.as_bytes()[4] == b'-';
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .filter(|_| well_formed)
        .ok_or_else(|| LedgerError::ConfigInvalid {
            section: "run".to_string(),
            key: "asof".to_string(),
            reason: format!("invalid date {raw:?} (expected YYYY-MM-DD)"),
        })
}
