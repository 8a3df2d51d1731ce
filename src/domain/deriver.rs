//! Normalises a signal record into entry/exit decisions.
//!
//! Precedence per record:
//! 1. `metrics.close` must be present; otherwise strict fails and lenient
//!    skips the record.
//! 2. Entry: `signal_entry`, else (lenient) `regime_ok && setup_ok && entry_ok`.
//! 3. Exit: `exit`, else (lenient) `false`.
//! 4. Reference levels are passed through unvalidated.
//!
//! Lenient gaps become notes on the [`Derivation`]; strict gaps become a
//! [`LedgerError::MissingField`].

use super::error::LedgerError;
use super::signal::SignalRecord;

/// The normalised view of one record the transition engine works from.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub ticker: String,
    pub close: f64,
    pub entry_level: Option<f64>,
    pub exit_level: Option<f64>,
    pub entry_signal: bool,
    pub exit_signal: bool,
}

/// Outcome of a non-fatal derivation. `decision` is `None` when the record
/// was skipped; `notes` explains any skipped or inferred field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Derivation {
    pub decision: Option<Decision>,
    pub notes: Vec<String>,
}

impl Derivation {
    fn skipped(note: String) -> Self {
        Derivation {
            decision: None,
            notes: vec![note],
        }
    }
}

pub fn derive(record: &SignalRecord, strict: bool) -> Result<Derivation, LedgerError> {
    let Some(ticker) = record.ticker() else {
        if strict {
            return Err(LedgerError::missing_field("<unknown>", "ticker"));
        }
        return Ok(Derivation::skipped(
            "ticker missing in record; skipped".to_string(),
        ));
    };

    let Some(close) = record.metrics.close else {
        if strict {
            return Err(LedgerError::missing_field(ticker, "metrics.close"));
        }
        return Ok(Derivation::skipped(format!(
            "metrics.close missing; skipping events for {ticker}"
        )));
    };

    let mut notes = Vec::new();
    let entry_signal = entry_flag(record, ticker, strict, &mut notes)?;
    let exit_signal = exit_flag(record, ticker, strict, &mut notes)?;

    Ok(Derivation {
        decision: Some(Decision {
            ticker: ticker.to_string(),
            close,
            entry_level: record.metrics.prev20_high,
            exit_level: record.metrics.prev10_low,
            entry_signal,
            exit_signal,
        }),
        notes,
    })
}

fn entry_flag(
    record: &SignalRecord,
    ticker: &str,
    strict: bool,
    notes: &mut Vec<String>,
) -> Result<bool, LedgerError> {
    if let Some(flag) = record.signal_entry {
        return Ok(flag);
    }
    if strict {
        return Err(LedgerError::missing_field(ticker, "signal_entry"));
    }
    let inferred = record.regime_ok.unwrap_or(false)
        && record.setup_ok.unwrap_or(false)
        && record.entry_ok.unwrap_or(false);
    if inferred {
        notes.push(format!(
            "signal_entry inferred by regime/setup/entry for {ticker}"
        ));
    } else {
        notes.push(format!(
            "signal_entry missing; regime/setup/entry fallback false for {ticker}"
        ));
    }
    Ok(inferred)
}

fn exit_flag(
    record: &SignalRecord,
    ticker: &str,
    strict: bool,
    notes: &mut Vec<String>,
) -> Result<bool, LedgerError> {
    if let Some(flag) = record.exit {
        return Ok(flag);
    }
    if strict {
        return Err(LedgerError::missing_field(ticker, "exit"));
    }
    notes.push(format!("exit missing; treated as False for {ticker}"));
    Ok(false)
}
