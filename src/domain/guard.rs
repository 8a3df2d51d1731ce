//! Replay guard: an as-of date is applied at most once.
//!
//! This is a logical guard against re-running a date, not a lock. Two
//! processes racing on the same store are not detected.

use chrono::NaiveDate;

use super::store::PositionStore;

#[derive(Debug, Clone, PartialEq)]
pub enum GuardOutcome {
    /// The run may mutate state. `note` is set when the stored last-applied
    /// date could not be read and was ignored.
    Proceed { note: Option<String> },
    /// `asof` is not after the last applied date.
    Skip { last_applied: String },
}

pub fn check(asof: NaiveDate, store: &PositionStore) -> GuardOutcome {
    match store.last_applied() {
        Ok(Some(last)) if asof <= last => GuardOutcome::Skip {
            last_applied: last.format("%Y-%m-%d").to_string(),
        },
        Ok(_) => GuardOutcome::Proceed { note: None },
        Err(raw) => GuardOutcome::Proceed {
            note: Some(format!("Invalid asof_last_applied {raw}; continuing.")),
        },
    }
}
