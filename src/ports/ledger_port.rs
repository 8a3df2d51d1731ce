//! Event ledger port trait.

use crate::domain::error::LedgerError;
use crate::domain::event::Event;
use chrono::NaiveDate;

pub trait LedgerPort {
    /// Append `events` to the partition holding `asof`, skipping any whose
    /// `event_id` is already present. Returns the number of events written.
    fn append(&self, asof: NaiveDate, events: &[Event]) -> Result<usize, LedgerError>;

    /// Every event currently in the partition holding `asof`.
    fn read_partition(&self, asof: NaiveDate) -> Result<Vec<Event>, LedgerError>;
}
