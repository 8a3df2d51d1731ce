//! Run summary output port trait.

use crate::domain::error::LedgerError;
use crate::domain::summary::RunSummary;

pub trait SummaryPort {
    fn write(&self, summary: &RunSummary) -> Result<(), LedgerError>;
}
