//! Signal feed port trait.

use crate::domain::error::LedgerError;
use crate::domain::signal::SignalRecord;

pub trait SignalPort {
    /// Every record of the feed, in feed order.
    fn load_signals(&self) -> Result<Vec<SignalRecord>, LedgerError>;
}
