//! Position store persistence port trait.

use crate::domain::error::LedgerError;
use crate::domain::store::PositionStore;

pub trait StorePort {
    /// Load the store. A store that does not exist yet loads as
    /// [`PositionStore::default`]; one that exists but cannot be read is
    /// [`LedgerError::StoreCorrupt`].
    fn load(&self) -> Result<PositionStore, LedgerError>;

    /// Replace the stored state with `store` in one step.
    fn save(&self, store: &PositionStore) -> Result<(), LedgerError>;
}
