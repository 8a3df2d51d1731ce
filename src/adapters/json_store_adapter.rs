//! JSON file position store.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::atomic_file::write_json_atomic;
use crate::domain::error::LedgerError;
use crate::domain::store::PositionStore;
use crate::ports::store_port::StorePort;

pub struct JsonStoreAdapter {
    path: PathBuf,
}

impl JsonStoreAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn corrupt(&self, reason: impl ToString) -> LedgerError {
        LedgerError::StoreCorrupt {
            path: self.path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

impl StorePort for JsonStoreAdapter {
    fn load(&self) -> Result<PositionStore, LedgerError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(PositionStore::default()),
            Err(e) => return Err(self.corrupt(e)),
        };
        serde_json::from_str(&content).map_err(|e| self.corrupt(e))
    }

    fn save(&self, store: &PositionStore) -> Result<(), LedgerError> {
        write_json_atomic(&self.path, store)
    }
}
