//! INI file configuration adapter.
//!
//! Recognised layout:
//!
//! ```ini
//! [paths]
//! signals = out/daily.jsonl
//! positions = data/state/positions.json
//! ledger_dir = data/state/ledger
//! events_out = out/events.json
//!
//! [positions]
//! default_qty = 200
//! strict = false
//! run_url = https://ci.example/run/1
//! ```

use crate::domain::error::LedgerError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LedgerError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config.load(path).map_err(|reason| LedgerError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" | "on" => Some(true),
            "false" | "no" | "0" | "off" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config
            .get(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn get_int(&self, section: &str, key: &str) -> Option<Result<i64, String>> {
        self.get_string(section, key)
            .map(|raw| raw.parse::<i64>().map_err(|_| raw))
    }

    fn get_bool(&self, section: &str, key: &str) -> Option<Result<bool, String>> {
        self.get_string(section, key)
            .map(|raw| Self::parse_bool(&raw).ok_or(raw))
    }
}
