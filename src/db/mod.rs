//! Persistence gateway. The registry is always saved and loaded whole.

pub mod json_file;
pub mod sqlite;

pub use json_file::JsonFileStorage;
pub use sqlite::SqliteStorage;

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;

use crate::models::{Nric, Patient};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Corrupted data file: {0}")]
    Corrupted(String),

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },
}

/// Durable home of the patient set.
pub trait Storage {
    /// Read every patient. A store that does not exist yet loads as empty.
    fn load(&self) -> Result<BTreeMap<Nric, Patient>, StorageError>;

    /// Replace the stored patient set with `patients`.
    fn save(&mut self, patients: &BTreeMap<Nric, Patient>) -> Result<(), StorageError>;

    /// Human-readable location, for logs and the startup banner.
    fn location(&self) -> String;
}

/// Open the backend matching the file extension: `.db`/`.sqlite` use SQLite,
/// everything else is a JSON document.
pub fn open_storage(path: &Path) -> Result<Box<dyn Storage>, StorageError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("db") | Some("sqlite") | Some("sqlite3") => {
            Ok(Box::new(SqliteStorage::open(path)?))
        }
        _ => Ok(Box::new(JsonFileStorage::new(path))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_selects_backend() {
        let dir = tempfile::tempdir().unwrap();

        let json = open_storage(&dir.path().join("patients.json")).unwrap();
        assert!(json.location().ends_with("patients.json"));

        let sqlite = open_storage(&dir.path().join("patients.db")).unwrap();
        assert!(sqlite.location().ends_with("patients.db"));
        assert!(dir.path().join("patients.db").exists());
    }

    #[test]
    fn both_backends_load_empty_when_new() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["fresh.json", "fresh.sqlite"] {
            let storage = open_storage(&dir.path().join(name)).unwrap();
            assert!(storage.load().unwrap().is_empty(), "{name}");
        }
    }
}
