use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use super::{Storage, StorageError};
use crate::models::{Nric, Patient};

/// Current on-disk document version.
const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct PatientFile {
    version: u32,
    patients: Vec<Patient>,
}

/// Whole-file JSON store.
///
/// Saves write a sibling temp file and rename it over the target, so a failed
/// save leaves the previous file intact.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Storage for JsonFileStorage {
    fn load(&self) -> Result<BTreeMap<Nric, Patient>, StorageError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "No data file yet, starting empty");
            return Ok(BTreeMap::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        let file: PatientFile = serde_json::from_str(&content)?;
        if file.version > FORMAT_VERSION {
            return Err(StorageError::Corrupted(format!(
                "unsupported format version {} (expected {FORMAT_VERSION} or lower)",
                file.version
            )));
        }

        let mut patients = BTreeMap::new();
        for patient in file.patients {
            let id = patient.id.clone();
            if patients.insert(id.clone(), patient).is_some() {
                return Err(StorageError::Corrupted(format!("duplicate patient {id}")));
            }
        }

        tracing::debug!(count = patients.len(), path = %self.path.display(), "Loaded patients");
        Ok(patients)
    }

    fn save(&mut self, patients: &BTreeMap<Nric, Patient>) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let file = PatientFile {
            version: FORMAT_VERSION,
            patients: patients.values().cloned().collect(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StorageError::Io(e.error))?;

        tracing::info!(count = patients.len(), path = %self.path.display(), "Saved patients");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
