//! Application state: the patient registry plus the storage it is saved to.
//!
//! Command handlers mutate the registry and then call `persist`. A failed save
//! is returned to the caller; the in-memory change stays in place.

use crate::db::{Storage, StorageError};
use crate::registry::PatientRegistry;

pub struct CoreState {
    registry: PatientRegistry,
    storage: Box<dyn Storage>,
}

impl CoreState {
    /// Load every patient from `storage`. Nothing is selected afterwards.
    pub fn load(storage: Box<dyn Storage>) -> Result<Self, StorageError> {
        let patients = storage.load()?;
        tracing::info!(
            count = patients.len(),
            location = %storage.location(),
            "Patient data loaded"
        );
        Ok(Self {
            registry: PatientRegistry::from_patients(patients),
            storage,
        })
    }

    pub fn registry(&self) -> &PatientRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut PatientRegistry {
        &mut self.registry
    }

    /// Write the full patient set back to storage.
    pub fn persist(&mut self) -> Result<(), StorageError> {
        self.storage.save(self.registry.patients()).map_err(|e| {
            tracing::error!(error = %e, location = %self.storage.location(), "Save failed");
            e
        })
    }

    pub fn storage_location(&self) -> String {
        self.storage.location()
    }
}
