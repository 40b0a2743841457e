//! Patient registry with a single "current patient" cursor.
//!
//! Record operations always target the selected patient. The cursor is an
//! identifier, not a reference, so it can never point at a removed patient:
//! `remove` refuses the selected one.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{Nric, Patient, RecentEntry, Record, RecordFields, RecordNotFound};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Patient {0} already exists")]
    AlreadyExists(Nric),

    #[error("Patient {0} not found")]
    PatientNotFound(Nric),

    #[error("No patient loaded")]
    NoSelection,

    #[error("Patient {0} is currently loaded and cannot be deleted")]
    IsCurrentlySelected(Nric),

    #[error(transparent)]
    RecordNotFound(#[from] RecordNotFound),
}

#[derive(Debug, Default)]
pub struct PatientRegistry {
    patients: BTreeMap<Nric, Patient>,
    current: Option<Nric>,
}

impl PatientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a previously loaded patient set. Nothing is selected.
    pub fn from_patients(patients: BTreeMap<Nric, Patient>) -> Self {
        Self {
            patients,
            current: None,
        }
    }

    pub fn patients(&self) -> &BTreeMap<Nric, Patient> {
        &self.patients
    }

    /// Patients in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Patient> {
        self.patients.values()
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    pub fn contains(&self, id: &Nric) -> bool {
        self.patients.contains_key(id)
    }

    pub fn add(&mut self, id: Nric) -> Result<(), RegistryError> {
        if self.patients.contains_key(&id) {
            return Err(RegistryError::AlreadyExists(id));
        }
        self.patients.insert(id.clone(), Patient::new(id));
        Ok(())
    }

    pub fn remove(&mut self, id: &Nric) -> Result<Patient, RegistryError> {
        if !self.patients.contains_key(id) {
            return Err(RegistryError::PatientNotFound(id.clone()));
        }
        if self.current.as_ref() == Some(id) {
            return Err(RegistryError::IsCurrentlySelected(id.clone()));
        }
        self.patients
            .remove(id)
            .ok_or_else(|| RegistryError::PatientNotFound(id.clone()))
    }

    pub fn select(&mut self, id: &Nric) -> Result<(), RegistryError> {
        if !self.patients.contains_key(id) {
            return Err(RegistryError::PatientNotFound(id.clone()));
        }
        self.current = Some(id.clone());
        Ok(())
    }

    /// Drop the selection. Returns the identifier that was selected, if any.
    pub fn clear_selection(&mut self) -> Option<Nric> {
        self.current.take()
    }

    pub fn current_id(&self) -> Result<&Nric, RegistryError> {
        self.current.as_ref().ok_or(RegistryError::NoSelection)
    }

    pub fn current(&self) -> Result<&Patient, RegistryError> {
        let id = self.current_id()?;
        self.patients
            .get(id)
            .ok_or_else(|| RegistryError::PatientNotFound(id.clone()))
    }

    fn current_mut(&mut self) -> Result<&mut Patient, RegistryError> {
        let id = self.current.as_ref().ok_or(RegistryError::NoSelection)?;
        self.patients
            .get_mut(id)
            .ok_or_else(|| RegistryError::PatientNotFound(id.clone()))
    }

    pub fn current_add_record(
        &mut self,
        date: NaiveDate,
        fields: RecordFields,
    ) -> Result<RecentEntry, RegistryError> {
        Ok(self.current_mut()?.add_or_update(date, fields))
    }

    pub fn current_delete_record(&mut self, date: &NaiveDate) -> Result<Record, RegistryError> {
        Ok(self.current_mut()?.delete_record(date)?)
    }

    /// Records of the selected patient, either all of them or the one on `date`.
    pub fn current_records(&self, date: Option<&NaiveDate>) -> Result<Vec<&Record>, RegistryError> {
        let patient = self.current()?;
        match date {
            None => Ok(patient.records().collect()),
            Some(d) => patient
                .record(d)
                .map(|r| vec![r])
                .ok_or_else(|| RecordNotFound(*d).into()),
        }
    }
}
