//! Patient-level commands: `add`, `load`, `unload`, `current`, `list`, `delete`.

use super::{parse_date, CommandError, ParsedCommand};
use crate::core_state::CoreState;
use crate::models::Nric;

pub const PATIENT_KEY: &str = "patient";
pub const RECORD_KEY: &str = "record";

/// Validates the NRIC in the payload, adds the patient and saves.
pub fn add(state: &mut CoreState, command: &ParsedCommand) -> Result<String, CommandError> {
    let id = Nric::parse(command.payload())?;
    state.registry_mut().add(id.clone())?;
    tracing::info!(patient = %id, "Patient added");
    state.persist()?;
    Ok(format!("Patient {id} has been added!"))
}

/// Selects the patient that record commands operate on.
pub fn load(state: &mut CoreState, command: &ParsedCommand) -> Result<String, CommandError> {
    let id = Nric::parse(command.payload())?;
    state.registry_mut().select(&id)?;
    tracing::debug!(patient = %id, "Patient loaded");
    Ok(format!("Patient {id}'s data has been found and loaded."))
}

pub fn unload(state: &mut CoreState) -> String {
    match state.registry_mut().clear_selection() {
        Some(id) => format!("Patient {id} has been unloaded."),
        None => "No patient was loaded.".to_string(),
    }
}

pub fn current(state: &CoreState) -> Result<String, CommandError> {
    let id = state.registry().current_id()?;
    Ok(format!("The currently loaded patient's ID is {id}."))
}

pub fn list(state: &CoreState) -> String {
    let registry = state.registry();
    if registry.is_empty() {
        return "There are no patients yet.".to_string();
    }
    let mut out = format!("Here are the {} patient(s):", registry.len());
    for (i, patient) in registry.iter().enumerate() {
        out.push_str(&format!(
            "\n{}. {} ({} record(s))",
            i + 1,
            patient.id,
            patient.record_count()
        ));
    }
    out
}

/// `delete /patient <NRIC>` removes a patient; `delete /record <date>` removes
/// one of the loaded patient's records. Either way the registry is saved.
pub fn delete(state: &mut CoreState, command: &ParsedCommand) -> Result<String, CommandError> {
    let message = if let Some(raw) = command.get(PATIENT_KEY) {
        let id = Nric::parse(raw)?;
        state.registry_mut().remove(&id)?;
        tracing::info!(patient = %id, "Patient deleted");
        format!("Patient {id} has been deleted!")
    } else if let Some(raw) = command.get(RECORD_KEY) {
        let date = parse_date(raw)?;
        state.registry_mut().current_delete_record(&date)?;
        tracing::info!(%date, "Record deleted");
        format!("Record for {date} has been deleted!")
    } else {
        return Err(CommandError::UnknownDeleteArgument);
    };

    state.persist()?;
    Ok(message)
}
