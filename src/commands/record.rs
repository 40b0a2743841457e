//! Record-level commands on the loaded patient: `record` and `retrieve`.

use super::{parse_date, parse_date_or_today, CommandError, ParsedCommand};
use crate::core_state::CoreState;
use crate::models::RecordFields;

/// Long and short argument keys for each record field.
const SYMPTOM_KEYS: [&str; 2] = ["symptom", "s"];
const DIAGNOSIS_KEYS: [&str; 2] = ["diagnosis", "d"];
const PRESCRIPTION_KEYS: [&str; 2] = ["prescription", "p"];

/// First non-blank value among `keys`.
fn field(command: &ParsedCommand, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| command.get(k))
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

/// Adds or merges a record on the payload date (today when omitted) and saves.
pub fn record(state: &mut CoreState, command: &ParsedCommand) -> Result<String, CommandError> {
    let date = parse_date_or_today(command.payload())?;
    let fields = RecordFields {
        symptom: field(command, &SYMPTOM_KEYS),
        diagnosis: field(command, &DIAGNOSIS_KEYS),
        prescription: field(command, &PRESCRIPTION_KEYS),
    };
    if fields.is_empty() {
        return Err(CommandError::EmptyDescription);
    }

    let recent = state.registry_mut().current_add_record(date, fields)?;
    let id = state.registry().current_id()?.clone();
    tracing::info!(patient = %id, %date, "Record added");
    state.persist()?;

    Ok(format!(
        "Added new record to patient {id} on {}:\n{}",
        recent.date,
        recent.describe()
    ))
}

/// Shows every record of the loaded patient, or only the one on the payload date.
pub fn retrieve(state: &CoreState, command: &ParsedCommand) -> Result<String, CommandError> {
    let date = match command.payload().trim() {
        "" => None,
        raw => Some(parse_date(raw)?),
    };
    let registry = state.registry();
    let id = registry.current_id()?;
    let records = registry.current_records(date.as_ref())?;

    if records.is_empty() {
        return Ok(format!("Patient {id} has no records yet."));
    }
    let mut out = format!("Here are {id}'s records:");
    for record in records {
        out.push('\n');
        out.push_str(&record.to_string());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{parse, CommandOutput};
    use crate::db::SqliteStorage;
    use crate::registry::RegistryError;

    fn loaded_state() -> CoreState {
        let mut s = CoreState::load(Box::new(SqliteStorage::in_memory().unwrap())).unwrap();
        run(&mut s, "add S1234567D").unwrap();
        run(&mut s, "load S1234567D").unwrap();
        s
    }

    fn run(state: &mut CoreState, line: &str) -> Result<String, CommandError> {
        match crate::commands::execute(state, &parse(line)?)? {
            CommandOutput::Message(m) => Ok(m),
            CommandOutput::Exit => panic!("unexpected exit"),
        }
    }

    #[test]
    fn record_without_loaded_patient() {
        let mut s = CoreState::load(Box::new(SqliteStorage::in_memory().unwrap())).unwrap();
        run(&mut s, "add S1234567D").unwrap();
        assert!(matches!(
            run(&mut s, "record 2024-01-01 /symptom coughing"),
            Err(CommandError::Registry(RegistryError::NoSelection))
        ));
        assert!(matches!(
            run(&mut s, "retrieve"),
            Err(CommandError::Registry(RegistryError::NoSelection))
        ));
    }

    #[test]
    fn record_echoes_supplied_fields() {
        let mut s = loaded_state();
        let out = run(&mut s, "record 2024-01-01 /s coughing /p cough syrup").unwrap();
        assert_eq!(
            out,
            "Added new record to patient S1234567D on 2024-01-01:\nSymptom: coughing\nPrescription: cough syrup"
        );
        assert_eq!(s.registry().current().unwrap().record_count(), 1);
    }

    #[test]
    fn record_requires_a_field() {
        let mut s = loaded_state();
        assert!(matches!(
            run(&mut s, "record 2024-01-01"),
            Err(CommandError::EmptyDescription)
        ));
        assert!(matches!(
            run(&mut s, "record 2024-01-01 /symptom   "),
            Err(CommandError::EmptyDescription)
        ));
    }

    #[test]
    fn record_rejects_bad_date() {
        let mut s = loaded_state();
        assert!(matches!(
            run(&mut s, "record coughing /symptom coughing"),
            Err(CommandError::InvalidDate(_))
        ));
    }

    #[test]
    fn record_defaults_to_today() {
        let mut s = loaded_state();
        run(&mut s, "record /diagnosis flu").unwrap();
        let today = chrono::Local::now().date_naive();
        assert!(s.registry().current().unwrap().has_record(&today));
    }

    #[test]
    fn same_date_merges_fields() {
        let mut s = loaded_state();
        run(&mut s, "record 01/01/2024 /symptom cough").unwrap();
        let second = run(&mut s, "record 2024-01-01 /diagnosis flu").unwrap();
        assert!(!second.contains("cough"));

        assert_eq!(
            run(&mut s, "retrieve").unwrap(),
            "Here are S1234567D's records:\n2024-01-01:\n  Symptom: cough\n  Diagnosis: flu"
        );
    }

    #[test]
    fn retrieve_all_or_one_date() {
        let mut s = loaded_state();
        assert_eq!(run(&mut s, "retrieve").unwrap(), "Patient S1234567D has no records yet.");

        run(&mut s, "record 2024-02-01 /symptom rash").unwrap();
        run(&mut s, "record 2024-01-01 /symptom cough").unwrap();

        let all = run(&mut s, "retrieve").unwrap();
        assert!(all.find("2024-01-01").unwrap() < all.find("2024-02-01").unwrap());

        let one = run(&mut s, "retrieve 01-02-2024").unwrap();
        assert!(one.contains("rash"));
        assert!(!one.contains("cough"));

        assert!(matches!(
            run(&mut s, "retrieve 2024-03-01"),
            Err(CommandError::Registry(RegistryError::RecordNotFound(_)))
        ));
    }
}
