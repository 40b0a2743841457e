use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use tracing;

use super::{Storage, StorageError};
use crate::models::{Nric, Patient, RecordFields};

/// Open a SQLite connection to the given path and run migrations
pub fn open_database(path: &Path) -> Result<Connection, StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(path)?;
    configure_pragmas(&conn)?;
    run_migrations(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (for testing)
pub fn open_memory_database() -> Result<Connection, StorageError> {
    let conn = Connection::open_in_memory()?;
    configure_pragmas(&conn)?;
    run_migrations(&conn)?;
    Ok(conn)
}

fn configure_pragmas(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "PRAGMA journal_mode=DELETE;
         PRAGMA foreign_keys=ON;",
    )?;
    Ok(())
}

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<(), StorageError> {
    let current_version = get_current_version(conn);

    let migrations: Vec<(i64, &str)> =
        vec![(1, include_str!("../../resources/migrations/001_initial.sql"))];

    for (version, sql) in migrations {
        if version > current_version {
            tracing::info!("Running migration v{version}");
            conn.execute_batch(sql).map_err(|e| StorageError::MigrationFailed {
                version,
                reason: e.to_string(),
            })?;
        }
    }

    Ok(())
}

/// Get the current schema version (0 if no schema exists yet)
fn get_current_version(conn: &Connection) -> i64 {
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get::<_, i64>(0)
    })
    .unwrap_or(0)
}

/// SQLite-backed store. Each save replaces every row inside one transaction.
pub struct SqliteStorage {
    conn: Connection,
    location: String,
}

impl SqliteStorage {
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        Ok(Self {
            conn: open_database(path)?,
            location: path.display().to_string(),
        })
    }

    pub fn in_memory() -> Result<Self, StorageError> {
        Ok(Self {
            conn: open_memory_database()?,
            location: ":memory:".into(),
        })
    }
}

impl Storage for SqliteStorage {
    fn load(&self) -> Result<BTreeMap<Nric, Patient>, StorageError> {
        let mut patients = BTreeMap::new();

        let mut stmt = self.conn.prepare("SELECT id FROM patients ORDER BY id")?;
        let ids = stmt.query_map([], |row| row.get::<_, String>(0))?;
        for raw in ids {
            let raw = raw?;
            let id = Nric::parse(&raw)
                .map_err(|e| StorageError::Corrupted(e.to_string()))?;
            patients.insert(id.clone(), Patient::new(id));
        }

        let mut stmt = self.conn.prepare(
            "SELECT patient_id, visit_date, symptom, diagnosis, prescription
             FROM records ORDER BY patient_id, visit_date",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, Option<String>>(4)?,
            ))
        })?;

        for row in rows {
            let (patient_id, visit_date, symptom, diagnosis, prescription) = row?;
            let id = Nric::parse(&patient_id)
                .map_err(|e| StorageError::Corrupted(e.to_string()))?;
            let date = NaiveDate::parse_from_str(&visit_date, "%Y-%m-%d").map_err(|e| {
                StorageError::Corrupted(format!("bad visit date {visit_date}: {e}"))
            })?;
            let patient = patients.get_mut(&id).ok_or_else(|| {
                StorageError::Corrupted(format!("record for unknown patient {id}"))
            })?;
            patient.add_or_update(
                date,
                RecordFields {
                    symptom,
                    diagnosis,
                    prescription,
                },
            );
        }

        tracing::debug!(count = patients.len(), location = %self.location, "Loaded patients");
        Ok(patients)
    }

    fn save(&mut self, patients: &BTreeMap<Nric, Patient>) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM records", [])?;
        tx.execute("DELETE FROM patients", [])?;
        {
            let mut insert_patient = tx.prepare("INSERT INTO patients (id) VALUES (?1)")?;
            let mut insert_record = tx.prepare(
                "INSERT INTO records (patient_id, visit_date, symptom, diagnosis, prescription)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for patient in patients.values() {
                insert_patient.execute(params![patient.id.as_str()])?;
                for record in patient.records() {
                    insert_record.execute(params![
                        patient.id.as_str(),
                        record.date.to_string(),
                        record.symptom,
                        record.diagnosis,
                        record.prescription,
                    ])?;
                }
            }
        }
        tx.commit()?;

        tracing::info!(count = patients.len(), location = %self.location, "Saved patients");
        Ok(())
    }

    fn location(&self) -> String {
        self.location.clone()
    }
}
