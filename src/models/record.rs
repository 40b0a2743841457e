use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One consultation, keyed by its visit date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symptom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prescription: Option<String>,
}

impl Record {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            symptom: None,
            diagnosis: None,
            prescription: None,
        }
    }

    /// Overwrite every field present in `fields`, leaving the rest untouched.
    pub fn merge(&mut self, fields: &RecordFields) {
        if let Some(ref symptom) = fields.symptom {
            self.symptom = Some(symptom.clone());
        }
        if let Some(ref diagnosis) = fields.diagnosis {
            self.diagnosis = Some(diagnosis.clone());
        }
        if let Some(ref prescription) = fields.prescription {
            self.prescription = Some(prescription.clone());
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.date)?;
        for line in field_lines(&self.symptom, &self.diagnosis, &self.prescription) {
            write!(f, "\n  {line}")?;
        }
        Ok(())
    }
}

/// Fields supplied by a single `record` command. `None` means "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFields {
    pub symptom: Option<String>,
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
}

impl RecordFields {
    pub fn is_empty(&self) -> bool {
        self.symptom.is_none() && self.diagnosis.is_none() && self.prescription.is_none()
    }
}

/// Snapshot of what the latest `add_or_update` call wrote, for confirmation output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentEntry {
    pub date: NaiveDate,
    pub fields: RecordFields,
}

impl RecentEntry {
    /// One line per supplied field, in the order symptom, diagnosis, prescription.
    pub fn describe(&self) -> String {
        field_lines(&self.fields.symptom, &self.fields.diagnosis, &self.fields.prescription)
            .join("\n")
    }
}

fn field_lines(
    symptom: &Option<String>,
    diagnosis: &Option<String>,
    prescription: &Option<String>,
) -> Vec<String> {
    let mut lines = Vec::with_capacity(3);
    if let Some(s) = symptom {
        lines.push(format!("Symptom: {s}"));
    }
    if let Some(d) = diagnosis {
        lines.push(format!("Diagnosis: {d}"));
    }
    if let Some(p) = prescription {
        lines.push(format!("Prescription: {p}"));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn merge_keeps_unrelated_fields() {
        let mut record = Record::new(date("2024-01-01"));
        record.merge(&RecordFields {
            symptom: Some("cough".into()),
            diagnosis: Some("flu".into()),
            prescription: None,
        });
        record.merge(&RecordFields {
            symptom: None,
            diagnosis: None,
            prescription: Some("rest".into()),
        });

        assert_eq!(record.symptom.as_deref(), Some("cough"));
        assert_eq!(record.diagnosis.as_deref(), Some("flu"));
        assert_eq!(record.prescription.as_deref(), Some("rest"));
    }

    #[test]
    fn merge_overwrites_resupplied_field() {
        let mut record = Record::new(date("2024-01-01"));
        record.merge(&RecordFields {
            symptom: Some("cough".into()),
            ..Default::default()
        });
        record.merge(&RecordFields {
            symptom: Some("fever".into()),
            ..Default::default()
        });
        assert_eq!(record.symptom.as_deref(), Some("fever"));
    }

    #[test]
    fn describe_omits_missing_fields() {
        let entry = RecentEntry {
            date: date("2024-03-05"),
            fields: RecordFields {
                symptom: None,
                diagnosis: Some("migraine".into()),
                prescription: Some("paracetamol".into()),
            },
        };
        assert_eq!(entry.describe(), "Diagnosis: migraine\nPrescription: paracetamol");
    }

    #[test]
    fn display_lists_fields_under_date() {
        let mut record = Record::new(date("2024-01-01"));
        record.merge(&RecordFields {
            symptom: Some("cough".into()),
            prescription: Some("rest".into()),
            ..Default::default()
        });
        assert_eq!(
            record.to_string(),
            "2024-01-01:\n  Symptom: cough\n  Prescription: rest"
        );
    }

    #[test]
    fn empty_fields_detected() {
        assert!(RecordFields::default().is_empty());
        assert!(!RecordFields {
            diagnosis: Some(String::new()),
            ..Default::default()
        }
        .is_empty());
    }
}
