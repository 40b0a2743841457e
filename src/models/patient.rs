use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::identifier::Nric;
use super::record::{RecentEntry, Record, RecordFields};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("No record found on {0}")]
pub struct RecordNotFound(pub NaiveDate);

/// A patient and their visit history, one record per date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: Nric,
    #[serde(default, with = "records_as_list")]
    records: BTreeMap<NaiveDate, Record>,
}

impl Patient {
    pub fn new(id: Nric) -> Self {
        Self {
            id,
            records: BTreeMap::new(),
        }
    }

    /// Create the record for `date` if needed, then merge in the supplied fields.
    pub fn add_or_update(&mut self, date: NaiveDate, fields: RecordFields) -> RecentEntry {
        let record = self
            .records
            .entry(date)
            .or_insert_with(|| Record::new(date));
        record.merge(&fields);
        RecentEntry { date, fields }
    }

    pub fn has_record(&self, date: &NaiveDate) -> bool {
        self.records.contains_key(date)
    }

    pub fn record(&self, date: &NaiveDate) -> Option<&Record> {
        self.records.get(date)
    }

    pub fn delete_record(&mut self, date: &NaiveDate) -> Result<Record, RecordNotFound> {
        self.records.remove(date).ok_or(RecordNotFound(*date))
    }

    /// All records, oldest first.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

/// Records are stored as a date-ordered list; the date key is rebuilt on load.
mod records_as_list {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::models::record::Record;

    pub fn serialize<S>(records: &BTreeMap<NaiveDate, Record>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(records.values())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<NaiveDate, Record>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let list = Vec::<Record>::deserialize(deserializer)?;
        Ok(list.into_iter().map(|r| (r.date, r)).collect())
    }
}
