//! The inspection record collection and its load/save cycle.
//!
//! The whole list is stored as one JSON array under a single key, newest
//! first. Reads never fail: unreadable data means an empty collection.

use anyhow::{Context, Result};
use serde_json::Value;

use crate::models::InspectionRecord;
use crate::storage::KeyValueStore;

const ENABLE_LOGS: bool = true;
use crate::{log_info, log_warn};

/// In-memory copy of the persisted collection.
#[derive(Debug, Clone, Default)]
pub struct RecordBook {
    key: String,
    records: Vec<InspectionRecord>,
}

impl RecordBook {
    pub fn load(store: &dyn KeyValueStore, key: impl Into<String>) -> Self {
        let key = key.into();
        let records = load_records(store, &key);
        Self { key, records }
    }

    pub fn records(&self) -> &[InspectionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&InspectionRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Puts `record` at the front and writes the whole list back. The
    /// in-memory list only changes once the write succeeded.
    pub fn prepend(&mut self, store: &dyn KeyValueStore, record: InspectionRecord) -> Result<()> {
        let mut updated = Vec::with_capacity(self.records.len() + 1);
        updated.push(record);
        updated.extend(self.records.iter().cloned());

        persist_records(store, &self.key, &updated)?;
        self.records = updated;
        log_info!("Saved inspection; collection now holds {}", self.records.len());
        Ok(())
    }
}

/// Reads the collection under `key`. A missing key, a non-array value or
/// invalid JSON all yield an empty list; entries that no longer validate
/// are skipped.
pub fn load_records(store: &dyn KeyValueStore, key: &str) -> Vec<InspectionRecord> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            log_warn!("Could not read records from storage: {err:#}");
            return Vec::new();
        }
    };

    let entries = match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Array(entries)) => entries,
        Ok(_) => {
            log_warn!("Stored records under '{key}' are not a list; starting empty");
            return Vec::new();
        }
        Err(err) => {
            log_warn!("Stored records under '{key}' are not valid JSON ({err}); starting empty");
            return Vec::new();
        }
    };

    let total = entries.len();
    let records: Vec<InspectionRecord> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(record) => Some(record),
            Err(err) => {
                log_warn!("Skipping stored record #{index}: {err}");
                None
            }
        })
        .collect();

    if records.len() != total {
        log_warn!("Loaded {} of {} stored records", records.len(), total);
    }
    records
}

pub fn persist_records(
    store: &dyn KeyValueStore,
    key: &str,
    records: &[InspectionRecord],
) -> Result<()> {
    let serialized = serde_json::to_string(records).context("failed to serialize records")?;
    store
        .set(key, &serialized)
        .with_context(|| format!("failed to persist records under '{key}'"))
}
