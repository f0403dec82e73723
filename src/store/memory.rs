//! In-memory store
//!
//! Backs `--ephemeral` runs and embedded coordinators that own persistence
//! themselves.

use std::sync::Mutex;

use serde_json::{Map, Value};

use super::{StateStore, StoredRecords};
use crate::error::StoreError;

/// Store that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Option<Map<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from previously persisted records
    pub fn with_records(records: Map<String, Value>) -> Self {
        Self {
            records: Mutex::new(Some(records)),
        }
    }

    /// Current value of one record
    pub fn record(&self, name: &str) -> Option<Value> {
        self.records
            .lock()
            .ok()
            .and_then(|records| records.as_ref().and_then(|map| map.get(name).cloned()))
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<StoredRecords>, StoreError> {
        let records = self.records.lock().map_err(|e| StoreError::Poisoned(e.to_string()))?;
        Ok(records.as_ref().map(StoredRecords::from_map))
    }

    fn save_record(&self, name: &str, record: Value) -> Result<(), StoreError> {
        let mut records = self.records.lock().map_err(|e| StoreError::Poisoned(e.to_string()))?;
        records.get_or_insert_with(Map::new).insert(name.to_string(), record);
        Ok(())
    }
}
