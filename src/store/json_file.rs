//! JSON file backed store

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{StateStore, StoredRecords};
use crate::error::StoreError;

/// Keeps both records in one pretty-printed JSON object on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Option<Map<String, Value>>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(map) => Ok(Some(map)),
            other => {
                warn!("State file {} does not hold an object ({}), ignoring it", self.path.display(), other);
                Ok(Some(Map::new()))
            }
        }
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<Option<StoredRecords>, StoreError> {
        Ok(self.read_map()?.map(|map| StoredRecords::from_map(&map)))
    }

    fn save_record(&self, name: &str, record: Value) -> Result<(), StoreError> {
        // an unreadable file is overwritten rather than blocking every save
        let mut map = self.read_map().unwrap_or_else(|e| {
            warn!("Replacing unreadable state file {}: {}", self.path.display(), e);
            None
        }).unwrap_or_default();
        map.insert(name.to_string(), record);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&Value::Object(map))?)?;
        fs::rename(&tmp, &self.path)?;

        debug!("Saved {} to {}", name, self.path.display());
        Ok(())
    }
}
