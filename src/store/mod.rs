//! Persistent store module
//!
//! Two named records are kept: `pomodoroState` and `waterIntake`. Records are
//! loaded as raw JSON so the state types can repair whatever they find.

pub mod json_file;
pub mod memory;

use serde_json::Value;

use crate::{
    error::StoreError,
    state::{TimerState, WaterState},
};

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// Record name of the pomodoro timer
pub const POMODORO_RECORD: &str = "pomodoroState";
/// Record name of the water counter
pub const WATER_RECORD: &str = "waterIntake";

/// Raw records as found in the store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredRecords {
    pub pomodoro: Option<Value>,
    pub water: Option<Value>,
}

impl StoredRecords {
    pub(crate) fn from_map(map: &serde_json::Map<String, Value>) -> Self {
        Self {
            pomodoro: map.get(POMODORO_RECORD).cloned(),
            water: map.get(WATER_RECORD).cloned(),
        }
    }
}

/// Durable key-value storage for the coordinator's records
pub trait StateStore: Send + Sync {
    /// Load both records. `Ok(None)` means nothing was ever persisted.
    fn load(&self) -> Result<Option<StoredRecords>, StoreError>;

    /// Replace one named record, leaving the other untouched
    fn save_record(&self, name: &str, record: Value) -> Result<(), StoreError>;

    fn save_timer(&self, state: &TimerState) -> Result<(), StoreError> {
        self.save_record(POMODORO_RECORD, serde_json::to_value(state)?)
    }

    fn save_water(&self, state: &WaterState) -> Result<(), StoreError> {
        self.save_record(WATER_RECORD, serde_json::to_value(state)?)
    }
}
