//! Error types shared by the store and the coordinator

use thiserror::Error;

/// Failures reading or writing the persisted records
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read/write state file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode/decode state records: {0}")]
    Json(#[from] serde_json::Error),

    #[error("State lock poisoned: {0}")]
    Poisoned(String),
}

/// Failures surfaced by coordinator operations
#[derive(Error, Debug)]
pub enum CoordinatorError {
    #[error("Failed to lock coordinator state: {0}")]
    Poisoned(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T, E = CoordinatorError> = std::result::Result<T, E>;
