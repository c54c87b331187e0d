//! Durable snapshot storage
//!
//! The whole timer collection is written to a single named slot as JSON of the
//! shape `{ "timers": [...] }`. Storage is best-effort: loading degrades to an
//! empty snapshot and failed writes are logged and dropped.

pub mod json_file;
pub mod memory;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::Timer;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;

/// Serialized form of the full timer collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timers: Vec<Timer>,
}

impl Snapshot {
    /// Decode a slot's contents
    pub fn from_json(raw: &str) -> Result<Self, StorageError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Encode for writing into a slot
    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage slot is unavailable: {0}")]
    Unavailable(String),
}

/// A durable key-value slot holding one snapshot
pub trait SnapshotStorage: Send + Sync {
    /// Last persisted snapshot, or an empty one when missing or unreadable
    fn load(&self) -> Snapshot;

    /// Persist `snapshot`, logging and swallowing any failure
    fn save(&self, snapshot: &Snapshot);
}
