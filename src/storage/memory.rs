//! In-memory snapshot slot

use std::sync::Mutex;
use tracing::{error, warn};

use super::{Snapshot, SnapshotStorage};

/// Holds the serialized snapshot string in memory; nothing survives the process
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with raw slot contents, which need not be valid JSON
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
        }
    }

    /// Current raw slot contents
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl SnapshotStorage for MemoryStorage {
    fn load(&self) -> Snapshot {
        let Some(raw) = self.raw() else {
            return Snapshot::default();
        };
        Snapshot::from_json(&raw).unwrap_or_else(|e| {
            warn!("Error loading state from memory slot: {}", e);
            Snapshot::default()
        })
    }

    fn save(&self, snapshot: &Snapshot) {
        let json = match snapshot.to_json() {
            Ok(json) => json,
            Err(e) => {
                error!("Error saving state to memory slot: {}", e);
                return;
            }
        };
        match self.slot.lock() {
            Ok(mut slot) => *slot = Some(json),
            Err(e) => error!("Failed to lock memory slot: {}", e),
        }
    }
}
