//! File-backed snapshot slot

use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};
use tracing::{debug, error, warn};

use super::{Snapshot, SnapshotStorage, StorageError};

/// Stores the snapshot in a single JSON file, replaced atomically on save
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the slot; `Ok(None)` when nothing has been written yet
    pub fn try_load(&self) -> Result<Option<Snapshot>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Snapshot::from_json(&raw).map(Some)
    }

    /// Write the slot via temp file + fsync + rename
    pub fn try_save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let json = snapshot.to_json()?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| StorageError::Unavailable(format!("{} has no file name", self.path.display())))?;
        let mut temp_name = file_name.to_os_string();
        temp_name.push(format!(".tmp.{}", std::process::id()));
        let temp_path = self.path.with_file_name(temp_name);

        let mut file = fs::File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        drop(file);

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        Ok(())
    }
}

impl SnapshotStorage for JsonFileStorage {
    fn load(&self) -> Snapshot {
        match self.try_load() {
            Ok(Some(snapshot)) => {
                debug!("Loaded {} timers from {}", snapshot.timers.len(), self.path.display());
                snapshot
            }
            Ok(None) => {
                debug!("No snapshot at {}, starting empty", self.path.display());
                Snapshot::default()
            }
            Err(e) => {
                warn!("Error loading state from {}: {}", self.path.display(), e);
                Snapshot::default()
            }
        }
    }

    fn save(&self, snapshot: &Snapshot) {
        if let Err(e) = self.try_save(snapshot) {
            error!("Error saving state to {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{NewTimer, TimerStore};
    use tempfile::TempDir;

    fn sample_snapshot() -> Snapshot {
        let mut store = TimerStore::new();
        store.add(NewTimer::idle("Tea", "green", 300));
        store.add(NewTimer::idle("Eggs", "", 420));
        store.snapshot()
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(temp_dir.path().join("timerState.json"));

        assert_eq!(storage.load(), Snapshot::default());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("timerState.json");
        fs::write(&path, "{not json").unwrap();

        let storage = JsonFileStorage::new(&path);

        assert!(storage.try_load().is_err());
        assert_eq!(storage.load(), Snapshot::default());
    }

    #[test]
    fn test_save_then_load_reproduces_collection() {
        let temp_dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(temp_dir.path().join("nested/dir/timerState.json"));
        let snapshot = sample_snapshot();

        storage.save(&snapshot);
        let loaded = storage.load();
        assert_eq!(loaded, snapshot);

        storage.save(&loaded);
        assert_eq!(storage.load(), snapshot);
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(temp_dir.path().join("timerState.json"));

        storage.save(&sample_snapshot());

        let names: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("timerState.json")]);
    }

    #[test]
    fn test_written_layout() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("timerState.json");
        let storage = JsonFileStorage::new(&path);
        storage.save(&sample_snapshot());

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let first = &value["timers"][0];
        assert_eq!(first["title"], "Tea");
        assert_eq!(first["remainingTime"], 300);
        assert_eq!(first["isRunning"], false);
        assert!(first["id"].is_string());
        assert!(first["createdAt"].is_i64());
    }

    #[test]
    fn test_failed_save_is_swallowed() {
        let temp_dir = TempDir::new().unwrap();
        // A directory in the slot's place makes the rename fail
        let path = temp_dir.path().join("timerState.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let storage = JsonFileStorage::new(&path);
        assert!(storage.try_save(&sample_snapshot()).is_err());
        storage.save(&sample_snapshot());
    }
}
