//! In-memory snapshot repository for testing.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex},
};

use crate::{
    Result,
    error::Error,
    ports::{DriveSnapshot, SnapshotRepository},
};

/// In-memory repository for testing.
///
/// Stores MessagePack bytes in a shared map keyed by path, so the encode
/// path is exercised without touching the file system. Clones share storage.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of snapshots currently stored.
    pub fn count(&self) -> usize {
        self.storage.lock().unwrap().len()
    }

    pub fn contains(&self, path: &Path) -> bool {
        let key = path.to_string_lossy().to_string();
        self.storage.lock().unwrap().contains_key(&key)
    }
}

impl SnapshotRepository for InMemoryRepository {
    fn save(&self, snapshot: &DriveSnapshot, path: &Path) -> Result<()> {
        let key = path.to_string_lossy().to_string();

        let bytes = rmp_serde::to_vec(snapshot).map_err(|e| Error::SerializationContext {
            operation: "serialize snapshot for in-memory storage".to_string(),
            message: e.to_string(),
        })?;

        self.storage.lock().unwrap().insert(key, bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<DriveSnapshot> {
        let key = path.to_string_lossy().to_string();
        let storage = self.storage.lock().unwrap();

        let bytes = storage.get(&key).ok_or_else(|| Error::Io {
            operation: format!("load snapshot from in-memory storage at {path:?}"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "key not found in memory"),
        })?;

        let snapshot: DriveSnapshot =
            rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
                operation: "deserialize snapshot from in-memory storage".to_string(),
                message: e.to_string(),
            })?;
        snapshot.check_version()?;
        Ok(snapshot)
    }
}
