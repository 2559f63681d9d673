//! MessagePack implementation of the snapshot repository.

use std::{fs::File, path::Path};

use crate::{
    Result,
    error::Error,
    ports::{DriveSnapshot, SnapshotRepository},
};

/// MessagePack-based snapshot repository.
///
/// # Examples
///
/// ```no_run
/// use smartcab::adapters::MsgPackRepository;
/// use smartcab::ports::{DriveSnapshot, SnapshotRepository};
/// use std::path::Path;
///
/// let repo = MsgPackRepository::new();
/// repo.save(&DriveSnapshot::new(Vec::new()), Path::new("table.msgpack"))?;
/// let loaded = repo.load(Path::new("table.msgpack"))?;
/// assert!(loaded.is_empty());
/// # Ok::<(), smartcab::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    pub fn new() -> Self {
        Self
    }
}

impl SnapshotRepository for MsgPackRepository {
    fn save(&self, snapshot: &DriveSnapshot, path: &Path) -> Result<()> {
        let mut file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;

        rmp_serde::encode::write(&mut file, snapshot).map_err(|e| {
            Error::SerializationContext {
                operation: "serialize snapshot to MessagePack".to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(())
    }

    fn load(&self, path: &Path) -> Result<DriveSnapshot> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;

        let snapshot: DriveSnapshot =
            rmp_serde::decode::from_read(&file).map_err(|e| Error::SerializationContext {
                operation: "deserialize snapshot from MessagePack".to_string(),
                message: e.to_string(),
            })?;
        snapshot.check_version()?;

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::{
        q_learning::QEntry,
        types::{Action, DriveState, Light},
    };

    fn sample() -> DriveSnapshot {
        DriveSnapshot::new(vec![QEntry {
            state: DriveState {
                light: Light::Green,
                oncoming: None,
                left: Some(Action::Forward),
                waypoint: Some(Action::Left),
            },
            action: Action::Left,
            value: 2.0,
        }])
    }

    #[test]
    fn test_msgpack_save_then_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("table.msgpack");

        let repo = MsgPackRepository::new();
        repo.save(&sample(), &file_path).expect("Failed to save");
        let loaded = repo.load(&file_path).expect("Failed to load");

        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_load_nonexistent_returns_error() {
        let repo = MsgPackRepository::new();
        let result = repo.load(Path::new("/tmp/nonexistent_smartcab_12345.msgpack"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_rejects_other_versions() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("old.msgpack");
        let mut snapshot = sample();
        snapshot.version = 0;

        let repo = MsgPackRepository::new();
        repo.save(&snapshot, &file_path).unwrap();
        assert!(matches!(
            repo.load(&file_path),
            Err(Error::UnsupportedSnapshotVersion { found: 0, .. })
        ));
    }
}
