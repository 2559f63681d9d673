//! Repository port for Q-table snapshots.

use std::path::Path;

use crate::{
    Result,
    q_learning::QTableSnapshot,
    types::{Action, DriveState},
};

/// Snapshot of the driving agent's table.
pub type DriveSnapshot = QTableSnapshot<DriveState, Action>;

/// Port for saving and loading diagnostic table snapshots.
///
/// # Examples
///
/// ```no_run
/// use smartcab::ports::{DriveSnapshot, SnapshotRepository};
/// use std::path::Path;
///
/// fn save_snapshot<R: SnapshotRepository>(
///     repo: &R,
///     snapshot: &DriveSnapshot,
/// ) -> smartcab::Result<()> {
///     repo.save(snapshot, Path::new("table.msgpack"))
/// }
/// ```
pub trait SnapshotRepository {
    /// # Errors
    ///
    /// Fails if the path cannot be written or serialization fails.
    fn save(&self, snapshot: &DriveSnapshot, path: &Path) -> Result<()>;

    /// # Errors
    ///
    /// Fails if nothing is stored at `path`, the bytes do not decode, or the
    /// snapshot version is not supported.
    fn load(&self, path: &Path) -> Result<DriveSnapshot>;
}
