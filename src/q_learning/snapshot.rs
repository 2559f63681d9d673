//! Diagnostic dump format for Q-tables.
//!
//! Snapshots exist for inspection and for carrying a table between runs by
//! hand. The layout is versioned but carries no compatibility guarantee.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One (state, action, value) row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QEntry<S, A> {
    pub state: S,
    pub action: A,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QTableSnapshot<S, A> {
    pub version: u32,
    pub entries: Vec<QEntry<S, A>>,
}

impl<S, A> QTableSnapshot<S, A> {
    pub const VERSION: u32 = 1;

    pub fn new(entries: Vec<QEntry<S, A>>) -> Self {
        Self {
            version: Self::VERSION,
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reject snapshots written by a different layout.
    pub fn check_version(&self) -> Result<()> {
        if self.version != Self::VERSION {
            return Err(Error::UnsupportedSnapshotVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }
        Ok(())
    }
}

impl<S: Serialize, A: Serialize> QTableSnapshot<S, A> {
    /// Write the snapshot as pretty JSON.
    pub fn save_json<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}
