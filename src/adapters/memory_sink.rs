//! In-memory diagnostic sink for tests.

use std::sync::{Arc, Mutex};

use crate::{Result, ports::DiagnosticSink};

/// Collects lines in memory. Clones share the same buffer, so a test can
/// hand one clone to a learner and read through the other.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.lines.lock().unwrap().clear();
    }
}

impl DiagnosticSink for MemorySink {
    fn append_line(&mut self, line: &str) -> Result<()> {
        self.lines.lock().unwrap().push(line.to_string());
        Ok(())
    }
}
