//! Diagnostic sink port - where run parameters and table dumps go.

use crate::Result;

/// Line-oriented text sink for human-readable diagnostics.
///
/// A learner writes its parameter banner once when a sink is attached and
/// dumps its table only when asked to. Nothing written here is a stable
/// format.
///
/// # Examples
///
/// ```
/// use smartcab::{adapters::MemorySink, ports::DiagnosticSink};
///
/// let mut sink = MemorySink::new();
/// sink.append_line("*** parameters: epsilon: 0.05")?;
/// assert_eq!(sink.lines().len(), 1);
/// # Ok::<(), smartcab::Error>(())
/// ```
pub trait DiagnosticSink: Send {
    /// Append one line. The sink adds the line terminator.
    fn append_line(&mut self, line: &str) -> Result<()>;
}
