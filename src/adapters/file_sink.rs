//! Append-only text file sink.

use std::{
    fs::{File, OpenOptions},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::{Result, error::Error, ports::DiagnosticSink};

/// Appends diagnostic lines to a text file, flushing after each line.
///
/// Existing content is kept so several runs can share one log.
///
/// # Examples
///
/// ```no_run
/// use smartcab::adapters::FileSink;
/// use smartcab::ports::DiagnosticSink;
///
/// let mut sink = FileSink::append("report/output_qlearning.txt")?;
/// sink.append_line("run started")?;
/// # Ok::<(), smartcab::Error>(())
/// ```
pub struct FileSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl FileSink {
    /// Open `path` for appending, creating it and its parent directory.
    pub fn append<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| Error::Io {
                operation: format!("create log directory {parent:?}"),
                source,
            })?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| Error::Io {
                operation: format!("open log file {path:?}"),
                source,
            })?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DiagnosticSink for FileSink {
    fn append_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{line}")?;
        self.writer.flush()?;
        Ok(())
    }
}
