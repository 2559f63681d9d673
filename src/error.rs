//! Error types for the smartcab crate

use thiserror::Error;

/// Main error type for the smartcab crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("action set is empty; at least one legal action is required")]
    NoActionsAvailable,

    #[error("invalid action '{action}': not a member of the legal action set")]
    InvalidAction { action: String },

    #[error("invalid reward {value}: rewards must be finite")]
    InvalidReward { value: f64 },

    #[error("unknown agent id {id}")]
    UnknownAgent { id: usize },

    #[error("no primary agent has been registered with the world")]
    NoPrimaryAgent,

    #[error("unsupported snapshot version {found} (expected {expected})")]
    UnsupportedSnapshotVersion { found: u32, expected: u32 },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
