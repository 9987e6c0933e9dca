//! Error types for the information-bar engine.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the information-bar engine.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration; the pipeline must not be invoked.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed input within a partition.
    #[error("Data error: {0}")]
    Data(String),

    /// Processing was cancelled before the partition completed.
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Config,
    Data,
    Cancelled,
    Io,
    Json,
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a data error.
    pub fn data(msg: impl Into<String>) -> Self {
        Error::Data(msg.into())
    }

    /// Create a cancellation error.
    pub fn cancelled(msg: impl Into<String>) -> Self {
        Error::Cancelled(msg.into())
    }

    /// Get the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::Config,
            Error::Data(_) => ErrorKind::Data,
            Error::Cancelled(_) => ErrorKind::Cancelled,
            Error::Io(_) => ErrorKind::Io,
            Error::Json(_) => ErrorKind::Json,
        }
    }

    /// Whether only the current partition is affected.
    ///
    /// Configuration problems apply to every partition run with that config.
    pub fn is_partition_scoped(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Config | ErrorKind::Json)
    }
}
