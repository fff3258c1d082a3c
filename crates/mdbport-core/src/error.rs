//! Error types for mdbport

use thiserror::Error;

/// Core error type for mdbport operations
#[derive(Error, Debug)]
pub enum MdbportError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Write error: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Other(String),
}

impl MdbportError {
    /// Whether the source refused the statement itself (syntax or capability
    /// gap) rather than failing to reach the database.
    pub fn is_query_rejection(&self) -> bool {
        matches!(self, MdbportError::Query(_))
    }

    /// Whether the destination failed to accept rows.
    pub fn is_write_failure(&self) -> bool {
        matches!(self, MdbportError::Write(_))
    }
}

/// Result type alias for mdbport operations
pub type Result<T> = std::result::Result<T, MdbportError>;
