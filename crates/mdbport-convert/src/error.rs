use mdbport_core::MdbportError;
use thiserror::Error;

pub type ConvertResult<T> = Result<T, ConvertError>;

/// A single table could not be copied. The run carries on with the next
/// table.
#[derive(Debug, Error)]
#[error("Failed to convert table '{table}': {cause}")]
pub struct TableConversionError {
    pub table: String,
    #[source]
    pub cause: MdbportError,
}

impl TableConversionError {
    pub fn new(table: impl Into<String>, cause: MdbportError) -> Self {
        Self {
            table: table.into(),
            cause,
        }
    }

    /// Whether the destination refused the rows, as opposed to the source
    /// failing to produce them.
    pub fn is_write_failure(&self) -> bool {
        self.cause.is_write_failure()
    }
}

/// Conversion errors
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Source database unavailable: {0}")]
    SourceUnavailable(#[source] MdbportError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Table(#[from] TableConversionError),

    #[error("Conversion cancelled during '{table}' after {rows_written} rows")]
    Cancelled { table: String, rows_written: u64 },
}

impl ConvertError {
    /// Classify a failure to open a source: bad paths and extensions are
    /// the caller's input, everything else means the source is unreachable.
    pub fn from_open_failure(err: MdbportError) -> Self {
        match err {
            MdbportError::NotFound(msg) | MdbportError::Configuration(msg) => {
                ConvertError::InvalidInput(msg)
            }
            other => ConvertError::SourceUnavailable(other),
        }
    }
}
