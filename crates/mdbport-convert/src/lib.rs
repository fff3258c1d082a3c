//! mdbport Convert - copies tables out of a legacy database into SQLite
//!
//! The [`Converter`] walks the tables of a [`TableSource`] and writes them
//! batch by batch into a [`TableSink`]:
//!
//! - [`PagingStrategy`] - identity (keyset) or position (offset) paging
//! - [`ProgressEvent`] - callbacks for progress displays
//! - [`ConversionReport`] / [`DatabaseSummary`] - what a run produced
//!
//! [`TableSource`]: mdbport_core::TableSource
//! [`TableSink`]: mdbport_core::TableSink

mod converter;
mod error;
mod options;
mod progress;
mod report;
mod source;
mod strategy;

pub use converter::{ContinueCheck, Converter};
pub use error::{ConvertError, ConvertResult, TableConversionError};
pub use options::{ConvertOptions, DEFAULT_BATCH_SIZE, default_destination_path};
pub use progress::{
    ProgressCallback, ProgressEvent, ProgressTracker, ROWS_PER_TABLE_ESTIMATE, overall_percent,
};
pub use report::{ConversionReport, DatabaseSummary, TableOutcome, TableReport, TableSummary};
pub use source::{SqlSource, open_access, open_sqlite};
pub use strategy::PagingStrategy;

/// Re-export the access configuration so callers need not depend on the
/// driver crates directly
pub use mdbport_drivers::access::AccessConfig;
pub use mdbport_drivers::sqlite::SqliteSink;
