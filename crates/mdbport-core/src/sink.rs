//! Write side of a table copy

use crate::{Result, RowBatch};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// How a batch lands in the destination table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WriteMode {
    /// Drop any existing table of the same name and create it from the
    /// batch's columns before inserting.
    Replace,
    /// Insert into the table created by an earlier `Replace`.
    Append,
}

/// A database that table rows can be copied into
#[async_trait]
pub trait TableSink: Send + Sync {
    /// Short description for logs (driver and file)
    fn describe(&self) -> String;

    /// Write one batch, returning the number of rows stored.
    async fn write_batch(&self, table: &str, batch: &RowBatch, mode: WriteMode) -> Result<u64>;

    /// Release the destination handle. Safe to call when nothing was written.
    async fn finish(&self) -> Result<()>;
}
