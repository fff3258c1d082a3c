//! Read side of a table copy

use crate::{Result, RowBatch, Value};
use async_trait::async_trait;

/// Position of the next page within one table.
///
/// A cursor is created once per table and replaced by value after every
/// batch; it never outlives the table it was created for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCursor {
    /// Rows whose identity column is strictly greater than `after`, in
    /// ascending identity order. `after` is `None` for the first page.
    Identity { column: String, after: Option<i64> },
    /// Rows after skipping `skip` rows in the source's natural order.
    ///
    /// Only correct while that natural order is stable between calls: a
    /// source mutated during the copy can make pages skip or repeat rows.
    Position { skip: u64 },
    /// The whole table in one read, with no bound on memory.
    Unbounded,
}

impl PageCursor {
    /// Whether this is a positional read that has not consumed any rows yet.
    pub fn is_first_position_page(&self) -> bool {
        matches!(self, PageCursor::Position { skip: 0 })
    }
}

/// Column names of a table plus an optional sample row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableProbe {
    pub columns: Vec<String>,
    /// First row of the table, `None` when the table is empty
    pub sample: Option<Vec<Value>>,
}

impl TableProbe {
    /// Value of `column` in the sample row.
    pub fn sample_value(&self, column: usize) -> Option<&Value> {
        self.sample.as_ref().and_then(|row| row.get(column))
    }
}

/// A database that table rows can be copied out of
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Short description for logs (driver and file)
    fn describe(&self) -> String;

    /// Names of user tables and views, in catalog order, possibly with
    /// duplicates and system objects.
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// Observe the column list of a table with a zero/one-row read.
    async fn probe_columns(&self, table: &str) -> Result<TableProbe>;

    /// Read at most `limit` rows starting at `cursor`. An empty batch means
    /// the table is exhausted.
    async fn read_batch(&self, table: &str, cursor: &PageCursor, limit: usize) -> Result<RowBatch>;

    /// Whether `column` holds no NULLs and no repeated values, so that
    /// identity pages over it neither skip nor repeat rows.
    async fn is_unique_key(&self, table: &str, column: &str) -> Result<bool>;

    /// Total number of rows in a table.
    async fn count_rows(&self, table: &str) -> Result<u64>;
}
