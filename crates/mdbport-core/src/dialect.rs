//! SQL text generation for the engines mdbport reads from
//!
//! Only the handful of statements a table copy needs are modelled: a
//! one-row probe, a key check, paged and unbounded reads and a row count.
//! Integer bounds are rendered inline so that no engine has to support
//! parameter binding in `TOP`/`LIMIT` positions.

use crate::PageCursor;
use serde::{Deserialize, Serialize};

/// SQL dialect of a source connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SqlDialect {
    /// Microsoft Access (Jet/ACE) through ODBC
    Access,
    /// SQLite
    Sqlite,
}

impl SqlDialect {
    /// Quote an identifier so that spaces, reserved words and embedded
    /// quote characters survive.
    pub fn quote_identifier(&self, name: &str) -> String {
        match self {
            SqlDialect::Access => format!("[{}]", name.replace(']', "]]")),
            SqlDialect::Sqlite => format!("\"{}\"", name.replace('"', "\"\"")),
        }
    }

    /// Read at most one row so the column list can be observed.
    pub fn probe_sql(&self, table: &str) -> String {
        let table = self.quote_identifier(table);
        match self {
            SqlDialect::Access => format!("SELECT TOP 1 * FROM {}", table),
            SqlDialect::Sqlite => format!("SELECT * FROM {} LIMIT 1", table),
        }
    }

    /// Count all rows of a table.
    pub fn count_sql(&self, table: &str) -> String {
        format!("SELECT COUNT(*) FROM {}", self.quote_identifier(table))
    }

    /// Count the values of `column` that are NULL or occur more than once.
    /// Zero means the column can drive identity paging.
    pub fn duplicate_key_sql(&self, table: &str, column: &str) -> String {
        let table = self.quote_identifier(table);
        let column = self.quote_identifier(column);
        format!(
            "SELECT COUNT(*) FROM (SELECT {col} FROM {table} GROUP BY {col} \
             HAVING COUNT(*) > 1 OR {col} IS NULL) AS dup",
            col = column,
            table = table
        )
    }

    /// Build the statement for the next page described by `cursor`.
    ///
    /// `limit` is ignored for [`PageCursor::Unbounded`].
    pub fn page_sql(&self, table: &str, cursor: &PageCursor, limit: usize) -> String {
        let quoted = self.quote_identifier(table);
        match (self, cursor) {
            (_, PageCursor::Unbounded) => format!("SELECT * FROM {}", quoted),

            (SqlDialect::Access, PageCursor::Identity { column, after }) => {
                let column = self.quote_identifier(column);
                match after {
                    Some(after) => format!(
                        "SELECT TOP {} * FROM {} WHERE {} > {} ORDER BY {}",
                        limit, quoted, column, after, column
                    ),
                    None => format!("SELECT TOP {} * FROM {} ORDER BY {}", limit, quoted, column),
                }
            }
            // Jet/ACE has no OFFSET support; the statement is still issued so
            // the caller can observe the rejection and fall back.
            (SqlDialect::Access, PageCursor::Position { skip }) => format!(
                "SELECT * FROM {} OFFSET {} ROWS FETCH NEXT {} ROWS ONLY",
                quoted, skip, limit
            ),

            (SqlDialect::Sqlite, PageCursor::Identity { column, after }) => {
                let column = self.quote_identifier(column);
                match after {
                    Some(after) => format!(
                        "SELECT * FROM {} WHERE {} > {} ORDER BY {} LIMIT {}",
                        quoted, column, after, column, limit
                    ),
                    None => format!("SELECT * FROM {} ORDER BY {} LIMIT {}", quoted, column, limit),
                }
            }
            (SqlDialect::Sqlite, PageCursor::Position { skip }) => {
                format!("SELECT * FROM {} LIMIT {} OFFSET {}", quoted, limit, skip)
            }
        }
    }
}
