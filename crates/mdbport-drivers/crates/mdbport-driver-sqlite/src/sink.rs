//! SQLite destination for converted tables

use async_trait::async_trait;
use mdbport_core::{Connection, MdbportError, Result, RowBatch, TableSink, WriteMode};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::SqliteConnection;

/// Writes batches into a SQLite file.
///
/// The file is not touched until the first batch arrives, so a run that
/// finds nothing to copy leaves no output behind. One sink owns its file for
/// the duration of a run.
pub struct SqliteSink {
    path: PathBuf,
    conn: Mutex<Option<Arc<SqliteConnection>>>,
}

impl SqliteSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            conn: Mutex::new(None),
        }
    }

    fn connection(&self) -> Result<Arc<SqliteConnection>> {
        let mut slot = self.conn.lock();
        if let Some(conn) = slot.as_ref() {
            return Ok(Arc::clone(conn));
        }

        let path = self.path.to_string_lossy();
        let conn = Arc::new(SqliteConnection::open(&path).map_err(|e| {
            tracing::error!(path = %path, error = %e, "failed to open destination");
            MdbportError::Write(e.to_string())
        })?);
        *slot = Some(Arc::clone(&conn));
        Ok(conn)
    }
}

#[async_trait]
impl TableSink for SqliteSink {
    fn describe(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }

    #[tracing::instrument(skip(self, batch), fields(rows = batch.len()))]
    async fn write_batch(&self, table: &str, batch: &RowBatch, mode: WriteMode) -> Result<u64> {
        let conn = self.connection()?;
        conn.write_rows(table, batch, mode == WriteMode::Replace)
    }

    async fn finish(&self) -> Result<()> {
        let conn = self.conn.lock().take();
        if let Some(conn) = conn {
            conn.close().await?;
        }
        Ok(())
    }
}
