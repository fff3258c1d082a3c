//! Table sources backed by a SQL connection

use async_trait::async_trait;
use mdbport_core::{
    Connection, ConnectionConfig, DatabaseDriver, MdbportError, PageCursor, Result, RowBatch,
    TableProbe, TableSource,
};
use mdbport_drivers::access::{AccessConfig, AccessDriver, ODBC_DRIVER_PARAM};
use mdbport_drivers::sqlite::SqliteDriver;
use std::path::Path;
use std::sync::Arc;

use crate::error::{ConvertError, ConvertResult};

/// Reads tables through any [`Connection`], building statements with the
/// connection's own dialect.
pub struct SqlSource {
    conn: Arc<dyn Connection>,
    label: String,
}

impl SqlSource {
    pub fn new(conn: Arc<dyn Connection>, label: impl Into<String>) -> Self {
        Self {
            conn,
            label: label.into(),
        }
    }

    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.conn
    }

    pub async fn close(&self) -> Result<()> {
        self.conn.close().await
    }
}

#[async_trait]
impl TableSource for SqlSource {
    fn describe(&self) -> String {
        format!("{}:{}", self.conn.driver_name(), self.label)
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        let schema = self.conn.as_schema_introspection().ok_or_else(|| {
            MdbportError::NotSupported(format!(
                "{} connections cannot list tables",
                self.conn.driver_name()
            ))
        })?;

        let tables = schema.list_tables().await?;
        Ok(tables
            .into_iter()
            .filter(|t| t.is_user_object())
            .map(|t| t.name)
            .collect())
    }

    async fn probe_columns(&self, table: &str) -> Result<TableProbe> {
        let sql = self.conn.dialect().probe_sql(table);
        let batch = RowBatch::from(self.conn.query(&sql, &[]).await?);
        Ok(TableProbe {
            sample: batch.rows.into_iter().next(),
            columns: batch.columns,
        })
    }

    async fn read_batch(&self, table: &str, cursor: &PageCursor, limit: usize) -> Result<RowBatch> {
        let sql = self.conn.dialect().page_sql(table, cursor, limit);
        tracing::debug!(table = %table, sql = %sql, "reading batch");
        Ok(RowBatch::from(self.conn.query(&sql, &[]).await?))
    }

    async fn is_unique_key(&self, table: &str, column: &str) -> Result<bool> {
        let sql = self.conn.dialect().duplicate_key_sql(table, column);
        let offending = self
            .conn
            .query(&sql, &[])
            .await?
            .scalar_i64()
            .ok_or_else(|| {
                MdbportError::Query(format!("Key check on '{}'.'{}' returned no count", table, column))
            })?;
        Ok(offending == 0)
    }

    async fn count_rows(&self, table: &str) -> Result<u64> {
        let sql = self.conn.dialect().count_sql(table);
        let result = self.conn.query(&sql, &[]).await?;
        result
            .scalar_i64()
            .and_then(|count| u64::try_from(count).ok())
            .ok_or_else(|| MdbportError::Query(format!("Row count of '{}' is not a number", table)))
    }
}

/// Open an Access database for reading.
///
/// A missing file or a non-Access extension is [`ConvertError::InvalidInput`];
/// any failure to connect is [`ConvertError::SourceUnavailable`].
#[tracing::instrument(skip(config), fields(path = %config.path.display()))]
pub async fn open_access(config: &AccessConfig) -> ConvertResult<SqlSource> {
    config.validate().map_err(ConvertError::from_open_failure)?;

    let mut params = ConnectionConfig::new_access(&config.path);
    if let Some(driver) = &config.odbc_driver {
        params = params.with_param(ODBC_DRIVER_PARAM, driver.clone());
    }

    let driver = AccessDriver::new();
    let conn = driver
        .connect(&params)
        .await
        .map_err(ConvertError::from_open_failure)?;
    tracing::debug!(driver = driver.name(), "source opened");
    Ok(SqlSource::new(conn, config.path.display().to_string()))
}

/// Open an existing SQLite database for reading.
pub async fn open_sqlite(path: &Path) -> ConvertResult<SqlSource> {
    let driver = SqliteDriver::new();
    let conn = driver
        .connect(&ConnectionConfig::new_sqlite(path))
        .await
        .map_err(ConvertError::SourceUnavailable)?;
    tracing::debug!(driver = driver.name(), "source opened");
    Ok(SqlSource::new(conn, path.display().to_string()))
}
