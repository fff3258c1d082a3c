//! SQLite connection implementation

use async_trait::async_trait;
use mdbport_core::{
    ColumnMeta, Connection, MdbportError, QueryResult, Result, Row, RowBatch, SchemaIntrospection,
    SqlDialect, StatementResult, TableInfo, TableType, Value,
};
use parking_lot::Mutex;
use rusqlite::{Connection as RusqliteConnection, OpenFlags, params_from_iter};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::schema::{create_table_sql, insert_sql};

/// How a database file is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Read an existing file; fails if it is missing
    ReadOnly,
    /// Read and write, creating the file when absent
    ReadWriteCreate,
}

/// SQLite connection wrapper
pub struct SqliteConnection {
    conn: Arc<Mutex<RusqliteConnection>>,
    path: String,
    closed: AtomicBool,
}

impl SqliteConnection {
    /// Open (or create) a SQLite database for reading and writing
    pub fn open(path: &str) -> Result<Self> {
        Self::open_with_mode(path, OpenMode::ReadWriteCreate)
    }

    /// Open an existing SQLite database without write access
    pub fn open_read_only(path: &str) -> Result<Self> {
        Self::open_with_mode(path, OpenMode::ReadOnly)
    }

    pub fn open_with_mode(path: &str, mode: OpenMode) -> Result<Self> {
        tracing::info!(path = %path, ?mode, "opening SQLite database");
        // Expand path to handle ~ and relative paths
        let expanded_path = Self::expand_path(path)?;

        let access = match mode {
            OpenMode::ReadOnly => OpenFlags::SQLITE_OPEN_READ_ONLY,
            OpenMode::ReadWriteCreate => {
                OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE
            }
        };
        let flags = access | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let conn = if path == ":memory:" {
            RusqliteConnection::open_in_memory().map_err(|e| {
                MdbportError::Connection(format!("Failed to open in-memory database: {}", e))
            })?
        } else {
            // Validate that parent directory exists for non-URI paths
            if !expanded_path.starts_with("file:") {
                let file_path = std::path::Path::new(&expanded_path);
                if let Some(parent) = file_path.parent()
                    && !parent.exists()
                {
                    return Err(MdbportError::Connection(format!(
                        "Parent directory does not exist: {}",
                        parent.display()
                    )));
                }
            }

            RusqliteConnection::open_with_flags(&expanded_path, flags).map_err(|e| {
                MdbportError::Connection(format!(
                    "Failed to open SQLite database at '{}': {}",
                    expanded_path, e
                ))
            })?
        };

        if mode == OpenMode::ReadWriteCreate {
            // The output is handed to other tools, so keep it a single file
            // with no -wal/-shm companions.
            conn.pragma_update(None, "journal_mode", "DELETE")
                .map_err(|e| MdbportError::Connection(format!("Failed to set journal mode: {}", e)))?;

            conn.pragma_update(None, "synchronous", "NORMAL").map_err(|e| {
                MdbportError::Connection(format!("Failed to set synchronous mode: {}", e))
            })?;
        }

        tracing::info!(path = %expanded_path, "SQLite database connection established");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: expanded_path,
            closed: AtomicBool::new(false),
        })
    }

    /// Expand path to handle ~ (home directory) and relative paths
    fn expand_path(path: &str) -> Result<String> {
        // Handle special cases
        if path == ":memory:" || path.starts_with("file:") {
            return Ok(path.to_string());
        }

        // Expand ~ to home directory
        let expanded = if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = std::env::var_os("HOME") {
                let home_path = std::path::PathBuf::from(home);
                home_path.join(rest).to_string_lossy().to_string()
            } else {
                return Err(MdbportError::Configuration(
                    "Unable to determine HOME directory".into(),
                ));
            }
        } else if path.starts_with('~') {
            return Err(MdbportError::Configuration(
                "User-specific home directories (~user) are not supported".into(),
            ));
        } else {
            path.to_string()
        };

        // Convert to absolute path if relative
        let path_buf = std::path::PathBuf::from(&expanded);
        let result = if path_buf.is_relative() {
            std::env::current_dir()
                .map_err(MdbportError::Io)?
                .join(path_buf)
                .to_string_lossy()
                .to_string()
        } else {
            expanded
        };

        Ok(result)
    }

    /// Insert a batch inside one transaction.
    ///
    /// With `replace` set, any existing table of the same name is dropped and
    /// recreated from the batch's columns first, in the same transaction, so
    /// a failed first batch leaves no half-built table behind.
    pub fn write_rows(&self, table_name: &str, batch: &RowBatch, replace: bool) -> Result<u64> {
        let width = batch.columns.len();
        if let Some(bad) = batch.rows.iter().position(|row| row.len() != width) {
            return Err(MdbportError::Write(format!(
                "Row {} of batch for '{}' has {} values, expected {}",
                bad,
                table_name,
                batch.rows[bad].len(),
                width
            )));
        }

        let mut conn = self.conn.lock();
        let tx = conn
            .transaction()
            .map_err(|e| MdbportError::Write(format!("Failed to begin transaction: {}", e)))?;

        if replace {
            let drop_sql = format!(
                "DROP TABLE IF EXISTS {}",
                SqlDialect::Sqlite.quote_identifier(table_name)
            );
            tx.execute_batch(&drop_sql)
                .map_err(|e| MdbportError::Write(format!("Failed to drop '{}': {}", table_name, e)))?;
            tx.execute_batch(&create_table_sql(table_name, batch)).map_err(|e| {
                MdbportError::Write(format!("Failed to create '{}': {}", table_name, e))
            })?;
        }

        let sql = insert_sql(table_name, &batch.columns);
        {
            let mut stmt = tx
                .prepare(&sql)
                .map_err(|e| MdbportError::Write(format!("Failed to prepare insert: {}", e)))?;
            for row in &batch.rows {
                let rusqlite_params = values_to_rusqlite(row);
                stmt.execute(params_from_iter(rusqlite_params.iter()))
                    .map_err(|e| {
                        MdbportError::Write(format!("Failed to insert into '{}': {}", table_name, e))
                    })?;
            }
        }

        tx.commit()
            .map_err(|e| MdbportError::Write(format!("Failed to commit batch: {}", e)))?;

        tracing::debug!(table = %table_name, rows = batch.len(), replace, "batch written");
        Ok(batch.len() as u64)
    }
}

#[async_trait]
impl Connection for SqliteConnection {
    fn driver_name(&self) -> &str {
        "sqlite"
    }

    fn dialect(&self) -> SqlDialect {
        SqlDialect::Sqlite
    }

    #[tracing::instrument(skip(self, sql, params), fields(sql_preview = %sql.chars().take(100).collect::<String>()))]
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<StatementResult> {
        let conn = self.conn.lock();
        let rusqlite_params = values_to_rusqlite(params);

        let rows_affected = conn
            .execute(sql, params_from_iter(rusqlite_params.iter()))
            .map_err(|e| MdbportError::Query(format!("Failed to execute statement: {}", e)))?;

        tracing::debug!(affected_rows = rows_affected, "statement executed");
        Ok(StatementResult {
            affected_rows: rows_affected as u64,
        })
    }

    #[tracing::instrument(skip(self, sql, params), fields(sql_preview = %sql.chars().take(100).collect::<String>()))]
    async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult> {
        let start_time = std::time::Instant::now();

        let conn = self.conn.lock();
        let rusqlite_params = values_to_rusqlite(params);

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| MdbportError::Query(format!("Failed to prepare query: {}", e)))?;

        // Column metadata before executing
        let mut columns: Vec<ColumnMeta> = Vec::with_capacity(stmt.column_count());

        for (idx, col) in stmt.columns().iter().enumerate() {
            let name = col.name().to_string();
            // Declared type from CREATE TABLE, when the column maps to one
            let data_type = col.decl_type().unwrap_or("DYNAMIC").to_string();

            columns.push(ColumnMeta {
                name,
                data_type,
                nullable: true,
                ordinal: idx,
            });
        }

        // Execute query and collect rows
        let mut rows = Vec::new();
        let mut query_rows = stmt
            .query(params_from_iter(rusqlite_params.iter()))
            .map_err(|e| MdbportError::Query(format!("Failed to execute query: {}", e)))?;

        while let Some(row) = query_rows
            .next()
            .map_err(|e| MdbportError::Query(format!("Failed to fetch row: {}", e)))?
        {
            let mut values = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                values.push(rusqlite_to_value(row, i)?);
            }
            rows.push(Row::new(values));
        }

        let execution_time_ms = start_time.elapsed().as_millis() as u64;

        tracing::debug!(
            row_count = rows.len(),
            execution_time_ms = execution_time_ms,
            "query executed successfully"
        );
        Ok(QueryResult {
            columns,
            rows,
            execution_time_ms,
        })
    }

    async fn close(&self) -> Result<()> {
        tracing::info!(path = %self.path, "closing SQLite connection");
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn as_schema_introspection(&self) -> Option<&dyn SchemaIntrospection> {
        Some(self)
    }
}

#[async_trait]
impl SchemaIntrospection for SqliteConnection {
    #[tracing::instrument(skip(self))]
    async fn list_tables(&self) -> Result<Vec<TableInfo>> {
        tracing::debug!("listing tables from sqlite_master");
        let result = self
            .query(
                "SELECT name, type FROM sqlite_master WHERE type IN ('table', 'view') ORDER BY rowid",
                &[],
            )
            .await?;

        let tables: Vec<TableInfo> = result
            .rows
            .iter()
            .filter_map(|row| {
                let name = row.get(0).and_then(|v| v.as_str())?.to_string();
                let table_type = if name.starts_with("sqlite_") {
                    TableType::System
                } else if row.get(1).and_then(|v| v.as_str()) == Some("view") {
                    TableType::View
                } else {
                    TableType::Table
                };
                Some(TableInfo::new(name, table_type))
            })
            .collect();

        tracing::debug!(table_count = tables.len(), "tables listed");
        Ok(tables)
    }
}

/// Convert our Value types to rusqlite-compatible types
fn values_to_rusqlite(values: &[Value]) -> Vec<rusqlite::types::Value> {
    values.iter().map(value_to_rusqlite).collect()
}

fn value_to_rusqlite(value: &Value) -> rusqlite::types::Value {
    match value {
        Value::Null => rusqlite::types::Value::Null,
        Value::Bool(b) => rusqlite::types::Value::Integer(if *b { 1 } else { 0 }),
        Value::Int16(i) => rusqlite::types::Value::Integer(*i as i64),
        Value::Int32(i) => rusqlite::types::Value::Integer(*i as i64),
        Value::Int64(i) => rusqlite::types::Value::Integer(*i),
        Value::Float32(f) => rusqlite::types::Value::Real(*f as f64),
        Value::Float64(f) => rusqlite::types::Value::Real(*f),
        Value::Decimal(d) => rusqlite::types::Value::Text(d.clone()),
        Value::String(s) => rusqlite::types::Value::Text(s.clone()),
        Value::Bytes(b) => rusqlite::types::Value::Blob(b.clone()),
        Value::Date(d) => rusqlite::types::Value::Text(d.to_string()),
        Value::Time(t) => rusqlite::types::Value::Text(t.to_string()),
        Value::DateTime(dt) => rusqlite::types::Value::Text(dt.to_string()),
    }
}

/// Convert rusqlite row value to our Value type
fn rusqlite_to_value(row: &rusqlite::Row, idx: usize) -> Result<Value> {
    use rusqlite::types::ValueRef;

    let value_ref = row
        .get_ref(idx)
        .map_err(|e| MdbportError::Query(e.to_string()))?;

    let value = match value_ref {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Int64(i),
        ValueRef::Real(f) => Value::Float64(f),
        ValueRef::Text(s) => Value::String(String::from_utf8_lossy(s).to_string()),
        ValueRef::Blob(b) => Value::Bytes(b.to_vec()),
    };

    Ok(value)
}
