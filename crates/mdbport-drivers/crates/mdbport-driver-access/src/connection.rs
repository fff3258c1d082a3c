//! Access connection over the system ODBC driver manager

use async_trait::async_trait;
use mdbport_core::{
    ColumnMeta, Connection, MdbportError, QueryResult, Result, Row, SchemaIntrospection,
    SqlDialect, StatementResult, TableInfo, TableType, Value,
};
use odbc_api::buffers::{AnySlice, BufferDesc, ColumnarAnyBuffer};
use odbc_api::{Connection as OdbcConnection, ConnectionOptions, Cursor, Environment, ResultSetMetadata};
use parking_lot::Mutex;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::value::{ColumnKind, decode_wide};

/// Rows fetched per ODBC round trip
const FETCH_ROWS: usize = 100;

static ODBC_ENV: OnceLock<Environment> = OnceLock::new();

/// Access connection errors
#[derive(Debug, thiserror::Error)]
pub enum AccessConnectionError {
    #[error("ODBC environment unavailable: {0}")]
    Environment(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    #[error("Statement does not return rows: {0}")]
    NoResultSet(String),

    #[error("Connection is closed")]
    ConnectionClosed,
}

impl From<AccessConnectionError> for MdbportError {
    fn from(err: AccessConnectionError) -> Self {
        match err {
            AccessConnectionError::Environment(_)
            | AccessConnectionError::ConnectionFailed(_)
            | AccessConnectionError::ConnectionClosed => MdbportError::Connection(err.to_string()),
            AccessConnectionError::QueryFailed(_) | AccessConnectionError::NoResultSet(_) => {
                MdbportError::Query(err.to_string())
            }
        }
    }
}

fn environment() -> std::result::Result<&'static Environment, AccessConnectionError> {
    if let Some(env) = ODBC_ENV.get() {
        return Ok(env);
    }
    let env = Environment::new().map_err(|e| AccessConnectionError::Environment(e.to_string()))?;
    Ok(ODBC_ENV.get_or_init(|| env))
}

/// Column names and decoded rows of one result set
type Fetched = (Vec<ColumnMeta>, Vec<Vec<Value>>);

fn fetch_all(mut cursor: impl Cursor) -> std::result::Result<Fetched, AccessConnectionError> {
    let failed = |e: odbc_api::Error| AccessConnectionError::QueryFailed(e.to_string());

    let names = cursor
        .column_names()
        .map_err(failed)?
        .collect::<std::result::Result<Vec<String>, _>>()
        .map_err(failed)?;

    let mut columns = Vec::with_capacity(names.len());
    let mut kinds = Vec::with_capacity(names.len());
    for (idx, name) in names.into_iter().enumerate() {
        let data_type = cursor.col_data_type(idx as u16 + 1).map_err(failed)?;
        kinds.push(ColumnKind::from(data_type));
        columns.push(ColumnMeta {
            name,
            data_type: format!("{:?}", data_type),
            nullable: true,
            ordinal: idx,
        });
    }

    let descs = kinds.iter().map(|kind| BufferDesc::WText {
        max_str_len: kind.buffer_len(),
    });
    let buffer = ColumnarAnyBuffer::try_from_descs(FETCH_ROWS, descs).map_err(failed)?;
    let mut block = cursor.bind_buffer(buffer).map_err(failed)?;

    let mut rows = Vec::new();
    // A value longer than its buffer fails the fetch rather than arriving cut short
    while let Some(batch) = block.fetch_with_truncation_check(true).map_err(failed)? {
        for row in 0..batch.num_rows() {
            rows.push(
                kinds
                    .iter()
                    .enumerate()
                    .map(|(col, kind)| match batch.column(col) {
                        AnySlice::WText(view) => decode_wide(*kind, view.get(row)),
                        _ => Value::Null,
                    })
                    .collect(),
            );
        }
    }

    Ok((columns, rows))
}

fn table_type(kind: &Value) -> TableType {
    match kind.as_str().map(str::trim) {
        Some("TABLE") => TableType::Table,
        Some("VIEW") => TableType::View,
        _ => TableType::System,
    }
}

/// Connection to one Access file
pub struct AccessConnection {
    conn: Mutex<OdbcConnection<'static>>,
    path: String,
    closed: AtomicBool,
}

impl AccessConnection {
    /// Connect with a full ODBC connection string
    #[tracing::instrument(skip(connection_string), fields(path = %path))]
    pub fn open(connection_string: &str, path: &str) -> std::result::Result<Self, AccessConnectionError> {
        let env = environment()?;
        let conn = env
            .connect_with_connection_string(connection_string, ConnectionOptions::default())
            .map_err(|e| AccessConnectionError::ConnectionFailed(e.to_string()))?;

        tracing::info!("Access database connection established");
        Ok(Self {
            conn: Mutex::new(conn),
            path: path.to_string(),
            closed: AtomicBool::new(false),
        })
    }

    fn ensure_open(&self) -> std::result::Result<(), AccessConnectionError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(AccessConnectionError::ConnectionClosed);
        }
        Ok(())
    }

    fn run_query(&self, sql: &str) -> std::result::Result<Fetched, AccessConnectionError> {
        self.ensure_open()?;
        let conn = self.conn.lock();
        let cursor = conn
            .execute(sql, (), None)
            .map_err(|e| AccessConnectionError::QueryFailed(e.to_string()))?
            .ok_or_else(|| AccessConnectionError::NoResultSet(sql.chars().take(100).collect()))?;
        fetch_all(cursor)
    }

    fn catalog_rows(&self, table_type: &str) -> std::result::Result<Vec<Vec<Value>>, AccessConnectionError> {
        self.ensure_open()?;
        let conn = self.conn.lock();
        let cursor = conn
            .tables("", "", "", table_type)
            .map_err(|e| AccessConnectionError::QueryFailed(e.to_string()))?;
        fetch_all(cursor).map(|(_, rows)| rows)
    }
}

#[async_trait]
impl Connection for AccessConnection {
    fn driver_name(&self) -> &str {
        "access"
    }

    fn dialect(&self) -> SqlDialect {
        SqlDialect::Access
    }

    #[tracing::instrument(skip(self, sql, params), fields(sql_preview = %sql.chars().take(100).collect::<String>()))]
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<StatementResult> {
        if !params.is_empty() {
            return Err(MdbportError::NotSupported(
                "Access statements do not take bound parameters".into(),
            ));
        }
        self.ensure_open()?;

        let conn = self.conn.lock();
        conn.execute(sql, (), None)
            .map_err(|e| AccessConnectionError::QueryFailed(e.to_string()))?;

        // The ODBC execute path does not report a row count
        Ok(StatementResult { affected_rows: 0 })
    }

    #[tracing::instrument(skip(self, sql, params), fields(sql_preview = %sql.chars().take(100).collect::<String>()))]
    async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult> {
        if !params.is_empty() {
            return Err(MdbportError::NotSupported(
                "Access queries do not take bound parameters".into(),
            ));
        }
        let start_time = std::time::Instant::now();

        let (columns, values) = self.run_query(sql)?;
        let rows = values.into_iter().map(Row::new).collect::<Vec<_>>();

        let execution_time_ms = start_time.elapsed().as_millis() as u64;
        tracing::debug!(row_count = rows.len(), execution_time_ms, "query executed successfully");

        Ok(QueryResult {
            columns,
            rows,
            execution_time_ms,
        })
    }

    async fn close(&self) -> Result<()> {
        tracing::info!(path = %self.path, "closing Access connection");
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
impl SchemaIntrospection for AccessConnection {
    /// Tables and views from the ODBC catalog. Some driver builds reject an
    /// unfiltered catalog request; those are asked for plain tables instead.
    #[tracing::instrument(skip(self))]
    async fn list_tables(&self) -> Result<Vec<TableInfo>> {
        let rows = match self.catalog_rows("") {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(error = %e, "catalog listing failed, retrying with TABLE filter");
                self.catalog_rows("TABLE")?
            }
        };

        // TABLE_CAT, TABLE_SCHEM, TABLE_NAME, TABLE_TYPE, REMARKS
        let tables: Vec<TableInfo> = rows
            .iter()
            .filter_map(|row| {
                let name = row.get(2)?.as_str()?.to_string();
                let kind = row.get(3).map(table_type).unwrap_or(TableType::Table);
                Some(TableInfo::new(name, kind))
            })
            .collect();

        tracing::debug!(table_count = tables.len(), "tables listed");
        Ok(tables)
    }
}
