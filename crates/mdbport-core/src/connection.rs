//! Connection trait and catalog introspection

use crate::{QueryResult, Result, SqlDialect, StatementResult, Value};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Kind of catalog object reported by a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableType {
    Table,
    View,
    /// Engine-internal catalog object (e.g. Access `SYSTEM TABLE`)
    System,
}

/// A catalog entry as reported by the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    pub name: String,
    pub table_type: TableType,
}

impl TableInfo {
    pub fn new(name: impl Into<String>, table_type: TableType) -> Self {
        Self {
            name: name.into(),
            table_type,
        }
    }

    /// Tables and views hold copyable rows; system objects do not.
    pub fn is_user_object(&self) -> bool {
        matches!(self.table_type, TableType::Table | TableType::View)
    }
}

/// A database connection
#[async_trait]
pub trait Connection: Send + Sync {
    /// Get the driver name (e.g., "sqlite", "access")
    fn driver_name(&self) -> &str;

    /// SQL dialect used to build statements for this connection
    fn dialect(&self) -> SqlDialect;

    /// Execute a statement that modifies data (INSERT/UPDATE/DELETE/DDL)
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<StatementResult>;

    /// Execute a query that returns rows (SELECT)
    async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult>;

    /// Close the connection
    async fn close(&self) -> Result<()>;

    /// Check if the connection is closed
    fn is_closed(&self) -> bool;

    /// Get schema introspection interface if supported
    fn as_schema_introspection(&self) -> Option<&dyn SchemaIntrospection> {
        None
    }
}

/// Catalog inspection
#[async_trait]
pub trait SchemaIntrospection: Send + Sync {
    /// List every catalog object, including system objects, in catalog order
    async fn list_tables(&self) -> Result<Vec<TableInfo>>;
}
