//! mdbport drivers
//!
//! Concrete implementations of the driver traits defined in `mdbport-core`,
//! each behind a cargo feature of the same name.

#[cfg(feature = "access")]
pub use mdbport_driver_access as access;
#[cfg(feature = "sqlite")]
pub use mdbport_driver_sqlite as sqlite;

/// Re-export commonly used types from mdbport-core
pub use mdbport_core::{
    Connection, ConnectionConfig, DatabaseDriver, MdbportError, QueryResult, Result, RowBatch,
    SchemaIntrospection, TableInfo, TableType, Value,
};
