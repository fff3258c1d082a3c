//! mdbport Core - shared abstractions for the Access to SQLite converter
//!
//! This crate provides the types and traits that the driver and conversion
//! crates agree on. It defines:
//!
//! - `DatabaseDriver` - Trait for opening connections from a `ConnectionConfig`
//! - `Connection` - Trait for a live database connection
//! - `SqlDialect` - Per-engine SQL text (quoting, paging clauses)
//! - `TableSource` / `TableSink` - The read and write sides of a table copy
//! - Common types like `Value`, `Row`, `RowBatch`, etc.

mod connection;
mod dialect;
mod driver;
mod error;
mod sink;
mod source;
mod types;

pub use connection::*;
pub use dialect::*;
pub use driver::*;
pub use error::*;
pub use sink::*;
pub use source::*;
pub use types::*;
