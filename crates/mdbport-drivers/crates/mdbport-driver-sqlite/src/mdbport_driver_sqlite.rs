//! SQLite database driver implementation
//!
//! SQLite plays both roles in a conversion: it is always the destination
//! (through [`SqliteSink`]) and can also be read as a source, which the
//! tests use to exercise the copier against a real engine.

mod connection;
mod driver;
mod schema;
mod sink;

pub use connection::{OpenMode, SqliteConnection};
pub use driver::SqliteDriver;
pub use schema::{create_table_sql, infer_column_types, insert_sql};
pub use sink::SqliteSink;
