//! Destination schema inferred from the first batch of a table

use mdbport_core::{RowBatch, SqlDialect, Value};

/// Declared SQLite type for a value, `None` for NULL
fn declared_type(value: &Value) -> Option<&'static str> {
    match value {
        Value::Null => None,
        Value::Bool(_) | Value::Int16(_) | Value::Int32(_) | Value::Int64(_) => Some("INTEGER"),
        Value::Float32(_) | Value::Float64(_) => Some("REAL"),
        Value::Decimal(_) | Value::String(_) => Some("TEXT"),
        Value::Bytes(_) => Some("BLOB"),
        Value::Date(_) => Some("DATE"),
        Value::Time(_) => Some("TIME"),
        Value::DateTime(_) => Some("TIMESTAMP"),
    }
}

/// One declared type per column: the type of the first non-NULL value in
/// that column, `TEXT` when the batch holds only NULLs for it.
pub fn infer_column_types(batch: &RowBatch) -> Vec<&'static str> {
    (0..batch.columns.len())
        .map(|idx| {
            batch
                .rows
                .iter()
                .filter_map(|row| row.get(idx))
                .find_map(declared_type)
                .unwrap_or("TEXT")
        })
        .collect()
}

pub fn create_table_sql(table: &str, batch: &RowBatch) -> String {
    let dialect = SqlDialect::Sqlite;
    let columns = batch
        .columns
        .iter()
        .zip(infer_column_types(batch))
        .map(|(name, ty)| format!("{} {}", dialect.quote_identifier(name), ty))
        .collect::<Vec<_>>()
        .join(", ");

    format!("CREATE TABLE {} ({})", dialect.quote_identifier(table), columns)
}

pub fn insert_sql(table: &str, columns: &[String]) -> String {
    let dialect = SqlDialect::Sqlite;
    let names = columns
        .iter()
        .map(|c| dialect.quote_identifier(c))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = vec!["?"; columns.len()].join(", ");

    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        dialect.quote_identifier(table),
        names,
        placeholders
    )
}

#[cfg(test)]
mod tests;
