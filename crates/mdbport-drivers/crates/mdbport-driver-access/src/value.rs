//! Decoding of ODBC text buffers into typed values
//!
//! Rows are fetched through wide (UTF-16) text buffers, which every ODBC
//! driver supports, and turned back into typed values using the column's
//! reported SQL type.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use mdbport_core::Value;

/// Longest text cell fetched, in UTF-16 code units. Longer values fail the
/// fetch instead of being cut short.
pub const MAX_TEXT_LEN: usize = 64 * 1024;

/// Coarse SQL type of a result column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Decimal,
    Bool,
    Date,
    Time,
    Timestamp,
    Binary,
    Text,
}

#[cfg(feature = "odbc")]
impl From<odbc_api::DataType> for ColumnKind {
    fn from(data_type: odbc_api::DataType) -> Self {
        use odbc_api::DataType;

        match data_type {
            DataType::TinyInt | DataType::SmallInt | DataType::Integer | DataType::BigInt => {
                ColumnKind::Integer
            }
            DataType::Real | DataType::Float { .. } | DataType::Double => ColumnKind::Float,
            DataType::Decimal { .. } | DataType::Numeric { .. } => ColumnKind::Decimal,
            DataType::Bit => ColumnKind::Bool,
            DataType::Date => ColumnKind::Date,
            DataType::Time { .. } => ColumnKind::Time,
            DataType::Timestamp { .. } => ColumnKind::Timestamp,
            DataType::Binary { .. } | DataType::Varbinary { .. } | DataType::LongVarbinary { .. } => {
                ColumnKind::Binary
            }
            _ => ColumnKind::Text,
        }
    }
}

impl ColumnKind {
    /// Text buffer length for one cell of this kind
    pub fn buffer_len(self) -> usize {
        match self {
            ColumnKind::Text => MAX_TEXT_LEN,
            // two hex digits per byte
            ColumnKind::Binary => 2 * MAX_TEXT_LEN,
            _ => 64,
        }
    }
}

/// Decode one UTF-16 cell as fetched from a wide text buffer
pub fn decode_wide(kind: ColumnKind, raw: Option<&[u16]>) -> Value {
    let text = raw.map(String::from_utf16_lossy);
    decode_text(kind, text.as_deref())
}

/// Decode one cell. `None` is SQL NULL. Text that does not parse as the
/// column's type is kept as a string rather than dropped.
pub fn decode_text(kind: ColumnKind, raw: Option<&str>) -> Value {
    let Some(text) = raw else {
        return Value::Null;
    };
    let trimmed = text.trim();

    let decoded = match kind {
        ColumnKind::Integer => trimmed.parse::<i64>().ok().map(Value::Int64),
        ColumnKind::Float => trimmed.parse::<f64>().ok().map(Value::Float64),
        ColumnKind::Decimal => Some(Value::Decimal(trimmed.to_string())),
        ColumnKind::Bool => match trimmed {
            "1" | "-1" => Some(Value::Bool(true)),
            "0" => Some(Value::Bool(false)),
            _ => None,
        },
        ColumnKind::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .map(Value::Date),
        ColumnKind::Time => NaiveTime::parse_from_str(trimmed, "%H:%M:%S%.f")
            .ok()
            .map(Value::Time),
        ColumnKind::Timestamp => NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f")
            .ok()
            .map(Value::DateTime),
        ColumnKind::Binary => decode_hex(trimmed).map(Value::Bytes),
        ColumnKind::Text => None,
    };

    decoded.unwrap_or_else(|| Value::String(text.to_string()))
}

/// ODBC renders binary columns as uppercase hex when bound as text
fn decode_hex(text: &str) -> Option<Vec<u8>> {
    if text.len() % 2 != 0 {
        return None;
    }
    (0..text.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(text.get(i..i + 2)?, 16).ok())
        .collect()
}
