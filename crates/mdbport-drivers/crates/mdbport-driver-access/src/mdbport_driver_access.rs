//! Microsoft Access driver for mdbport
//!
//! Access files are only readable through the vendor ODBC driver, so the
//! live connection is compiled in with the `odbc` feature. Path validation,
//! driver selection and value decoding are always available.

mod config;
#[cfg(feature = "odbc")]
mod connection;
mod driver;
mod value;

#[cfg(test)]
mod config_tests;
#[cfg(test)]
mod driver_tests;
#[cfg(test)]
mod value_tests;

pub use config::{AccessConfig, AccessFormat, ODBC_DRIVER_PARAM};
#[cfg(feature = "odbc")]
pub use connection::{AccessConnection, AccessConnectionError};
pub use driver::AccessDriver;
pub use value::{ColumnKind, MAX_TEXT_LEN, decode_text, decode_wide};
