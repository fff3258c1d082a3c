//! Command-line arguments

use clap::Parser;
use mdbport_convert::{AccessConfig, DEFAULT_BATCH_SIZE, default_destination_path};
use std::path::PathBuf;

/// Convert a Microsoft Access database (.accdb, .mdb) to SQLite
#[derive(Parser, Debug, Clone)]
#[command(name = "mdbport", version, about)]
pub struct CliArgs {
    /// Access database to convert
    #[arg(value_name = "ACCESS_FILE")]
    pub source: PathBuf,

    /// SQLite file to write (defaults to the source path with a .sqlite extension)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Rows read and written per batch
    #[arg(
        short = 'c',
        long,
        default_value_t = DEFAULT_BATCH_SIZE,
        value_parser = parse_chunk_size,
        value_name = "ROWS"
    )]
    pub chunk_size: usize,

    /// Show tables and record counts without converting
    #[arg(short, long)]
    pub info: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the result as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// ODBC driver name to use instead of the one picked from the file extension
    #[arg(long, env = "MDBPORT_ODBC_DRIVER", value_name = "NAME")]
    pub odbc_driver: Option<String>,
}

impl CliArgs {
    pub fn destination(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_destination_path(&self.source))
    }

    pub fn access_config(&self) -> AccessConfig {
        let config = AccessConfig::new(&self.source);
        match &self.odbc_driver {
            Some(driver) => config.with_odbc_driver(driver.clone()),
            None => config,
        }
    }
}

fn parse_chunk_size(value: &str) -> Result<usize, String> {
    let size: usize = value
        .parse()
        .map_err(|_| format!("'{}' is not a whole number", value))?;
    if size == 0 {
        return Err("chunk size must be at least 1".to_string());
    }
    Ok(size)
}
