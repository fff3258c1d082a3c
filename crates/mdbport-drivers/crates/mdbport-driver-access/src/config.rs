//! Access file validation and ODBC connection strings

use mdbport_core::{ConnectionConfig, MdbportError, Result};
use std::path::{Path, PathBuf};

/// Connection parameter that overrides the ODBC driver name
pub const ODBC_DRIVER_PARAM: &str = "odbc_driver";

/// On-disk Access format, decided by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessFormat {
    /// Access 2007 and later
    Accdb,
    /// Access 2003 and earlier
    Mdb,
}

impl AccessFormat {
    /// Format for a path, matching the extension case-insensitively
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "accdb" => Some(Self::Accdb),
            "mdb" => Some(Self::Mdb),
            _ => None,
        }
    }

    /// Name of the ODBC driver that reads this format
    pub fn odbc_driver(&self) -> &'static str {
        match self {
            AccessFormat::Accdb => "Microsoft Access Driver (*.mdb, *.accdb)",
            AccessFormat::Mdb => "Microsoft Access Driver (*.mdb)",
        }
    }
}

/// Where an Access database lives and which ODBC driver opens it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessConfig {
    pub path: PathBuf,
    /// Overrides the driver chosen from the file extension
    pub odbc_driver: Option<String>,
}

impl AccessConfig {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            odbc_driver: None,
        }
    }

    pub fn with_odbc_driver(mut self, driver: impl Into<String>) -> Self {
        self.odbc_driver = Some(driver.into());
        self
    }

    pub fn from_connection_config(config: &ConnectionConfig) -> Self {
        Self {
            path: config.path.clone(),
            odbc_driver: config.get_string(ODBC_DRIVER_PARAM),
        }
    }

    /// Check the file exists and has an Access extension.
    ///
    /// A missing file is `NotFound`; any other extension is a
    /// `Configuration` error.
    pub fn validate(&self) -> Result<AccessFormat> {
        if !self.path.exists() {
            return Err(MdbportError::NotFound(format!(
                "Access database file not found: {}",
                self.path.display()
            )));
        }

        AccessFormat::from_path(&self.path).ok_or_else(|| {
            MdbportError::Configuration(format!(
                "Input file must be an Access database (.accdb or .mdb): {}",
                self.path.display()
            ))
        })
    }

    /// ODBC driver name, without braces
    pub fn driver_name(&self, format: AccessFormat) -> String {
        match &self.odbc_driver {
            Some(name) => name.trim_matches(|c| c == '{' || c == '}').to_string(),
            None => format.odbc_driver().to_string(),
        }
    }

    pub fn connection_string(&self, format: AccessFormat) -> String {
        format!(
            "DRIVER={{{}}};DBQ={};",
            self.driver_name(format),
            self.path.display()
        )
    }
}
