//! Microsoft Access driver implementation

use async_trait::async_trait;
use mdbport_core::{Connection, ConnectionConfig, DatabaseDriver, MdbportError, Result};
use std::sync::Arc;

use crate::AccessConfig;

/// Microsoft Access database driver
pub struct AccessDriver;

impl AccessDriver {
    pub fn new() -> Self {
        tracing::debug!(odbc = cfg!(feature = "odbc"), "Access driver initialized");
        Self
    }
}

impl Default for AccessDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseDriver for AccessDriver {
    fn id(&self) -> &'static str {
        "access"
    }

    fn name(&self) -> &'static str {
        "Microsoft Access"
    }

    /// Validation failures come back unchanged (`NotFound`,
    /// `Configuration`); anything after that is a `Connection` error.
    #[tracing::instrument(skip(self, config), fields(path = %config.path.display()))]
    async fn connect(&self, config: &ConnectionConfig) -> Result<Arc<dyn Connection>> {
        let access = AccessConfig::from_connection_config(config);
        let format = access.validate()?;
        tracing::debug!(driver = %access.driver_name(format), "selected ODBC driver");

        #[cfg(feature = "odbc")]
        {
            let conn_str = access.connection_string(format);
            let path = access.path.display().to_string();
            let conn = crate::AccessConnection::open(&conn_str, &path).map_err(|e| {
                tracing::error!(error = %e, "failed to connect to Access database");
                MdbportError::from(e)
            })?;
            tracing::info!(path = %path, "Access connection created");
            Ok(Arc::new(conn))
        }

        #[cfg(not(feature = "odbc"))]
        {
            Err(MdbportError::Connection(format!(
                "mdbport was built without ODBC support; rebuild with the `odbc` feature to read {}",
                access.path.display()
            )))
        }
    }

    fn build_connection_string(&self, config: &ConnectionConfig) -> String {
        let access = AccessConfig::from_connection_config(config);
        let format =
            crate::AccessFormat::from_path(&access.path).unwrap_or(crate::AccessFormat::Accdb);
        access.connection_string(format)
    }
}
