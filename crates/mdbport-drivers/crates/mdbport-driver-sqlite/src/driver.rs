//! SQLite driver implementation

use async_trait::async_trait;
use mdbport_core::{Connection, ConnectionConfig, DatabaseDriver, MdbportError, Result};
use std::sync::Arc;

use crate::SqliteConnection;

/// SQLite database driver. Connections made through it are read-only;
/// writing goes through [`crate::SqliteSink`].
pub struct SqliteDriver;

impl SqliteDriver {
    pub fn new() -> Self {
        tracing::debug!("SQLite driver initialized");
        Self
    }
}

impl Default for SqliteDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseDriver for SqliteDriver {
    fn id(&self) -> &'static str {
        "sqlite"
    }

    fn name(&self) -> &'static str {
        "SQLite"
    }

    #[tracing::instrument(skip(self, config), fields(path = %config.path.display()))]
    async fn connect(&self, config: &ConnectionConfig) -> Result<Arc<dyn Connection>> {
        let path = self.build_connection_string(config);
        if path != ":memory:" && !config.path.exists() {
            return Err(MdbportError::Connection(format!(
                "SQLite database not found: {}",
                config.path.display()
            )));
        }

        let conn = SqliteConnection::open_read_only(&path).map_err(|e| {
            tracing::error!(error = %e, "failed to connect to SQLite database");
            MdbportError::Connection(format!("Failed to connect to SQLite database: {}", e))
        })?;

        tracing::info!(path = %path, "SQLite connection created");
        Ok(Arc::new(conn))
    }

    fn build_connection_string(&self, config: &ConnectionConfig) -> String {
        config.path.to_string_lossy().into_owned()
    }
}
