//! Database driver trait definition

use crate::{Connection, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Core driver trait that all database drivers must implement
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    /// Short identifier used in connection configs ("access", "sqlite")
    fn id(&self) -> &'static str;

    /// Human-readable name ("Microsoft Access", "SQLite")
    fn name(&self) -> &'static str;

    /// Create a new connection
    async fn connect(&self, config: &ConnectionConfig) -> Result<Arc<dyn Connection>>;

    /// Build a connection string from configuration
    fn build_connection_string(&self, config: &ConnectionConfig) -> String;
}

/// Connection configuration for file-based databases
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Driver ID (e.g., "access", "sqlite")
    pub driver: String,
    /// Database file path
    pub path: PathBuf,
    /// Additional connection parameters
    pub params: HashMap<String, String>,
}

impl ConnectionConfig {
    /// Create a new configuration with default values
    pub fn new(driver: &str, path: impl AsRef<Path>) -> Self {
        Self {
            driver: driver.to_string(),
            path: path.as_ref().to_path_buf(),
            params: HashMap::new(),
        }
    }

    /// Create a SQLite configuration
    pub fn new_sqlite(path: impl AsRef<Path>) -> Self {
        Self::new("sqlite", path)
    }

    /// Create a Microsoft Access configuration
    pub fn new_access(path: impl AsRef<Path>) -> Self {
        Self::new("access", path)
    }

    /// Builder-style parameter setter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Get a parameter as a string
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.params.get(key).cloned()
    }
}
