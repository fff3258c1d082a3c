//! Conversion settings

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, ConvertResult};

pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Table selection and paging rules for a conversion run. The batch size
/// is passed to each copy call instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConvertOptions {
    /// Column names treated as a row identity, compared case-insensitively,
    /// tried in order
    pub identity_columns: Vec<String>,
    /// Name prefixes of catalog objects that are never copied, compared
    /// case-sensitively
    pub system_prefixes: Vec<String>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            identity_columns: vec!["ID".to_string()],
            system_prefixes: vec!["MSys".to_string()],
        }
    }
}

impl ConvertOptions {
    pub fn with_identity_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.identity_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_system_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.system_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_system_table(&self, name: &str) -> bool {
        self.system_prefixes
            .iter()
            .any(|prefix| name.starts_with(prefix.as_str()))
    }
}

pub(crate) fn validate_batch_size(batch_size: usize) -> ConvertResult<()> {
    if batch_size == 0 {
        return Err(ConvertError::InvalidInput(
            "batch size must be at least 1".into(),
        ));
    }
    Ok(())
}

/// Output path used when none is given: the source path with its
/// extension replaced by `.sqlite`.
pub fn default_destination_path(source: &Path) -> PathBuf {
    source.with_extension("sqlite")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let options = ConvertOptions::default();
        assert_eq!(options.identity_columns, vec!["ID"]);
        assert_eq!(options.system_prefixes, vec!["MSys"]);
    }

    #[test]
    fn test_zero_batch_size_is_invalid() {
        assert!(validate_batch_size(1).is_ok());
        assert!(matches!(validate_batch_size(0), Err(ConvertError::InvalidInput(_))));
    }

    #[test]
    fn test_system_prefix_is_case_sensitive() {
        let options = ConvertOptions::default();
        assert!(options.is_system_table("MSysObjects"));
        assert!(!options.is_system_table("msysNotes"));
        assert!(!options.is_system_table("Customers"));

        let options = options.with_system_prefixes(["~TMP", "MSys"]);
        assert!(options.is_system_table("~TMPCLP1234"));
    }

    #[test]
    fn test_default_destination_path() {
        assert_eq!(
            default_destination_path(Path::new("/data/Northwind.accdb")),
            PathBuf::from("/data/Northwind.sqlite")
        );
        assert_eq!(
            default_destination_path(Path::new("legacy.v2.MDB")),
            PathBuf::from("legacy.v2.sqlite")
        );
    }
}
