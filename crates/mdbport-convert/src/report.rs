//! What a run or an info query produced

use serde::Serialize;

/// Result of copying one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TableOutcome {
    Copied { rows: u64 },
    Failed { error: String },
    /// Stopped by cancellation; the rows already written stay in place
    Cancelled { rows: u64 },
}

impl TableOutcome {
    pub fn rows(&self) -> u64 {
        match self {
            TableOutcome::Copied { rows } | TableOutcome::Cancelled { rows } => *rows,
            TableOutcome::Failed { .. } => 0,
        }
    }

    pub fn is_copied(&self) -> bool {
        matches!(self, TableOutcome::Copied { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableReport {
    pub table: String,
    #[serde(flatten)]
    pub outcome: TableOutcome,
}

/// Per-table outcomes of a conversion run, in the order tables were
/// attempted. Tables after a cancellation are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    pub tables: Vec<TableReport>,
    pub cancelled: bool,
    pub warnings: Vec<String>,
}

impl ConversionReport {
    pub fn record(&mut self, table: impl Into<String>, outcome: TableOutcome) {
        self.tables.push(TableReport {
            table: table.into(),
            outcome,
        });
    }

    pub fn outcome(&self, table: &str) -> Option<&TableOutcome> {
        self.tables
            .iter()
            .find(|report| report.table == table)
            .map(|report| &report.outcome)
    }

    pub fn total_rows(&self) -> u64 {
        self.tables.iter().map(|report| report.outcome.rows()).sum()
    }

    pub fn copied_count(&self) -> usize {
        self.tables
            .iter()
            .filter(|report| report.outcome.is_copied())
            .count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &TableReport> {
        self.tables
            .iter()
            .filter(|report| matches!(report.outcome, TableOutcome::Failed { .. }))
    }

    /// Every attempted table was copied and the run was not cancelled.
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.tables.iter().all(|report| report.outcome.is_copied())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub name: String,
    pub records: u64,
}

/// Table names and row counts of a source database
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatabaseSummary {
    pub tables: Vec<TableSummary>,
    pub total_records: u64,
    /// Tables whose count failed; they are listed with zero records
    pub warnings: Vec<String>,
}

impl DatabaseSummary {
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
