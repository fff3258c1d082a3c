//! Progress events and the overall-percentage estimate

use serde::Serialize;
use std::sync::Arc;

/// Rows after which a table counts as fully done for the in-table part of
/// the estimate. Row totals are not known up front.
pub const ROWS_PER_TABLE_ESTIMATE: u64 = 1000;

/// Something observable happened during a run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    RunStarted {
        total_tables: usize,
    },
    TableStarted {
        table: String,
        /// Zero-based position in the run
        index: usize,
        total_tables: usize,
    },
    BatchWritten {
        table: String,
        /// One-based batch number within the table
        batch: usize,
        rows_in_batch: u64,
        rows_in_table: u64,
    },
    TableFinished {
        table: String,
        rows: u64,
    },
    TableFailed {
        table: String,
        error: String,
    },
}

pub type ProgressCallback = Arc<dyn Fn(&ProgressEvent) + Send + Sync>;

/// `100 * (tables_completed / total_tables + (rows / 1000) / total_tables)`,
/// clamped to `[0, 100]`. Zero when there is nothing to convert.
///
/// The in-table term is an estimate and is not capped per table, so a large
/// table can push the figure to 100 before the run ends.
pub fn overall_percent(tables_completed: usize, total_tables: usize, rows_in_current_table: u64) -> f64 {
    if total_tables == 0 {
        return 0.0;
    }
    let total = total_tables as f64;
    let in_table = rows_in_current_table as f64 / ROWS_PER_TABLE_ESTIMATE as f64;
    let percent = 100.0 * (tables_completed as f64 / total + in_table / total);
    percent.clamp(0.0, 100.0)
}

/// Folds events into the numbers a progress display needs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressTracker {
    pub total_tables: usize,
    /// Tables that finished, failed or were skipped
    pub tables_completed: usize,
    pub current_table: Option<String>,
    pub rows_in_table: u64,
    pub rows_total: u64,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, event: &ProgressEvent) {
        match event {
            ProgressEvent::RunStarted { total_tables } => {
                *self = Self {
                    total_tables: *total_tables,
                    ..Self::default()
                };
            }
            ProgressEvent::TableStarted { table, .. } => {
                self.current_table = Some(table.clone());
                self.rows_in_table = 0;
            }
            ProgressEvent::BatchWritten {
                rows_in_batch,
                rows_in_table,
                ..
            } => {
                self.rows_in_table = *rows_in_table;
                self.rows_total += rows_in_batch;
            }
            ProgressEvent::TableFinished { .. } | ProgressEvent::TableFailed { .. } => {
                self.tables_completed += 1;
                self.current_table = None;
                self.rows_in_table = 0;
            }
        }
    }

    pub fn percent(&self) -> f64 {
        overall_percent(self.tables_completed, self.total_tables, self.rows_in_table)
    }
}

#[cfg(test)]
mod tests;
