//! Common test utilities and mocks

#![allow(dead_code)]

use async_trait::async_trait;
use mdbport_core::{
    MdbportError, PageCursor, Result, RowBatch, TableProbe, TableSink, TableSource, Value,
    WriteMode,
};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

/// In-memory table served by [`MockSource`]
#[derive(Debug, Clone)]
pub struct MockTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl MockTable {
    pub fn new(columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    /// `ID`/`Name` table with identities `1..=count`, stored out of order
    /// so identity paging has to sort.
    pub fn with_ids(count: i64) -> Self {
        let mut ids: Vec<i64> = (1..=count).collect();
        ids.reverse();
        Self::new(
            &["ID", "Name"],
            ids.into_iter()
                .map(|id| vec![Value::Int64(id), Value::String(format!("row {}", id))])
                .collect(),
        )
    }

    /// Single `Label` column, no identity
    pub fn without_ids(count: usize) -> Self {
        Self::new(
            &["Label"],
            (0..count)
                .map(|i| vec![Value::String(format!("label {}", i))])
                .collect(),
        )
    }
}

/// Source collaborator double.
///
/// Answers identity and position reads like a SQL engine would, and can be
/// told to reject offset paging or to fail on specific tables.
pub struct MockSource {
    /// Raw catalog listing, as returned by `list_tables`
    pub catalog: Vec<String>,
    pub tables: HashMap<String, MockTable>,
    pub fail_listing: bool,
    /// Reject every position read (the Access behaviour)
    pub reject_position: bool,
    /// Reject position reads that skip at least one row
    pub reject_position_after_first: bool,
    pub fail_reads: HashSet<String>,
    pub fail_counts: HashSet<String>,
    /// Answer key checks with a rejected statement
    pub reject_key_checks: bool,
    /// Every read issued: table, cursor, limit
    pub read_log: Mutex<Vec<(String, PageCursor, usize)>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self {
            catalog: Vec::new(),
            tables: HashMap::new(),
            fail_listing: false,
            reject_position: false,
            reject_position_after_first: false,
            fail_reads: HashSet::new(),
            fail_counts: HashSet::new(),
            reject_key_checks: false,
            read_log: Mutex::new(Vec::new()),
        }
    }

    pub fn with_table(mut self, name: &str, table: MockTable) -> Self {
        self.catalog.push(name.to_string());
        self.tables.insert(name.to_string(), table);
        self
    }

    /// Add a catalog entry with no backing table
    pub fn with_catalog_entry(mut self, name: &str) -> Self {
        self.catalog.push(name.to_string());
        self
    }

    pub fn with_failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn rejecting_position_paging(mut self) -> Self {
        self.reject_position = true;
        self
    }

    pub fn rejecting_position_after_first_page(mut self) -> Self {
        self.reject_position_after_first = true;
        self
    }

    pub fn with_failing_reads(mut self, table: &str) -> Self {
        self.fail_reads.insert(table.to_string());
        self
    }

    pub fn with_failing_count(mut self, table: &str) -> Self {
        self.fail_counts.insert(table.to_string());
        self
    }

    pub fn rejecting_key_checks(mut self) -> Self {
        self.reject_key_checks = true;
        self
    }

    pub fn reads(&self) -> Vec<(String, PageCursor, usize)> {
        self.read_log.lock().clone()
    }

    fn table(&self, name: &str) -> Result<&MockTable> {
        self.tables
            .get(name)
            .ok_or_else(|| MdbportError::Query(format!("no such table: {}", name)))
    }
}

#[async_trait]
impl TableSource for MockSource {
    fn describe(&self) -> String {
        "mock".to_string()
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        if self.fail_listing {
            return Err(MdbportError::Connection("driver not installed".into()));
        }
        Ok(self.catalog.clone())
    }

    async fn probe_columns(&self, table: &str) -> Result<TableProbe> {
        let t = self.table(table)?;
        Ok(TableProbe {
            columns: t.columns.clone(),
            sample: t.rows.first().cloned(),
        })
    }

    async fn read_batch(&self, table: &str, cursor: &PageCursor, limit: usize) -> Result<RowBatch> {
        self.read_log
            .lock()
            .push((table.to_string(), cursor.clone(), limit));

        if self.fail_reads.contains(table) {
            return Err(MdbportError::Connection("network share went away".into()));
        }
        let t = self.table(table)?;

        let rows = match cursor {
            PageCursor::Unbounded => t.rows.clone(),
            PageCursor::Position { skip } => {
                if self.reject_position || (self.reject_position_after_first && *skip > 0) {
                    return Err(MdbportError::Query(
                        "Syntax error in FROM clause (OFFSET)".into(),
                    ));
                }
                t.rows
                    .iter()
                    .skip(*skip as usize)
                    .take(limit)
                    .cloned()
                    .collect()
            }
            PageCursor::Identity { column, after } => {
                let idx = t
                    .columns
                    .iter()
                    .position(|c| c == column)
                    .ok_or_else(|| MdbportError::Query(format!("no such column: {}", column)))?;
                let mut rows: Vec<Vec<Value>> = t
                    .rows
                    .iter()
                    .filter(|row| match (row[idx].as_i64(), after) {
                        (Some(id), Some(after)) => id > *after,
                        (Some(_), None) => true,
                        (None, _) => false,
                    })
                    .cloned()
                    .collect();
                rows.sort_by_key(|row| row[idx].as_i64());
                rows.truncate(limit);
                rows
            }
        };

        Ok(RowBatch::new(t.columns.clone(), rows))
    }

    async fn is_unique_key(&self, table: &str, column: &str) -> Result<bool> {
        if self.reject_key_checks {
            return Err(MdbportError::Query("Subqueries are not allowed here".into()));
        }
        let t = self.table(table)?;
        let idx = t
            .columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| MdbportError::Query(format!("no such column: {}", column)))?;

        let mut seen = HashSet::new();
        Ok(t.rows
            .iter()
            .all(|row| !row[idx].is_null() && seen.insert(format!("{:?}", row[idx]))))
    }

    async fn count_rows(&self, table: &str) -> Result<u64> {
        if self.fail_counts.contains(table) {
            return Err(MdbportError::Query("COUNT not permitted".into()));
        }
        Ok(self.table(table)?.rows.len() as u64)
    }
}

/// One call to [`MockSink::write_batch`]
#[derive(Debug, Clone, PartialEq)]
pub struct WriteCall {
    pub table: String,
    pub mode: WriteMode,
    pub rows: usize,
}

/// Destination collaborator double that keeps tables in memory
pub struct MockSink {
    pub tables: Mutex<HashMap<String, RowBatch>>,
    pub writes: Mutex<Vec<WriteCall>>,
    pub fail_tables: HashSet<String>,
    pub fail_all: bool,
    pub finished: Mutex<bool>,
}

impl MockSink {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
            writes: Mutex::new(Vec::new()),
            fail_tables: HashSet::new(),
            fail_all: false,
            finished: Mutex::new(false),
        }
    }

    pub fn failing_on(mut self, table: &str) -> Self {
        self.fail_tables.insert(table.to_string());
        self
    }

    pub fn read_only(mut self) -> Self {
        self.fail_all = true;
        self
    }

    pub fn writes(&self) -> Vec<WriteCall> {
        self.writes.lock().clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().len()
    }

    pub fn table(&self, name: &str) -> Option<RowBatch> {
        self.tables.lock().get(name).cloned()
    }

    pub fn is_finished(&self) -> bool {
        *self.finished.lock()
    }
}

#[async_trait]
impl TableSink for MockSink {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    async fn write_batch(&self, table: &str, batch: &RowBatch, mode: WriteMode) -> Result<u64> {
        if self.fail_all || self.fail_tables.contains(table) {
            return Err(MdbportError::Write("attempt to write a readonly database".into()));
        }

        self.writes.lock().push(WriteCall {
            table: table.to_string(),
            mode,
            rows: batch.len(),
        });

        let mut tables = self.tables.lock();
        match mode {
            WriteMode::Replace => {
                tables.insert(table.to_string(), batch.clone());
            }
            WriteMode::Append => {
                let existing = tables
                    .get_mut(table)
                    .ok_or_else(|| MdbportError::Write(format!("no such table: {}", table)))?;
                existing.rows.extend(batch.rows.iter().cloned());
            }
        }
        Ok(batch.len() as u64)
    }

    async fn finish(&self) -> Result<()> {
        *self.finished.lock() = true;
        Ok(())
    }
}

/// Identity values of a copied table, in stored order
pub fn ids_of(batch: &RowBatch) -> Vec<i64> {
    let idx = batch.column_index("ID").unwrap_or(0);
    batch
        .rows
        .iter()
        .filter_map(|row| row.get(idx).and_then(Value::as_i64))
        .collect()
}
