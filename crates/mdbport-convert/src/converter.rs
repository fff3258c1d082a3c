//! The table copier
//!
//! Tables are copied one at a time and each table batch by batch: a batch is
//! fully written to the sink before the next one is read, so memory use is
//! bounded by the batch size. A table that fails is recorded and the run
//! moves on to the next one.

use mdbport_core::{MdbportError, PageCursor, Result, TableSink, TableSource, WriteMode};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::error::{ConvertError, ConvertResult, TableConversionError};
use crate::options::{ConvertOptions, validate_batch_size};
use crate::progress::{ProgressCallback, ProgressEvent};
use crate::report::{ConversionReport, DatabaseSummary, TableOutcome, TableSummary};
use crate::strategy::PagingStrategy;

/// Polled before every batch read; returning `false` stops the run after
/// the write in flight.
pub type ContinueCheck = Arc<dyn Fn() -> bool + Send + Sync>;

pub struct Converter {
    source: Arc<dyn TableSource>,
    options: ConvertOptions,
    progress: Option<ProgressCallback>,
    should_continue: Option<ContinueCheck>,
}

impl Converter {
    pub fn new(source: Arc<dyn TableSource>, options: ConvertOptions) -> Self {
        Self {
            source,
            options,
            progress: None,
            should_continue: None,
        }
    }

    pub fn with_progress(mut self, callback: impl Fn(&ProgressEvent) + Send + Sync + 'static) -> Self {
        self.progress = Some(Arc::new(callback));
        self
    }

    pub fn with_continue_check(mut self, check: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.should_continue = Some(Arc::new(check));
        self
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(callback) = &self.progress {
            callback(&event);
        }
    }

    fn cancelled(&self) -> bool {
        self.should_continue.as_ref().is_some_and(|check| !check())
    }

    /// User tables and views of the source: system-prefixed names removed,
    /// duplicates dropped, sorted by byte order.
    #[tracing::instrument(skip(self), fields(source = %self.source.describe()))]
    pub async fn list_tables(&self) -> ConvertResult<Vec<String>> {
        let names = self
            .source
            .list_tables()
            .await
            .map_err(ConvertError::SourceUnavailable)?;

        let tables: BTreeSet<String> = names
            .into_iter()
            .filter(|name| !self.options.is_system_table(name))
            .collect();

        tracing::debug!(table_count = tables.len(), "tables listed");
        Ok(tables.into_iter().collect())
    }

    /// Identity paging needs a non-null, duplicate-free column. Anything
    /// else is paged by position, as is a source that cannot run the check.
    async fn confirm_identity(
        &self,
        table: &str,
        strategy: PagingStrategy,
    ) -> Result<PagingStrategy> {
        let column = match &strategy {
            PagingStrategy::Identity { column } => column.clone(),
            PagingStrategy::Position => return Ok(strategy),
        };

        match self.source.is_unique_key(table, &column).await {
            Ok(true) => Ok(strategy),
            Ok(false) => {
                tracing::warn!(
                    table = %table,
                    column = %column,
                    "identity column has NULL or repeated values, paging by position"
                );
                Ok(PagingStrategy::Position)
            }
            Err(e) if e.is_query_rejection() => {
                tracing::warn!(
                    table = %table,
                    column = %column,
                    error = %e,
                    "key check rejected, paging by position"
                );
                Ok(PagingStrategy::Position)
            }
            Err(e) => Err(e),
        }
    }

    /// Copy one table into `sink`, returning the number of rows written.
    ///
    /// The first batch replaces any table of the same name in the sink; later
    /// batches append. A table with no rows is never written.
    #[tracing::instrument(skip(self, sink), fields(sink = %sink.describe()))]
    pub async fn copy_table(
        &self,
        sink: &dyn TableSink,
        table: &str,
        batch_size: usize,
    ) -> ConvertResult<u64> {
        validate_batch_size(batch_size)?;
        let fail = |cause: MdbportError| ConvertError::Table(TableConversionError::new(table, cause));

        let probe = self.source.probe_columns(table).await.map_err(fail)?;
        let strategy = PagingStrategy::choose(&probe, &self.options.identity_columns);
        let strategy = self.confirm_identity(table, strategy).await.map_err(fail)?;
        tracing::info!(table = %table, ?strategy, columns = probe.columns.len(), "converting table");

        let mut cursor = strategy.first_cursor();
        let mut rows_written = 0u64;
        let mut batches = 0usize;

        loop {
            if self.cancelled() {
                tracing::warn!(table = %table, rows_written, "conversion cancelled");
                return Err(ConvertError::Cancelled {
                    table: table.to_string(),
                    rows_written,
                });
            }

            let batch = match self.source.read_batch(table, &cursor, batch_size).await {
                Ok(batch) => batch,
                Err(e) if cursor.is_first_position_page() && e.is_query_rejection() => {
                    tracing::warn!(
                        table = %table,
                        error = %e,
                        "paged read rejected, reading the whole table at once"
                    );
                    cursor = PageCursor::Unbounded;
                    self.source
                        .read_batch(table, &cursor, batch_size)
                        .await
                        .map_err(fail)?
                }
                Err(e) => return Err(fail(e)),
            };

            if batch.is_empty() {
                break;
            }

            let mode = if batches == 0 {
                WriteMode::Replace
            } else {
                WriteMode::Append
            };
            let written = sink.write_batch(table, &batch, mode).await.map_err(fail)?;
            rows_written += written;
            batches += 1;

            tracing::info!(table = %table, rows_written, "processed rows");
            self.emit(ProgressEvent::BatchWritten {
                table: table.to_string(),
                batch: batches,
                rows_in_batch: written,
                rows_in_table: rows_written,
            });

            match strategy.next_cursor(&cursor, &batch).map_err(fail)? {
                Some(next) => cursor = next,
                None => break,
            }
        }

        tracing::info!(table = %table, rows = rows_written, batches, "table converted");
        Ok(rows_written)
    }

    /// Copy every listed table in order, recording a per-table outcome.
    ///
    /// Only a failure to list the source, an invalid batch size or a failure
    /// to set up the run is returned as an error; table failures end up in
    /// the report.
    #[tracing::instrument(skip(self, sink), fields(source = %self.source.describe(), sink = %sink.describe()))]
    pub async fn copy_all_tables(
        &self,
        sink: &dyn TableSink,
        batch_size: usize,
    ) -> ConvertResult<ConversionReport> {
        validate_batch_size(batch_size)?;
        let tables = self.list_tables().await?;
        tracing::info!(table_count = tables.len(), "found tables to convert");
        self.emit(ProgressEvent::RunStarted {
            total_tables: tables.len(),
        });

        let mut report = ConversionReport::default();
        let mut write_failures = 0usize;

        for (index, table) in tables.iter().enumerate() {
            if self.cancelled() {
                report.cancelled = true;
                break;
            }

            self.emit(ProgressEvent::TableStarted {
                table: table.clone(),
                index,
                total_tables: tables.len(),
            });

            match self.copy_table(sink, table, batch_size).await {
                Ok(rows) => {
                    self.emit(ProgressEvent::TableFinished {
                        table: table.clone(),
                        rows,
                    });
                    report.record(table.as_str(), TableOutcome::Copied { rows });
                }
                Err(ConvertError::Table(e)) => {
                    tracing::error!(table = %table, error = %e.cause, "failed to convert table");
                    if e.is_write_failure() {
                        write_failures += 1;
                    }
                    let error = e.cause.to_string();
                    self.emit(ProgressEvent::TableFailed {
                        table: table.clone(),
                        error: error.clone(),
                    });
                    report.record(table.as_str(), TableOutcome::Failed { error });
                }
                Err(ConvertError::Cancelled { rows_written, .. }) => {
                    report.record(table.as_str(), TableOutcome::Cancelled { rows: rows_written });
                    report.cancelled = true;
                    break;
                }
                Err(other) => return Err(other),
            }
        }

        if !report.tables.is_empty() && write_failures == report.tables.len() {
            let warning = format!(
                "every table failed to write to {}; the destination may be read-only or full",
                sink.describe()
            );
            tracing::warn!("{}", warning);
            report.warnings.push(warning);
        }

        if let Err(e) = sink.finish().await {
            tracing::warn!(error = %e, "failed to close destination");
            report.warnings.push(format!("failed to close destination: {}", e));
        }

        tracing::info!(
            copied = report.copied_count(),
            attempted = report.tables.len(),
            rows = report.total_rows(),
            cancelled = report.cancelled,
            "conversion finished"
        );
        Ok(report)
    }

    /// Table names and row counts. A table whose count fails is listed
    /// with zero records and a warning.
    #[tracing::instrument(skip(self), fields(source = %self.source.describe()))]
    pub async fn database_info(&self) -> ConvertResult<DatabaseSummary> {
        let tables = self.list_tables().await?;
        let mut summary = DatabaseSummary::default();

        for name in tables {
            let records = match self.source.count_rows(&name).await {
                Ok(count) => count,
                Err(e) => {
                    tracing::warn!(table = %name, error = %e, "could not count records");
                    summary
                        .warnings
                        .push(format!("could not count records in '{}': {}", name, e));
                    0
                }
            };
            summary.total_records += records;
            summary.tables.push(TableSummary { name, records });
        }

        Ok(summary)
    }
}

