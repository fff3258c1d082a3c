//! Integration tests for table listing, whole-database runs and info queries

mod common;

use mdbport_convert::{
    ConvertError, ConvertOptions, Converter, ProgressEvent, ProgressTracker, TableOutcome,
};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::sync::Arc;

use common::{MockSink, MockSource, MockTable};

fn converter(source: MockSource) -> Converter {
    Converter::new(Arc::new(source), ConvertOptions::default())
}

// ============ list_tables ============

#[tokio::test]
async fn list_tables_filters_dedupes_and_sorts() {
    let source = MockSource::new()
        .with_catalog_entry("Zeta")
        .with_catalog_entry("MSysX")
        .with_catalog_entry("alpha")
        .with_catalog_entry("alpha");

    let tables = converter(source).list_tables().await.unwrap();

    assert_eq!(tables, vec!["Zeta", "alpha"]);
}

#[tokio::test]
async fn list_tables_honours_configured_prefixes() {
    let source = MockSource::new()
        .with_catalog_entry("~TMPCLP4411")
        .with_catalog_entry("MSysObjects")
        .with_catalog_entry("Orders");
    let options = ConvertOptions::default().with_system_prefixes(["~TMP"]);

    let tables = Converter::new(Arc::new(source), options)
        .list_tables()
        .await
        .unwrap();

    assert_eq!(tables, vec!["MSysObjects", "Orders"]);
}

#[tokio::test]
async fn unreachable_source_is_source_unavailable() {
    let err = converter(MockSource::new().with_failing_listing())
        .list_tables()
        .await
        .unwrap_err();

    assert!(matches!(err, ConvertError::SourceUnavailable(_)));
}

// ============ copy_all_tables ============

#[tokio::test]
async fn failing_table_does_not_stop_the_run() {
    // Failing table sorts first in one run and last in the other
    for (good, bad) in [("B_ok", "A_bad"), ("A_ok", "B_bad")] {
        let source = MockSource::new()
            .with_table(good, MockTable::with_ids(3))
            .with_table(bad, MockTable::with_ids(3))
            .with_failing_reads(bad);
        let sink = MockSink::new();

        let report = converter(source).copy_all_tables(&sink, 2).await.unwrap();

        assert_eq!(report.outcome(good), Some(&TableOutcome::Copied { rows: 3 }));
        assert!(matches!(report.outcome(bad), Some(TableOutcome::Failed { .. })));
        assert_eq!(report.total_rows(), 3);
        assert!(!report.is_complete());
        assert!(report.warnings.is_empty());
        assert!(sink.is_finished());
    }
}

#[tokio::test]
async fn tables_are_copied_in_sorted_order() {
    let source = MockSource::new()
        .with_table("b", MockTable::with_ids(1))
        .with_table("MSysACEs", MockTable::with_ids(1))
        .with_table("C", MockTable::with_ids(1))
        .with_table("a", MockTable::with_ids(1));
    let sink = MockSink::new();

    let report = converter(source).copy_all_tables(&sink, 10).await.unwrap();

    let order: Vec<&str> = report.tables.iter().map(|t| t.table.as_str()).collect();
    assert_eq!(order, vec!["C", "a", "b"]);
    let written: Vec<String> = sink.writes().into_iter().map(|w| w.table).collect();
    assert_eq!(written, vec!["C", "a", "b"]);
    assert!(report.is_complete());
}

#[tokio::test]
async fn every_write_failing_adds_a_warning() {
    let source = MockSource::new()
        .with_table("A", MockTable::with_ids(2))
        .with_table("B", MockTable::with_ids(2));

    let report = converter(source)
        .copy_all_tables(&MockSink::new().read_only(), 10)
        .await
        .unwrap();

    assert_eq!(report.failed().count(), 2);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("every table failed to write"));
}

#[tokio::test]
async fn source_failures_do_not_warn_about_the_destination() {
    let source = MockSource::new()
        .with_table("A", MockTable::with_ids(2))
        .with_failing_reads("A");

    let report = converter(source)
        .copy_all_tables(&MockSink::new(), 10)
        .await
        .unwrap();

    assert_eq!(report.failed().count(), 1);
    assert!(report.warnings.is_empty());
}

#[tokio::test]
async fn empty_database_produces_an_empty_report() {
    let sink = MockSink::new();

    let report = converter(MockSource::new().with_catalog_entry("MSysObjects"))
        .copy_all_tables(&sink, 10)
        .await
        .unwrap();

    assert!(report.tables.is_empty());
    assert!(report.warnings.is_empty());
    assert_eq!(sink.write_count(), 0);
}

#[tokio::test]
async fn listing_failure_aborts_the_run() {
    let err = converter(MockSource::new().with_failing_listing())
        .copy_all_tables(&MockSink::new(), 10)
        .await
        .unwrap_err();

    assert!(matches!(err, ConvertError::SourceUnavailable(_)));
}

#[tokio::test]
async fn cancellation_keeps_finished_tables() {
    let source = Arc::new(
        MockSource::new()
            .with_table("A", MockTable::with_ids(4))
            .with_table("B", MockTable::with_ids(4))
            .with_table("C", MockTable::with_ids(4)),
    );
    let sink = Arc::new(MockSink::new());

    // Allow A's two batches and B's first
    let observed = sink.clone();
    let converter = Converter::new(source, ConvertOptions::default())
        .with_continue_check(move || observed.write_count() < 3);

    let report = converter.copy_all_tables(sink.as_ref(), 2).await.unwrap();

    assert!(report.cancelled);
    assert_eq!(report.outcome("A"), Some(&TableOutcome::Copied { rows: 4 }));
    assert_eq!(report.outcome("B"), Some(&TableOutcome::Cancelled { rows: 2 }));
    assert_eq!(report.outcome("C"), None);
    assert_eq!(sink.table("A").unwrap().len(), 4);
    assert_eq!(sink.table("B").unwrap().len(), 2);
    assert!(sink.is_finished());
}

#[tokio::test]
async fn progress_events_drive_the_tracker_to_completion() {
    let tracker = Arc::new(Mutex::new(ProgressTracker::new()));
    let events = Arc::new(Mutex::new(Vec::new()));
    let (t, e) = (tracker.clone(), events.clone());

    let source = MockSource::new()
        .with_table("A", MockTable::with_ids(3))
        .with_table("B", MockTable::with_ids(1))
        .with_failing_reads("B");
    let converter = Converter::new(Arc::new(source), ConvertOptions::default()).with_progress(
        move |event| {
            t.lock().observe(event);
            e.lock().push(event.clone());
        },
    );

    converter.copy_all_tables(&MockSink::new(), 10).await.unwrap();

    let tracker = tracker.lock();
    assert_eq!(tracker.total_tables, 2);
    assert_eq!(tracker.tables_completed, 2);
    assert_eq!(tracker.rows_total, 3);
    assert_eq!(tracker.percent(), 100.0);

    let events = events.lock();
    assert_eq!(events.first(), Some(&ProgressEvent::RunStarted { total_tables: 2 }));
    assert!(matches!(events.last(), Some(ProgressEvent::TableFailed { table, .. }) if table == "B"));
}

// ============ database_info ============

#[tokio::test]
async fn database_info_counts_every_table() {
    let source = MockSource::new()
        .with_table("Orders", MockTable::with_ids(12))
        .with_table("Notes", MockTable::without_ids(3))
        .with_table("MSysQueries", MockTable::with_ids(99));

    let summary = converter(source).database_info().await.unwrap();

    assert_eq!(summary.table_names(), vec!["Notes", "Orders"]);
    assert_eq!(summary.total_records, 15);
    assert!(summary.warnings.is_empty());
}

#[tokio::test]
async fn database_info_survives_count_failures() {
    let source = MockSource::new()
        .with_table("Orders", MockTable::with_ids(12))
        .with_table("Locked", MockTable::with_ids(5))
        .with_failing_count("Locked");

    let summary = converter(source).database_info().await.unwrap();

    assert_eq!(summary.table_names(), vec!["Locked", "Orders"]);
    assert_eq!(summary.tables[0].records, 0);
    assert_eq!(summary.total_records, 12);
    assert_eq!(summary.warnings.len(), 1);
    assert!(summary.warnings[0].contains("Locked"));
}
