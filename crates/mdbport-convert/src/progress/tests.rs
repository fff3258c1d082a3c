use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_no_tables_is_zero() {
    assert_eq!(overall_percent(0, 0, 5000), 0.0);
}

#[test]
fn test_in_table_rows_add_to_completed_tables() {
    assert_eq!(overall_percent(0, 4, 0), 0.0);
    assert_eq!(overall_percent(0, 4, 500), 12.5);
    assert_eq!(overall_percent(1, 4, 1000), 50.0);
    assert_eq!(overall_percent(1, 4, 2000), 75.0);
}

#[test]
fn test_large_table_only_clamps_the_total() {
    assert_eq!(overall_percent(0, 2, 5000), 100.0);
    assert_eq!(overall_percent(1, 4, 250_000), 100.0);
    assert_eq!(overall_percent(0, 10, 3000), 30.0);
}

#[test]
fn test_result_is_clamped() {
    assert_eq!(overall_percent(4, 4, 0), 100.0);
    assert_eq!(overall_percent(4, 4, 999), 100.0);
    assert_eq!(overall_percent(9, 4, 0), 100.0);
}

#[test]
fn test_tracker_follows_a_run() {
    let mut tracker = ProgressTracker::new();
    tracker.observe(&ProgressEvent::RunStarted { total_tables: 2 });
    tracker.observe(&ProgressEvent::TableStarted {
        table: "A".into(),
        index: 0,
        total_tables: 2,
    });
    tracker.observe(&ProgressEvent::BatchWritten {
        table: "A".into(),
        batch: 1,
        rows_in_batch: 500,
        rows_in_table: 500,
    });
    assert_eq!(tracker.percent(), 25.0);
    assert_eq!(tracker.current_table.as_deref(), Some("A"));

    tracker.observe(&ProgressEvent::TableFinished {
        table: "A".into(),
        rows: 500,
    });
    tracker.observe(&ProgressEvent::TableStarted {
        table: "B".into(),
        index: 1,
        total_tables: 2,
    });
    tracker.observe(&ProgressEvent::TableFailed {
        table: "B".into(),
        error: "boom".into(),
    });

    assert_eq!(tracker.tables_completed, 2);
    assert_eq!(tracker.rows_total, 500);
    assert_eq!(tracker.percent(), 100.0);
}
