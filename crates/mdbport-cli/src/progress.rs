//! Terminal output for conversions
//!
//! A progress bar driven by [`ProgressTracker`] plus the plain-text
//! header, info listing and summary printed around a run.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use mdbport_convert::{
    ConversionReport, DatabaseSummary, ProgressEvent, ProgressTracker, TableOutcome,
};
use parking_lot::Mutex;
use std::path::Path;
use std::time::Duration;

/// Progress bar that follows conversion events
pub struct ProgressReporter {
    bar: ProgressBar,
    tracker: Mutex<ProgressTracker>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::new(100);

        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {msg}")
            .map(|s| s.progress_chars("=> ").tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(100));

        Self {
            bar,
            tracker: Mutex::new(ProgressTracker::new()),
        }
    }

    /// Feed one conversion event into the display
    pub fn observe(&self, event: &ProgressEvent) {
        let mut tracker = self.tracker.lock();
        tracker.observe(event);

        match event {
            ProgressEvent::TableFinished { table, rows } => {
                self.bar.println(format!(
                    "  {} {} ({} rows)",
                    style("✓").green(),
                    table,
                    format_number(*rows)
                ));
            }
            ProgressEvent::TableFailed { table, error } => {
                self.bar.println(format!(
                    "  {} {}: {}",
                    style("✗").red(),
                    table,
                    error
                ));
            }
            _ => {}
        }

        let percent = tracker.percent();
        self.bar.set_position(percent.round() as u64);
        self.bar.set_message(status_line(&tracker, percent));
    }

    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn status_line(tracker: &ProgressTracker, percent: f64) -> String {
    match &tracker.current_table {
        Some(table) => format!(
            "{:.1}% | Table {}/{}: {} | Rows: {}",
            percent,
            (tracker.tables_completed + 1).min(tracker.total_tables),
            tracker.total_tables,
            table,
            format_number(tracker.rows_in_table)
        ),
        None => format!("{:.1}% | Rows: {}", percent, format_number(tracker.rows_total)),
    }
}

/// Format a number with thousands separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let bytes: Vec<_> = s.bytes().rev().collect();

    let chunks: Vec<String> = bytes
        .chunks(3)
        .map(|chunk| chunk.iter().rev().map(|&b| b as char).collect::<String>())
        .collect();

    chunks.into_iter().rev().collect::<Vec<_>>().join(",")
}

/// Print the tables of a database and their record counts
pub fn print_info(source: &Path, summary: &DatabaseSummary) {
    println!();
    println!("{} {}", style("Database:").cyan().bold(), source.display());
    println!("{}", style("─".repeat(50)).dim());
    for table in &summary.tables {
        println!("  {:<36} {:>12}", table.name, format_number(table.records));
    }
    println!("{}", style("─".repeat(50)).dim());
    println!(
        "  {} {} tables, {} records",
        style("Total:").bold(),
        summary.tables.len(),
        format_number(summary.total_records)
    );
    for warning in &summary.warnings {
        println!("  {} {}", style("Warning:").yellow().bold(), warning);
    }
    println!();
}

/// Print a header at the start of a conversion
pub fn print_header(source: &Path, output: &Path, chunk_size: usize) {
    println!();
    println!(
        "{} {}",
        style("mdbport").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style("─".repeat(50)).dim());
    println!("  {} {}", style("Source:").bold(), source.display());
    println!("  {} {}", style("Output:").bold(), output.display());
    println!("  {} {}", style("Chunk size:").bold(), format_number(chunk_size as u64));
    println!();
}

/// Print a summary of the conversion results
pub fn print_summary(report: &ConversionReport, duration: Duration, output: &Path) {
    let duration_secs = duration.as_secs_f64();
    let total_rows = report.total_rows();
    let rate = if duration_secs > 0.0 {
        total_rows as f64 / duration_secs
    } else {
        0.0
    };

    let heading = if report.cancelled {
        style("Conversion Cancelled").yellow().bold()
    } else if report.is_complete() {
        style("Conversion Complete").green().bold()
    } else {
        style("Conversion Finished With Errors").yellow().bold()
    };

    println!();
    println!("{}", heading);
    println!("{}", style("─".repeat(50)).dim());
    for entry in &report.tables {
        let status = match &entry.outcome {
            TableOutcome::Copied { rows } => format!("{} rows", format_number(*rows)),
            TableOutcome::Cancelled { rows } => {
                format!("cancelled after {} rows", format_number(*rows))
            }
            TableOutcome::Failed { error } => format!("failed: {}", error),
        };
        println!("  {:<36} {}", entry.table, status);
    }
    println!("{}", style("─".repeat(50)).dim());
    println!(
        "  {} {}/{}",
        style("Tables copied:").bold(),
        report.copied_count(),
        report.tables.len()
    );
    println!("  {} {}", style("Rows:").bold(), format_number(total_rows));
    println!(
        "  {} {:.1}s ({:.0} rows/sec)",
        style("Duration:").bold(),
        duration_secs,
        rate
    );
    let failures = report.failed().count();
    if failures > 0 {
        println!(
            "  {} {}",
            style("Failed tables:").yellow().bold(),
            failures
        );
    }
    for warning in &report.warnings {
        println!("  {} {}", style("Warning:").yellow().bold(), warning);
    }
    println!("  {} {}", style("Database:").bold(), output.display());
    println!();
}
