//! mdbport - convert Microsoft Access databases to SQLite
//!
//! ```text
//! mdbport Northwind.accdb                 # writes Northwind.sqlite
//! mdbport legacy.mdb -o out.db -c 5000    # custom output and chunk size
//! mdbport Northwind.accdb --info          # list tables and record counts
//! ```

mod args;
mod logging;
mod progress;

use anyhow::{Context, Result, bail};
use args::CliArgs;
use clap::Parser;
use mdbport_convert::{ConvertOptions, Converter, SqlSource, SqliteSink, open_access};
use progress::{ProgressReporter, print_header, print_info, print_summary};
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{error, info, warn};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: CliArgs) -> Result<()> {
    logging::init(logging::LoggingConfig::for_cli(args.verbose))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    runtime.block_on(run_async(args))
}

async fn run_async(args: CliArgs) -> Result<()> {
    let source = Arc::new(
        open_access(&args.access_config())
            .await
            .with_context(|| format!("Failed to open {}", args.source.display()))?,
    );
    let converter = Converter::new(source.clone(), ConvertOptions::default());

    let summary = converter
        .database_info()
        .await
        .context("Failed to read database information")?;

    if args.info {
        if args.json {
            println!("{}", summary.to_json()?);
        } else {
            print_info(&args.source, &summary);
        }
        close_source(&source).await;
        return Ok(());
    }

    let destination = args.destination();
    if !args.json {
        print_info(&args.source, &summary);
        print_header(&args.source, &destination, args.chunk_size);
    }

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\nInterrupt received, stopping after the current batch...");
                running.store(false, Ordering::SeqCst);
            }
        });
    }

    let mut converter = converter.with_continue_check({
        let running = running.clone();
        move || running.load(Ordering::SeqCst)
    });

    let reporter = (!args.quiet).then(|| Arc::new(ProgressReporter::new()));
    if let Some(reporter) = &reporter {
        let reporter = reporter.clone();
        converter = converter.with_progress(move |event| reporter.observe(event));
    }

    info!(
        source = %args.source.display(),
        destination = %destination.display(),
        chunk_size = args.chunk_size,
        "Starting conversion"
    );
    let started = Instant::now();
    let sink = SqliteSink::new(&destination);
    let result = converter.copy_all_tables(&sink, args.chunk_size).await;

    if let Some(reporter) = &reporter {
        reporter.finish_and_clear();
    }
    close_source(&source).await;

    let report = result.context("Conversion failed")?;
    for warning in &report.warnings {
        warn!("{}", warning);
    }

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print_summary(&report, started.elapsed(), &destination);
    }

    if report.cancelled {
        bail!("Conversion cancelled; tables already copied remain in {}", destination.display());
    }

    Ok(())
}

async fn close_source(source: &SqlSource) {
    if let Err(e) = source.close().await {
        warn!("Failed to close source database: {}", e);
    }
}
