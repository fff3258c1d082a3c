//! Logging setup for the command-line tool
//!
//! Logs go to stderr so that `--json` output on stdout stays parseable.
//! `RUST_LOG` takes precedence over the filter chosen from the flags.

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default log level filter
    pub default_filter: String,

    /// Whether to include file/line information in logs
    pub include_location: bool,

    /// Whether to colour the output
    pub ansi: bool,
}

impl LoggingConfig {
    pub fn for_cli(verbose: bool) -> Self {
        let default_filter = if verbose {
            "debug,rusqlite=info"
        } else {
            "info"
        };

        Self {
            default_filter: default_filter.to_string(),
            include_location: verbose,
            ansi: console::Term::stderr().features().colors_supported(),
        }
    }
}

pub fn init(config: LoggingConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(config.include_location)
        .with_thread_ids(false)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_ansi(config.ansi)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    tracing::debug!(filter = %config.default_filter, "logging initialized");
    Ok(())
}
