//! Structured logging for the aipack CLI.
//!
//! Dual-mode output on stderr:
//! - Human-readable console lines for interactive use
//! - JSON lines for agent/automation workflows
//!
//! stdout is reserved for the run summary payload; all log output goes to
//! stderr. The filter can be overridden with the `AIPACK_LOG` environment
//! variable using `tracing_subscriber::EnvFilter` syntax.

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable overriding the log filter.
pub const LOG_ENV: &str = "AIPACK_LOG";

/// Log output modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable console output
    #[default]
    Human,
    /// Machine-parseable JSON lines
    Json,
}

/// Initialize the logging subsystem.
///
/// Verbosity maps to a default filter (`warn` < `info` < `debug` < `trace`);
/// `quiet` forces errors only. Safe to call more than once; later calls are
/// no-ops.
pub fn init_logging(verbosity: u8, quiet: bool, color: bool, format: LogFormat) {
    let level = if quiet {
        "error"
    } else {
        match verbosity {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(color);

    let result = match format {
        LogFormat::Human => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    // Already initialized (e.g. repeated calls under test): keep the first.
    let _ = result;
}
