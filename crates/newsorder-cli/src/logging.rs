//! Log subscriber setup
//!
//! Logs go to stderr. `RUST_LOG` overrides the verbosity flags; JSON report
//! output switches the log lines to JSON as well.

use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::OutputFormat;

/// Filter from `RUST_LOG`, falling back to the configured verbosity
pub fn env_filter(config: &CliConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.verbosity.default_filter()))
}

/// Log lines name their module at `-v` and above
#[must_use]
pub const fn show_targets(config: &CliConfig) -> bool {
    config.verbosity.is_verbose()
}

/// Install the global subscriber
pub fn init_logging(config: &CliConfig) -> CliResult<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(std::io::stderr)
        .with_target(show_targets(config));

    let installed = match config.format {
        OutputFormat::Json => builder.json().with_current_span(false).try_init(),
        OutputFormat::Text => builder.with_ansi(config.color.should_color_stderr()).try_init(),
    };
    installed.map_err(|e| CliError::config(format!("logging: {e}")))
}
