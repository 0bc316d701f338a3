//! Newsorder CLI library
//!
//! Argument parsing, configuration, logging setup and report rendering for
//! the `newsorder` binary.

#![warn(missing_docs)]

mod commands;
mod config;
mod error;
mod logging;
mod output;
mod runner;

pub use commands::{Cli, ColorArg, FormatArg};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use logging::{env_filter, init_logging, show_targets};
pub use output::{render_json, OutputFormat, Reporter, RunSummary};
pub use runner::run_check;
