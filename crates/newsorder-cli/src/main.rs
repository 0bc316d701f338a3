//! Newsorder CLI
//!
//! ## Usage
//!
//! ```bash
//! newsorder                          # Check the live site
//! newsorder -v --format json         # JSON report, progress logs on stderr
//! newsorder --no-sandbox --headed    # Visible browser, no sandbox
//! ```

use clap::Parser;
use newsorder_cli::{init_logging, run_check, Cli, CliConfig, CliResult, Reporter};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Cli::parse().to_config();
    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &CliConfig) -> CliResult<()> {
    init_logging(config)?;

    let reporter = Reporter::new(
        config.format,
        config.color.should_color(),
        config.verbosity.is_quiet(),
    );
    let outcome = run_check(config).await;
    reporter.finish(&outcome)?;
    outcome.map(|_| ())
}
