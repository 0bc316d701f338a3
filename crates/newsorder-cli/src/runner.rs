//! Runs the check against a live browser

use newsorder::RunReport;
#[cfg(feature = "browser")]
use newsorder::{Session, SessionConfig};

use crate::config::CliConfig;
use crate::error::CliResult;

/// Launch Chromium, check the "newest" listing, and close the browser
#[cfg(feature = "browser")]
pub async fn run_check(config: &CliConfig) -> CliResult<RunReport> {
    let session_config = SessionConfig::default()
        .with_browser(config.browser.clone())
        .with_base_url(config.base_url.clone());
    let session = Session::launch(session_config).await?;
    Ok(session.run_newest().await?)
}

/// Without the `browser` feature there is nothing to drive
#[cfg(not(feature = "browser"))]
#[allow(clippy::unused_async)]
pub async fn run_check(_config: &CliConfig) -> CliResult<RunReport> {
    Err(crate::error::CliError::config(
        "built without the `browser` feature; rebuild with --features browser",
    ))
}
