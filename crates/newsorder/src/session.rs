//! Browser session scoped to one run (`browser` feature).
//!
//! A [`Session`] owns the Chromium process. [`Session::run`] always closes
//! it, and dropping a session aborts the CDP handler task.

use tracing::info;

use crate::browser::{Browser, BrowserConfig, ChromiumDriver};
use crate::fixture::{combine_teardown, with_news_page};
use crate::page_object::{NewsPage, SortBy, DEFAULT_BASE_URL};
use crate::result::CheckResult;
use crate::scenario::{run_scenario, RunReport, Scenario};
use crate::wait::WaitOptions;

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Browser launch options
    pub browser: BrowserConfig,
    /// Site root
    pub base_url: String,
    /// Auto-wait policy for page operations
    pub wait: WaitOptions,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            browser: BrowserConfig::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            wait: WaitOptions::default(),
        }
    }
}

impl SessionConfig {
    /// Set browser options
    #[must_use]
    pub fn with_browser(mut self, browser: BrowserConfig) -> Self {
        self.browser = browser;
        self
    }

    /// Set site root
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set wait policy
    #[must_use]
    pub const fn with_wait(mut self, wait: WaitOptions) -> Self {
        self.wait = wait;
        self
    }
}

/// A launched browser plus the settings pages are created with
#[derive(Debug)]
pub struct Session {
    browser: Browser,
    config: SessionConfig,
}

impl Session {
    /// Launch Chromium
    ///
    /// # Errors
    ///
    /// [`CheckError::BrowserNotFound`](crate::CheckError::BrowserNotFound) or
    /// [`CheckError::BrowserLaunch`](crate::CheckError::BrowserLaunch)
    pub async fn launch(config: SessionConfig) -> CheckResult<Self> {
        let browser = Browser::launch(config.browser.clone()).await?;
        Ok(Self { browser, config })
    }

    /// Session configuration
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Open a fresh page wrapped in the page object
    pub async fn news_page(&self) -> CheckResult<NewsPage<ChromiumDriver>> {
        let driver = self.browser.new_page().await?;
        Ok(NewsPage::new(driver, self.config.base_url.clone()).with_wait_options(self.config.wait))
    }

    /// Run the scenario on `sort`, then close the browser whatever the outcome
    pub async fn run(self, sort: SortBy) -> CheckResult<RunReport> {
        info!(%sort, base_url = %self.config.base_url, "starting run");
        let outcome = self.run_on_page(sort).await;
        let teardown = self.close().await;
        combine_teardown(outcome, teardown)
    }

    /// [`Session::run`] on the "newest" listing
    pub async fn run_newest(self) -> CheckResult<RunReport> {
        self.run(SortBy::New).await
    }

    /// Close the browser and wait for it to exit
    pub async fn close(self) -> CheckResult<()> {
        self.browser.close().await
    }

    async fn run_on_page(&self, sort: SortBy) -> CheckResult<RunReport> {
        let page = self.news_page().await?;
        with_news_page(page, |page| {
            Box::pin(async move {
                let mut scenario = Scenario::new();
                run_scenario(page, &mut scenario, sort).await
            })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.base_url, "https://news.ycombinator.com");
        assert_eq!(config.wait, WaitOptions::default());
        assert!(config.browser.headless);
    }

    #[test]
    fn test_builder() {
        let config = SessionConfig::default()
            .with_base_url("http://localhost:8080")
            .with_browser(BrowserConfig::default().with_no_sandbox())
            .with_wait(WaitOptions::new().with_timeout(1_000));
        assert_eq!(config.base_url, "http://localhost:8080");
        assert!(!config.browser.sandbox);
        assert_eq!(config.wait.timeout_ms, 1_000);
    }
}
