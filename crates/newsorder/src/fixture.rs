//! Page fixture: hand a ready page object to a test body and always close it.
//!
//! The body's error wins over a teardown error; a teardown error after a
//! passing body fails the run.

use futures::future::BoxFuture;
use tracing::warn;

use crate::driver::PageDriver;
use crate::page_object::NewsPage;
use crate::result::CheckResult;

/// Run `test` against `page`, then close the page whatever the outcome
///
/// ```ignore
/// let report = with_news_page(page, |page| Box::pin(run_newest_scenario(page))).await?;
/// ```
pub async fn with_news_page<D, T, F>(mut page: NewsPage<D>, test: F) -> CheckResult<T>
where
    D: PageDriver,
    F: for<'a> FnOnce(&'a mut NewsPage<D>) -> BoxFuture<'a, CheckResult<T>>,
{
    let outcome = test(&mut page).await;
    let teardown = page.close().await;
    combine_teardown(outcome, teardown)
}

/// Merge a body outcome with its teardown result, first error first
pub(crate) fn combine_teardown<T>(
    outcome: CheckResult<T>,
    teardown: CheckResult<()>,
) -> CheckResult<T> {
    match (outcome, teardown) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(err)) => Err(err),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(teardown_err)) => {
            warn!(error = %teardown_err, "teardown failed after an earlier error");
            Err(err)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::driver::{ElementHandle, MockDriver};
    use crate::locator::Selector;
    use crate::result::CheckError;
    use crate::wait::WaitOptions;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// Delegates to a mock but refuses to close
    #[derive(Debug)]
    struct StuckDriver {
        inner: MockDriver,
        close_attempted: Arc<AtomicBool>,
    }

    #[async_trait]
    impl PageDriver for StuckDriver {
        async fn navigate(&mut self, url: &str) -> CheckResult<()> {
            self.inner.navigate(url).await
        }
        async fn current_url(&self) -> CheckResult<String> {
            self.inner.current_url().await
        }
        async fn query_all(&self, selector: &Selector) -> CheckResult<Vec<ElementHandle>> {
            self.inner.query_all(selector).await
        }
        async fn is_visible(&self, element: &ElementHandle) -> CheckResult<bool> {
            self.inner.is_visible(element).await
        }
        async fn attribute(
            &self,
            element: &ElementHandle,
            name: &str,
        ) -> CheckResult<Option<String>> {
            self.inner.attribute(element, name).await
        }
        async fn click(&mut self, element: &ElementHandle) -> CheckResult<()> {
            self.inner.click(element).await
        }
        async fn close(&mut self) -> CheckResult<()> {
            self.close_attempted.store(true, Ordering::SeqCst);
            Err(CheckError::driver("page already detached"))
        }
    }

    fn page(driver: MockDriver) -> NewsPage<MockDriver> {
        NewsPage::new(driver, "https://news.example")
            .with_wait_options(WaitOptions::new().with_timeout(20).with_poll_interval(5))
    }

    #[tokio::test]
    async fn test_passes_value_through() {
        let driver = MockDriver::news_site("https://news.example", &[vec![9, 8]]);
        let count = with_news_page(page(driver), |p| {
            Box::pin(async move {
                p.goto("newest").await?;
                Ok::<_, CheckError>(p.current_page_timestamps().await?.len())
            })
        })
        .await
        .unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn test_closes_after_failure() {
        let closed = Arc::new(AtomicBool::new(false));
        let driver = StuckDriver {
            inner: MockDriver::new(),
            close_attempted: Arc::clone(&closed),
        };
        let page = NewsPage::new(driver, "https://news.example")
            .with_wait_options(WaitOptions::new().with_timeout(10).with_poll_interval(5));

        let err = with_news_page(page, |p| Box::pin(async move { p.goto("newest").await }))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckError::SiteNotLoaded { .. }));
        assert!(closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_teardown_error_fails_passing_body() {
        let driver = StuckDriver {
            inner: MockDriver::new(),
            close_attempted: Arc::new(AtomicBool::new(false)),
        };
        let page = NewsPage::new(driver, "https://news.example");
        let err = with_news_page(page, |_| Box::pin(async { Ok::<_, CheckError>(()) }))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckError::Driver { .. }));
    }

    #[test]
    fn test_combine_prefers_body_error() {
        let merged: CheckResult<()> = combine_teardown(
            Err(CheckError::driver("body")),
            Err(CheckError::driver("teardown")),
        );
        assert!(merged.unwrap_err().to_string().contains("body"));
    }
}
