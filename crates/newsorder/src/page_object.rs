//! Page object for the Hacker News listings.
//!
//! [`NewsPage`] owns one page session and turns the site's markup into a few
//! semantic operations. All site-specific selectors live here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::driver::{ElementHandle, PageDriver};
use crate::locator::{Locator, Selector};
use crate::result::{CheckError, CheckResult};
use crate::timestamp::{parse_timestamp, Timestamp};
use crate::wait::{poll_until, WaitOptions};

/// Default site root
pub const DEFAULT_BASE_URL: &str = "https://news.ycombinator.com";

/// Text of the site title link
pub const SITE_TITLE: &str = "Hacker News";

/// Exact text of the pagination link
pub const MORE_LINK_TEXT: &str = "More";

/// Elements showing an article's age
pub const AGE_SELECTOR: &str = "span.age";

/// Attribute carrying the age timestamp
pub const TITLE_ATTRIBUTE: &str = "title";

/// Listing views the site serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Newest submissions
    New,
    /// Past front pages
    Past,
    /// Newest comments
    Comments,
    /// Ask HN
    Ask,
    /// Show HN
    Show,
    /// Job postings
    Jobs,
    /// Submission form
    Submit,
}

impl SortBy {
    /// Path segment relative to the site root
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::New => "newest",
            Self::Past => "front",
            Self::Comments => "newcomments",
            Self::Ask => "ask",
            Self::Show => "show",
            Self::Jobs => "jobs",
            Self::Submit => "submit",
        }
    }

    /// All views
    #[must_use]
    pub const fn all() -> [Self; 7] {
        [
            Self::New,
            Self::Past,
            Self::Comments,
            Self::Ask,
            Self::Show,
            Self::Jobs,
            Self::Submit,
        ]
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for SortBy {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|sort| sort.path() == s)
            .ok_or_else(|| CheckError::invalid_state(format!("unknown listing view {s:?}")))
    }
}

/// Page object wrapping one session on the site
#[derive(Debug)]
pub struct NewsPage<D: PageDriver> {
    driver: D,
    base_url: String,
    wait: WaitOptions,
    title_link: Locator,
    more_link: Locator,
    article_ages: Locator,
}

impl<D: PageDriver> NewsPage<D> {
    /// Wrap a driver; `base_url` is the site root
    pub fn new(driver: D, base_url: impl Into<String>) -> Self {
        Self {
            driver,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            wait: WaitOptions::default(),
            title_link: Locator::from_selector(Selector::link_text(SITE_TITLE))
                .described_as(format!("{SITE_TITLE:?} title link")),
            more_link: Locator::from_selector(Selector::link_text_exact(MORE_LINK_TEXT))
                .described_as(format!("{MORE_LINK_TEXT:?} link")),
            article_ages: Locator::new(AGE_SELECTOR),
        }
    }

    /// Override the default wait policy
    #[must_use]
    pub fn with_wait_options(mut self, wait: WaitOptions) -> Self {
        self.wait = wait;
        self
    }

    /// Borrow the underlying driver
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Site root without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path; the empty path is the home page
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Navigate to `path` and wait for the site title to show
    pub async fn goto(&mut self, path: &str) -> CheckResult<()> {
        let url = self.url_for(path);
        info!(%url, "navigating");
        self.driver.navigate(&url).await?;
        self.expect_title_visible().await
    }

    /// Navigate to a listing view
    pub async fn goto_sorted(&mut self, sort: SortBy) -> CheckResult<()> {
        self.goto(sort.path()).await
    }

    /// Fail with [`CheckError::SiteNotLoaded`] unless the title link shows
    pub async fn expect_title_visible(&self) -> CheckResult<()> {
        match self.first_visible(&self.title_link).await {
            Ok(_) => Ok(()),
            Err(CheckError::Timeout { .. }) => Err(CheckError::SiteNotLoaded {
                url: self.driver.current_url().await?,
                marker: self.title_link.description().to_string(),
            }),
            Err(other) => Err(other),
        }
    }

    /// Wait for the "More" link, click it, and wait until the page URL
    /// changes
    ///
    /// A click can return before the browser commits the navigation, so the
    /// old page would still be readable. The URL is polled under the page's
    /// wait policy; [`CheckError::Timeout`] if it never changes.
    pub async fn click_more_link(&mut self) -> CheckResult<()> {
        let from = self.driver.current_url().await?;
        let link = match self.first_visible(&self.more_link).await {
            Ok(link) => link,
            Err(CheckError::Timeout { .. }) => {
                return Err(CheckError::LoadMoreUnavailable { url: from })
            }
            Err(other) => return Err(other),
        };
        debug!(%from, "clicking more link");
        self.driver.click(&link).await?;
        self.wait_for_url_change(&from).await
    }

    /// Poll until the current URL differs from `from`
    async fn wait_for_url_change(&self, from: &str) -> CheckResult<()> {
        let driver = &self.driver;
        let waited_for = format!("navigation away from {from}");
        let found = poll_until(&self.wait, &waited_for, || async move {
            let url = driver.current_url().await?;
            Ok::<_, CheckError>((url != from).then_some(url))
        })
        .await?;
        debug!(url = %found.value, elapsed_ms = found.elapsed.as_millis() as u64, "next page");
        Ok(())
    }

    /// Timestamps of every article on the current page, in DOM order
    pub async fn current_page_timestamps(&self) -> CheckResult<Vec<Timestamp>> {
        let elements = self
            .driver
            .query_all(self.article_ages.selector())
            .await?;

        let mut timestamps = Vec::with_capacity(elements.len());
        for element in &elements {
            timestamps.push(self.article_timestamp(element).await?);
        }

        if timestamps.is_empty() {
            return Err(CheckError::NoTimestamps {
                url: self.driver.current_url().await?,
            });
        }
        debug!(count = timestamps.len(), "collected page timestamps");
        Ok(timestamps)
    }

    /// Wait for an age element to show, then parse its `title`
    pub async fn article_timestamp(&self, element: &ElementHandle) -> CheckResult<Timestamp> {
        let driver = &self.driver;
        let waited_for = format!("{} #{}", element.selector, element.index);
        let _ = poll_until(&self.wait, &waited_for, || async move {
            driver
                .is_visible(element)
                .await
                .map(|visible| visible.then_some(()))
        })
        .await?;

        let title = driver
            .attribute(element, TITLE_ATTRIBUTE)
            .await?
            .ok_or_else(|| CheckError::MissingAttribute {
                attribute: TITLE_ATTRIBUTE.to_string(),
            })?;
        Ok(parse_timestamp(&title)?)
    }

    /// Close the underlying page
    pub async fn close(&mut self) -> CheckResult<()> {
        self.driver.close().await
    }

    /// First currently visible match of `locator`, polling until timeout
    async fn first_visible(&self, locator: &Locator) -> CheckResult<ElementHandle> {
        let driver = &self.driver;
        let selector = locator.selector();
        poll_until(&self.wait, locator.description(), || async move {
            for handle in driver.query_all(selector).await? {
                if driver.is_visible(&handle).await? {
                    return Ok(Some(handle));
                }
            }
            Ok::<_, CheckError>(None)
        })
        .await
        .map(|found| found.value)
    }
}
