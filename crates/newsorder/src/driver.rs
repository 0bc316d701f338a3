//! PageDriver - abstract browser automation trait
//!
//! The page object never talks to a browser engine directly. It consumes the
//! handful of capabilities below, which lets the same page logic run against
//! Chromium over CDP ([`crate::ChromiumDriver`], `browser` feature) or
//! against the scripted [`MockDriver`] in unit tests.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │  PageDriver (Abstract Trait)                              │
//! ├───────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────┐      ┌─────────────────────┐     │
//! │  │  ChromiumDriver     │      │  MockDriver         │     │
//! │  │  CDP via            │      │  Scripted pages,    │     │
//! │  │  chromiumoxide      │      │  call history       │     │
//! │  └─────────────────────┘      └─────────────────────┘     │
//! └───────────────────────────────────────────────────────────┘
//! ```

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;

use crate::locator::Selector;
use crate::result::{CheckError, CheckResult};

/// Handle on the `index`-th element matching `selector` at query time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementHandle {
    /// Selector the element was found with
    pub selector: Selector,
    /// Position among the matches, in DOM order
    pub index: usize,
}

impl ElementHandle {
    /// Create a new element handle
    #[must_use]
    pub const fn new(selector: Selector, index: usize) -> Self {
        Self { selector, index }
    }
}

/// Abstract driver trait for browser automation
///
/// Every call completes (or fails) before the next one starts; drivers do
/// not retry on their own.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate to URL and wait for the load to finish
    async fn navigate(&mut self, url: &str) -> CheckResult<()>;

    /// Get current URL
    async fn current_url(&self) -> CheckResult<String>;

    /// Query all elements currently matching the selector, in DOM order
    async fn query_all(&self, selector: &Selector) -> CheckResult<Vec<ElementHandle>>;

    /// Whether the element exists and is rendered with a non-empty box
    async fn is_visible(&self, element: &ElementHandle) -> CheckResult<bool>;

    /// Read an attribute; `None` if the element lacks it
    async fn attribute(&self, element: &ElementHandle, name: &str)
        -> CheckResult<Option<String>>;

    /// Click the element; a navigation it triggers may commit after this returns
    async fn click(&mut self, element: &ElementHandle) -> CheckResult<()>;

    /// Close the page
    async fn close(&mut self) -> CheckResult<()>;
}

// ============================================================================
// Mock driver
// ============================================================================

/// A scripted DOM element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockElement {
    /// Tag name
    pub tag: String,
    /// CSS classes
    pub classes: Vec<String>,
    /// Text content
    pub text: String,
    /// Attributes
    pub attributes: BTreeMap<String, String>,
    /// Whether the element renders
    pub visible: bool,
}

impl MockElement {
    /// Create a visible element with no classes, text or attributes
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            classes: Vec::new(),
            text: String::new(),
            attributes: BTreeMap::new(),
            visible: true,
        }
    }

    /// A link with text and `href`
    #[must_use]
    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self::new("a").with_text(text).with_attribute("href", href)
    }

    /// An article age span carrying a `title` attribute
    #[must_use]
    pub fn age(title: impl Into<String>) -> Self {
        Self::new("span").with_class("age").with_attribute("title", title)
    }

    /// Add a CSS class
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Set text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attributes.insert(name.into(), value.into());
        self
    }

    /// Mark as not rendered
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Match `tag`, `.class`, or `tag.class.other` selectors
    fn matches_css(&self, css: &str) -> bool {
        let mut parts = css.split('.');
        let tag = parts.next().unwrap_or_default();
        (tag.is_empty() || tag == self.tag)
            && parts.all(|class| self.classes.iter().any(|c| c == class))
    }

    fn matches(&self, selector: &Selector) -> bool {
        self.matches_css(selector.base_css()) && selector.accepts_text(&self.text)
    }
}

/// A scripted page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockPage {
    /// URL the page is served at
    pub url: String,
    /// Elements in DOM order
    pub elements: Vec<MockElement>,
}

impl MockPage {
    /// Create an empty page
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            elements: Vec::new(),
        }
    }

    /// Append an element
    #[must_use]
    pub fn with_element(mut self, element: MockElement) -> Self {
        self.elements.push(element);
        self
    }

    /// A listing page shaped like the live site: title link, one age span
    /// per timestamp, and a "More" link when `more_href` is given
    #[must_use]
    pub fn news_listing(url: impl Into<String>, timestamps: &[u64], more_href: Option<&str>) -> Self {
        let mut page = Self::new(url).with_element(MockElement::link("Hacker News", "news"));
        for ts in timestamps {
            page = page.with_element(MockElement::age(format!("2025-10-17T17:46:44 {ts}")));
        }
        if let Some(href) = more_href {
            page = page.with_element(MockElement::link("More", href).with_class("morelink"));
        }
        page
    }
}

/// Mock driver for unit testing
#[derive(Debug, Default)]
pub struct MockDriver {
    pages: HashMap<String, MockPage>,
    current_url: String,
    /// Call history for verification
    pub call_history: Vec<String>,
}

impl MockDriver {
    /// Create a driver with no pages
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve a page at its URL
    #[must_use]
    pub fn with_page(mut self, page: MockPage) -> Self {
        self.add_page(page);
        self
    }

    /// Serve a page at its URL, replacing any page already there
    pub fn add_page(&mut self, page: MockPage) {
        let _ = self.pages.insert(page.url.clone(), page);
    }

    /// A paginated "newest" listing: one page per batch, each linking to the
    /// next, the last one without a "More" link
    #[must_use]
    pub fn news_site(base_url: &str, batches: &[Vec<u64>]) -> Self {
        let base = base_url.trim_end_matches('/');
        let url_for = |page: usize| {
            if page == 0 {
                format!("{base}/newest")
            } else {
                format!("{base}/newest?p={}", page + 1)
            }
        };

        let mut driver = Self::new();
        for (i, batch) in batches.iter().enumerate() {
            let next = (i + 1 < batches.len()).then(|| format!("newest?p={}", i + 2));
            driver.add_page(MockPage::news_listing(url_for(i), batch, next.as_deref()));
        }
        driver
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.call_history
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.call_history.iter().any(|c| c.starts_with(method))
    }

    fn current_page(&self) -> Option<&MockPage> {
        self.pages.get(&self.current_url)
    }

    fn matching(&self, selector: &Selector) -> Vec<&MockElement> {
        self.current_page()
            .map(|page| page.elements.iter().filter(|e| e.matches(selector)).collect())
            .unwrap_or_default()
    }

    fn resolve(&self, element: &ElementHandle) -> Option<&MockElement> {
        self.matching(&element.selector).get(element.index).copied()
    }

    fn resolve_href(&self, href: &str) -> String {
        if href.contains("://") {
            return href.to_string();
        }
        let origin_end = self
            .current_url
            .find("://")
            .and_then(|scheme| {
                self.current_url[scheme + 3..]
                    .find('/')
                    .map(|slash| scheme + 3 + slash)
            })
            .unwrap_or(self.current_url.len());
        format!(
            "{}/{}",
            &self.current_url[..origin_end],
            href.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl PageDriver for MockDriver {
    async fn navigate(&mut self, url: &str) -> CheckResult<()> {
        self.call_history.push(format!("navigate:{url}"));
        self.current_url = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> CheckResult<String> {
        Ok(self.current_url.clone())
    }

    async fn query_all(&self, selector: &Selector) -> CheckResult<Vec<ElementHandle>> {
        let count = self.matching(selector).len();
        Ok((0..count)
            .map(|index| ElementHandle::new(selector.clone(), index))
            .collect())
    }

    async fn is_visible(&self, element: &ElementHandle) -> CheckResult<bool> {
        Ok(self.resolve(element).is_some_and(|e| e.visible))
    }

    async fn attribute(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> CheckResult<Option<String>> {
        self.resolve(element)
            .map(|e| e.attributes.get(name).cloned())
            .ok_or_else(|| CheckError::driver(format!("element {} not found", element.selector)))
    }

    async fn click(&mut self, element: &ElementHandle) -> CheckResult<()> {
        let target = self
            .resolve(element)
            .ok_or_else(|| CheckError::driver(format!("element {} not found", element.selector)))?
            .attributes
            .get("href")
            .cloned();
        self.call_history.push(format!("click:{}", element.selector));
        if let Some(href) = target {
            let url = self.resolve_href(&href);
            self.navigate(&url).await?;
        }
        Ok(())
    }

    async fn close(&mut self) -> CheckResult<()> {
        self.call_history.push("close".to_string());
        Ok(())
    }
}
