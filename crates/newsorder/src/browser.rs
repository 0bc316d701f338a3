//! Browser control for headless runs.
//!
//! With the `browser` feature this module launches Chromium through
//! chromiumoxide and exposes a [`ChromiumDriver`] implementing
//! [`PageDriver`](crate::PageDriver). Without the feature only the
//! configuration type is available.

/// Browser configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 800,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

// ============================================================================
// Real CDP Implementation (when `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
mod cdp {
    use super::BrowserConfig;
    use crate::driver::{ElementHandle, PageDriver};
    use crate::locator::Selector;
    use crate::result::{CheckError, CheckResult};
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::element::Element;
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use std::collections::HashMap;
    use tokio::sync::Mutex;
    use tracing::{debug, warn};

    /// Browser instance with real CDP connection
    #[derive(Debug)]
    pub struct Browser {
        config: BrowserConfig,
        inner: CdpBrowser,
        handle: tokio::task::JoinHandle<()>,
    }

    impl Browser {
        /// Launch a new browser instance with real CDP
        ///
        /// # Errors
        ///
        /// Returns error if browser cannot be launched
        pub async fn launch(config: BrowserConfig) -> CheckResult<Self> {
            let mut builder = CdpConfig::builder()
                .window_size(config.viewport_width, config.viewport_height);

            if !config.headless {
                builder = builder.with_head();
            }

            if !config.sandbox {
                builder = builder.no_sandbox();
            }

            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder.build().map_err(|message| {
                if config.chromium_path.is_none() {
                    warn!(%message, "chromium auto-detection failed");
                    CheckError::BrowserNotFound
                } else {
                    CheckError::BrowserLaunch { message }
                }
            })?;

            let (browser, mut handler) =
                CdpBrowser::launch(cdp_config)
                    .await
                    .map_err(|e| CheckError::BrowserLaunch {
                        message: e.to_string(),
                    })?;

            // Spawn handler task
            let handle = tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            debug!(headless = config.headless, "browser launched");
            Ok(Self {
                config,
                inner: browser,
                handle,
            })
        }

        /// Open a blank page and wrap it in a driver
        ///
        /// # Errors
        ///
        /// Returns error if page cannot be created
        pub async fn new_page(&self) -> CheckResult<ChromiumDriver> {
            let page = self
                .inner
                .new_page("about:blank")
                .await
                .map_err(|e| CheckError::driver(e.to_string()))?;
            Ok(ChromiumDriver::new(page))
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Close the browser and wait for the process to exit
        pub async fn close(mut self) -> CheckResult<()> {
            self.inner
                .close()
                .await
                .map_err(|e| CheckError::driver(e.to_string()))?;
            let _ = self.inner.wait().await;
            debug!("browser closed");
            Ok(())
        }
    }

    impl Drop for Browser {
        fn drop(&mut self) {
            self.handle.abort();
        }
    }

    /// Elements resolved by the last query for each selector
    type Resolved = HashMap<Selector, Vec<Element>>;

    /// A browser page driven over CDP
    ///
    /// Handles returned by [`PageDriver::query_all`] index into the elements
    /// that query resolved, so later reads act on those same nodes. The cache
    /// is dropped on every navigation and click.
    #[derive(Debug)]
    pub struct ChromiumDriver {
        page: CdpPage,
        resolved: Mutex<Resolved>,
    }

    impl ChromiumDriver {
        fn new(page: CdpPage) -> Self {
            Self {
                page,
                resolved: Mutex::new(HashMap::new()),
            }
        }

        /// Elements matching the selector right now, in DOM order
        ///
        /// Link-text filtering reads every candidate's text in one script
        /// evaluation.
        async fn resolve_all(&self, selector: &Selector) -> CheckResult<Vec<Element>> {
            let texts = if selector.filters_text() {
                Some(self.candidate_texts(selector).await?)
            } else {
                None
            };
            let candidates = self
                .page
                .find_elements(selector.base_css())
                .await
                .map_err(|e| CheckError::driver(format!("query {selector}: {e}")))?;
            let Some(texts) = texts else {
                return Ok(candidates);
            };
            if texts.len() != candidates.len() {
                debug!(%selector, "DOM changed while querying");
                return Ok(Vec::new());
            }

            let keep = selector.matching_indices(&texts);
            Ok(candidates
                .into_iter()
                .enumerate()
                .filter(|(index, _)| keep.contains(index))
                .map(|(_, element)| element)
                .collect())
        }

        async fn candidate_texts(&self, selector: &Selector) -> CheckResult<Vec<String>> {
            self.page
                .evaluate(texts_script(selector.base_css())?)
                .await
                .map_err(|e| CheckError::driver(format!("read text of {selector}: {e}")))?
                .into_value::<Vec<String>>()
                .map_err(|e| CheckError::driver(format!("read text of {selector}: {e}")))
        }

        fn detached(handle: &ElementHandle) -> CheckError {
            CheckError::driver(format!("{} #{} detached", handle.selector, handle.index))
        }
    }

    /// Script returning the text of every element matching `css`
    pub(crate) fn texts_script(css: &str) -> CheckResult<String> {
        let quoted = serde_json::to_string(css)
            .map_err(|e| CheckError::driver(format!("quote {css:?}: {e}")))?;
        Ok(format!(
            "Array.from(document.querySelectorAll({quoted})).map(e => (e.innerText || '').trim())"
        ))
    }

    #[async_trait]
    impl PageDriver for ChromiumDriver {
        async fn navigate(&mut self, url: &str) -> CheckResult<()> {
            self.resolved.get_mut().clear();
            let _ = self
                .page
                .goto(url)
                .await
                .map_err(|e| CheckError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            Ok(())
        }

        async fn current_url(&self) -> CheckResult<String> {
            self.page
                .url()
                .await
                .map_err(|e| CheckError::driver(e.to_string()))?
                .ok_or_else(|| CheckError::driver("page has no URL"))
        }

        async fn query_all(&self, selector: &Selector) -> CheckResult<Vec<ElementHandle>> {
            let elements = self.resolve_all(selector).await?;
            let handles = (0..elements.len())
                .map(|index| ElementHandle::new(selector.clone(), index))
                .collect();
            self.resolved.lock().await.insert(selector.clone(), elements);
            Ok(handles)
        }

        async fn is_visible(&self, element: &ElementHandle) -> CheckResult<bool> {
            let resolved = self.resolved.lock().await;
            let Some(el) = resolved
                .get(&element.selector)
                .and_then(|found| found.get(element.index))
            else {
                return Ok(false);
            };
            // no box model means the element is not rendered
            Ok(el
                .bounding_box()
                .await
                .map(|b| b.width > 0.0 && b.height > 0.0)
                .unwrap_or(false))
        }

        async fn attribute(
            &self,
            element: &ElementHandle,
            name: &str,
        ) -> CheckResult<Option<String>> {
            let resolved = self.resolved.lock().await;
            let el = resolved
                .get(&element.selector)
                .and_then(|found| found.get(element.index))
                .ok_or_else(|| Self::detached(element))?;
            el.attribute(name)
                .await
                .map_err(|e| CheckError::driver(format!("read `{name}`: {e}")))
        }

        /// Click the element
        ///
        /// Returns once CDP has dispatched the click. The browser may commit
        /// the resulting navigation later; callers that need the new page
        /// wait for the URL to change.
        async fn click(&mut self, element: &ElementHandle) -> CheckResult<()> {
            let mut found = self
                .resolved
                .get_mut()
                .remove(&element.selector)
                .unwrap_or_default();
            self.resolved.get_mut().clear();
            if element.index >= found.len() {
                return Err(Self::detached(element));
            }
            let el = found.swap_remove(element.index);
            let _ = el
                .click()
                .await
                .map_err(|e| CheckError::driver(format!("click {}: {e}", element.selector)))?;
            Ok(())
        }

        async fn close(&mut self) -> CheckResult<()> {
            self.page
                .clone()
                .close()
                .await
                .map_err(|e| CheckError::driver(e.to_string()))
        }
    }
}

#[cfg(feature = "browser")]
pub use cdp::{Browser, ChromiumDriver};

#[cfg(all(test, feature = "browser"))]
pub(crate) use cdp::texts_script;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BrowserConfig::default();
        assert!(config.headless);
        assert!(config.sandbox);
        assert!(config.chromium_path.is_none());
    }

    #[test]
    fn test_builder_methods() {
        let config = BrowserConfig::default()
            .with_headless(false)
            .with_viewport(1920, 1080)
            .with_chromium_path("/usr/bin/chromium")
            .with_no_sandbox();
        assert!(!config.headless);
        assert!(!config.sandbox);
        assert_eq!(config.viewport_width, 1920);
        assert_eq!(config.viewport_height, 1080);
        assert_eq!(config.chromium_path.as_deref(), Some("/usr/bin/chromium"));
    }

    #[cfg(feature = "browser")]
    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_texts_script_quotes_css() {
        let script = texts_script(r#"a[title="x"]"#).unwrap();
        assert!(script.starts_with(r#"Array.from(document.querySelectorAll("a[title=\"x\"]"))"#));
        assert!(script.contains("innerText"));
    }
}
