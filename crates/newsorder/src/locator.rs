//! Selectors and locators for the elements the checks interact with.
//!
//! A [`Selector`] describes *which* elements match; a [`Locator`] pairs a
//! selector with a human-readable description used in diagnostics.
//! Link-text selectors mirror an accessible-name lookup: they scan every
//! `<a>` and keep those whose trimmed text matches.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Base CSS for link-text selectors
pub const LINK_CSS: &str = "a";

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selector {
    /// CSS selector (e.g., "span.age")
    Css(String),
    /// Link whose text matches
    LinkText {
        /// Text to match
        text: String,
        /// Whole-text, case-sensitive match instead of a substring match
        exact: bool,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Link whose text contains `text`, ignoring case
    #[must_use]
    pub fn link_text(text: impl Into<String>) -> Self {
        Self::LinkText {
            text: text.into(),
            exact: false,
        }
    }

    /// Link whose whole text is exactly `text`
    #[must_use]
    pub fn link_text_exact(text: impl Into<String>) -> Self {
        Self::LinkText {
            text: text.into(),
            exact: true,
        }
    }

    /// CSS that yields the candidate elements before any text filter
    #[must_use]
    pub fn base_css(&self) -> &str {
        match self {
            Self::Css(css) => css,
            Self::LinkText { .. } => LINK_CSS,
        }
    }

    /// Whether this selector filters candidates by their text
    #[must_use]
    pub const fn filters_text(&self) -> bool {
        matches!(self, Self::LinkText { .. })
    }

    /// Whether a candidate with the given text content matches
    #[must_use]
    pub fn accepts_text(&self, content: &str) -> bool {
        match self {
            Self::Css(_) => true,
            Self::LinkText { text, exact: true } => content.trim() == text,
            Self::LinkText { text, exact: false } => content
                .trim()
                .to_lowercase()
                .contains(&text.to_lowercase()),
        }
    }

    /// Positions of the accepted candidates, given every candidate's text in
    /// DOM order
    #[must_use]
    pub fn matching_indices<S: AsRef<str>>(&self, texts: &[S]) -> Vec<usize> {
        texts
            .iter()
            .enumerate()
            .filter(|(_, text)| self.accepts_text(text.as_ref()))
            .map(|(index, _)| index)
            .collect()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(css) => write!(f, "{css}"),
            Self::LinkText { text, exact: true } => write!(f, "link {text:?} (exact)"),
            Self::LinkText { text, exact: false } => write!(f, "link {text:?}"),
        }
    }
}

/// A named, reusable handle on a set of elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    selector: Selector,
    description: String,
}

impl Locator {
    /// Create a locator from a CSS selector
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self::from_selector(Selector::css(selector))
    }

    /// Create a locator from a selector
    #[must_use]
    pub fn from_selector(selector: Selector) -> Self {
        let description = selector.to_string();
        Self {
            selector,
            description,
        }
    }

    /// Override the description used in diagnostics
    #[must_use]
    pub fn described_as(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Get the description
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod selector_tests {
        use super::*;

        #[test]
        fn test_css_accepts_any_text() {
            let sel = Selector::css("span.age");
            assert_eq!(sel.base_css(), "span.age");
            assert!(!sel.filters_text());
            assert!(sel.accepts_text(""));
        }

        #[test]
        fn test_exact_link_text() {
            let sel = Selector::link_text_exact("More");
            assert_eq!(sel.base_css(), LINK_CSS);
            assert!(sel.filters_text());
            assert!(sel.accepts_text("More"));
            assert!(sel.accepts_text("  More\n"));
            assert!(!sel.accepts_text("more"));
            assert!(!sel.accepts_text("More comments"));
        }

        #[test]
        fn test_substring_link_text() {
            let sel = Selector::link_text("Hacker News");
            assert!(sel.accepts_text("Hacker News"));
            assert!(sel.accepts_text("hacker news jobs"));
            assert!(!sel.accepts_text("Lobsters"));
        }

        #[test]
        fn test_matching_indices_keep_dom_positions() {
            let texts = ["new", "More comments", " More ", "past", "More"];
            assert_eq!(Selector::link_text_exact("More").matching_indices(&texts), vec![2, 4]);
            assert_eq!(Selector::css("a").matching_indices(&texts).len(), 5);
            assert!(Selector::link_text("jobs").matching_indices(&texts).is_empty());
        }

        #[test]
        fn test_exact_and_substring_key_separately() {
            use std::collections::HashMap;
            let mut resolved = HashMap::new();
            resolved.insert(Selector::link_text_exact("More"), vec![4]);
            resolved.insert(Selector::link_text("More"), vec![1, 2, 4]);
            assert_eq!(resolved.len(), 2);
            assert_eq!(resolved[&Selector::link_text_exact("More")], vec![4]);
        }

        #[test]
        fn test_display() {
            assert_eq!(Selector::css("a.x").to_string(), "a.x");
            assert_eq!(
                Selector::link_text_exact("More").to_string(),
                "link \"More\" (exact)"
            );
        }
    }

    mod locator_tests {
        use super::*;

        #[test]
        fn test_new_uses_selector_description() {
            let loc = Locator::new("span.age");
            assert_eq!(loc.selector(), &Selector::css("span.age"));
            assert_eq!(loc.description(), "span.age");
        }

        #[test]
        fn test_described_as() {
            let loc = Locator::from_selector(Selector::link_text_exact("More"))
                .described_as("\"More\" link");
            assert_eq!(loc.description(), "\"More\" link");
        }
    }
}
