//! Result and error types for newsorder.

use thiserror::Error;

use crate::timestamp::TimestampParseError;

/// Result type for newsorder operations
pub type CheckResult<T> = Result<T, CheckError>;

/// Errors that can abort a run
#[derive(Debug, Error)]
pub enum CheckError {
    /// Browser executable not found
    #[error("Browser not found. Install Chromium or set CHROMIUM_PATH")]
    BrowserNotFound,

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Navigation error reported by the browser engine
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Any other browser engine failure (query, attribute read, click)
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Operation timed out
    #[error("Timed out after {ms}ms waiting for {waited_for}")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
        /// What was waited for
        waited_for: String,
    },

    /// The site identity marker never became visible after navigation
    #[error("Site not loaded: {marker} not visible at {url}")]
    SiteNotLoaded {
        /// URL that was navigated to
        url: String,
        /// Description of the identity marker
        marker: String,
    },

    /// A timestamp element carries no timestamp attribute
    #[error("Timestamp attribute `{attribute}` not found")]
    MissingAttribute {
        /// Attribute name
        attribute: String,
    },

    /// The timestamp attribute is present but malformed
    #[error("Malformed timestamp attribute: {0}")]
    Timestamp(#[from] TimestampParseError),

    /// A page rendered no timestamp elements at all
    #[error("No article timestamps found on {url}")]
    NoTimestamps {
        /// URL of the empty page
        url: String,
    },

    /// The "More" link never became visible
    #[error("Load-more control not available at {url}")]
    LoadMoreUnavailable {
        /// URL of the page without a "More" link
        url: String,
    },

    /// Pagination ran dry before enough timestamps were collected
    #[error("Pagination exhausted after {collected} timestamps, needed more than {threshold}")]
    PaginationExhausted {
        /// Timestamps collected before pagination ran dry
        collected: usize,
        /// Count that had to be exceeded
        threshold: usize,
    },

    /// Fewer timestamps than the verifier requires
    #[error("Insufficient samples: required {required}, collected {actual}")]
    InsufficientSamples {
        /// Minimum sample size
        required: usize,
        /// Samples actually available
        actual: usize,
    },

    /// The collected prefix is not sorted newest-first
    #[error(
        "Timestamps out of order at index {index}: {current} is newer than the preceding {previous}"
    )]
    OrderingViolation {
        /// Index of the offending (newer) element
        index: usize,
        /// Value at `index - 1`
        previous: u64,
        /// Value at `index`
        current: u64,
    },

    /// Invalid state error (operation called in wrong state)
    #[error("Invalid state: {message}")]
    InvalidState {
        /// Error message
        message: String,
    },
}

impl CheckError {
    /// Create a driver error
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Create an invalid state error
    #[must_use]
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Short machine-readable name of the violated contract
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::BrowserNotFound | Self::BrowserLaunch { .. } => "browser",
            Self::Navigation { .. } | Self::SiteNotLoaded { .. } => "load",
            Self::Driver { .. } | Self::Timeout { .. } | Self::InvalidState { .. } => "driver",
            Self::MissingAttribute { .. } | Self::Timestamp(_) | Self::NoTimestamps { .. } => {
                "extraction"
            }
            Self::LoadMoreUnavailable { .. } | Self::PaginationExhausted { .. } => "pagination",
            Self::InsufficientSamples { .. } => "sample",
            Self::OrderingViolation { .. } => "ordering",
        }
    }
}
