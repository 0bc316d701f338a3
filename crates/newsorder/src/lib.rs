//! Newsorder: browser-driven check that Hacker News lists its newest
//! submissions newest-first.
//!
//! The run opens the "newest" listing, reads each article's submission
//! timestamp, follows "More" until more than 100 timestamps are collected,
//! and verifies that the first 100 never increase.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │   ┌────────────┐    ┌────────────┐    ┌────────────────┐     │
//! │   │ Scenario   │───►│ NewsPage   │───►│ PageDriver     │     │
//! │   │ (state     │    │ (page      │    │ (Chromium/CDP  │     │
//! │   │  machine)  │◄───│  object)   │    │  or mock)      │     │
//! │   └─────┬──────┘    └────────────┘    └────────────────┘     │
//! │         ▼                                                    │
//! │   ┌────────────────────┐                                     │
//! │   │ verify_descending  │                                     │
//! │   └────────────────────┘                                     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use newsorder::{Session, SessionConfig};
//!
//! let session = Session::launch(SessionConfig::default()).await?;
//! let report = session.run_newest().await?;
//! println!("{} timestamps over {} pages", report.collected, report.pages);
//! ```

#![warn(missing_docs)]

mod browser;
mod driver;
mod fixture;
mod locator;
mod ordering;
mod page_object;
mod result;
mod scenario;
#[cfg(feature = "browser")]
mod session;
mod timestamp;
mod wait;

pub use browser::BrowserConfig;
#[cfg(feature = "browser")]
pub use browser::{Browser, ChromiumDriver};
pub use driver::{ElementHandle, MockDriver, MockElement, MockPage, PageDriver};
pub use fixture::with_news_page;
pub use locator::{Locator, Selector, LINK_CSS};
pub use ordering::{verify_descending, OrderingReport, DEFAULT_SAMPLE_SIZE};
pub use page_object::{
    NewsPage, SortBy, AGE_SELECTOR, DEFAULT_BASE_URL, MORE_LINK_TEXT, SITE_TITLE, TITLE_ATTRIBUTE,
};
pub use result::{CheckError, CheckResult};
pub use scenario::{
    run_newest_scenario, run_scenario, NextStep, RunReport, Scenario, ScenarioState,
    PAGINATION_THRESHOLD,
};
#[cfg(feature = "browser")]
pub use session::{Session, SessionConfig};
pub use timestamp::{
    parse_timestamp, ParsedTimestamp, Timestamp, TimestampParseError, TimestampSequence,
    TIME_PREFIX,
};
pub use wait::{
    poll_until, WaitOptions, WaitResult, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS,
};
