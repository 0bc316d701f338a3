//! Auto-waiting for page conditions.
//!
//! Every visibility check polls the driver until a condition holds or the
//! default timeout elapses. There is no backoff and no retry of failed
//! driver calls: a driver error ends the wait immediately.

use std::future::Future;
use std::time::{Duration, Instant};

use tracing::trace;

use crate::result::{CheckError, CheckResult};

/// Default timeout for auto-waiting (5 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 5_000;

/// Default polling interval for auto-waiting (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create default wait options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Outcome of a successful wait
#[derive(Debug, Clone)]
pub struct WaitResult<T> {
    /// Value produced by the satisfied condition
    pub value: T,
    /// Time spent waiting
    pub elapsed: Duration,
}

/// Poll `check` until it yields `Some`, or fail with [`CheckError::Timeout`].
///
/// The check always runs at least once, even with a zero timeout.
pub async fn poll_until<T, F, Fut>(
    options: &WaitOptions,
    waited_for: &str,
    mut check: F,
) -> CheckResult<WaitResult<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = CheckResult<Option<T>>>,
{
    let start = Instant::now();
    loop {
        if let Some(value) = check().await? {
            let elapsed = start.elapsed();
            trace!(waited_for, elapsed_ms = elapsed.as_millis() as u64, "wait satisfied");
            return Ok(WaitResult { value, elapsed });
        }
        if start.elapsed() >= options.timeout() {
            return Err(CheckError::Timeout {
                ms: options.timeout_ms,
                waited_for: waited_for.to_string(),
            });
        }
        tokio::time::sleep(options.poll_interval()).await;
    }
}
