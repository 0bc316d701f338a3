//! The "newest articles are sorted" scenario.
//!
//! [`Scenario`] is a pure state machine over collected timestamps:
//!
//! ```text
//! NotStarted -> Loading(1) -> Accumulating(1) -> Continuing(1) -> Loading(2) -> ...
//!                                             \-> Verifying -> Done
//! any error -> Failed
//! ```
//!
//! [`run_scenario`] wires it to a [`NewsPage`]. Pagination continues while
//! the collected count is at or below the threshold, so a run always
//! gathers strictly more than the threshold before verifying.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::driver::PageDriver;
use crate::ordering::{verify_descending, OrderingReport, DEFAULT_SAMPLE_SIZE};
use crate::page_object::{NewsPage, SortBy};
use crate::result::{CheckError, CheckResult};
use crate::timestamp::{Timestamp, TimestampSequence};

/// Collected count that must be exceeded before verifying
pub const PAGINATION_THRESHOLD: usize = 100;

/// Scenario state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ScenarioState {
    /// Nothing loaded yet
    NotStarted,
    /// Waiting for a page's timestamps (pages count from 1)
    Loading {
        /// Page being loaded
        page: usize,
    },
    /// A page's batch is being appended
    Accumulating {
        /// Page just collected
        page: usize,
    },
    /// Below threshold; the next page is requested
    Continuing {
        /// Page just collected
        page: usize,
    },
    /// Enough timestamps; ordering is being checked
    Verifying,
    /// Ordering verified
    Done,
    /// Run aborted
    Failed {
        /// Diagnostic of the first error
        reason: String,
    },
}

impl ScenarioState {
    /// Whether no further transitions are accepted
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed { .. })
    }
}

/// What the runner does after a batch is accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    /// Click "More" and collect another page
    LoadMore,
    /// Hand the sequence to the verifier
    Verify,
}

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Listing view that was checked
    pub sort: SortBy,
    /// Pages visited
    pub pages: usize,
    /// Timestamps collected, including any over-collection
    pub collected: usize,
    /// Verifier result
    pub ordering: OrderingReport,
}

/// State machine accumulating timestamps across pages
#[derive(Debug, Clone)]
pub struct Scenario {
    state: ScenarioState,
    timestamps: TimestampSequence,
    threshold: usize,
    sample_size: usize,
    pages_loaded: usize,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario {
    /// Scenario with the standard threshold and sample size (both 100)
    #[must_use]
    pub fn new() -> Self {
        Self::with_limits(PAGINATION_THRESHOLD, DEFAULT_SAMPLE_SIZE)
    }

    /// Scenario with custom limits
    #[must_use]
    pub fn with_limits(threshold: usize, sample_size: usize) -> Self {
        Self {
            state: ScenarioState::NotStarted,
            timestamps: TimestampSequence::new(),
            threshold,
            sample_size,
            pages_loaded: 0,
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> &ScenarioState {
        &self.state
    }

    /// Timestamps collected so far, in collection order
    #[must_use]
    pub fn timestamps(&self) -> &[Timestamp] {
        self.timestamps.as_slice()
    }

    /// Pages whose batch has been accepted
    #[must_use]
    pub const fn pages_loaded(&self) -> usize {
        self.pages_loaded
    }

    /// Collected count that must be exceeded before verifying
    #[must_use]
    pub const fn threshold(&self) -> usize {
        self.threshold
    }

    /// Number of leading timestamps the verifier inspects
    #[must_use]
    pub const fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// `NotStarted -> Loading(1)`
    pub fn begin(&mut self) -> CheckResult<()> {
        match self.state {
            ScenarioState::NotStarted => {
                self.state = ScenarioState::Loading { page: 1 };
                Ok(())
            }
            _ => Err(self.unexpected("begin")),
        }
    }

    /// `Loading(n) -> Accumulating(n) -> Continuing(n) | Verifying`
    ///
    /// The whole batch is kept even when it overshoots the threshold.
    pub fn accept_batch(
        &mut self,
        batch: impl IntoIterator<Item = Timestamp>,
    ) -> CheckResult<NextStep> {
        let ScenarioState::Loading { page } = self.state else {
            return Err(self.unexpected("accept a batch"));
        };

        self.state = ScenarioState::Accumulating { page };
        let before = self.timestamps.len();
        self.timestamps.extend_batch(batch);
        self.pages_loaded = page;
        info!(
            page,
            batch = self.timestamps.len() - before,
            collected = self.timestamps.len(),
            "page collected"
        );

        if self.timestamps.len() > self.threshold {
            self.state = ScenarioState::Verifying;
            Ok(NextStep::Verify)
        } else {
            self.state = ScenarioState::Continuing { page };
            Ok(NextStep::LoadMore)
        }
    }

    /// `Continuing(n) -> Loading(n + 1)`
    pub fn advance_page(&mut self) -> CheckResult<()> {
        let ScenarioState::Continuing { page } = self.state else {
            return Err(self.unexpected("advance to the next page"));
        };
        self.state = ScenarioState::Loading { page: page + 1 };
        Ok(())
    }

    /// `Verifying -> Done`, or `Failed` when the verifier rejects the sequence
    pub fn verify(&mut self) -> CheckResult<OrderingReport> {
        if self.state != ScenarioState::Verifying {
            return Err(self.unexpected("verify"));
        }
        match verify_descending(self.timestamps.as_slice(), self.sample_size) {
            Ok(report) => {
                info!(checked = report.checked, "ordering verified");
                self.state = ScenarioState::Done;
                Ok(report)
            }
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Move to `Failed`; a terminal state keeps its first outcome
    pub fn fail(&mut self, error: &CheckError) {
        if self.state.is_terminal() {
            return;
        }
        debug!(from = ?self.state, "scenario failed");
        self.state = ScenarioState::Failed {
            reason: error.to_string(),
        };
    }

    fn unexpected(&self, action: &str) -> CheckError {
        CheckError::invalid_state(format!("cannot {action} in state {:?}", self.state))
    }
}

/// Drive `scenario` against `page` on the given listing view
///
/// On any error the scenario ends in [`ScenarioState::Failed`] and the error
/// is returned unchanged, except that a missing "More" link is reported as
/// [`CheckError::PaginationExhausted`].
pub async fn run_scenario<D: PageDriver>(
    page: &mut NewsPage<D>,
    scenario: &mut Scenario,
    sort: SortBy,
) -> CheckResult<RunReport> {
    match drive(page, scenario, sort).await {
        Ok(report) => Ok(report),
        Err(err) => {
            warn!(kind = err.kind(), error = %err, "scenario failed");
            scenario.fail(&err);
            Err(err)
        }
    }
}

/// Check that the "newest" listing is sorted newest-first
pub async fn run_newest_scenario<D: PageDriver>(page: &mut NewsPage<D>) -> CheckResult<RunReport> {
    let mut scenario = Scenario::new();
    run_scenario(page, &mut scenario, SortBy::New).await
}

async fn drive<D: PageDriver>(
    page: &mut NewsPage<D>,
    scenario: &mut Scenario,
    sort: SortBy,
) -> CheckResult<RunReport> {
    scenario.begin()?;
    page.goto_sorted(sort).await?;

    loop {
        let batch = page.current_page_timestamps().await?;
        match scenario.accept_batch(batch)? {
            NextStep::Verify => break,
            NextStep::LoadMore => {
                let collected = scenario.timestamps().len();
                page.click_more_link().await.map_err(|err| match err {
                    CheckError::LoadMoreUnavailable { .. } => CheckError::PaginationExhausted {
                        collected,
                        threshold: scenario.threshold(),
                    },
                    other => other,
                })?;
                scenario.advance_page()?;
            }
        }
    }

    let ordering = scenario.verify()?;
    Ok(RunReport {
        sort,
        pages: scenario.pages_loaded(),
        collected: scenario.timestamps().len(),
        ordering,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn descending(from: u64, count: u64) -> Vec<Timestamp> {
        (0..count).map(|i| Timestamp::from_secs(from - i)).collect()
    }

    mod transition_tests {
        use super::*;

        #[test]
        fn test_starts_not_started() {
            let s = Scenario::new();
            assert_eq!(s.state(), &ScenarioState::NotStarted);
            assert_eq!(s.threshold(), 100);
            assert_eq!(s.sample_size(), 100);
            assert_eq!(s.pages_loaded(), 0);
        }

        #[test]
        fn test_four_pages_of_thirty_reach_done() {
            let mut s = Scenario::new();
            s.begin().unwrap();
            let mut next = 10_000;
            for page in 1..=3 {
                assert_eq!(s.state(), &ScenarioState::Loading { page });
                assert_eq!(s.accept_batch(descending(next, 30)).unwrap(), NextStep::LoadMore);
                assert_eq!(s.state(), &ScenarioState::Continuing { page });
                s.advance_page().unwrap();
                next -= 30;
            }
            assert_eq!(s.accept_batch(descending(next, 30)).unwrap(), NextStep::Verify);
            assert_eq!(s.state(), &ScenarioState::Verifying);
            assert_eq!(s.timestamps().len(), 120);
            assert_eq!(s.pages_loaded(), 4);

            let report = s.verify().unwrap();
            assert_eq!(report.checked, 100);
            assert_eq!(s.state(), &ScenarioState::Done);
        }

        #[test]
        fn test_exactly_threshold_keeps_paginating() {
            let mut s = Scenario::new();
            s.begin().unwrap();
            assert_eq!(s.accept_batch(descending(500, 100)).unwrap(), NextStep::LoadMore);
            s.advance_page().unwrap();
            assert_eq!(s.accept_batch(descending(400, 1)).unwrap(), NextStep::Verify);
        }

        #[test]
        fn test_over_collection_is_retained() {
            let mut s = Scenario::new();
            s.begin().unwrap();
            assert_eq!(s.accept_batch(descending(1_000, 250)).unwrap(), NextStep::Verify);
            assert_eq!(s.timestamps().len(), 250);
        }

        #[test]
        fn test_inversion_fails_verification() {
            let mut s = Scenario::new();
            s.begin().unwrap();
            let mut batch = descending(10_000, 120);
            batch.swap(56, 57);
            let _ = s.accept_batch(batch).unwrap();
            match s.verify() {
                Err(CheckError::OrderingViolation { index, .. }) => assert_eq!(index, 57),
                other => panic!("expected violation, got {other:?}"),
            }
            assert!(matches!(s.state(), ScenarioState::Failed { .. }));
        }

        #[test]
        fn test_inversion_after_sample_is_ignored() {
            let mut s = Scenario::new();
            s.begin().unwrap();
            let mut batch = descending(10_000, 120);
            batch.swap(110, 111);
            let _ = s.accept_batch(batch).unwrap();
            assert!(s.verify().is_ok());
        }
    }

    mod invalid_transition_tests {
        use super::*;

        #[test]
        fn test_batch_before_begin() {
            let mut s = Scenario::new();
            assert!(matches!(
                s.accept_batch(descending(10, 3)),
                Err(CheckError::InvalidState { .. })
            ));
        }

        #[test]
        fn test_begin_twice() {
            let mut s = Scenario::new();
            s.begin().unwrap();
            assert!(s.begin().is_err());
        }

        #[test]
        fn test_verify_too_early() {
            let mut s = Scenario::new();
            s.begin().unwrap();
            let _ = s.accept_batch(descending(10, 3)).unwrap();
            assert!(matches!(s.verify(), Err(CheckError::InvalidState { .. })));
            assert!(s.advance_page().is_ok());
        }

        #[test]
        fn test_terminal_states_reject_transitions() {
            let mut s = Scenario::with_limits(2, 2);
            s.begin().unwrap();
            let _ = s.accept_batch(descending(10, 3)).unwrap();
            let _ = s.verify().unwrap();
            assert!(s.state().is_terminal());
            assert!(s.begin().is_err());
            assert!(s.accept_batch(descending(5, 1)).is_err());
            assert!(s.advance_page().is_err());
            assert!(s.verify().is_err());
        }

        #[test]
        fn test_fail_keeps_first_reason() {
            let mut s = Scenario::new();
            s.fail(&CheckError::driver("first"));
            s.fail(&CheckError::driver("second"));
            match s.state() {
                ScenarioState::Failed { reason } => assert!(reason.contains("first")),
                other => panic!("expected Failed, got {other:?}"),
            }
            assert!(s.begin().is_err());
        }
    }

    mod serialization_tests {
        use super::*;

        #[test]
        fn test_state_json() {
            let json = serde_json::to_string(&ScenarioState::Loading { page: 2 }).unwrap();
            assert_eq!(json, r#"{"state":"loading","page":2}"#);
            let json = serde_json::to_string(&ScenarioState::Done).unwrap();
            assert_eq!(json, r#"{"state":"done"}"#);
        }
    }
}
