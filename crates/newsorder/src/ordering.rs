//! Newest-first ordering check over a collected timestamp sequence.

use serde::{Deserialize, Serialize};

use crate::result::{CheckError, CheckResult};
use crate::timestamp::Timestamp;

/// Number of leading timestamps the ordering check inspects
pub const DEFAULT_SAMPLE_SIZE: usize = 100;

/// Summary of a passed ordering check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderingReport {
    /// Number of timestamps inspected
    pub checked: usize,
    /// First (newest) inspected timestamp
    pub newest: Option<Timestamp>,
    /// Last (oldest) inspected timestamp
    pub oldest: Option<Timestamp>,
}

/// Verify that the first `min_sample_size` timestamps are sorted newest-first.
///
/// The prefix is compared against a stably sorted descending copy of itself.
/// Ties are allowed. Values past the prefix are ignored, and an empty prefix
/// passes.
///
/// # Errors
///
/// - [`CheckError::InsufficientSamples`] if the sequence is shorter than
///   `min_sample_size`.
/// - [`CheckError::OrderingViolation`] naming the first index whose value is
///   newer than its predecessor.
pub fn verify_descending(
    sequence: &[Timestamp],
    min_sample_size: usize,
) -> CheckResult<OrderingReport> {
    if sequence.len() < min_sample_size {
        return Err(CheckError::InsufficientSamples {
            required: min_sample_size,
            actual: sequence.len(),
        });
    }

    let prefix = &sequence[..min_sample_size];
    let mut sorted = prefix.to_vec();
    sorted.sort_by(|a, b| b.cmp(a));

    if prefix == sorted.as_slice() {
        return Ok(OrderingReport {
            checked: prefix.len(),
            newest: prefix.first().copied(),
            oldest: prefix.last().copied(),
        });
    }

    Err(first_inversion(prefix, &sorted))
}

/// Locate the offending pair in a prefix known to differ from its sorted copy
fn first_inversion(prefix: &[Timestamp], sorted: &[Timestamp]) -> CheckError {
    if let Some(i) = prefix.windows(2).position(|w| w[0] < w[1]) {
        return CheckError::OrderingViolation {
            index: i + 1,
            previous: prefix[i].as_secs(),
            current: prefix[i + 1].as_secs(),
        };
    }

    // no adjacent inversion: report the first mismatch against the sorted copy
    let index = prefix
        .iter()
        .zip(sorted)
        .position(|(a, b)| a != b)
        .unwrap_or(0);
    CheckError::OrderingViolation {
        index,
        previous: sorted.get(index).map_or(0, |t| t.as_secs()),
        current: prefix.get(index).map_or(0, |t| t.as_secs()),
    }
}
