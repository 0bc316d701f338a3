//! Article timestamps and the `title` attribute parser.
//!
//! The listing renders every article age as
//! `<span class="age" title="2025-10-17T17:46:44 1760723204">`. Older markup
//! prefixes the value with a literal `time` token, so both
//! `time <datetime> <epoch>` and `<datetime> <epoch>` are accepted. Anything
//! else is rejected with a [`TimestampParseError`]; the parser never falls
//! back to a sentinel value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use thiserror::Error;

/// Optional leading token of the attribute value
pub const TIME_PREFIX: &str = "time";

/// Errors produced while parsing a timestamp attribute
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampParseError {
    /// Attribute value is empty or whitespace
    #[error("attribute value is empty")]
    Empty,

    /// No datetime token after the optional prefix
    #[error("no datetime token in {value:?}")]
    MissingDatetime {
        /// Raw attribute value
        value: String,
    },

    /// No epoch-seconds token after the datetime
    #[error("no epoch-seconds token in {value:?}")]
    MissingEpoch {
        /// Raw attribute value
        value: String,
    },

    /// Epoch token is not a non-negative integer
    #[error("epoch token {token:?} is not an integer")]
    InvalidEpoch {
        /// Offending token
        token: String,
        /// Underlying parse failure
        #[source]
        source: ParseIntError,
    },

    /// Extra tokens after the epoch
    #[error("unexpected trailing token {token:?} in {value:?}")]
    TrailingTokens {
        /// First unexpected token
        token: String,
        /// Raw attribute value
        value: String,
    },
}

/// Unix epoch seconds of an article submission
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Wrap raw epoch seconds
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Raw epoch seconds
    #[must_use]
    pub const fn as_secs(self) -> u64 {
        self.0
    }
}

impl From<u64> for Timestamp {
    fn from(secs: u64) -> Self {
        Self(secs)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fully parsed `title` attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTimestamp {
    /// The ISO 8601 datetime token, kept verbatim
    pub datetime: String,
    /// The epoch-seconds token
    pub timestamp: Timestamp,
}

impl FromStr for ParsedTimestamp {
    type Err = TimestampParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut tokens = value.split_whitespace().peekable();
        if tokens.peek().is_none() {
            return Err(TimestampParseError::Empty);
        }
        if tokens.peek() == Some(&TIME_PREFIX) {
            let _ = tokens.next();
        }

        let datetime = tokens
            .next()
            .ok_or_else(|| TimestampParseError::MissingDatetime {
                value: value.to_string(),
            })?;
        let epoch = tokens
            .next()
            .ok_or_else(|| TimestampParseError::MissingEpoch {
                value: value.to_string(),
            })?;
        if let Some(extra) = tokens.next() {
            return Err(TimestampParseError::TrailingTokens {
                token: extra.to_string(),
                value: value.to_string(),
            });
        }

        let secs = epoch
            .parse::<u64>()
            .map_err(|source| TimestampParseError::InvalidEpoch {
                token: epoch.to_string(),
                source,
            })?;

        Ok(Self {
            datetime: datetime.to_string(),
            timestamp: Timestamp(secs),
        })
    }
}

/// Parse the epoch seconds out of an age `title` attribute
pub fn parse_timestamp(value: &str) -> Result<Timestamp, TimestampParseError> {
    value.parse::<ParsedTimestamp>().map(|p| p.timestamp)
}

/// Append-only sequence of timestamps in page-then-DOM order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimestampSequence {
    values: Vec<Timestamp>,
}

impl TimestampSequence {
    /// Create an empty sequence
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one page's batch, preserving its order
    pub fn extend_batch(&mut self, batch: impl IntoIterator<Item = Timestamp>) {
        self.values.extend(batch);
    }

    /// Number of timestamps collected so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing has been collected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// View the collected timestamps
    #[must_use]
    pub fn as_slice(&self) -> &[Timestamp] {
        &self.values
    }
}

impl FromIterator<Timestamp> for TimestampSequence {
    fn from_iter<I: IntoIterator<Item = Timestamp>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
