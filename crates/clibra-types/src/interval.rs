//! Resampling interval definitions.

use serde::{Deserialize, Serialize};
use std::num::NonZeroU64;
use std::str::FromStr;

/// Width of a resampling window, in whole seconds.
///
/// Windows are aligned to the Unix epoch: a window starts at every multiple
/// of the interval counted from `1970-01-01T00:00:00Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Interval(NonZeroU64);

impl Interval {
    /// One second, the resolution of stored partitions.
    pub const SECOND: Self = Self(NonZeroU64::MIN);

    /// Creates an interval of the given number of seconds.
    ///
    /// Returns `None` for zero.
    #[must_use]
    pub const fn from_secs(seconds: u64) -> Option<Self> {
        match NonZeroU64::new(seconds) {
            Some(s) => Some(Self(s)),
            None => None,
        }
    }

    /// Returns the interval width in seconds.
    #[must_use]
    pub const fn seconds(&self) -> u64 {
        self.0.get()
    }

    /// Returns the interval width in seconds as `i64`, saturating.
    #[must_use]
    pub const fn seconds_i64(&self) -> i64 {
        let s = self.0.get();
        if s > i64::MAX as u64 {
            i64::MAX
        } else {
            s as i64
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Interval> for u64 {
    fn from(interval: Interval) -> Self {
        interval.seconds()
    }
}

impl TryFrom<u64> for Interval {
    type Error = IntervalParseError;

    fn try_from(seconds: u64) -> Result<Self, Self::Error> {
        Self::from_secs(seconds).ok_or_else(|| IntervalParseError(seconds.to_string()))
    }
}

impl FromStr for Interval {
    type Err = IntervalParseError;

    /// Parses plain seconds (`"3600"`) or a unit suffix (`"90s"`, `"5m"`, `"1h"`, `"1d"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || IntervalParseError(s.to_string());
        let lower = s.trim().to_lowercase();

        let (digits, multiplier) = match lower.char_indices().last() {
            Some((idx, 's')) => (&lower[..idx], 1),
            Some((idx, 'm')) => (&lower[..idx], 60),
            Some((idx, 'h')) => (&lower[..idx], 3_600),
            Some((idx, 'd')) => (&lower[..idx], 86_400),
            Some(_) => (lower.as_str(), 1),
            None => return Err(err()),
        };

        let value: u64 = digits.parse().map_err(|_| err())?;
        value
            .checked_mul(multiplier)
            .and_then(Self::from_secs)
            .ok_or_else(err)
    }
}

/// Error returned when parsing an invalid interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalParseError(String);

impl std::fmt::Display for IntervalParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid interval '{}', expected a positive number of seconds (e.g. 60, 90s, 5m, 1h, 1d)",
            self.0
        )
    }
}

impl std::error::Error for IntervalParseError {}
