//! Date range and day iteration.

use chrono::{NaiveDate, TimeDelta};

use crate::{ClibraError, DateRangeError};

/// A range of calendar dates, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// Start date (inclusive).
    pub start: NaiveDate,
    /// End date (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end.
    ///
    /// # Errors
    ///
    /// Returns an error if start > end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parses both ends with [`parse_date`] and validates the range.
    ///
    /// # Errors
    ///
    /// Returns [`ClibraError::InvalidDateFormat`] if either date is malformed,
    /// or [`ClibraError::DateRange`] if start > end.
    pub fn parse(start: &str, end: &str) -> Result<Self, ClibraError> {
        let start = parse_date(start)?;
        let end = parse_date(end)?;
        Ok(Self::new(start, end)?)
    }

    /// Returns a lazy iterator over every date in the range.
    ///
    /// `DateRange` is `Copy`, so calling this again restarts from `start`.
    #[must_use]
    pub const fn days(&self) -> DayIterator {
        DayIterator {
            current: Some(self.start),
            end: self.end,
        }
    }

    /// Returns the total number of days in the range.
    #[must_use]
    pub fn total_days(&self) -> usize {
        usize::try_from((self.end - self.start).num_days() + 1).unwrap_or(0)
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

impl IntoIterator for DateRange {
    type Item = NaiveDate;
    type IntoIter = DayIterator;

    fn into_iter(self) -> Self::IntoIter {
        self.days()
    }
}

/// Iterator over all dates in a date range.
#[derive(Debug, Clone)]
pub struct DayIterator {
    current: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for DayIterator {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.filter(|d| *d <= self.end)?;
        self.current = current.checked_add_signed(TimeDelta::days(1));
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .current
            .filter(|d| *d <= self.end)
            .map_or(0, |d| (self.end - d).num_days() as usize + 1);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DayIterator {}

/// Parses a calendar date given as `YYYYMMDD` or `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns [`ClibraError::InvalidDateFormat`] for anything else.
pub fn parse_date(s: &str) -> Result<NaiveDate, ClibraError> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y%m%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .map_err(|_| ClibraError::InvalidDateFormat(s.to_string()))
}
