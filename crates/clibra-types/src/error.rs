//! Error types for clibra.

use chrono::NaiveDate;
use thiserror::Error;

use crate::IntervalParseError;

/// Result type alias for clibra operations.
pub type Result<T> = std::result::Result<T, ClibraError>;

/// Errors raised while validating requests and records.
#[derive(Error, Debug)]
pub enum ClibraError {
    /// A date argument is not `YYYYMMDD` / `YYYY-MM-DD`.
    #[error("Invalid date format: '{0}' (expected YYYYMMDD)")]
    InvalidDateFormat(String),

    /// A symbol that cannot name a store directory.
    #[error("Invalid symbol: '{0}' (must be a single path component)")]
    InvalidSymbol(String),

    /// No connector is registered for the exchange.
    #[error("Unsupported exchange: {0}")]
    UnsupportedExchange(String),

    /// Invalid date range.
    #[error(transparent)]
    DateRange(#[from] DateRangeError),

    /// Invalid resampling interval.
    #[error(transparent)]
    Interval(#[from] IntervalParseError),

    /// A trade side other than buy or sell.
    #[error("Invalid trade side: '{0}' (expected Buy or Sell)")]
    InvalidSide(String),

    /// Malformed procedure file line.
    #[error("Invalid procedure line {line}: {reason}")]
    Procedure {
        /// One-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error for invalid date ranges.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    /// Start date is after end date.
    #[error("Invalid date range: {start} > {end}")]
    InvalidRange {
        /// The start date.
        start: NaiveDate,
        /// The end date.
        end: NaiveDate,
    },
}
