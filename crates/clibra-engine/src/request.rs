//! Validated operation requests.

use clibra_format::OutputFormat;
use clibra_types::{ClibraError, DateRange, Interval, PartitionKey, normalize_exchange, validate_symbol};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Fetch and store one pair over a date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    /// Lowercase exchange identifier.
    pub exchange: String,
    /// Symbol, kept verbatim.
    pub symbol: String,
    /// Dates to store.
    pub range: DateRange,
}

impl UpdateRequest {
    /// Creates a request. The exchange identifier is lowercased.
    #[must_use]
    pub fn new(exchange: &str, symbol: impl Into<String>, range: DateRange) -> Self {
        Self {
            exchange: normalize_exchange(exchange),
            symbol: symbol.into(),
            range,
        }
    }

    /// Parses `begin`/`end` (`YYYYMMDD` or `YYYY-MM-DD`) into a request.
    ///
    /// # Errors
    ///
    /// Returns an error if the symbol cannot name a store directory, a date
    /// is malformed, or `begin > end`.
    pub fn parse(exchange: &str, symbol: &str, begin: &str, end: &str) -> Result<Self, ClibraError> {
        validate_symbol(symbol)?;
        Ok(Self::new(exchange, symbol, DateRange::parse(begin, end)?))
    }

    /// Builds the partition key of the first requested date.
    pub(crate) fn first_key(&self) -> Result<PartitionKey, ClibraError> {
        PartitionKey::new(&self.exchange, self.symbol.as_str(), self.range.start)
    }
}

/// Tuning for [`update`](crate::update).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOptions {
    /// Dates processed concurrently. Zero is treated as one.
    pub workers: usize,
}

impl UpdateOptions {
    /// Default number of concurrent dates.
    pub const DEFAULT_WORKERS: usize = 4;
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            workers: Self::DEFAULT_WORKERS,
        }
    }
}

/// Resample a stored date range into one export file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    /// Lowercase exchange identifier.
    pub exchange: String,
    /// Symbol, kept verbatim.
    pub symbol: String,
    /// Dates to read.
    pub range: DateRange,
    /// Output window width.
    pub interval: Interval,
    /// Directory receiving the export; created if missing.
    pub output_dir: PathBuf,
    /// Export encoding.
    pub format: OutputFormat,
}

impl GenerateRequest {
    /// Creates a request writing the default format. The exchange identifier is lowercased.
    #[must_use]
    pub fn new(
        exchange: &str,
        symbol: impl Into<String>,
        range: DateRange,
        interval: Interval,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            exchange: normalize_exchange(exchange),
            symbol: symbol.into(),
            range,
            interval,
            output_dir: output_dir.into(),
            format: OutputFormat::default(),
        }
    }

    /// Parses dates and interval into a request.
    ///
    /// # Errors
    ///
    /// Returns an error if the symbol cannot name a store directory, a date
    /// or the interval is malformed, or `begin > end`.
    pub fn parse(
        exchange: &str,
        symbol: &str,
        begin: &str,
        end: &str,
        interval: &str,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self, ClibraError> {
        validate_symbol(symbol)?;
        let range = DateRange::parse(begin, end)?;
        let interval = interval.parse::<Interval>()?;
        Ok(Self::new(exchange, symbol, range, interval, output_dir))
    }

    /// Sets the export encoding.
    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Returns `<exchange>_<symbol>_<begin>_<end>_<seconds>.<ext>`, dates as `YYYYMMDD`.
    #[must_use]
    pub fn artifact_name(&self) -> String {
        format!(
            "{}_{}_{}_{}_{}.{}",
            self.exchange,
            self.symbol,
            self.range.start.format("%Y%m%d"),
            self.range.end.format("%Y%m%d"),
            self.interval.seconds(),
            self.format.extension()
        )
    }

    /// Returns the full path of the export file.
    #[must_use]
    pub fn artifact_path(&self) -> PathBuf {
        self.output_dir.join(self.artifact_name())
    }

    /// Builds the partition key of the first requested date.
    pub(crate) fn first_key(&self) -> Result<PartitionKey, ClibraError> {
        PartitionKey::new(&self.exchange, self.symbol.as_str(), self.range.start)
    }
}

/// Delete one pair's partitions over a date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveRequest {
    /// Lowercase exchange identifier.
    pub exchange: String,
    /// Symbol, kept verbatim.
    pub symbol: String,
    /// Dates to delete.
    pub range: DateRange,
}

impl RemoveRequest {
    /// Creates a request. The exchange identifier is lowercased.
    #[must_use]
    pub fn new(exchange: &str, symbol: impl Into<String>, range: DateRange) -> Self {
        Self {
            exchange: normalize_exchange(exchange),
            symbol: symbol.into(),
            range,
        }
    }

    /// Parses `begin`/`end` into a request.
    ///
    /// # Errors
    ///
    /// Returns an error if the symbol cannot name a store directory, a date
    /// is malformed, or `begin > end`.
    pub fn parse(exchange: &str, symbol: &str, begin: &str, end: &str) -> Result<Self, ClibraError> {
        validate_symbol(symbol)?;
        Ok(Self::new(exchange, symbol, DateRange::parse(begin, end)?))
    }

    /// Builds the partition key of the first requested date.
    pub(crate) fn first_key(&self) -> Result<PartitionKey, ClibraError> {
        PartitionKey::new(&self.exchange, self.symbol.as_str(), self.range.start)
    }
}
