//! Output format abstraction.

use clibra_aggregate::Candle;
use std::io::Write;
use thiserror::Error;

use crate::{CsvFormatter, JsonFormatter};

/// Output format identifier for generated exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// Gzip-compressed CSV, the same layout as stored partitions.
    #[default]
    CsvGz,
    /// Plain CSV.
    Csv,
    /// JSON array format.
    Json,
    /// Newline-delimited JSON format.
    Ndjson,
    /// Apache Parquet format.
    Parquet,
}

impl OutputFormat {
    /// Returns the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::CsvGz => "csv.gz",
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Ndjson => "ndjson",
            Self::Parquet => "parquet",
        }
    }

    /// Returns all available formats.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::CsvGz, Self::Csv, Self::Json, Self::Ndjson, Self::Parquet]
    }

    /// Writes candles in this format.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails, or [`FormatError::Unsupported`]
    /// for Parquet when the `parquet` feature is disabled.
    pub fn write_candles<W: Write + Send>(
        &self,
        candles: &[Candle],
        writer: W,
    ) -> Result<(), FormatError> {
        match self {
            Self::CsvGz => CsvFormatter::gzip().write_candles(candles, writer),
            Self::Csv => CsvFormatter::new().write_candles(candles, writer),
            Self::Json => JsonFormatter::new().write_candles(candles, writer),
            Self::Ndjson => JsonFormatter::ndjson().write_candles(candles, writer),
            #[cfg(feature = "parquet")]
            Self::Parquet => crate::ParquetFormatter::new().write_candles(candles, writer),
            #[cfg(not(feature = "parquet"))]
            Self::Parquet => Err(FormatError::Unsupported(
                "Parquet support not compiled in".to_string(),
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv.gz" | "csvgz" | "gz" => Ok(Self::CsvGz),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "ndjson" | "jsonl" => Ok(Self::Ndjson),
            "parquet" | "pq" => Ok(Self::Parquet),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

/// Errors that can occur while encoding or decoding candles.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Unknown output format.
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// Format not available in this build.
    #[error("Unsupported format: {0}")]
    Unsupported(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding or decoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A `datetime` cell that is not an ISO-8601 timestamp.
    #[error("Invalid timestamp '{value}' in row {row}")]
    InvalidTimestamp {
        /// The offending cell.
        value: String,
        /// One-based data row number.
        row: usize,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Arrow/Parquet error.
    #[error("Parquet error: {0}")]
    Parquet(String),
}

/// Trait for output formatters.
pub trait Formatter: Send + Sync {
    /// Writes candles to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_candles<W: Write + Send>(
        &self,
        candles: &[Candle],
        writer: W,
    ) -> Result<(), FormatError>;

    /// Returns the file extension for this format.
    fn extension(&self) -> &str;
}
