//! CSV candle tables, plain or gzip-compressed.

use chrono::{DateTime, NaiveDateTime, Utc};
use clibra_aggregate::Candle;
use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::{FormatError, Formatter};

/// Column header shared by partitions and CSV exports.
pub const CANDLE_COLUMNS: [&str; 8] = [
    "datetime",
    "open",
    "high",
    "low",
    "close",
    "volume",
    "buyVolume",
    "sellVolume",
];

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// CSV formatter.
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Field delimiter (default: comma).
    delimiter: u8,
    /// Whether to include header row.
    include_header: bool,
    /// Gzip compression level, `None` for plain text.
    compression: Option<Compression>,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    /// Creates a new plain CSV formatter with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: b',',
            include_header: true,
            compression: None,
        }
    }

    /// Creates a gzip-compressed CSV formatter (the partition layout).
    #[must_use]
    pub fn gzip() -> Self {
        Self::new().with_compression(Some(Compression::default()))
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Sets gzip compression (`None` disables it).
    #[must_use]
    pub const fn with_compression(mut self, compression: Option<Compression>) -> Self {
        self.compression = compression;
        self
    }

    /// Creates a tab-separated values (TSV) formatter.
    #[must_use]
    pub const fn tsv() -> Self {
        Self::new().with_delimiter(b'\t')
    }

    /// Writes the table and hands back the underlying writer.
    fn write_rows<W: Write>(&self, candles: &[Candle], writer: W) -> Result<W, FormatError> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .from_writer(writer);

        // Written by hand so that an empty table still carries its header.
        if self.include_header {
            csv_writer.write_record(CANDLE_COLUMNS)?;
        }
        for candle in candles {
            csv_writer.serialize(CandleRow::from(candle))?;
        }

        csv_writer
            .into_inner()
            .map_err(|e| FormatError::Io(e.into_error()))
    }
}

impl Formatter for CsvFormatter {
    fn write_candles<W: Write + Send>(
        &self,
        candles: &[Candle],
        writer: W,
    ) -> Result<(), FormatError> {
        match self.compression {
            Some(level) => {
                let encoder = self.write_rows(candles, GzEncoder::new(writer, level))?;
                encoder.finish()?.flush()?;
            }
            None => self.write_rows(candles, writer)?.flush()?,
        }
        Ok(())
    }

    fn extension(&self) -> &str {
        if self.compression.is_some() {
            "csv.gz"
        } else if self.delimiter == b'\t' {
            "tsv"
        } else {
            "csv"
        }
    }
}

/// Reads a gzip-compressed candle table (the partition layout).
///
/// # Errors
///
/// Returns an error if the stream is not gzip, a column is missing, or a
/// cell does not parse.
pub fn read_candles_gz<R: Read>(reader: R) -> Result<Vec<Candle>, FormatError> {
    read_candles(MultiGzDecoder::new(reader))
}

/// Reads a plain comma-separated candle table with a header row.
///
/// # Errors
///
/// Returns an error if the header lacks a column or a cell does not parse.
pub fn read_candles<R: Read>(reader: R) -> Result<Vec<Candle>, FormatError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    if !csv_reader.headers()?.iter().any(|h| h == CANDLE_COLUMNS[0]) {
        return Err(FormatError::MissingColumn(CANDLE_COLUMNS[0].to_string()));
    }

    csv_reader
        .deserialize::<CandleRow>()
        .enumerate()
        .map(|(idx, row)| row?.into_candle(idx + 1))
        .collect()
}

/// Parses a `datetime` cell.
///
/// Accepts RFC 3339 (`2024-01-01T00:00:00Z`) as well as the naive layouts
/// `2024-01-01 00:00:00` and `2024-01-01T00:00:00`, read as UTC.
#[must_use]
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|naive| naive.and_utc())
        })
}

/// One CSV row, keyed by the partition column names.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CandleRow {
    datetime: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
    buy_volume: f64,
    sell_volume: f64,
}

impl From<&Candle> for CandleRow {
    fn from(candle: &Candle) -> Self {
        Self {
            datetime: candle.timestamp.format(DATETIME_FORMAT).to_string(),
            open: candle.open,
            high: candle.high,
            low: candle.low,
            close: candle.close,
            volume: candle.volume,
            buy_volume: candle.buy_volume,
            sell_volume: candle.sell_volume,
        }
    }
}

impl CandleRow {
    fn into_candle(self, row: usize) -> Result<Candle, FormatError> {
        let timestamp =
            parse_datetime(&self.datetime).ok_or_else(|| FormatError::InvalidTimestamp {
                value: self.datetime.clone(),
                row,
            })?;
        Ok(Candle::new(
            timestamp,
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
            self.buy_volume,
            self.sell_volume,
        ))
    }
}
