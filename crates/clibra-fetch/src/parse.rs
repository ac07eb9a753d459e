//! Trade CSV parsing.

use chrono::{DateTime, Utc};
use clibra_types::{Side, Trade};
use serde::Deserialize;
use thiserror::Error;

use crate::{DecompressError, maybe_decompress};

/// Errors that can occur during trade parsing.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The archive could not be decompressed.
    #[error(transparent)]
    Decompress(#[from] DecompressError),

    /// Malformed CSV or a missing required column.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A timestamp that is not a finite, representable epoch time.
    #[error("Invalid timestamp '{value}' in row {row}")]
    InvalidTimestamp {
        /// One-based data row number.
        row: usize,
        /// The offending value.
        value: String,
    },

    /// A side other than buy or sell.
    #[error("Invalid side '{side}' in row {row}")]
    InvalidSide {
        /// One-based data row number.
        row: usize,
        /// The offending value.
        side: String,
    },
}

/// The columns of a Bybit trade archive that clibra uses.
#[derive(Debug, Deserialize)]
struct RawTrade {
    /// Fractional epoch seconds, kept as text so no digit is rounded away.
    timestamp: String,
    side: String,
    size: f64,
    price: f64,
}

impl RawTrade {
    fn into_trade(self, row: usize) -> Result<Trade, ParseError> {
        let Some(timestamp) = parse_epoch_seconds(&self.timestamp) else {
            return Err(ParseError::InvalidTimestamp {
                row,
                value: self.timestamp,
            });
        };
        let side = self
            .side
            .parse::<Side>()
            .map_err(|_| ParseError::InvalidSide {
                row,
                side: self.side.clone(),
            })?;
        Ok(Trade::new(timestamp, side, self.size, self.price))
    }
}

/// Parses fractional epoch seconds such as `1704067200.2871`.
///
/// Digits past the sixth decimal are truncated, never rounded, so a trade
/// always stays inside the second it was executed in. Values that are not
/// plain decimals (exponent notation) go through [`seconds_to_datetime`].
#[must_use]
pub fn parse_epoch_seconds(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return value.parse::<f64>().ok().and_then(seconds_to_datetime);
    }
    let Ok(seconds) = whole.parse::<i64>() else {
        return value.parse::<f64>().ok().and_then(seconds_to_datetime);
    };

    let digits = &fraction[..fraction.len().min(6)];
    let mut micros = 0i64;
    for (i, digit) in digits.bytes().enumerate() {
        micros += i64::from(digit - b'0') * 10i64.pow(5 - i as u32);
    }
    if whole.starts_with('-') {
        micros = -micros;
    }

    DateTime::from_timestamp_micros(seconds.checked_mul(1_000_000)?.checked_add(micros)?)
}

/// Converts fractional epoch seconds, truncated to microsecond precision.
#[must_use]
pub fn seconds_to_datetime(seconds: f64) -> Option<DateTime<Utc>> {
    let micros = (seconds * 1e6).floor();
    if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_micros(micros as i64)
}

/// Parses a trade CSV with a header row.
///
/// Only the `timestamp`, `side`, `size` and `price` columns are read; any
/// other column is ignored. Rows are returned in file order.
///
/// # Errors
///
/// Returns an error on the first malformed row.
pub fn parse_trades_csv(data: &[u8]) -> Result<Vec<Trade>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    reader
        .deserialize::<RawTrade>()
        .enumerate()
        .map(|(idx, row)| row?.into_trade(idx + 1))
        .collect()
}

/// Parses a Bybit daily trade archive into trades in execution order.
///
/// The archive may be gzip-compressed or already decoded. Bybit publishes
/// some days newest-first; those are reversed so that the first trade of
/// each second comes first.
///
/// # Errors
///
/// Returns an error if decompression or parsing fails.
pub fn parse_bybit_archive(raw: &[u8]) -> Result<Vec<Trade>, ParseError> {
    let data = maybe_decompress(raw)?;
    let mut trades = parse_trades_csv(&data)?;
    if is_descending(&trades) {
        trades.reverse();
    }
    Ok(trades)
}

fn is_descending(trades: &[Trade]) -> bool {
    match (trades.first(), trades.last()) {
        (Some(first), Some(last)) => first.timestamp > last.timestamp,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Timelike};
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    const HEADER: &str = "timestamp,symbol,side,size,price,tickDirection,trdMatchID,grossValue,homeNotional,foreignNotional\n";

    fn archive(rows: &[&str]) -> String {
        let mut out = HEADER.to_string();
        for row in rows {
            out.push_str(row);
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_parse_bybit_rows() {
        let data = archive(&[
            "1704067200.2,BTCUSDT,Buy,0.5,42000.5,PlusTick,a,2.1e+12,0.5,21000.25",
            "1704067200.9,BTCUSDT,Sell,1.25,41999.0,MinusTick,b,5.2e+12,1.25,52498.75",
        ]);

        let trades = parse_trades_csv(data.as_bytes()).unwrap();
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].side, Side::Buy);
        assert_eq!(trades[1].side, Side::Sell);
        assert_relative_eq!(trades[1].size, 1.25);
        assert_relative_eq!(trades[0].price, 42_000.5);
        assert_eq!(
            trades[0].timestamp,
            Utc.timestamp_opt(1_704_067_200, 200_000_000).unwrap()
        );
    }

    #[test]
    fn test_microsecond_precision() {
        let ts = parse_epoch_seconds("1704067200.123456").unwrap();
        assert_eq!(ts.nanosecond(), 123_456_000);
        let ts = parse_epoch_seconds("1704067200.2").unwrap();
        assert_eq!(ts.nanosecond(), 200_000_000);
        assert_eq!(parse_epoch_seconds("1704067200").unwrap().timestamp(), 1_704_067_200);
        assert!(seconds_to_datetime(f64::NAN).is_none());
        assert!(seconds_to_datetime(f64::INFINITY).is_none());
    }

    #[test]
    fn test_sub_microsecond_digits_never_round_up() {
        let ts = parse_epoch_seconds("1704067200.9999996").unwrap();
        assert_eq!(ts.timestamp(), 1_704_067_200);
        assert_eq!(ts.nanosecond(), 999_999_000);

        let ts = seconds_to_datetime(1_704_067_200.999_999_6).unwrap();
        assert_eq!(ts.timestamp(), 1_704_067_200);

        let data = archive(&["1704067200.9999996,BTCUSDT,Buy,1,100,PlusTick,a,1,1,1"]);
        let trades = parse_trades_csv(data.as_bytes()).unwrap();
        assert_eq!(trades[0].second(), Utc.timestamp_opt(1_704_067_200, 0).unwrap());
    }

    #[test]
    fn test_epoch_seconds_edge_forms() {
        assert_eq!(
            parse_epoch_seconds("1.7040672005e9").unwrap(),
            Utc.timestamp_opt(1_704_067_200, 500_000_000).unwrap()
        );
        assert_eq!(
            parse_epoch_seconds("-0.5").unwrap(),
            Utc.timestamp_opt(-1, 500_000_000).unwrap()
        );
        assert!(parse_epoch_seconds("noon").is_none());
        assert!(parse_epoch_seconds("").is_none());
    }

    #[test]
    fn test_invalid_timestamp_is_rejected() {
        let data = archive(&["soon,BTCUSDT,Buy,1,100,PlusTick,a,1,1,1"]);
        let err = parse_trades_csv(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::InvalidTimestamp { row: 1, ref value } if value == "soon"));
    }

    #[test]
    fn test_invalid_side_is_rejected() {
        let data = archive(&["1704067200.2,BTCUSDT,Hold,0.5,42000.5,ZeroPlusTick,a,1,1,1"]);
        let err = parse_trades_csv(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::InvalidSide { row: 1, ref side } if side == "Hold"));
    }

    #[test]
    fn test_missing_column_is_rejected() {
        let data = "timestamp,side,price\n1704067200.2,Buy,1.0\n";
        assert!(matches!(
            parse_trades_csv(data.as_bytes()),
            Err(ParseError::Csv(_))
        ));
    }

    #[test]
    fn test_descending_archive_is_reversed() {
        let data = archive(&[
            "1704067201.5,BTCUSDT,Buy,1,101,PlusTick,c,1,1,1",
            "1704067200.9,BTCUSDT,Sell,1,99,MinusTick,b,1,1,1",
            "1704067200.2,BTCUSDT,Buy,1,100,PlusTick,a,1,1,1",
        ]);
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();

        let trades = parse_bybit_archive(&compressed).unwrap();
        assert_relative_eq!(trades[0].price, 100.0);
        assert_relative_eq!(trades[2].price, 101.0);
    }

    #[test]
    fn test_header_only_archive() {
        let trades = parse_bybit_archive(HEADER.as_bytes()).unwrap();
        assert!(trades.is_empty());
    }
}
