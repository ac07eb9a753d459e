//! Synthetic inputs for the clibra benchmarks.
//!
//! Run with: `cargo bench --package clibra-bench`

use chrono::{NaiveDate, TimeDelta};
use clibra_aggregate::{Candle, aggregate_trades};
use clibra_types::{Side, Trade};

/// Generates `count` trades spread evenly across one UTC day.
///
/// Prices follow a deterministic zig-zag around 42 000 and sides alternate,
/// so runs are reproducible without a random number generator.
#[must_use]
pub fn synthetic_day(date: NaiveDate, count: usize) -> Vec<Trade> {
    let Some(midnight) = date.and_hms_opt(0, 0, 0) else {
        return Vec::new();
    };
    let start = midnight.and_utc();
    let step_micros = 86_400_000_000 / count.max(1) as i64;

    (0..count)
        .map(|i| {
            let offset = TimeDelta::microseconds(step_micros * i as i64);
            let wobble = (i % 200) as f64 - 100.0;
            let side = if i % 3 == 0 { Side::Sell } else { Side::Buy };
            Trade::new(start + offset, side, 0.001 * (1 + i % 50) as f64, 42_000.0 + wobble * 0.5)
        })
        .collect()
}

/// Aggregates [`synthetic_day`] into 1-second candles.
#[must_use]
pub fn synthetic_candles(date: NaiveDate, trades: usize) -> Vec<Candle> {
    aggregate_trades(&synthetic_day(date, trades))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_day_stays_in_day() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let trades = synthetic_day(date, 1_000);

        assert_eq!(trades.len(), 1_000);
        assert!(trades.iter().all(|t| t.timestamp.date_naive() == date));
        assert!(trades.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn test_one_candle_per_second_when_dense() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(synthetic_candles(date, 86_400).len(), 86_400);
    }
}
