//! Candle-to-interval resampling.

use chrono::{DateTime, TimeDelta, Utc};
use clibra_types::{Interval, truncate_to_second};

use crate::Candle;

/// Streaming candle resampler.
///
/// Folds time-ordered candles into epoch-aligned windows of a fixed width.
/// Windows without candles are skipped entirely; a partially covered window
/// is emitted from whatever candles it has.
#[derive(Debug)]
pub struct CandleResampler {
    interval: Interval,
    current: Option<WindowBuilder>,
}

impl CandleResampler {
    /// Creates a resampler for the given window width.
    #[must_use]
    pub const fn new(interval: Interval) -> Self {
        Self {
            interval,
            current: None,
        }
    }

    /// Returns the window width.
    #[must_use]
    pub const fn interval(&self) -> Interval {
        self.interval
    }

    /// Processes a candle, potentially emitting a completed window.
    ///
    /// Candles must arrive in ascending time order.
    pub fn process(&mut self, candle: &Candle) -> Option<Candle> {
        let start = window_start(candle.timestamp, self.interval);

        match self.current.take() {
            Some(mut builder) if builder.timestamp == start => {
                builder.update(candle);
                self.current = Some(builder);
                None
            }
            Some(builder) => {
                debug_assert!(builder.timestamp < start, "candles out of order");
                self.current = Some(WindowBuilder::new(start, candle));
                Some(builder.finish())
            }
            None => {
                self.current = Some(WindowBuilder::new(start, candle));
                None
            }
        }
    }

    /// Finishes resampling, returning any remaining window.
    #[must_use]
    pub fn finish(self) -> Option<Candle> {
        self.current.map(WindowBuilder::finish)
    }
}

/// Resamples time-ordered candles into windows of `interval` seconds.
///
/// Empty input yields an empty vector.
#[must_use]
pub fn resample(candles: &[Candle], interval: Interval) -> Vec<Candle> {
    let mut resampler = CandleResampler::new(interval);
    let mut out: Vec<Candle> = candles
        .iter()
        .filter_map(|candle| resampler.process(candle))
        .collect();
    out.extend(resampler.finish());
    out
}

/// Returns the start of the epoch-aligned window containing `timestamp`.
#[must_use]
pub fn window_start(timestamp: DateTime<Utc>, interval: Interval) -> DateTime<Utc> {
    let offset = timestamp.timestamp().rem_euclid(interval.seconds_i64());
    truncate_to_second(timestamp) - TimeDelta::seconds(offset)
}

#[derive(Debug)]
struct WindowBuilder {
    timestamp: DateTime<Utc>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
    buy_volume: f64,
    sell_volume: f64,
}

impl WindowBuilder {
    const fn new(timestamp: DateTime<Utc>, candle: &Candle) -> Self {
        Self {
            timestamp,
            open: candle.open,
            high: candle.high,
            low: candle.low,
            close: candle.close,
            volume: candle.volume,
            buy_volume: candle.buy_volume,
            sell_volume: candle.sell_volume,
        }
    }

    fn update(&mut self, candle: &Candle) {
        self.high = self.high.max(candle.high);
        self.low = self.low.min(candle.low);
        self.close = candle.close;
        self.volume += candle.volume;
        self.buy_volume += candle.buy_volume;
        self.sell_volume += candle.sell_volume;
    }

    const fn finish(self) -> Candle {
        Candle::new(
            self.timestamp,
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
            self.buy_volume,
            self.sell_volume,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate_trades;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use chrono::{TimeZone, Timelike};
    use clibra_types::{Side, Trade};
    use proptest::prelude::*;

    fn interval(seconds: u64) -> Interval {
        Interval::from_secs(seconds).unwrap()
    }

    fn second(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, m, s).unwrap()
    }

    fn flat(ts: DateTime<Utc>, price: f64, buy: f64, sell: f64) -> Candle {
        Candle::new(ts, price, price, price, price, buy + sell, buy, sell)
    }

    #[test]
    fn test_two_second_window_example() {
        let candles = vec![
            Candle::new(second(0, 0, 0), 100.0, 100.0, 99.0, 99.0, 3.0, 1.0, 2.0),
            Candle::new(second(0, 0, 1), 101.0, 101.0, 101.0, 101.0, 1.0, 1.0, 0.0),
        ];

        let out = resample(&candles, interval(2));
        assert_eq!(out.len(), 1);

        let bar = out[0];
        assert_eq!(bar.timestamp, second(0, 0, 0));
        assert_relative_eq!(bar.open, 100.0);
        assert_relative_eq!(bar.high, 101.0);
        assert_relative_eq!(bar.low, 99.0);
        assert_relative_eq!(bar.close, 101.0);
        assert_relative_eq!(bar.volume, 4.0);
        assert_relative_eq!(bar.buy_volume, 2.0);
        assert_relative_eq!(bar.sell_volume, 2.0);
    }

    #[test]
    fn test_empty_windows_are_dropped() {
        let candles = vec![
            flat(second(0, 0, 5), 10.0, 1.0, 0.0),
            flat(second(0, 3, 2), 11.0, 0.0, 1.0),
        ];

        let out = resample(&candles, interval(60));
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].timestamp, second(0, 0, 0));
        assert_eq!(out[1].timestamp, second(0, 3, 0));
    }

    #[test]
    fn test_windows_align_to_epoch_not_first_candle() {
        let candles = vec![flat(second(10, 7, 13), 10.0, 1.0, 0.0)];

        let out = resample(&candles, interval(300));
        assert_eq!(out[0].timestamp, second(10, 5, 0));

        // 7 seconds does not divide a day: alignment follows the epoch.
        let out = resample(&candles, interval(7));
        assert_eq!(out[0].timestamp.timestamp() % 7, 0);
    }

    #[test]
    fn test_window_spans_midnight() {
        let before = Utc.with_ymd_and_hms(2024, 1, 1, 23, 59, 59).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        // 1704153599 = 7 * 243450514 + 1, so the 7s window opens at 23:59:58.
        let width = interval(7);
        assert_eq!(window_start(before, width), window_start(after, width));

        let out = resample(&[flat(before, 1.0, 1.0, 0.0), flat(after, 2.0, 0.0, 1.0)], width);
        assert_eq!(out.len(), 1);
        assert_relative_eq!(out[0].open, 1.0);
        assert_relative_eq!(out[0].close, 2.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(resample(&[], interval(60)).is_empty());
    }

    #[test]
    fn test_streaming_matches_batch() {
        let candles: Vec<_> = (0..10)
            .map(|s| flat(second(0, 0, s), f64::from(s), 1.0, 1.0))
            .collect();

        let mut resampler = CandleResampler::new(interval(4));
        let mut streamed = Vec::new();
        for candle in &candles {
            streamed.extend(resampler.process(candle));
        }
        streamed.extend(resampler.finish());

        assert_eq!(streamed, resample(&candles, interval(4)));
        assert_eq!(streamed.len(), 3);
        assert_eq!(streamed[2].timestamp.second(), 8);
    }

    fn arb_trade() -> impl Strategy<Value = Trade> {
        (
            0i64..7_200_000,
            prop_oneof![Just(Side::Buy), Just(Side::Sell)],
            0.001f64..100.0,
            1.0f64..1_000.0,
        )
            .prop_map(|(millis, side, size, price)| {
                Trade::new(second(0, 0, 0) + TimeDelta::milliseconds(millis), side, size, price)
            })
    }

    proptest! {
        #[test]
        fn prop_double_interval_is_boundary_consistent(
            mut trades in prop::collection::vec(arb_trade(), 0..300),
            t in 1u64..900,
        ) {
            trades.sort_by_key(|t| t.timestamp);
            let seconds = aggregate_trades(&trades);

            let direct = resample(&seconds, interval(2 * t));
            let staged = resample(&resample(&seconds, interval(t)), interval(2 * t));

            prop_assert_eq!(direct.len(), staged.len());
            for (a, b) in direct.iter().zip(&staged) {
                prop_assert_eq!(a.timestamp, b.timestamp);
                prop_assert_eq!(a.open, b.open);
                prop_assert_eq!(a.high, b.high);
                prop_assert_eq!(a.low, b.low);
                prop_assert_eq!(a.close, b.close);
                assert_abs_diff_eq!(a.volume, b.volume, epsilon = 1e-6);
                assert_abs_diff_eq!(a.buy_volume, b.buy_volume, epsilon = 1e-6);
                assert_abs_diff_eq!(a.sell_volume, b.sell_volume, epsilon = 1e-6);
            }
        }

        #[test]
        fn prop_resampled_candles_are_consistent(
            mut trades in prop::collection::vec(arb_trade(), 0..300),
            t in 1u64..3_600,
        ) {
            trades.sort_by_key(|t| t.timestamp);
            let out = resample(&aggregate_trades(&trades), interval(t));

            for candle in &out {
                prop_assert!(candle.is_consistent(1e-6));
                prop_assert_eq!(candle.timestamp.timestamp() % t as i64, 0);
            }
            for pair in out.windows(2) {
                prop_assert!(pair[0].timestamp < pair[1].timestamp);
            }
        }
    }
}
