//! Trade-to-1-second candle aggregation.

use chrono::{DateTime, Utc};
use clibra_types::{Side, Trade};
use std::collections::BTreeMap;

use crate::Candle;

/// Groups trades into 1-second candles.
///
/// Each trade lands in the bucket of its floored second. Within a bucket the
/// arrival order of [`push`](Self::push) calls decides `open` and `close`;
/// input is never re-sorted, so callers must feed trades in the order the
/// exchange executed them. Buckets without trades produce no candle.
#[derive(Debug, Default)]
pub struct TradeAggregator {
    buckets: BTreeMap<DateTime<Utc>, TradeBucket>,
    trade_count: usize,
}

impl TradeAggregator {
    /// Creates an empty aggregator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buckets: BTreeMap::new(),
            trade_count: 0,
        }
    }

    /// Adds one trade to its bucket.
    pub fn push(&mut self, trade: &Trade) {
        self.trade_count += 1;
        self.buckets
            .entry(trade.second())
            .and_modify(|bucket| bucket.update(trade))
            .or_insert_with(|| TradeBucket::new(trade));
    }

    /// Returns the number of trades pushed so far.
    #[must_use]
    pub const fn trade_count(&self) -> usize {
        self.trade_count
    }

    /// Returns the number of occupied seconds so far.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Finishes aggregation, returning candles in ascending time order.
    #[must_use]
    pub fn finish(self) -> Vec<Candle> {
        self.buckets
            .into_iter()
            .map(|(timestamp, bucket)| bucket.finish(timestamp))
            .collect()
    }
}

impl Extend<Trade> for TradeAggregator {
    fn extend<I: IntoIterator<Item = Trade>>(&mut self, iter: I) {
        for trade in iter {
            self.push(&trade);
        }
    }
}

/// Aggregates a day's trades into 1-second candles.
///
/// Empty input yields an empty vector.
#[must_use]
pub fn aggregate_trades(trades: &[Trade]) -> Vec<Candle> {
    let mut aggregator = TradeAggregator::new();
    for trade in trades {
        aggregator.push(trade);
    }
    aggregator.finish()
}

/// Running OHLC state for one second.
#[derive(Debug)]
struct TradeBucket {
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    buy_volume: f64,
    sell_volume: f64,
}

impl TradeBucket {
    fn new(trade: &Trade) -> Self {
        let mut bucket = Self {
            open: trade.price,
            high: trade.price,
            low: trade.price,
            close: trade.price,
            buy_volume: 0.0,
            sell_volume: 0.0,
        };
        bucket.add_size(trade);
        bucket
    }

    fn update(&mut self, trade: &Trade) {
        self.high = self.high.max(trade.price);
        self.low = self.low.min(trade.price);
        self.close = trade.price;
        self.add_size(trade);
    }

    fn add_size(&mut self, trade: &Trade) {
        match trade.side {
            Side::Buy => self.buy_volume += trade.size,
            Side::Sell => self.sell_volume += trade.size,
        }
    }

    // volume is derived so that volume == buy + sell holds exactly
    fn finish(self, timestamp: DateTime<Utc>) -> Candle {
        Candle::new(
            timestamp,
            self.open,
            self.high,
            self.low,
            self.close,
            self.buy_volume + self.sell_volume,
            self.buy_volume,
            self.sell_volume,
        )
    }
}
