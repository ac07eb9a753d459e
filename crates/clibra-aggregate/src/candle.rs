//! Candle (OHLCV bar) data structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLCV bar with buy/sell volume split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candle {
    /// Bucket start, truncated to the bucket's resolution.
    #[serde(rename = "datetime")]
    pub timestamp: DateTime<Utc>,
    /// Opening price (first trade or first sub-candle's open).
    pub open: f64,
    /// Highest price during the bucket.
    pub high: f64,
    /// Lowest price during the bucket.
    pub low: f64,
    /// Closing price (last trade or last sub-candle's close).
    pub close: f64,
    /// Total traded size.
    pub volume: f64,
    /// Traded size on buyer-initiated trades.
    pub buy_volume: f64,
    /// Traded size on seller-initiated trades.
    pub sell_volume: f64,
}

impl Candle {
    /// Creates a new candle.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        buy_volume: f64,
        sell_volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
            buy_volume,
            sell_volume,
        }
    }

    /// Returns true if the OHLC and volume invariants hold within `epsilon`.
    ///
    /// `low <= min(open, close)`, `high >= max(open, close)` and
    /// `volume == buy_volume + sell_volume`.
    #[must_use]
    pub fn is_consistent(&self, epsilon: f64) -> bool {
        self.low <= self.open.min(self.close)
            && self.high >= self.open.max(self.close)
            && (self.volume - (self.buy_volume + self.sell_volume)).abs() <= epsilon
    }
}
