//! Trade record representation.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::ClibraError;

/// Aggressor side of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Buyer-initiated trade.
    Buy,
    /// Seller-initiated trade.
    Sell,
}

impl Side {
    /// Returns the side as it appears in exchange archives.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::Sell => "Sell",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Side {
    type Err = ClibraError;

    /// Parses a side, case-insensitively. Anything other than buy/sell is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("buy") {
            Ok(Self::Buy)
        } else if s.eq_ignore_ascii_case("sell") {
            Ok(Self::Sell)
        } else {
            Err(ClibraError::InvalidSide(s.to_string()))
        }
    }
}

/// A single executed trade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Execution time (UTC, sub-second precision).
    pub timestamp: DateTime<Utc>,
    /// Aggressor side.
    pub side: Side,
    /// Traded quantity.
    pub size: f64,
    /// Execution price.
    pub price: f64,
}

impl Trade {
    /// Creates a new trade.
    #[must_use]
    pub const fn new(timestamp: DateTime<Utc>, side: Side, size: f64, price: f64) -> Self {
        Self {
            timestamp,
            side,
            size,
            price,
        }
    }

    /// Returns the start of the second containing this trade.
    ///
    /// Always floors, never rounds: `00:00:00.9` belongs to `00:00:00`.
    #[must_use]
    pub fn second(&self) -> DateTime<Utc> {
        truncate_to_second(self.timestamp)
    }
}

/// Floors a timestamp to its containing second.
#[must_use]
pub fn truncate_to_second(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt - TimeDelta::nanoseconds(i64::from(dt.timestamp_subsec_nanos()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_side_parse() {
        assert_eq!("Buy".parse::<Side>().unwrap(), Side::Buy);
        assert_eq!("sell".parse::<Side>().unwrap(), Side::Sell);
        assert!(matches!(
            "Unknown".parse::<Side>(),
            Err(ClibraError::InvalidSide(_))
        ));
    }

    #[test]
    fn test_trade_second_floors() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + TimeDelta::milliseconds(900);
        let trade = Trade::new(ts, Side::Sell, 2.0, 99.0);

        let second = trade.second();
        assert_eq!(second.second(), 0);
        assert_eq!(second.nanosecond(), 0);
    }

    #[test]
    fn test_truncate_before_epoch() {
        let ts = Utc.with_ymd_and_hms(1969, 12, 31, 23, 59, 59).unwrap()
            + TimeDelta::milliseconds(500);
        assert_eq!(
            truncate_to_second(ts),
            Utc.with_ymd_and_hms(1969, 12, 31, 23, 59, 59).unwrap()
        );
    }
}
