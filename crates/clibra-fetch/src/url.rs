//! Archive URL construction.

use chrono::NaiveDate;

/// Base URL of Bybit's public trade archives.
pub const BYBIT_BASE_URL: &str = "https://public.bybit.com/trading";

/// Builds the URL of one day's Bybit trade archive.
///
/// URL format: `{BYBIT_BASE_URL}/{SYMBOL}/{SYMBOL}{YYYY-MM-DD}.csv.gz`
///
/// # Example
///
/// ```
/// use clibra_fetch::url::bybit_trades_url;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// let url = bybit_trades_url("BTCUSDT", date);
/// assert_eq!(url, "https://public.bybit.com/trading/BTCUSDT/BTCUSDT2024-01-15.csv.gz");
/// ```
#[must_use]
pub fn bybit_trades_url(symbol: &str, date: NaiveDate) -> String {
    format!(
        "{BYBIT_BASE_URL}/{symbol}/{symbol}{}.csv.gz",
        date.format("%Y-%m-%d")
    )
}
