//! Exchange connectors: where a day's trades come from and how to read them.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::NaiveDate;
use clibra_types::Trade;
use std::fmt;
use tracing::{debug, warn};

use crate::{DownloadClient, DownloadError, ParseError, parse_bybit_archive, url::bybit_trades_url};

/// Turns a raw archive body into trades in execution order.
pub type TradeParser = fn(&[u8]) -> Result<Vec<Trade>, ParseError>;

/// Result of fetching one (symbol, date).
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The day's trades, possibly empty.
    Trades(Vec<Trade>),
    /// The source has no archive for that day.
    NotFound,
    /// Download or parsing failed.
    Failed(String),
}

/// A source of daily trade archives for one exchange.
#[async_trait]
pub trait Connector: Send + Sync + fmt::Debug {
    /// Lowercase exchange identifier.
    fn exchange(&self) -> &'static str;

    /// Builds the fetch target (a URL) for one day.
    fn target(&self, symbol: &str, date: NaiveDate) -> String;

    /// Downloads the raw archive. `Ok(None)` means the source has no data.
    async fn fetch_raw(&self, target: &str) -> Result<Option<Bytes>, DownloadError>;

    /// Returns the parser for raw archives.
    fn parser(&self) -> TradeParser;

    /// Normalizes a raw archive into trades on the calling thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive is malformed.
    fn normalize(&self, raw: &[u8]) -> Result<Vec<Trade>, ParseError> {
        (self.parser())(raw)
    }

    /// Fetches and normalizes one day.
    ///
    /// Parsing runs on the blocking thread pool. Failures are folded into
    /// [`FetchOutcome::Failed`] so callers can record them and move on.
    async fn fetch(&self, symbol: &str, date: NaiveDate) -> FetchOutcome {
        let target = self.target(symbol, date);
        let raw = match self.fetch_raw(&target).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return FetchOutcome::NotFound,
            Err(e) => {
                warn!(exchange = self.exchange(), symbol, %date, error = %e, "download failed");
                return FetchOutcome::Failed(e.to_string());
            }
        };

        let parser = self.parser();
        match tokio::task::spawn_blocking(move || parser(&raw)).await {
            Ok(Ok(trades)) => {
                debug!(exchange = self.exchange(), symbol, %date, trades = trades.len(), "parsed archive");
                FetchOutcome::Trades(trades)
            }
            Ok(Err(e)) => {
                warn!(exchange = self.exchange(), symbol, %date, error = %e, "parse failed");
                FetchOutcome::Failed(e.to_string())
            }
            Err(e) => FetchOutcome::Failed(format!("parser task failed: {e}")),
        }
    }
}

/// Bybit public trade archives.
#[derive(Debug, Clone)]
pub struct BybitConnector {
    client: DownloadClient,
}

impl BybitConnector {
    /// Exchange identifier.
    pub const EXCHANGE: &'static str = "bybit";

    /// Creates a connector using the given HTTP client.
    #[must_use]
    pub const fn new(client: DownloadClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Connector for BybitConnector {
    fn exchange(&self) -> &'static str {
        Self::EXCHANGE
    }

    fn target(&self, symbol: &str, date: NaiveDate) -> String {
        bybit_trades_url(symbol, date)
    }

    async fn fetch_raw(&self, target: &str) -> Result<Option<Bytes>, DownloadError> {
        self.client.download(target).await
    }

    fn parser(&self) -> TradeParser {
        parse_bybit_archive
    }
}
