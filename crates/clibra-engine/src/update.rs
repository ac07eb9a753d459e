//! Fetch, aggregate and store missing days.

use chrono::NaiveDate;
use clibra_aggregate::aggregate_trades;
use clibra_fetch::{Connector, ConnectorRegistry, FetchOutcome};
use clibra_store::PartitionStore;
use clibra_types::{PartitionKey, Trade};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

use crate::{Result, UpdateOptions, UpdateRequest};

/// What happened to one date of an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateOutcome {
    /// A new partition was stored with this many 1-second candles.
    Written {
        /// Candle rows in the partition.
        rows: usize,
    },
    /// The partition was already stored; nothing was fetched.
    AlreadyPresent,
    /// The exchange has no archive for the date.
    NotFound,
    /// Fetching, parsing or writing failed.
    Failed(String),
}

impl fmt::Display for DateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Written { rows } => write!(f, "written ({rows} rows)"),
            Self::AlreadyPresent => f.write_str("already exists"),
            Self::NotFound => f.write_str("not found"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Outcome of one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateReport {
    /// The calendar date.
    pub date: NaiveDate,
    /// What happened.
    pub outcome: DateOutcome,
}

/// Summary of an update run, one entry per requested date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateReport {
    /// Lowercase exchange identifier.
    pub exchange: String,
    /// Symbol.
    pub symbol: String,
    /// Per-date outcomes, sorted by date.
    pub dates: Vec<DateReport>,
}

impl UpdateReport {
    fn count(&self, pred: impl Fn(&DateOutcome) -> bool) -> usize {
        self.dates.iter().filter(|d| pred(&d.outcome)).count()
    }

    /// Number of newly stored partitions.
    #[must_use]
    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, DateOutcome::Written { .. }))
    }

    /// Number of dates skipped because they were already stored.
    #[must_use]
    pub fn already_present(&self) -> usize {
        self.count(|o| matches!(o, DateOutcome::AlreadyPresent))
    }

    /// Number of dates the exchange had no data for.
    #[must_use]
    pub fn not_found(&self) -> usize {
        self.count(|o| matches!(o, DateOutcome::NotFound))
    }

    /// Number of failed dates.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, DateOutcome::Failed(_)))
    }

    /// Returns every date that is now stored.
    pub fn stored_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates
            .iter()
            .filter(|d| {
                matches!(
                    d.outcome,
                    DateOutcome::Written { .. } | DateOutcome::AlreadyPresent
                )
            })
            .map(|d| d.date)
    }

    /// Returns the failed dates with their reasons.
    pub fn failures(&self) -> impl Iterator<Item = (NaiveDate, &str)> + '_ {
        self.dates.iter().filter_map(|d| match &d.outcome {
            DateOutcome::Failed(reason) => Some((d.date, reason.as_str())),
            _ => None,
        })
    }
}

impl fmt::Display for UpdateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} {} written, {} already present, {} not found, {} failed",
            self.exchange,
            self.symbol,
            self.written(),
            self.already_present(),
            self.not_found(),
            self.failed()
        )
    }
}

/// Stores every missing date of the request.
///
/// See [`update_with_progress`].
///
/// # Errors
///
/// Returns [`EngineError::Invalid`](crate::EngineError::Invalid) if no
/// connector is registered for the exchange or the symbol cannot name a
/// store directory.
pub async fn update(
    store: &PartitionStore,
    registry: &ConnectorRegistry,
    request: &UpdateRequest,
    options: UpdateOptions,
) -> Result<UpdateReport> {
    update_with_progress(store, registry, request, options, |_| {}).await
}

/// Stores every missing date of the request, calling `on_date` as each
/// date finishes.
///
/// Dates run in a pool of `options.workers` concurrent tasks. A date that
/// is already stored is skipped without fetching; a date that cannot be
/// fetched or written is recorded and the batch continues. Dropping the
/// returned future stops issuing new dates; partitions already written stay
/// valid.
///
/// # Errors
///
/// Returns [`EngineError::Invalid`](crate::EngineError::Invalid) if no
/// connector is registered for the exchange or the symbol cannot name a
/// store directory.
pub async fn update_with_progress<F>(
    store: &PartitionStore,
    registry: &ConnectorRegistry,
    request: &UpdateRequest,
    options: UpdateOptions,
    mut on_date: F,
) -> Result<UpdateReport>
where
    F: FnMut(&DateReport),
{
    let connector = registry.connector(&request.exchange)?;
    let first_key = request.first_key()?;
    let workers = options.workers.max(1);
    info!(
        exchange = %request.exchange,
        symbol = %request.symbol,
        range = %request.range,
        workers,
        "starting update"
    );

    let mut pending = stream::iter(request.range.days())
        .map(|date| update_date(store, connector.as_ref(), first_key.with_date(date)))
        .buffer_unordered(workers);

    let mut dates = Vec::with_capacity(request.range.total_days());
    while let Some(report) = pending.next().await {
        on_date(&report);
        dates.push(report);
    }
    dates.sort_by_key(|d| d.date);

    let report = UpdateReport {
        exchange: request.exchange.clone(),
        symbol: request.symbol.clone(),
        dates,
    };
    info!("{report}");
    Ok(report)
}

async fn update_date(store: &PartitionStore, connector: &dyn Connector, key: PartitionKey) -> DateReport {
    let date = key.date();
    let outcome = if store.exists(&key) {
        debug!(partition = %key, "already stored");
        DateOutcome::AlreadyPresent
    } else {
        match connector.fetch(key.symbol(), date).await {
            FetchOutcome::Trades(trades) => store_trades(store, key, trades).await,
            FetchOutcome::NotFound => {
                warn!(partition = %key, "no data at source");
                DateOutcome::NotFound
            }
            FetchOutcome::Failed(reason) => {
                warn!(partition = %key, %reason, "fetch failed");
                DateOutcome::Failed(reason)
            }
        }
    };

    DateReport { date, outcome }
}

/// Aggregates and writes on the blocking pool.
async fn store_trades(store: &PartitionStore, key: PartitionKey, trades: Vec<Trade>) -> DateOutcome {
    let store = store.clone();
    let task_key = key.clone();
    let written = tokio::task::spawn_blocking(move || {
        let candles = aggregate_trades(&trades);
        store.write(&task_key, &candles).map(|_| candles.len())
    })
    .await;

    match written {
        Ok(Ok(rows)) => {
            info!(partition = %key, rows, "stored");
            DateOutcome::Written { rows }
        }
        Ok(Err(e)) => {
            warn!(partition = %key, error = %e, "write failed");
            DateOutcome::Failed(e.to_string())
        }
        Err(e) => {
            warn!(partition = %key, error = %e, "write task failed");
            DateOutcome::Failed(format!("write task failed: {e}"))
        }
    }
}
