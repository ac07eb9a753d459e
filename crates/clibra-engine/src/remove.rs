//! Delete stored partitions.

use chrono::NaiveDate;
use clibra_fetch::ConnectorRegistry;
use clibra_store::{PartitionStore, StoreError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{RemoveRequest, Result};

/// Summary of a remove run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveReport {
    /// Dates whose partition was deleted, ascending.
    pub removed: Vec<NaiveDate>,
    /// Dates that had no partition, ascending.
    pub absent: Vec<NaiveDate>,
}

/// Deletes every stored partition in the requested range.
///
/// Absent dates are reported, not treated as errors.
///
/// # Errors
///
/// Returns [`EngineError::Invalid`](crate::EngineError::Invalid) for an
/// exchange without a connector or a symbol that cannot name a store
/// directory, before anything is deleted. Otherwise returns an error if an
/// existing partition cannot be deleted.
pub fn remove(
    store: &PartitionStore,
    registry: &ConnectorRegistry,
    request: &RemoveRequest,
) -> Result<RemoveReport> {
    registry.ensure_supported(&request.exchange)?;
    let first_key = request.first_key()?;
    let mut report = RemoveReport::default();

    for date in request.range.days() {
        let key = first_key.with_date(date);
        match store.delete(&key) {
            Ok(()) => report.removed.push(date),
            Err(StoreError::NotFound(_)) => {
                debug!(partition = %key, "nothing to remove");
                report.absent.push(date);
            }
            Err(e) => return Err(e.into()),
        }
    }

    info!(
        exchange = %request.exchange,
        symbol = %request.symbol,
        removed = report.removed.len(),
        absent = report.absent.len(),
        "remove finished"
    );
    Ok(report)
}
