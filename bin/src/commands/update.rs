//! Update command implementation.
//!
//! Fetches missing days from the exchange and stores them as 1-second candles.

use crate::commands::ensure_all_supported;
use crate::display::day_progress;
use anyhow::{Result, bail};
use clibra_lib::prelude::*;
use tracing::warn;

/// Runs each update request in turn.
pub(crate) async fn update(
    store: &PartitionStore,
    requests: Vec<UpdateRequest>,
    workers: usize,
    quiet: bool,
) -> Result<()> {
    let config = ClientConfig {
        concurrency: workers.max(1),
        ..Default::default()
    };
    let registry = ConnectorRegistry::with_defaults(DownloadClient::new(config)?);

    ensure_all_supported(&registry, requests.iter().map(|r| r.exchange.as_str()))?;

    let options = UpdateOptions { workers };
    let mut failed = 0usize;

    for request in &requests {
        let progress = day_progress(
            request.range.total_days(),
            format!(
                "{}:{} {} -> {}",
                request.exchange, request.symbol, request.range.start, request.range.end
            ),
            quiet,
        );

        let run = update_with_progress(store, &registry, request, options, |report| {
            if let DateOutcome::Failed(reason) = &report.outcome {
                progress.println(format!("{}: {reason}", report.date));
            }
            progress.inc(1);
        });

        let report = tokio::select! {
            result = run => result?,
            _ = tokio::signal::ctrl_c() => {
                progress.abandon_with_message("Interrupted");
                bail!("Interrupted; days already written are kept");
            }
        };

        progress.finish_with_message(report.to_string());
        for (date, reason) in report.failures() {
            warn!(%date, reason, "date not stored");
        }
        failed += report.failed();
    }

    if failed > 0 && !quiet {
        println!("{failed} date(s) failed; rerun the update to retry them.");
    }

    Ok(())
}
