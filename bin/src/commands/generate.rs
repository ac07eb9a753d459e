//! Generate command implementation.
//!
//! Resamples stored 1-second candles into one export file per request.

use crate::commands::ensure_all_supported;
use crate::display::{spinner, summarize_dates};
use anyhow::{Context, Result};
use clibra_lib::prelude::*;

/// Runs each generate request in turn.
pub(crate) async fn generate(
    store: &PartitionStore,
    requests: Vec<GenerateRequest>,
    quiet: bool,
) -> Result<()> {
    let registry = ConnectorRegistry::with_defaults(DownloadClient::with_defaults()?);
    ensure_all_supported(&registry, requests.iter().map(|r| r.exchange.as_str()))?;

    for request in requests {
        let progress = spinner(
            format!(
                "{}:{} {} -> {} @ {}s",
                request.exchange,
                request.symbol,
                request.range.start,
                request.range.end,
                request.interval.seconds()
            ),
            quiet,
        );

        let name = request.artifact_name();
        let task_store = store.clone();
        let task_registry = registry.clone();
        let report = tokio::task::spawn_blocking(move || {
            generate_one(&task_store, &task_registry, &request)
        })
        .await
        .context("generate task panicked")??;

        progress.finish_and_clear();

        if quiet {
            continue;
        }
        if !report.missing_dates.is_empty() {
            println!(
                "Missing {} day(s): {}",
                report.missing_dates.len(),
                summarize_dates(&report.missing_dates)
            );
        }
        match &report.output {
            Some(path) => println!(
                "Wrote {} rows from {} 1-second candles to {}",
                report.rows,
                report.source_rows,
                path.display()
            ),
            None => println!("No candles in range; {name} not written."),
        }
    }

    Ok(())
}

fn generate_one(
    store: &PartitionStore,
    registry: &ConnectorRegistry,
    request: &GenerateRequest,
) -> Result<GenerateReport> {
    clibra_lib::generate(store, registry, request)
        .with_context(|| format!("Failed to generate {}", request.artifact_name()))
}
