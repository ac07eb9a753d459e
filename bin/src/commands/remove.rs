//! Remove command implementation.

use crate::commands::ensure_all_supported;
use crate::display::summarize_dates;
use anyhow::Result;
use clibra_lib::prelude::*;
use inquire::Confirm;

/// Deletes stored days after confirmation.
pub(crate) fn remove(
    store: &PartitionStore,
    request: &RemoveRequest,
    yes: bool,
    quiet: bool,
) -> Result<()> {
    let registry = ConnectorRegistry::with_defaults(DownloadClient::with_defaults()?);
    ensure_all_supported(&registry, [request.exchange.as_str()])?;

    if !yes {
        let prompt = format!(
            "Remove {}:{} from {} to {} ({} day(s))?",
            request.exchange,
            request.symbol,
            request.range.start,
            request.range.end,
            request.range.total_days()
        );
        let confirmed = Confirm::new(&prompt).with_default(false).prompt()?;
        if !confirmed {
            println!("Canceled.");
            return Ok(());
        }
    }

    let report = clibra_lib::remove(store, &registry, request)?;

    if !quiet {
        if report.removed.is_empty() {
            println!("Nothing to remove.");
        } else {
            println!(
                "Removed {} day(s): {}",
                report.removed.len(),
                summarize_dates(&report.removed)
            );
        }
    }

    Ok(())
}
