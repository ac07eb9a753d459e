//! Show command implementation.

use anyhow::Result;
use clibra_lib::prelude::*;

/// Prints disk usage and per-pair date coverage.
pub(crate) fn show(store: &PartitionStore) -> Result<()> {
    let report = clibra_lib::show(store)?;
    println!("{report}");
    if report.coverage.is_empty() {
        println!("No candles stored under {}", store.root().display());
    }
    Ok(())
}
