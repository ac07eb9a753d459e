//! CLI command implementations.

pub(crate) mod generate;
pub(crate) mod remove;
pub(crate) mod show;
pub(crate) mod update;

use anyhow::{Context, Result};
use clibra_lib::prelude::*;

/// Checks every request's exchange before any work starts, so a bad line in
/// a procedure file never leaves a half-run batch.
pub(crate) fn ensure_all_supported<'a>(
    registry: &ConnectorRegistry,
    exchanges: impl IntoIterator<Item = &'a str>,
) -> Result<()> {
    for exchange in exchanges {
        registry.ensure_supported(exchange).with_context(|| {
            format!(
                "Supported exchanges: {}",
                registry.exchanges().collect::<Vec<_>>().join(", ")
            )
        })?;
    }
    Ok(())
}
