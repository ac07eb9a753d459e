//! Resample stored partitions into one export file.

use chrono::NaiveDate;
use clibra_aggregate::{Candle, resample};
use clibra_fetch::ConnectorRegistry;
use clibra_store::{PartitionStore, StoreError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::{EngineError, GenerateRequest, Result};

/// Summary of a generate run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateReport {
    /// The export file, or `None` when no candle fell in the range.
    pub output: Option<PathBuf>,
    /// Rows in the export.
    pub rows: usize,
    /// 1-second candles read from the store.
    pub source_rows: usize,
    /// Requested dates with no stored partition, ascending.
    pub missing_dates: Vec<NaiveDate>,
}

impl GenerateReport {
    /// Returns true if nothing was written.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.output.is_none()
    }
}

/// Reads the requested partitions, resamples and writes the export.
///
/// Partitions are concatenated in date order before resampling, so a window
/// may span midnight. A missing partition contributes no candles; an empty
/// result writes nothing and is not an error.
///
/// The export is written to a hidden temp file in `output_dir` and renamed
/// into place, so a failed run never leaves a truncated artifact.
///
/// # Errors
///
/// Returns [`EngineError::Invalid`] for an exchange without a connector or a
/// symbol that cannot name a store directory. Otherwise returns an error if
/// a stored partition is corrupt or unreadable, or the export cannot be
/// written.
pub fn generate(
    store: &PartitionStore,
    registry: &ConnectorRegistry,
    request: &GenerateRequest,
) -> Result<GenerateReport> {
    registry.ensure_supported(&request.exchange)?;
    let first_key = request.first_key()?;
    let mut candles: Vec<Candle> = Vec::new();
    let mut missing_dates = Vec::new();

    for date in request.range.days() {
        let key = first_key.with_date(date);
        match store.read(&key) {
            Ok(day) => candles.extend(day),
            Err(StoreError::NotFound(_)) => {
                debug!(partition = %key, "missing partition");
                missing_dates.push(date);
            }
            Err(e) => return Err(e.into()),
        }
    }

    if !missing_dates.is_empty() {
        warn!(
            exchange = %request.exchange,
            symbol = %request.symbol,
            missing = missing_dates.len(),
            "generating over missing dates"
        );
    }

    let bars = resample(&candles, request.interval);
    let mut report = GenerateReport {
        output: None,
        rows: bars.len(),
        source_rows: candles.len(),
        missing_dates,
    };

    if bars.is_empty() {
        info!(
            exchange = %request.exchange,
            symbol = %request.symbol,
            range = %request.range,
            "no candles in range, nothing written"
        );
        return Ok(report);
    }

    let path = request.artifact_path();
    write_export(&path, request, &bars)?;
    info!(path = %path.display(), rows = bars.len(), "wrote export");
    report.output = Some(path);
    Ok(report)
}

fn write_export(path: &Path, request: &GenerateRequest, bars: &[Candle]) -> Result<()> {
    let output_err = |source| EngineError::Output {
        path: path.to_path_buf(),
        source,
    };

    fs::create_dir_all(&request.output_dir).map_err(output_err)?;
    let file = tempfile::Builder::new()
        .prefix(".")
        .suffix(".tmp")
        .tempfile_in(&request.output_dir)
        .map_err(output_err)?;

    // Dropping the temp file on any error below removes it.
    let mut writer = BufWriter::new(file);
    request.format.write_candles(bars, &mut writer)?;
    let file = writer
        .into_inner()
        .map_err(|e| output_err(e.into_error()))?;
    file.persist(path).map_err(|e| output_err(e.error))?;
    Ok(())
}
