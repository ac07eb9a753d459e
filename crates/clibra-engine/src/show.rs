//! Store inventory.

use clibra_store::{CoverageReport, PartitionStore};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Result;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Disk usage and per-pair coverage of a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowReport {
    /// Bytes used by everything under the store root.
    pub total_bytes: u64,
    /// One entry per pair with at least one partition, sorted by exchange then symbol.
    pub coverage: Vec<CoverageReport>,
}

impl ShowReport {
    /// Returns the total size in mebibytes.
    #[must_use]
    pub fn total_megabytes(&self) -> f64 {
        self.total_bytes as f64 / BYTES_PER_MB
    }
}

impl fmt::Display for ShowReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Total size: {:.2} MB", self.total_megabytes())?;
        for pair in &self.coverage {
            write!(f, "\n{pair}")?;
        }
        Ok(())
    }
}

/// Reports disk usage and the coverage of every stored pair.
///
/// Pairs whose directory holds no partition are left out.
///
/// # Errors
///
/// Returns an error if the store cannot be listed.
pub fn show(store: &PartitionStore) -> Result<ShowReport> {
    let total_bytes = store.total_size()?;

    let mut coverage = Vec::new();
    for (exchange, symbol) in store.list_pairs()? {
        let dates = store.list_partitions(&exchange, &symbol)?;
        coverage.extend(CoverageReport::analyze(exchange, symbol, &dates));
    }

    Ok(ShowReport {
        total_bytes,
        coverage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use clibra_store::StoreConfig;
    use clibra_types::PartitionKey;
    use tempfile::TempDir;

    #[test]
    fn test_show_lists_pairs_with_gaps() {
        let temp_dir = TempDir::new().unwrap();
        let store = PartitionStore::new(StoreConfig::new(temp_dir.path()));
        for (symbol, day) in [("BTCUSDT", 1), ("BTCUSDT", 3), ("ETHUSDT", 2)] {
            let date = NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
            store.write(&PartitionKey::new("bybit", symbol, date).unwrap(), &[]).unwrap();
        }
        std::fs::create_dir_all(store.pair_dir("bybit", "EMPTY")).unwrap();

        let report = show(&store).unwrap();
        assert!(report.total_bytes > 0);
        assert_eq!(report.coverage.len(), 2);

        let text = report.to_string();
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[0].starts_with("Total size: "));
        assert_eq!(
            lines[1],
            "bybit: BTCUSDT from 2024-01-01 to 2024-01-03, 1 missing dates"
        );
        assert_eq!(
            lines[2],
            "bybit: ETHUSDT from 2024-01-02 to 2024-01-02, 0 missing dates"
        );
    }

    #[test]
    fn test_show_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = PartitionStore::new(StoreConfig::new(temp_dir.path().join("missing")));

        let report = show(&store).unwrap();
        assert_eq!(report.total_bytes, 0);
        assert!(report.coverage.is_empty());
        assert_eq!(report.to_string(), "Total size: 0.00 MB");
    }
}
