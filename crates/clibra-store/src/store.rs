//! Daily partition files on the local filesystem.

use chrono::NaiveDate;
use clibra_aggregate::Candle;
use clibra_format::{decode_partition, encode_partition};
use clibra_types::{PartitionKey, normalize_exchange};
use std::collections::BTreeSet;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{Result, StoreConfig, StoreError};

/// File extension of stored partitions.
pub const PARTITION_EXTENSION: &str = "csv.gz";

const CANDLES_DIR: &str = "candles";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Write-once store of daily 1-second candle partitions.
///
/// Partitions are stored as `<root>/candles/<exchange>/<symbol>/<YYYY-MM-DD>.csv.gz`.
/// Entries whose name starts with `.` (including in-flight temp files) are
/// never reported by listings.
#[derive(Debug, Clone)]
pub struct PartitionStore {
    root: PathBuf,
    candles_path: PathBuf,
}

impl PartitionStore {
    /// Creates a store for the given configuration.
    ///
    /// No directories are created until the first write.
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        let candles_path = config.root.join(CANDLES_DIR);
        Self {
            root: config.root,
            candles_path,
        }
    }

    /// Returns the root directory of the store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the directory holding one pair's partitions.
    #[must_use]
    pub fn pair_dir(&self, exchange: &str, symbol: &str) -> PathBuf {
        self.candles_path
            .join(normalize_exchange(exchange))
            .join(symbol)
    }

    /// Returns the file path of a partition.
    #[must_use]
    pub fn path_for(&self, key: &PartitionKey) -> PathBuf {
        self.pair_dir(key.exchange(), key.symbol()).join(format!(
            "{}.{PARTITION_EXTENSION}",
            key.date().format(DATE_FORMAT)
        ))
    }

    /// Returns true if the partition is stored.
    #[must_use]
    pub fn exists(&self, key: &PartitionKey) -> bool {
        self.path_for(key).is_file()
    }

    /// Writes a partition as a single unit, replacing any existing file.
    ///
    /// The data goes to a hidden temp file in the target directory which is
    /// then renamed over the final path, so a partition is either absent or
    /// complete. This method does not enforce write-once: callers check
    /// [`exists`](Self::exists) first, or use [`write_new`](Self::write_new).
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or the file cannot be written.
    pub fn write(&self, key: &PartitionKey, candles: &[Candle]) -> Result<PathBuf> {
        let path = self.path_for(key);
        let dir = path
            .parent()
            .map_or_else(|| self.candles_path.clone(), Path::to_path_buf);

        fs::create_dir_all(&dir).map_err(|e| StoreError::CreateDir {
            path: dir.clone(),
            source: e,
        })?;

        let bytes = encode_partition(candles)?;
        let write_err = |source| StoreError::WriteFile {
            path: path.clone(),
            source,
        };

        let mut file = tempfile::Builder::new()
            .prefix(".")
            .suffix(".tmp")
            .tempfile_in(&dir)
            .map_err(write_err)?;
        file.write_all(&bytes).map_err(write_err)?;
        file.as_file().sync_all().map_err(write_err)?;
        file.persist(&path).map_err(|e| write_err(e.error))?;

        debug!(partition = %key, rows = candles.len(), bytes = bytes.len(), "wrote partition");
        Ok(path)
    }

    /// Writes a partition only if it is not stored yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyExists`] if the partition is present, or
    /// any error of [`write`](Self::write).
    pub fn write_new(&self, key: &PartitionKey, candles: &[Candle]) -> Result<PathBuf> {
        if self.exists(key) {
            return Err(StoreError::AlreadyExists(key.clone()));
        }
        self.write(key, candles)
    }

    /// Reads a partition's candles in stored order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the partition is absent, or
    /// [`StoreError::Corrupt`] if it cannot be decoded.
    pub fn read(&self, key: &PartitionKey) -> Result<Vec<Candle>> {
        let path = self.path_for(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(key.clone()));
            }
            Err(e) => return Err(StoreError::ReadFile { path, source: e }),
        };

        let candles = decode_partition(&bytes).map_err(|e| StoreError::Corrupt {
            path: path.clone(),
            source: e,
        })?;
        debug!(partition = %key, rows = candles.len(), "read partition");
        Ok(candles)
    }

    /// Deletes a partition.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the partition is absent.
    pub fn delete(&self, key: &PartitionKey) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(partition = %key, "deleted partition");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(key.clone())),
            Err(e) => Err(StoreError::DeleteFile { path, source: e }),
        }
    }

    /// Lists the stored dates of one pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the pair directory exists but cannot be read.
    pub fn list_partitions(&self, exchange: &str, symbol: &str) -> Result<BTreeSet<NaiveDate>> {
        let dir = self.pair_dir(exchange, symbol);
        let dates = read_dir_names(&dir, EntryKind::File)?
            .iter()
            .filter_map(|name| parse_partition_name(name))
            .collect();
        Ok(dates)
    }

    /// Lists stored exchanges, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the candles directory cannot be read.
    pub fn list_exchanges(&self) -> Result<Vec<String>> {
        read_dir_names(&self.candles_path, EntryKind::Dir)
    }

    /// Lists stored symbols of one exchange, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the exchange directory cannot be read.
    pub fn list_symbols(&self, exchange: &str) -> Result<Vec<String>> {
        read_dir_names(
            &self.candles_path.join(normalize_exchange(exchange)),
            EntryKind::Dir,
        )
    }

    /// Lists every stored (exchange, symbol) pair, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be read.
    pub fn list_pairs(&self) -> Result<Vec<(String, String)>> {
        let mut pairs = Vec::new();
        for exchange in self.list_exchanges()? {
            for symbol in self.list_symbols(&exchange)? {
                pairs.push((exchange.clone(), symbol));
            }
        }
        Ok(pairs)
    }

    /// Returns the number of bytes used by all files under the root.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory or file cannot be inspected.
    pub fn total_size(&self) -> Result<u64> {
        dir_size(&self.root)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Dir,
}

/// Sorted non-hidden entry names of `dir`; a missing directory is empty.
fn read_dir_names(dir: &Path, kind: EntryKind) -> Result<Vec<String>> {
    let read_dir_err = |source| StoreError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(read_dir_err(e)),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(read_dir_err)?;
        let file_type = entry.file_type().map_err(read_dir_err)?;
        let matches = match kind {
            EntryKind::File => file_type.is_file(),
            EntryKind::Dir => file_type.is_dir(),
        };
        if !matches {
            continue;
        }
        match entry.file_name().to_str() {
            Some(name) if !name.starts_with('.') => names.push(name.to_string()),
            _ => {}
        }
    }
    names.sort();
    Ok(names)
}

/// Parses `YYYY-MM-DD.csv.gz`.
fn parse_partition_name(name: &str) -> Option<NaiveDate> {
    let stem = name.strip_suffix(PARTITION_EXTENSION)?.strip_suffix('.')?;
    NaiveDate::parse_from_str(stem, DATE_FORMAT).ok()
}

fn dir_size(path: &Path) -> Result<u64> {
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
        Err(e) => {
            return Err(StoreError::ReadDir {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    let mut total = 0;
    for entry in entries {
        let entry = entry.map_err(|e| StoreError::ReadDir {
            path: path.to_path_buf(),
            source: e,
        })?;
        let entry_path = entry.path();
        let metadata = entry.metadata().map_err(|e| StoreError::ReadFile {
            path: entry_path.clone(),
            source: e,
        })?;
        if metadata.is_dir() {
            total += dir_size(&entry_path)?;
        } else {
            total += metadata.len();
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn key(d: u32) -> PartitionKey {
        PartitionKey::new("bybit", "BTCUSDT", date(d)).unwrap()
    }

    fn candles(d: u32) -> Vec<Candle> {
        let ts = Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap();
        vec![Candle::new(ts, 100.0, 100.0, 99.0, 99.0, 3.0, 1.0, 2.0)]
    }

    fn create_store() -> (TempDir, PartitionStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = PartitionStore::new(StoreConfig::new(temp_dir.path()));
        (temp_dir, store)
    }

    #[test]
    fn test_path_layout() {
        let (temp_dir, store) = create_store();
        let path = store.path_for(&PartitionKey::new("ByBit", "BTCUSDT", date(5)).unwrap());
        assert_eq!(
            path,
            temp_dir
                .path()
                .join("candles/bybit/BTCUSDT/2024-01-05.csv.gz")
        );
    }

    #[test]
    fn test_write_read_round_trip() {
        let (_temp_dir, store) = create_store();
        assert!(!store.exists(&key(1)));

        store.write(&key(1), &candles(1)).unwrap();
        assert!(store.exists(&key(1)));

        let read = store.read(&key(1)).unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].timestamp, candles(1)[0].timestamp);
        assert_relative_eq!(read[0].sell_volume, 2.0);
    }

    #[test]
    fn test_empty_partition_is_stored() {
        let (_temp_dir, store) = create_store();
        store.write(&key(2), &[]).unwrap();

        assert!(store.exists(&key(2)));
        assert!(store.read(&key(2)).unwrap().is_empty());
    }

    #[test]
    fn test_write_new_is_guarded() {
        let (_temp_dir, store) = create_store();
        store.write_new(&key(1), &candles(1)).unwrap();

        let err = store.write_new(&key(1), &[]).unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(_)));
        assert_eq!(store.read(&key(1)).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_partition() {
        let (_temp_dir, store) = create_store();
        assert!(matches!(store.read(&key(9)), Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete(&key(9)), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, store) = create_store();
        store.write(&key(3), &candles(3)).unwrap();
        store.delete(&key(3)).unwrap();
        assert!(!store.exists(&key(3)));
    }

    #[test]
    fn test_corrupt_partition() {
        let (_temp_dir, store) = create_store();
        let path = store.write(&key(4), &candles(4)).unwrap();
        fs::write(&path, b"garbage").unwrap();

        assert!(matches!(store.read(&key(4)), Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn test_listings_skip_hidden_and_foreign_files() {
        let (_temp_dir, store) = create_store();
        store.write(&key(3), &candles(3)).unwrap();
        store.write(&key(1), &candles(1)).unwrap();
        store
            .write(&PartitionKey::new("bybit", "ETHUSDT", date(1)).unwrap(), &[])
            .unwrap();

        let dir = store.pair_dir("bybit", "BTCUSDT");
        fs::write(dir.join(".2024-01-02.csv.gz.tmp"), b"partial").unwrap();
        fs::write(dir.join("notes.txt"), b"hello").unwrap();
        fs::create_dir_all(store.root().join("candles/.cache")).unwrap();

        let dates = store.list_partitions("BYBIT", "BTCUSDT").unwrap();
        assert_eq!(dates.into_iter().collect::<Vec<_>>(), vec![date(1), date(3)]);

        assert_eq!(store.list_exchanges().unwrap(), vec!["bybit"]);
        assert_eq!(
            store.list_pairs().unwrap(),
            vec![
                ("bybit".to_string(), "BTCUSDT".to_string()),
                ("bybit".to_string(), "ETHUSDT".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_store() {
        let (_temp_dir, store) = create_store();
        assert!(store.list_pairs().unwrap().is_empty());
        assert!(store.list_partitions("bybit", "BTCUSDT").unwrap().is_empty());
        assert_eq!(store.total_size().unwrap(), 0);
    }

    #[test]
    fn test_total_size() {
        let (_temp_dir, store) = create_store();
        let path = store.write(&key(1), &candles(1)).unwrap();
        let expected = fs::metadata(path).unwrap().len();
        assert_eq!(store.total_size().unwrap(), expected);
    }

    #[test]
    fn test_parse_partition_name() {
        assert_eq!(parse_partition_name("2024-01-05.csv.gz"), Some(date(5)));
        assert_eq!(parse_partition_name("2024-01-05.csv"), None);
        assert_eq!(parse_partition_name("20240105.csv.gz"), None);
    }
}
