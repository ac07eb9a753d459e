//! Store location.

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Directory name used under the home directory when no root is given.
const DEFAULT_DIR_NAME: &str = ".clibra";

/// Configuration for a [`PartitionStore`](crate::PartitionStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Root directory; partitions live under `<root>/candles/`.
    pub root: PathBuf,
}

impl StoreConfig {
    /// Creates a configuration rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns `~/.clibra`, or `./.clibra` when no home directory is known.
    #[must_use]
    pub fn default_root() -> PathBuf {
        BaseDirs::new().map_or_else(
            || PathBuf::from(".").join(DEFAULT_DIR_NAME),
            |dirs| dirs.home_dir().join(DEFAULT_DIR_NAME),
        )
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(Self::default_root())
    }
}
