//! Partition storage for the clibra candlestick store.
//!
//! - [`PartitionStore`] - write-once daily partitions with atomic writes
//! - [`StoreConfig`] - where the store lives on disk
//! - [`CoverageReport`] - gap analysis over the stored dates of one pair

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod coverage;
mod error;
mod store;

pub use config::StoreConfig;
pub use coverage::CoverageReport;
pub use error::{Result, StoreError};
pub use store::{PARTITION_EXTENSION, PartitionStore};
