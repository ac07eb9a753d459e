//! Trade archive download and parsing for clibra.
//!
//! This crate provides the data source side of the pipeline:
//!
//! - [`DownloadClient`] - HTTP client with connection pooling and retries
//! - [`Connector`] - per-exchange fetch target, download and normalization
//! - [`ConnectorRegistry`] - exchange identifier to connector lookup
//! - [`parse_bybit_archive`] - Bybit daily trade CSV parsing
//! - [`url::bybit_trades_url`] - Bybit archive URLs

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod connector;
mod decompress;
mod parse;
mod registry;
pub mod url;

pub use client::{ClientConfig, DownloadClient, DownloadError};
pub use connector::{BybitConnector, Connector, FetchOutcome, TradeParser};
pub use decompress::{DecompressError, GZIP_MAGIC, decompress_gzip, is_gzip, maybe_decompress};
pub use parse::{
    ParseError, parse_bybit_archive, parse_epoch_seconds, parse_trades_csv, seconds_to_datetime,
};
pub use registry::{ConnectorFactory, ConnectorRegistry};
