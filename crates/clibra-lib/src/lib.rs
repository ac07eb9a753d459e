//! Build and query a local store of 1-second candles from exchange trade archives.
//!
//! This is a facade crate that re-exports functionality from the clibra
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use clibra_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = PartitionStore::new(StoreConfig::default());
//!     let registry = ConnectorRegistry::with_defaults(DownloadClient::with_defaults()?);
//!
//!     let request = UpdateRequest::parse("bybit", "BTCUSDT", "20240101", "20240107")?;
//!     let report = update(&store, &registry, &request, UpdateOptions::default()).await?;
//!     println!("{report}");
//!
//!     let request = GenerateRequest::parse("bybit", "BTCUSDT", "20240101", "20240107", "1h", ".")?;
//!     if let Some(path) = generate(&store, &registry, &request)?.output {
//!         println!("wrote {}", path.display());
//!     }
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use clibra_types::*;

#[cfg(feature = "aggregate")]
pub use clibra_aggregate::{Candle, CandleResampler, TradeAggregator, aggregate_trades, resample};

#[cfg(feature = "format")]
pub use clibra_format::{
    CsvFormatter, FormatError, Formatter, JsonFormatter, OutputFormat, decode_partition,
    encode_partition,
};

#[cfg(all(feature = "format", feature = "parquet"))]
pub use clibra_format::ParquetFormatter;

#[cfg(feature = "store")]
pub use clibra_store::{CoverageReport, PartitionStore, StoreConfig, StoreError};

#[cfg(feature = "fetch")]
pub use clibra_fetch::{
    BybitConnector, ClientConfig, Connector, ConnectorRegistry, DownloadClient, DownloadError,
    FetchOutcome, ParseError,
};

#[cfg(feature = "engine")]
pub use clibra_engine::{
    DateOutcome, DateReport, EngineError, GenerateReport, GenerateRequest, RemoveReport,
    RemoveRequest, ShowReport, UpdateOptions, UpdateReport, UpdateRequest, generate,
    parse_generate_procedure, parse_update_procedure, read_procedure_file, remove, show, update,
    update_with_progress,
};

/// Prelude module for convenient imports.
///
/// ```
/// use clibra_lib::prelude::*;
/// ```
pub mod prelude {
    pub use clibra_types::{
        ClibraError, DateRange, Interval, PartitionKey, Result, Side, Trade,
    };

    #[cfg(feature = "aggregate")]
    pub use clibra_aggregate::{Candle, aggregate_trades, resample};

    #[cfg(feature = "format")]
    pub use clibra_format::{Formatter, OutputFormat};

    #[cfg(feature = "store")]
    pub use clibra_store::{CoverageReport, PartitionStore, StoreConfig};

    #[cfg(feature = "fetch")]
    pub use clibra_fetch::{ClientConfig, Connector, ConnectorRegistry, DownloadClient};

    #[cfg(feature = "engine")]
    pub use clibra_engine::{
        DateOutcome, GenerateReport, GenerateRequest, RemoveRequest, UpdateOptions,
        UpdateReport, UpdateRequest, generate, parse_generate_procedure, parse_update_procedure,
        read_procedure_file, remove, show, update, update_with_progress,
    };
}
