#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv;
mod formatter;
mod json;
mod partition;

#[cfg(feature = "parquet")]
mod parquet;

pub use crate::csv::{CANDLE_COLUMNS, CsvFormatter, parse_datetime, read_candles, read_candles_gz};
pub use formatter::{FormatError, Formatter, OutputFormat};
pub use json::{JsonFormatter, JsonStyle};
pub use partition::{decode_partition, encode_partition};

#[cfg(feature = "parquet")]
pub use crate::parquet::ParquetFormatter;
