//! Core types for the clibra candlestick store.
//!
//! This crate provides the fundamental data structures used throughout clibra:
//!
//! - [`Trade`] - A single executed trade with timestamp, side, size and price
//! - [`PartitionKey`] - Exchange, symbol and date of one stored partition
//! - [`Interval`] - Epoch-aligned resampling window width
//! - [`DateRange`] - Inclusive date range with lazy day iteration

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod date_range;
mod error;
mod interval;
mod partition;
mod trade;

pub use date_range::{DateRange, DayIterator, parse_date};
pub use error::{ClibraError, DateRangeError, Result};
pub use interval::{Interval, IntervalParseError};
pub use partition::{PartitionKey, normalize_exchange, validate_symbol};
pub use trade::{Side, Trade, truncate_to_second};
