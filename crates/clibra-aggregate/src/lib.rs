//! Candle aggregation for clibra.
//!
//! This crate provides the two aggregation stages:
//!
//! - [`Candle`] - OHLCV bar with buy/sell volume split
//! - [`TradeAggregator`] / [`aggregate_trades`] - trades to 1-second candles
//! - [`CandleResampler`] / [`resample`] - candles to epoch-aligned windows

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod aggregator;
mod candle;
mod resample;

pub use aggregator::{TradeAggregator, aggregate_trades};
pub use candle::Candle;
pub use resample::{CandleResampler, resample, window_start};
