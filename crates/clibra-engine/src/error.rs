//! Engine errors.

use clibra_format::FormatError;
use clibra_store::StoreError;
use clibra_types::ClibraError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an operation.
///
/// Per-date fetch and write failures during `update` are not errors; they
/// are recorded in the report and the batch continues.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Invalid request: bad date, range, interval or exchange.
    #[error(transparent)]
    Invalid(#[from] ClibraError),

    /// Partition store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Export encoding failure.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Failed to create or write an export file.
    #[error("Failed to write '{path}': {source}")]
    Output {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
