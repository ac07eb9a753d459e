//! Store errors.

use clibra_format::FormatError;
use clibra_types::PartitionKey;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during partition store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The partition is not stored.
    #[error("Partition not found: {0}")]
    NotFound(PartitionKey),

    /// The partition is already stored and the write was guarded.
    #[error("Partition already exists: {0}")]
    AlreadyExists(PartitionKey),

    /// Failed to create a directory.
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        /// The path that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write a file.
    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to delete a file.
    #[error("Failed to delete file '{path}': {source}")]
    DeleteFile {
        /// The path that could not be deleted.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to read a directory.
    #[error("Failed to read directory '{path}': {source}")]
    ReadDir {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A stored partition could not be decoded.
    #[error("Corrupt partition '{path}': {source}")]
    Corrupt {
        /// The offending file.
        path: PathBuf,
        /// The decoding error.
        source: FormatError,
    },

    /// Candles could not be encoded.
    #[error("Failed to encode partition: {0}")]
    Encode(#[from] FormatError),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
