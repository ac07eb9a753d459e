//! Gzip decompression for daily trade archives.

use flate2::read::MultiGzDecoder;
use std::borrow::Cow;
use std::io::Read;
use thiserror::Error;

/// Leading bytes of every gzip member.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Errors that can occur during decompression.
#[derive(Error, Debug)]
pub enum DecompressError {
    /// Gzip decompression failed.
    #[error("Gzip decompression failed: {0}")]
    Gzip(#[from] std::io::Error),

    /// Empty input data.
    #[error("Empty input data")]
    EmptyInput,
}

/// Returns true if `data` starts with the gzip magic bytes.
#[must_use]
pub fn is_gzip(data: &[u8]) -> bool {
    data.starts_with(&GZIP_MAGIC)
}

/// Decompresses gzip data.
///
/// # Errors
///
/// Returns an error if the input is empty or not valid gzip.
pub fn decompress_gzip(compressed: &[u8]) -> Result<Vec<u8>, DecompressError> {
    if compressed.is_empty() {
        return Err(DecompressError::EmptyInput);
    }

    let mut decompressed = Vec::with_capacity(compressed.len() * 4);
    MultiGzDecoder::new(compressed).read_to_end(&mut decompressed)?;
    Ok(decompressed)
}

/// Decompresses `data` if it is gzip, otherwise borrows it unchanged.
///
/// The HTTP layer may already have decoded a response served with
/// `Content-Encoding: gzip`.
///
/// # Errors
///
/// Returns an error if the input is empty or a gzip stream is corrupt.
pub fn maybe_decompress(data: &[u8]) -> Result<Cow<'_, [u8]>, DecompressError> {
    if data.is_empty() {
        return Err(DecompressError::EmptyInput);
    }
    if is_gzip(data) {
        decompress_gzip(data).map(Cow::Owned)
    } else {
        Ok(Cow::Borrowed(data))
    }
}
