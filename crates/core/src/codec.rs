//! Gzip codec for offloaded HTML payloads.
//!
//! Clients gzip the proposal HTML before writing it to object storage; the
//! relay reverses that here.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use thiserror::Error;

/// Codec failures.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Input is not a complete gzip stream.
    #[error("malformed gzip stream: {0}")]
    Malformed(#[from] std::io::Error),

    /// Decompressed bytes are not valid UTF-8.
    #[error("decompressed payload is not valid UTF-8")]
    NotUtf8,
}

/// Gzip-compress text.
///
/// # Errors
///
/// Returns an error if the encoder fails to flush.
pub fn compress(text: &str) -> Result<Vec<u8>, CodecError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes())?;
    Ok(encoder.finish()?)
}

/// Decompress a gzip stream into UTF-8 text.
///
/// Truncated streams fail; the decompressed size is not bounded here.
///
/// # Errors
///
/// Returns an error if the input is not valid gzip or not valid UTF-8.
pub fn decompress(data: &[u8]) -> Result<String, CodecError> {
    let mut decoder = GzDecoder::new(data);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    String::from_utf8(out).map_err(|_| CodecError::NotUtf8)
}
