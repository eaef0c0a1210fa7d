//! Compression codecs for the decode and re-encode stages
//!
//! Each [`CompressionType`] maps to one [`Codec`]. Decompression is bounded:
//! a codec refuses to inflate a payload beyond the caller's limit so that a
//! small hostile frame cannot exhaust memory.

use crate::types::CompressionType;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::io::{Read, Write};

/// Zstandard level used when re-encoding
pub const ZSTD_LEVEL: i32 = 3;

/// Errors that can occur during codec operations
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Compression operation failed
    #[error("Compression failed: {0}")]
    CompressionFailed(String),

    /// Decompression operation failed
    #[error("Decompression failed: {0}")]
    DecompressionFailed(String),

    /// Decoded size would exceed the allowed memory
    #[error("Decoded size {size} exceeds limit of {limit} bytes")]
    LimitExceeded {
        /// Declared or observed size
        size: usize,
        /// Allowed maximum
        limit: usize,
    },

    /// Invalid data format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// IO error during codec operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CodecError> for dataproc_core::Error {
    fn from(err: CodecError) -> Self {
        dataproc_core::Error::RuntimeFailure(err.to_string())
    }
}

/// Trait for all compression codecs
///
/// Implementations must be thread-safe (`Send + Sync`) so a processor can be
/// shared across threads.
pub trait Codec: Send + Sync {
    /// Algorithm implemented by this codec
    fn compression_type(&self) -> CompressionType;

    /// Compress a payload
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError>;

    /// Decompress a payload, producing at most `limit` bytes
    fn decompress(&self, data: &[u8], limit: usize) -> Result<Vec<u8>, CodecError>;
}

/// Codec for a compression type
pub fn codec_for(compression: CompressionType) -> Box<dyn Codec> {
    match compression {
        CompressionType::None => Box::new(PassthroughCodec),
        CompressionType::Lz4 => Box::new(Lz4Codec),
        CompressionType::Zstd => Box::new(ZstdCodec::new(ZSTD_LEVEL)),
        CompressionType::Gzip => Box::new(GzipCodec::default()),
    }
}

fn read_limited<R: Read>(reader: R, limit: usize) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    reader
        .take(limit as u64 + 1)
        .read_to_end(&mut out)
        .map_err(|e| CodecError::DecompressionFailed(e.to_string()))?;
    if out.len() > limit {
        return Err(CodecError::LimitExceeded {
            size: out.len(),
            limit,
        });
    }
    Ok(out)
}

/// Identity codec
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughCodec;

impl Codec for PassthroughCodec {
    fn compression_type(&self) -> CompressionType {
        CompressionType::None
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(data.to_vec())
    }

    fn decompress(&self, data: &[u8], limit: usize) -> Result<Vec<u8>, CodecError> {
        if data.len() > limit {
            return Err(CodecError::LimitExceeded {
                size: data.len(),
                limit,
            });
        }
        Ok(data.to_vec())
    }
}

/// LZ4 block codec with a 4-byte little-endian size prefix
#[derive(Debug, Clone, Copy, Default)]
pub struct Lz4Codec;

impl Codec for Lz4Codec {
    fn compression_type(&self) -> CompressionType {
        CompressionType::Lz4
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(lz4_flex::compress_prepend_size(data))
    }

    fn decompress(&self, data: &[u8], limit: usize) -> Result<Vec<u8>, CodecError> {
        let header: [u8; 4] = data
            .get(..4)
            .and_then(|h| h.try_into().ok())
            .ok_or_else(|| CodecError::InvalidFormat("LZ4 frame shorter than size prefix".to_string()))?;
        let declared = u32::from_le_bytes(header) as usize;
        if declared > limit {
            return Err(CodecError::LimitExceeded {
                size: declared,
                limit,
            });
        }

        lz4_flex::decompress_size_prepended(data)
            .map_err(|e| CodecError::DecompressionFailed(format!("LZ4 decompression failed: {e}")))
    }
}

/// Zstandard codec
#[derive(Debug, Clone, Copy)]
pub struct ZstdCodec {
    level: i32,
}

impl ZstdCodec {
    pub fn new(level: i32) -> Self {
        Self { level }
    }
}

impl Codec for ZstdCodec {
    fn compression_type(&self) -> CompressionType {
        CompressionType::Zstd
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        zstd::stream::encode_all(data, self.level)
            .map_err(|e| CodecError::CompressionFailed(format!("zstd: {e}")))
    }

    fn decompress(&self, data: &[u8], limit: usize) -> Result<Vec<u8>, CodecError> {
        if data.is_empty() {
            return Err(CodecError::InvalidFormat("empty zstd frame".to_string()));
        }
        let decoder = zstd::stream::read::Decoder::new(data)?;
        read_limited(decoder, limit)
    }
}

/// GZIP codec
#[derive(Debug, Clone, Copy)]
pub struct GzipCodec {
    level: flate2::Compression,
}

impl GzipCodec {
    pub fn new(level: u32) -> Self {
        Self {
            level: flate2::Compression::new(level.min(9)),
        }
    }
}

impl Default for GzipCodec {
    fn default() -> Self {
        Self {
            level: flate2::Compression::default(),
        }
    }
}

impl Codec for GzipCodec {
    fn compression_type(&self) -> CompressionType {
        CompressionType::Gzip
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2 + 32), self.level);
        encoder
            .write_all(data)
            .map_err(|e| CodecError::CompressionFailed(format!("gzip: {e}")))?;
        encoder
            .finish()
            .map_err(|e| CodecError::CompressionFailed(format!("gzip: {e}")))
    }

    fn decompress(&self, data: &[u8], limit: usize) -> Result<Vec<u8>, CodecError> {
        if data.is_empty() {
            return Err(CodecError::InvalidFormat("empty gzip member".to_string()));
        }
        read_limited(GzDecoder::new(data), limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_payload() -> Vec<u8> {
        b"the quick brown fox jumps over the lazy dog "
            .iter()
            .cycle()
            .take(10_000)
            .copied()
            .collect()
    }

    #[test]
    fn test_codec_for_matches_type() {
        for compression in CompressionType::ALL {
            assert_eq!(codec_for(compression).compression_type(), compression);
        }
    }

    #[test]
    fn test_all_codecs_round_trip() {
        let payload = sample_payload();
        for compression in CompressionType::ALL {
            let codec = codec_for(compression);
            let packed = codec.compress(&payload).unwrap();
            if compression != CompressionType::None {
                assert!(packed.len() < payload.len(), "{compression} did not compress");
            }
            let unpacked = codec.decompress(&packed, payload.len()).unwrap();
            assert_eq!(unpacked, payload, "{compression} round trip");
        }
    }

    #[test]
    fn test_limit_enforced() {
        let payload = sample_payload();
        for compression in CompressionType::ALL {
            let codec = codec_for(compression);
            let packed = codec.compress(&payload).unwrap();
            let err = codec.decompress(&packed, payload.len() - 1).unwrap_err();
            assert!(
                matches!(err, CodecError::LimitExceeded { .. }),
                "{compression}: {err}"
            );
        }
    }

    #[test]
    fn test_garbage_rejected() {
        let garbage = [0xde, 0xad, 0xbe, 0xef, 0x01, 0x02, 0x03];
        for compression in [CompressionType::Zstd, CompressionType::Gzip] {
            assert!(codec_for(compression).decompress(&garbage, 1024).is_err());
        }
        assert!(matches!(
            Lz4Codec.decompress(&[1, 2], 1024),
            Err(CodecError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_gzip_output_is_deterministic() {
        let payload = sample_payload();
        let codec = GzipCodec::new(6);
        assert_eq!(codec.compress(&payload).unwrap(), codec.compress(&payload).unwrap());
    }

    #[test]
    fn test_codec_error_converts_to_runtime_failure() {
        let err: dataproc_core::Error = CodecError::InvalidFormat("bad".to_string()).into();
        assert_eq!(
            err,
            dataproc_core::Error::RuntimeFailure("Invalid format: bad".to_string())
        );
    }
}
