//! Checksummed, compressed, partition-parallel byte stream processing
//!
//! A [`StreamProcessor`] takes a frame (an optionally compressed payload with
//! an optional CRC-32 trailer), applies a [`ChunkTransform`] to the payload
//! on a bounded worker pool and returns a frame in the same format.
//!
//! # Example
//!
//! ```rust
//! use dataproc_stream::{seal, ByteMap, CompressionType, StreamConfig, StreamProcessor};
//!
//! let config = StreamConfig::new(4)
//!     .with_compression(CompressionType::Zstd)
//!     .with_checksum(true);
//! let processor = StreamProcessor::with_transform(config.clone(), ByteMap::xor(0x20)).unwrap();
//!
//! let input = seal(&config, b"hello stream").unwrap();
//! let output = processor.process(&input).unwrap();
//! assert_eq!(dataproc_stream::open(&config, &output).unwrap(), b"HELLO\0STREAM");
//! ```

pub mod checksum;
pub mod codec;
pub mod config;
pub mod frame;
pub mod processor;
pub mod transform;
pub mod types;

pub use checksum::{append_checksum, checksum, verify_and_strip, CHECKSUM_LEN};
pub use codec::{codec_for, Codec, CodecError};
pub use config::{StreamConfig, DEFAULT_BUFFER_SIZE, DEFAULT_MAX_MEMORY, MAX_PARALLEL_STREAMS};
pub use frame::{open, seal};
pub use processor::StreamProcessor;
pub use transform::{ByteMap, ChunkTransform, Identity};
pub use types::{CompressionType, StreamState, StreamStats};
