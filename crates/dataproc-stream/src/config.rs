//! Stream processor configuration

use crate::types::CompressionType;
use dataproc_core::{default_worker_count, Error, Result, MAX_WORKERS};
use serde::{Deserialize, Serialize};

/// Default buffer size for stream operations
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Maximum number of parallel streams
pub const MAX_PARALLEL_STREAMS: u32 = MAX_WORKERS as u32;

/// Default memory ceiling for one job (64 MiB)
pub const DEFAULT_MAX_MEMORY: usize = 64 * 1024 * 1024;

/// Configuration for stream processing
///
/// A processor copies its configuration when created; changing a config
/// afterwards has no effect on existing processors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Block size each worker feeds to the transform
    pub buffer_size: usize,
    /// Largest input, decoded payload or output one job may hold
    pub max_memory: usize,
    /// Number of parallel workers, in `[1, 16]`
    pub parallel_workers: u32,
    /// Compression algorithm to use
    pub compression: CompressionType,
    /// Enable CRC-32 integrity trailers
    pub enable_checksum: bool,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            max_memory: DEFAULT_MAX_MEMORY,
            parallel_workers: default_worker_count() as u32,
            compression: CompressionType::None,
            enable_checksum: false,
        }
    }
}

impl StreamConfig {
    /// Defaults with the given worker count
    pub fn new(parallel_workers: u32) -> Self {
        Self {
            parallel_workers,
            ..Self::default()
        }
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_max_memory(mut self, max_memory: usize) -> Self {
        self.max_memory = max_memory;
        self
    }

    pub fn with_parallel_workers(mut self, parallel_workers: u32) -> Self {
        self.parallel_workers = parallel_workers;
        self
    }

    pub fn with_compression(mut self, compression: CompressionType) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_checksum(mut self, enable_checksum: bool) -> Self {
        self.enable_checksum = enable_checksum;
        self
    }

    /// Check every invariant, reporting the first violation
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(Error::InvalidArgument(
                "buffer_size must be greater than 0".to_string(),
            ));
        }
        if self.max_memory < self.buffer_size {
            return Err(Error::InvalidArgument(format!(
                "max_memory ({}) must be at least buffer_size ({})",
                self.max_memory, self.buffer_size
            )));
        }
        if self.parallel_workers == 0 || self.parallel_workers > MAX_PARALLEL_STREAMS {
            return Err(Error::InvalidArgument(format!(
                "parallel_workers ({}) must be in [1, {MAX_PARALLEL_STREAMS}]",
                self.parallel_workers
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = StreamConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.buffer_size, DEFAULT_BUFFER_SIZE);
        assert!((1..=MAX_PARALLEL_STREAMS).contains(&config.parallel_workers));
    }

    #[test]
    fn test_zero_buffer_rejected() {
        let err = StreamConfig::new(2).with_buffer_size(0).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_max_memory_below_buffer_rejected() {
        let config = StreamConfig::new(2).with_buffer_size(1024).with_max_memory(512);
        assert!(matches!(config.validate(), Err(Error::InvalidArgument(_))));

        let config = StreamConfig::new(2).with_buffer_size(1024).with_max_memory(1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_worker_bounds() {
        assert!(StreamConfig::new(0).validate().is_err());
        assert!(StreamConfig::new(1).validate().is_ok());
        assert!(StreamConfig::new(16).validate().is_ok());
        let err = StreamConfig::new(17).validate().unwrap_err();
        assert_eq!(
            err,
            Error::InvalidArgument("parallel_workers (17) must be in [1, 16]".to_string())
        );
    }

    #[test]
    fn test_builder_chain() {
        let config = StreamConfig::new(4)
            .with_compression(CompressionType::Gzip)
            .with_checksum(true)
            .with_buffer_size(4096);
        assert_eq!(config.compression, CompressionType::Gzip);
        assert!(config.enable_checksum);
        assert_eq!(config.buffer_size, 4096);
        assert_eq!(config.parallel_workers, 4);
    }
}
