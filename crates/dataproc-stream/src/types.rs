//! Value types of the stream pipeline

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Lifecycle of one processing job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum StreamState {
    /// Ready to accept a job
    Idle = 0,
    /// A job is in flight
    Processing = 1,
    /// The last job succeeded
    Completed = 2,
    /// The last job failed; `reset` is required
    Error = 3,
}

impl StreamState {
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => StreamState::Idle,
            1 => StreamState::Processing,
            2 => StreamState::Completed,
            _ => StreamState::Error,
        }
    }
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamState::Idle => write!(f, "Idle"),
            StreamState::Processing => write!(f, "Processing"),
            StreamState::Completed => write!(f, "Completed"),
            StreamState::Error => write!(f, "Error"),
        }
    }
}

/// Data compression algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CompressionType {
    /// No compression
    #[default]
    None,
    /// LZ4 block format with a prepended little-endian size
    Lz4,
    /// Zstandard frame
    Zstd,
    /// GZIP member
    Gzip,
}

impl CompressionType {
    /// All algorithms, in declaration order
    pub const ALL: [CompressionType; 4] = [
        CompressionType::None,
        CompressionType::Lz4,
        CompressionType::Zstd,
        CompressionType::Gzip,
    ];
}

impl fmt::Display for CompressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionType::None => write!(f, "None"),
            CompressionType::Lz4 => write!(f, "Lz4"),
            CompressionType::Zstd => write!(f, "Zstd"),
            CompressionType::Gzip => write!(f, "Gzip"),
        }
    }
}

/// Snapshot of stream processing statistics
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StreamStats {
    /// Total input bytes accepted by successful jobs
    pub bytes_processed: u64,
    /// Total wall time spent in successful jobs, in milliseconds
    pub processing_time_ms: u64,
    /// Throughput in MB/s over all successful jobs
    pub throughput_mbps: f64,
    /// Number of jobs that ended in the `Error` state
    pub error_count: u32,
}

/// Running totals owned by a processor
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct StatsAccumulator {
    bytes_processed: u64,
    processing_time: Duration,
    error_count: u32,
}

impl StatsAccumulator {
    pub(crate) fn record_success(&mut self, bytes: usize, elapsed: Duration) {
        self.bytes_processed = self.bytes_processed.saturating_add(bytes as u64);
        self.processing_time = self.processing_time.saturating_add(elapsed);
    }

    pub(crate) fn record_failure(&mut self) {
        self.error_count = self.error_count.saturating_add(1);
    }

    pub(crate) fn snapshot(&self) -> StreamStats {
        let secs = self.processing_time.as_secs_f64();
        let throughput_mbps = if secs > 0.0 {
            self.bytes_processed as f64 / 1_000_000.0 / secs
        } else {
            0.0
        };
        StreamStats {
            bytes_processed: self.bytes_processed,
            processing_time_ms: self.processing_time.as_millis() as u64,
            throughput_mbps,
            error_count: self.error_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_round_trip_through_u8() {
        for state in [
            StreamState::Idle,
            StreamState::Processing,
            StreamState::Completed,
            StreamState::Error,
        ] {
            assert_eq!(StreamState::from_u8(state as u8), state);
        }
    }

    #[test]
    fn test_display_names() {
        assert_eq!(StreamState::Processing.to_string(), "Processing");
        assert_eq!(CompressionType::Zstd.to_string(), "Zstd");
        assert_eq!(CompressionType::default(), CompressionType::None);
    }

    #[test]
    fn test_accumulator_throughput() {
        let mut acc = StatsAccumulator::default();
        assert_eq!(acc.snapshot(), StreamStats::default());

        acc.record_success(2_000_000, Duration::from_millis(500));
        acc.record_success(2_000_000, Duration::from_millis(500));
        acc.record_failure();

        let stats = acc.snapshot();
        assert_eq!(stats.bytes_processed, 4_000_000);
        assert_eq!(stats.processing_time_ms, 1000);
        assert!((stats.throughput_mbps - 4.0).abs() < 1e-9);
        assert_eq!(stats.error_count, 1);
    }

    #[test]
    fn test_zero_elapsed_has_zero_throughput() {
        let mut acc = StatsAccumulator::default();
        acc.record_success(10, Duration::ZERO);
        assert_eq!(acc.snapshot().throughput_mbps, 0.0);
    }
}
