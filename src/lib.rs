//! # dataproc
//!
//! Parallel byte-stream processing and numeric pattern analysis.
//!
//! This crate re-exports the workspace crates and adds the caller-facing
//! engine handles:
//!
//! - [`dataproc_core`]: error taxonomy, numeric primitives, worker pools,
//!   lifecycle management and diagnostics sinks
//! - [`dataproc_stream`]: checksummed, compressed, partition-parallel byte
//!   stream processing
//! - [`dataproc_analysis`]: periodic, trend, anomaly and cluster detection,
//!   robust anomaly scoring and correlation matrices
//!
//! ## Engine handles
//!
//! [`StreamEngine`] and [`AnalyzerEngine`] each own one processor or
//! analyzer and a membership in a shared [`Lifecycle`]. Handles are
//! move-only. A handle that could not join its lifecycle stays invalid and
//! answers every call with `NotInitialized`.
//!
//! ```rust
//! use dataproc::prelude::*;
//! use std::sync::Arc;
//!
//! let lifecycle = Arc::new(Lifecycle::new());
//! let mut streams = StreamEngine::with_lifecycle(Arc::clone(&lifecycle));
//! let analyzer = AnalyzerEngine::with_lifecycle(Arc::clone(&lifecycle));
//! assert_eq!(lifecycle.reference_count(), 2);
//!
//! let config = StreamConfig::new(4).with_checksum(true);
//! streams.create_stream(config.clone()).unwrap();
//! let output = streams.process(&seal(&config, &[1, 2, 3, 4]).unwrap()).unwrap();
//! assert_eq!(output.len(), 4 + 4);
//!
//! let anomalies = analyzer.detect_anomalies(&[1.0, 1.1, 0.9, 1.0, 42.0], 0.95).unwrap();
//! assert_eq!(anomalies, vec![4]);
//!
//! drop(streams);
//! drop(analyzer);
//! assert!(!lifecycle.is_initialized());
//! ```

mod analyzer_engine;
mod handle;
mod stream_engine;
mod version;

pub use analyzer_engine::AnalyzerEngine;
pub use stream_engine::StreamEngine;
pub use version::{build_info, version, BuildInfo};

// Re-export workspace crates
pub use dataproc_analysis;
pub use dataproc_core;
pub use dataproc_stream;

pub use dataproc_analysis::{
    AnalysisResult, AnalyzerConfig, CorrelationMatrix, PatternAnalyzer, PatternType,
};
pub use dataproc_core::{
    CollectingSink, DiagnosticEvent, DiagnosticsBus, DiagnosticsSink, Error, ErrorKind, Lifecycle,
    LoggingSink, NullSink, Result,
};
pub use dataproc_stream::{
    open, seal, ByteMap, ChunkTransform, CompressionType, Identity, StreamConfig, StreamProcessor,
    StreamState, StreamStats,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        open, seal, AnalysisResult, AnalyzerConfig, AnalyzerEngine, ByteMap, ChunkTransform,
        CompressionType, CorrelationMatrix, DiagnosticsSink, Error, ErrorKind, Lifecycle,
        PatternType, Result, StreamConfig, StreamEngine, StreamState, StreamStats,
    };
}
