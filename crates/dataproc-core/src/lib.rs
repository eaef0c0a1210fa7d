//! Core types shared by the dataproc crates
//!
//! This crate provides the pieces the stream and analysis layers are built
//! on:
//!
//! - **Errors**: a three-kind taxonomy (`InvalidArgument`, `RuntimeFailure`,
//!   `NotInitialized`) used by every public operation
//! - **Primitives**: mean, variance, dot product, norms and Pearson moments
//! - **Execution**: bounded, per-job worker pools with ordered results
//! - **Lifecycle**: reference-counted shared setup for engine handles
//! - **Diagnostics**: sinks that receive categorized failure events
//!
//! # Example
//!
//! ```rust
//! use dataproc_core::execution::{partition_ranges, WorkerPool};
//!
//! let pool = WorkerPool::new(4).unwrap();
//! let data: Vec<u8> = (0..=255).collect();
//! let parts = partition_ranges(data.len(), pool.num_workers());
//! let lens = pool.map_partitions(&data, &parts, |_, chunk| Ok(chunk.len())).unwrap();
//! assert_eq!(lens, vec![64, 64, 64, 64]);
//! ```

pub mod diagnostics;
pub mod error;
pub mod execution;
pub mod lifecycle;
pub mod primitives;
pub mod utils;

// Re-export core types
pub use error::{Error, ErrorKind, Result};

pub use diagnostics::{
    CollectingSink, DiagnosticEvent, DiagnosticsBus, DiagnosticsSink, LoggingSink, NullSink,
};
pub use execution::{default_worker_count, partition_ranges, ExecutionStrategy, WorkerPool, MAX_WORKERS};
pub use lifecycle::{Lifecycle, LifecycleGuard};
pub use primitives::{scalar_backend, CenteredMoments, ComputePrimitives, NormType, ScalarBackend};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ComputePrimitives, DiagnosticsSink, Error, ErrorKind, Lifecycle, NormType, Result,
        ScalarBackend, WorkerPool,
    };
}
