//! Bounded worker pools for partitioned work
//!
//! A `WorkerPool` describes how many threads a job may use. Each call to
//! [`WorkerPool::map_partitions`] spins up a scoped Rayon pool, runs one task
//! per partition and joins every thread before returning, so no worker ever
//! outlives the call that created it.
//!
//! Results are returned in partition order regardless of which worker
//! finished first.

use crate::error::{Error, Result};
use std::ops::Range;

/// Hard cap on the number of workers per pool
pub const MAX_WORKERS: usize = 16;

/// Execution strategy of a pool
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Process partitions one after another on the calling thread
    Sequential,
    /// Process partitions on dedicated worker threads
    Parallel,
}

/// Split `len` items into `parts` contiguous ranges
///
/// Every range but the last has length `len / parts`; the last range
/// absorbs the remainder. The number of ranges is clamped to
/// `[1, max(len, 1)]` so that no range is empty unless `len` is zero.
///
/// # Examples
///
/// ```rust
/// use dataproc_core::execution::partition_ranges;
///
/// assert_eq!(partition_ranges(10, 3), vec![0..3, 3..6, 6..10]);
/// assert_eq!(partition_ranges(2, 4), vec![0..1, 1..2]);
/// assert_eq!(partition_ranges(0, 4), vec![0..0]);
/// ```
pub fn partition_ranges(len: usize, parts: usize) -> Vec<Range<usize>> {
    let parts = parts.clamp(1, len.max(1));
    let chunk = len / parts;
    (0..parts)
        .map(|i| {
            let start = i * chunk;
            let end = if i + 1 == parts { len } else { start + chunk };
            start..end
        })
        .collect()
}

/// A bounded pool of workers, created per job
#[derive(Clone, Debug)]
pub struct WorkerPool {
    num_workers: usize,
    thread_prefix: String,
}

impl WorkerPool {
    /// Create a pool description with `num_workers` threads
    ///
    /// Fails with `InvalidArgument` unless `1 <= num_workers <= MAX_WORKERS`.
    pub fn new(num_workers: usize) -> Result<Self> {
        if num_workers == 0 || num_workers > MAX_WORKERS {
            return Err(Error::InvalidArgument(format!(
                "worker count {num_workers} must be in [1, {MAX_WORKERS}]"
            )));
        }
        Ok(Self {
            num_workers,
            thread_prefix: "dataproc-worker".to_string(),
        })
    }

    /// Name worker threads `{prefix}-{index}`
    pub fn with_thread_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_prefix = prefix.into();
        self
    }

    /// Number of worker threads
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Get the execution strategy
    pub fn strategy(&self) -> ExecutionStrategy {
        if cfg!(feature = "parallel") && self.num_workers > 1 {
            ExecutionStrategy::Parallel
        } else {
            ExecutionStrategy::Sequential
        }
    }

    /// Apply `f` to every partition of `data`, returning results by
    /// partition index
    ///
    /// `f` receives the partition index and the partition slice. The first
    /// error reported by any partition is returned after all workers have
    /// been joined.
    pub fn map_partitions<U, F, R>(
        &self,
        data: &[U],
        partitions: &[Range<usize>],
        f: F,
    ) -> Result<Vec<R>>
    where
        U: Sync,
        F: Fn(usize, &[U]) -> Result<R> + Sync + Send,
        R: Send,
    {
        if let Some(bad) = partitions.iter().find(|r| r.start > r.end || r.end > data.len()) {
            return Err(Error::InvalidArgument(format!(
                "partition {bad:?} out of bounds for {} items",
                data.len()
            )));
        }

        match self.strategy() {
            ExecutionStrategy::Sequential => partitions
                .iter()
                .enumerate()
                .map(|(index, range)| f(index, &data[range.clone()]))
                .collect(),
            ExecutionStrategy::Parallel => self.map_parallel(data, partitions, f),
        }
    }

    #[cfg(feature = "parallel")]
    fn map_parallel<U, F, R>(&self, data: &[U], partitions: &[Range<usize>], f: F) -> Result<Vec<R>>
    where
        U: Sync,
        F: Fn(usize, &[U]) -> Result<R> + Sync + Send,
        R: Send,
    {
        use rayon::prelude::*;

        let prefix = self.thread_prefix.clone();
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.num_workers)
            .thread_name(move |i| format!("{prefix}-{i}"))
            .build_scoped(
                |thread| thread.run(),
                |pool| {
                    pool.install(|| {
                        partitions
                            .par_iter()
                            .enumerate()
                            .map(|(index, range)| f(index, &data[range.clone()]))
                            .collect::<Vec<Result<R>>>()
                    })
                },
            )
            .map_err(|e| Error::RuntimeFailure(format!("Failed to create worker pool: {e}")))?
            .into_iter()
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn map_parallel<U, F, R>(&self, data: &[U], partitions: &[Range<usize>], f: F) -> Result<Vec<R>>
    where
        U: Sync,
        F: Fn(usize, &[U]) -> Result<R> + Sync + Send,
        R: Send,
    {
        partitions
            .iter()
            .enumerate()
            .map(|(index, range)| f(index, &data[range.clone()]))
            .collect()
    }
}

/// Default worker count: available CPUs, capped at `MAX_WORKERS`
pub fn default_worker_count() -> usize {
    num_cpus::get().clamp(1, MAX_WORKERS)
}
