//! The stream processor state machine and pipeline
//!
//! A [`StreamProcessor`] runs one job at a time:
//!
//! 1. verify the CRC-32 trailer (when checksums are enabled)
//! 2. decompress with the configured codec
//! 3. split the payload into contiguous partitions, one per worker
//! 4. apply the transform to each partition in `buffer_size` blocks
//! 5. concatenate partition outputs by index
//! 6. recompress and reattach a trailer
//!
//! State lives in an atomic so that admission, `state()` and `statistics()`
//! never wait on an in-flight job.

use crate::codec::{codec_for, Codec};
use crate::config::StreamConfig;
use crate::frame;
use crate::transform::{ChunkTransform, Identity};
use crate::types::{StatsAccumulator, StreamState, StreamStats};
use dataproc_core::{partition_ranges, Error, Result, WorkerPool};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Byte-stream processor bound to one immutable configuration
pub struct StreamProcessor {
    config: StreamConfig,
    codec: Box<dyn Codec>,
    transform: Arc<dyn ChunkTransform>,
    pool: WorkerPool,
    state: AtomicU8,
    stats: Mutex<StatsAccumulator>,
}

impl StreamProcessor {
    /// Create an `Idle` processor with the identity transform
    pub fn new(config: StreamConfig) -> Result<Self> {
        Self::with_transform(config, Identity)
    }

    /// Alias of [`StreamProcessor::new`]
    pub fn create(config: StreamConfig) -> Result<Self> {
        Self::new(config)
    }

    /// Create an `Idle` processor applying `transform` to every block
    pub fn with_transform<T>(config: StreamConfig, transform: T) -> Result<Self>
    where
        T: ChunkTransform + 'static,
    {
        Self::with_shared_transform(config, Arc::new(transform))
    }

    /// Create an `Idle` processor sharing an existing transform
    pub fn with_shared_transform(
        config: StreamConfig,
        transform: Arc<dyn ChunkTransform>,
    ) -> Result<Self> {
        config.validate()?;
        let pool = WorkerPool::new(config.parallel_workers as usize)?
            .with_thread_prefix("dataproc-stream");
        debug!(
            workers = config.parallel_workers,
            compression = %config.compression,
            checksum = config.enable_checksum,
            transform = transform.name(),
            "Created stream processor"
        );

        Ok(Self {
            codec: codec_for(config.compression),
            config,
            transform,
            pool,
            state: AtomicU8::new(StreamState::Idle as u8),
            stats: Mutex::new(StatsAccumulator::default()),
        })
    }

    /// Configuration bound at construction
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Current state
    pub fn state(&self) -> StreamState {
        StreamState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Consistent snapshot of the running statistics
    pub fn statistics(&self) -> StreamStats {
        self.lock_stats().snapshot()
    }

    /// Run one job over `input`, returning the re-encoded output
    ///
    /// Fails with `RuntimeFailure("busy")` if another job is in flight on
    /// this processor, and with a `RuntimeFailure` naming `reset` if the
    /// previous job failed. Any failure after admission moves the processor
    /// to [`StreamState::Error`].
    #[instrument(skip(self, input), fields(input_len = input.len()))]
    pub fn process(&self, input: &[u8]) -> Result<Vec<u8>> {
        self.admit()?;
        let job = JobGuard {
            processor: self,
            finished: false,
        };
        let start = Instant::now();

        match self.run_pipeline(input) {
            Ok(output) => {
                let elapsed = start.elapsed();
                debug!(output_len = output.len(), ?elapsed, "Job completed");
                job.complete(input.len(), elapsed);
                Ok(output)
            }
            Err(e) => {
                warn!(error = %e, "Job failed");
                Err(e)
            }
        }
    }

    /// Clear statistics and return to `Idle`
    ///
    /// Legal from `Idle`, `Completed` and `Error`; fails while a job is in
    /// flight.
    pub fn reset(&self) -> Result<()> {
        let mut current = self.state.load(Ordering::Acquire);
        loop {
            if current == StreamState::Processing as u8 {
                return Err(Error::RuntimeFailure(
                    "cannot reset while Processing".to_string(),
                ));
            }
            match self.state.compare_exchange(
                current,
                StreamState::Processing as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }

        *self.lock_stats() = StatsAccumulator::default();
        self.state.store(StreamState::Idle as u8, Ordering::Release);
        debug!(from = %StreamState::from_u8(current), "Processor reset");
        Ok(())
    }

    fn admit(&self) -> Result<()> {
        let mut current = self.state.load(Ordering::Acquire);
        loop {
            match StreamState::from_u8(current) {
                StreamState::Processing => return Err(Error::busy()),
                StreamState::Error => {
                    return Err(Error::RuntimeFailure(
                        "processor is in Error state; call reset() before processing".to_string(),
                    ))
                }
                StreamState::Idle | StreamState::Completed => {}
            }
            match self.state.compare_exchange(
                current,
                StreamState::Processing as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Ok(()),
                Err(actual) => current = actual,
            }
        }
    }

    fn run_pipeline(&self, input: &[u8]) -> Result<Vec<u8>> {
        let config = &self.config;
        if input.len() > config.max_memory {
            return Err(Error::RuntimeFailure(format!(
                "input of {} bytes exceeds max_memory ({})",
                input.len(),
                config.max_memory
            )));
        }

        let payload = frame::decode(self.codec.as_ref(), config, input)?;
        let partitions = partition_ranges(payload.len(), self.pool.num_workers());
        debug!(
            payload_len = payload.len(),
            partitions = partitions.len(),
            "Dispatching partitions"
        );

        let transform = self.transform.as_ref();
        let buffer_size = config.buffer_size;
        let arena = self.pool.map_partitions(&payload, &partitions, |_, chunk| {
            let mut out = Vec::with_capacity(chunk.len());
            for block in chunk.chunks(buffer_size) {
                transform.apply(block, &mut out)?;
            }
            Ok(out)
        })?;

        let merged_len: usize = arena.iter().map(Vec::len).sum();
        if merged_len > config.max_memory {
            return Err(Error::RuntimeFailure(format!(
                "transformed payload of {merged_len} bytes exceeds max_memory ({})",
                config.max_memory
            )));
        }
        let mut merged = Vec::with_capacity(merged_len);
        for slot in &arena {
            merged.extend_from_slice(slot);
        }

        frame::encode(self.codec.as_ref(), config, &merged)
    }

    fn lock_stats(&self) -> MutexGuard<'_, StatsAccumulator> {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for StreamProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamProcessor")
            .field("config", &self.config)
            .field("transform", &self.transform.name())
            .field("state", &self.state())
            .finish()
    }
}

/// Settles the state of an admitted job
///
/// A job that is dropped without `complete` (an error return or a panic in
/// a transform) lands in `Error`.
struct JobGuard<'a> {
    processor: &'a StreamProcessor,
    finished: bool,
}

impl JobGuard<'_> {
    fn complete(mut self, bytes: usize, elapsed: Duration) {
        self.processor.lock_stats().record_success(bytes, elapsed);
        self.processor
            .state
            .store(StreamState::Completed as u8, Ordering::Release);
        self.finished = true;
    }
}

impl Drop for JobGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.processor.lock_stats().record_failure();
            self.processor
                .state
                .store(StreamState::Error as u8, Ordering::Release);
        }
    }
}
