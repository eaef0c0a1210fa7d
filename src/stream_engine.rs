//! Caller-owned handle over a stream processor

use crate::handle::HandleCore;
use dataproc_core::{DiagnosticsSink, Error, Lifecycle, Result};
use dataproc_stream::{ChunkTransform, StreamConfig, StreamProcessor, StreamState, StreamStats};
use std::fmt;
use std::sync::Arc;

/// Engine handle wrapping one [`StreamProcessor`]
///
/// A handle starts without a processor; bind one with
/// [`StreamEngine::create_stream`]. Every failure is recorded as the
/// handle's [`last_error`](StreamEngine::last_error) and forwarded to its
/// diagnostics sink.
///
/// # Example
///
/// ```rust
/// use dataproc::{StreamConfig, StreamEngine};
///
/// let mut engine = StreamEngine::new();
/// engine.create_stream(StreamConfig::new(2)).unwrap();
/// assert_eq!(engine.process(b"abc").unwrap(), b"abc");
/// assert_eq!(engine.statistics().unwrap().bytes_processed, 3);
/// ```
pub struct StreamEngine {
    core: HandleCore,
    processor: Option<StreamProcessor>,
}

impl StreamEngine {
    /// Handle on the global lifecycle, logging failures
    pub fn new() -> Self {
        Self::with_lifecycle(Lifecycle::global())
    }

    /// Handle on an explicit lifecycle context
    pub fn with_lifecycle(lifecycle: Arc<Lifecycle>) -> Self {
        Self::with_context(lifecycle, HandleCore::default_sink())
    }

    /// Handle on the global lifecycle reporting to `sink`
    pub fn with_diagnostics(sink: Arc<dyn DiagnosticsSink>) -> Self {
        Self::with_context(Lifecycle::global(), sink)
    }

    /// Handle on `lifecycle` reporting to `sink`
    ///
    /// Never fails; if the lifecycle cannot be joined the handle is invalid
    /// and every call returns `NotInitialized`.
    pub fn with_context(lifecycle: Arc<Lifecycle>, sink: Arc<dyn DiagnosticsSink>) -> Self {
        Self {
            core: HandleCore::new(&lifecycle, sink),
            processor: None,
        }
    }

    /// Handle on the global lifecycle, failing instead of going invalid
    pub fn try_new() -> Result<Self> {
        Ok(Self {
            core: HandleCore::try_new(&Lifecycle::global(), HandleCore::default_sink())?,
            processor: None,
        })
    }

    /// Bind a fresh processor with the identity transform
    ///
    /// On failure the previous binding, if any, is kept.
    pub fn create_stream(&mut self, config: StreamConfig) -> Result<()> {
        let processor = self
            .core
            .run("create_stream", || StreamProcessor::create(config))?;
        self.processor = Some(processor);
        Ok(())
    }

    /// Bind a fresh processor applying `transform`
    pub fn create_stream_with_transform<T>(&mut self, config: StreamConfig, transform: T) -> Result<()>
    where
        T: ChunkTransform + 'static,
    {
        let processor = self.core.run("create_stream", || {
            StreamProcessor::with_transform(config, transform)
        })?;
        self.processor = Some(processor);
        Ok(())
    }

    fn processor(&self) -> Result<&StreamProcessor> {
        self.processor.as_ref().ok_or_else(|| {
            Error::NotInitialized("no stream created; call create_stream first".to_string())
        })
    }

    /// Run one job on the bound processor
    pub fn process(&self, input: &[u8]) -> Result<Vec<u8>> {
        self.core
            .run("process", || self.processor()?.process(input))
    }

    /// Statistics snapshot of the bound processor
    pub fn statistics(&self) -> Result<StreamStats> {
        self.core
            .run("statistics", || Ok(self.processor()?.statistics()))
    }

    /// Reset the bound processor to `Idle`
    pub fn reset(&self) -> Result<()> {
        self.core.run("reset", || self.processor()?.reset())
    }

    /// State of the bound processor
    pub fn state(&self) -> Result<StreamState> {
        self.core.run("state", || Ok(self.processor()?.state()))
    }

    /// Configuration of the bound processor
    pub fn config(&self) -> Result<StreamConfig> {
        self.core
            .run("config", || Ok(self.processor()?.config().clone()))
    }

    /// Whether the handle joined a live lifecycle
    pub fn is_valid(&self) -> bool {
        self.core.is_valid()
    }

    /// Display string of the most recent failure, empty if none
    pub fn last_error(&self) -> String {
        self.core.last_error()
    }
}

impl Default for StreamEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StreamEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamEngine")
            .field("valid", &self.is_valid())
            .field("processor", &self.processor)
            .finish()
    }
}
