//! Caller-owned handle over a pattern analyzer

use crate::handle::HandleCore;
use dataproc_analysis::{AnalysisResult, AnalyzerConfig, CorrelationMatrix, PatternAnalyzer, PatternType};
use dataproc_core::{DiagnosticsSink, Lifecycle, Result};
use std::fmt;
use std::sync::Arc;

/// Engine handle wrapping one [`PatternAnalyzer`]
///
/// # Example
///
/// ```rust
/// use dataproc::{AnalyzerEngine, PatternType};
///
/// let engine = AnalyzerEngine::new();
/// let result = engine
///     .analyze_time_series(&[1.0, 2.0, 3.0, 4.0, 5.0], &[0, 1, 2, 3, 4], &[PatternType::Trending])
///     .unwrap();
/// assert_eq!(result.pattern_type(), PatternType::Trending);
/// ```
pub struct AnalyzerEngine {
    core: HandleCore,
    analyzer: PatternAnalyzer,
}

impl AnalyzerEngine {
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
    pub fn with_context(lifecycle: Arc<Lifecycle>, sink: Arc<dyn DiagnosticsSink>) -> Self {
        Self {
            core: HandleCore::new(&lifecycle, sink),
            analyzer: PatternAnalyzer::new(),
        }
    }

    /// Handle on the global lifecycle, failing instead of going invalid
    pub fn try_new() -> Result<Self> {
        Ok(Self {
            core: HandleCore::try_new(&Lifecycle::global(), HandleCore::default_sink())?,
            analyzer: PatternAnalyzer::new(),
        })
    }

    /// Replace the analyzer with one using `config`
    ///
    /// On failure the current analyzer is kept.
    pub fn configure(&mut self, config: AnalyzerConfig) -> Result<()> {
        let analyzer = self
            .core
            .run("configure", || PatternAnalyzer::with_config(config))?;
        self.analyzer = analyzer;
        Ok(())
    }

    /// Current analyzer configuration
    pub fn config(&self) -> Result<AnalyzerConfig> {
        self.core.run("config", || Ok(*self.analyzer.config()))
    }

    /// Best matching pattern among `pattern_types`
    pub fn analyze_time_series(
        &self,
        data: &[f64],
        timestamps: &[u64],
        pattern_types: &[PatternType],
    ) -> Result<AnalysisResult> {
        self.core.run("analyze_time_series", || {
            self.analyzer
                .analyze_time_series(data, timestamps, pattern_types)
        })
    }

    /// Indices of anomalous points at `sensitivity`
    pub fn detect_anomalies(&self, data: &[f64], sensitivity: f64) -> Result<Vec<usize>> {
        self.core.run("detect_anomalies", || {
            self.analyzer.detect_anomalies(data, sensitivity)
        })
    }

    /// Pearson correlation matrix of equal-length variables
    pub fn compute_correlation_matrix(&self, data: &[Vec<f64>]) -> Result<CorrelationMatrix> {
        self.core.run("compute_correlation_matrix", || {
            self.analyzer.compute_correlation_matrix(data)
        })
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

impl Default for AnalyzerEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AnalyzerEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyzerEngine")
            .field("valid", &self.is_valid())
            .field("analyzer", &self.analyzer)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataproc_core::{CollectingSink, Error, ErrorKind};

    #[test]
    fn test_failures_reach_sink() {
        let sink = Arc::new(CollectingSink::new());
        let engine = AnalyzerEngine::with_context(Arc::new(Lifecycle::new()), sink.clone());

        assert!(engine.detect_anomalies(&[1.0, 2.0], 0.0).is_err());
        assert!(engine
            .analyze_time_series(&[1.0], &[], &[PatternType::Trending])
            .is_err());

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].operation, "detect_anomalies");
        assert_eq!(events[1].operation, "analyze_time_series");
        assert_eq!(sink.counts_by_kind()[&ErrorKind::InvalidArgument], 2);
        assert!(engine.last_error().contains("Size mismatch"));
    }

    #[test]
    fn test_configure() {
        let mut engine = AnalyzerEngine::with_lifecycle(Arc::new(Lifecycle::new()));
        let err = engine
            .configure(AnalyzerConfig::default().with_anomaly_sensitivity(2.0))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(engine.config().unwrap(), AnalyzerConfig::default());

        engine
            .configure(AnalyzerConfig::default().with_min_confidence(0.9))
            .unwrap();
        assert_eq!(engine.config().unwrap().min_confidence, 0.9);
    }

    #[test]
    fn test_config_on_invalid_handle() {
        let sink = Arc::new(CollectingSink::new());
        let engine = AnalyzerEngine::with_context(Arc::new(Lifecycle::with_capacity(0)), sink.clone());
        assert!(!engine.is_valid());
        assert_eq!(engine.config().unwrap_err().kind(), ErrorKind::NotInitialized);
        assert_eq!(sink.events().last().unwrap().operation, "config");

        let lifecycle = Arc::new(Lifecycle::new());
        let engine = AnalyzerEngine::with_lifecycle(Arc::clone(&lifecycle));
        assert!(engine.config().is_ok());
        lifecycle.shutdown().unwrap();
        assert_eq!(engine.config().unwrap_err().kind(), ErrorKind::NotInitialized);
    }

    #[test]
    fn test_engine_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AnalyzerEngine>();
    }
}
