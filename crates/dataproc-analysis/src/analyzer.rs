//! Pattern analyzer: runs the detectors and picks the best match

use crate::anomaly::{detect_anomalies, AnomalyDetector, DEFAULT_SENSITIVITY};
use crate::cluster::ClusterDetector;
use crate::correlation::correlation_matrix_with;
use crate::periodic::PeriodicDetector;
use crate::traits::{Detection, PatternDetector};
use crate::trending::TrendDetector;
use crate::types::{AnalysisResult, CorrelationMatrix, PatternType};
use dataproc_core::utils::all_finite;
use dataproc_core::{ComputePrimitives, Error, Result, ScalarBackend};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument};

/// A detector must score strictly above this to report a pattern
pub const MIN_CONFIDENCE: f64 = 0.5;

/// Analyzer configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Threshold a detection must exceed, in `[0, 1)`
    pub min_confidence: f64,
    /// Sensitivity used by the anomaly detector, in `(0, 1]`
    pub anomaly_sensitivity: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            min_confidence: MIN_CONFIDENCE,
            anomaly_sensitivity: DEFAULT_SENSITIVITY,
        }
    }
}

impl AnalyzerConfig {
    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn with_anomaly_sensitivity(mut self, anomaly_sensitivity: f64) -> Self {
        self.anomaly_sensitivity = anomaly_sensitivity;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.min_confidence) {
            return Err(Error::InvalidArgument(format!(
                "min_confidence ({}) must be in [0, 1)",
                self.min_confidence
            )));
        }
        if !(self.anomaly_sensitivity > 0.0 && self.anomaly_sensitivity <= 1.0) {
            return Err(Error::InvalidArgument(format!(
                "anomaly_sensitivity ({}) must be in (0, 1]",
                self.anomaly_sensitivity
            )));
        }
        Ok(())
    }
}

/// Runs pattern detectors over numeric time series
///
/// Synchronous and stateless between calls; one analyzer can serve any
/// number of threads.
pub struct PatternAnalyzer<P: ComputePrimitives + 'static = ScalarBackend> {
    config: AnalyzerConfig,
    primitives: P,
    detectors: Vec<Box<dyn PatternDetector>>,
}

impl PatternAnalyzer<ScalarBackend> {
    /// Analyzer with the default configuration
    pub fn new() -> Self {
        Self::build(AnalyzerConfig::default(), ScalarBackend, AnomalyDetector::default())
    }

    /// Analyzer with a validated configuration
    pub fn with_config(config: AnalyzerConfig) -> Result<Self> {
        Self::with_primitives(config, ScalarBackend)
    }
}

impl Default for PatternAnalyzer<ScalarBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ComputePrimitives + 'static> PatternAnalyzer<P> {
    /// Analyzer computing on `primitives`
    pub fn with_primitives(config: AnalyzerConfig, primitives: P) -> Result<Self> {
        config.validate()?;
        let anomaly = AnomalyDetector::new(config.anomaly_sensitivity)?;
        Ok(Self::build(config, primitives, anomaly))
    }

    fn build(config: AnalyzerConfig, primitives: P, anomaly: AnomalyDetector) -> Self {
        // Registered in PatternType order
        let detectors: Vec<Box<dyn PatternDetector>> = vec![
            Box::new(PeriodicDetector::new(primitives.clone())),
            Box::new(TrendDetector::new(primitives.clone())),
            Box::new(anomaly),
            Box::new(ClusterDetector),
        ];
        Self {
            config,
            primitives,
            detectors,
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Detector registered for `pattern_type`
    pub fn detector(&self, pattern_type: PatternType) -> Option<&dyn PatternDetector> {
        self.detectors
            .iter()
            .find(|d| d.pattern_type() == pattern_type)
            .map(|d| d.as_ref())
    }

    /// Find the strongest of the requested patterns
    ///
    /// Requested types are deduplicated and evaluated in priority order. The
    /// best detection wins if its confidence is strictly above
    /// `min_confidence`; equal confidences go to the earlier type. When no
    /// detection qualifies the result is not-found but still reports the
    /// best candidate's type, confidence and metadata.
    #[instrument(skip(self, data, timestamps), fields(n = data.len(), types = pattern_types.len()))]
    pub fn analyze_time_series(
        &self,
        data: &[f64],
        timestamps: &[u64],
        pattern_types: &[PatternType],
    ) -> Result<AnalysisResult> {
        if data.len() != timestamps.len() {
            return Err(Error::size_mismatch(data.len(), timestamps.len(), "timestamps"));
        }
        if data.is_empty() || pattern_types.is_empty() {
            return Ok(AnalysisResult::empty());
        }
        if !all_finite(data) {
            return Err(Error::non_finite("time series data"));
        }

        let mut requested = pattern_types.to_vec();
        requested.sort();
        requested.dedup();

        let mut best: Option<(PatternType, &'static str, Detection)> = None;
        for pattern_type in requested {
            let Some(detector) = self.detector(pattern_type) else {
                continue;
            };
            let detection = if data.len() < detector.minimum_sample_size() {
                Detection::none().with("insufficient_data", data.len())
            } else {
                detector.detect(data, timestamps)
            };
            debug!(
                %pattern_type,
                detector = detector.name(),
                confidence = detection.confidence,
                "Detector finished"
            );

            let better = best
                .as_ref()
                .map_or(true, |(_, _, current)| detection.confidence > current.confidence);
            if better {
                best = Some((pattern_type, detector.name(), detection));
            }
        }

        let Some((pattern_type, name, detection)) = best else {
            return Ok(AnalysisResult::empty());
        };
        let mut result = if detection.confidence > self.config.min_confidence {
            AnalysisResult::found(pattern_type, detection.confidence)
        } else {
            AnalysisResult::not_found(pattern_type, detection.confidence)
        };
        for (key, value) in detection.metadata {
            result = result.with_metadata(key, value);
        }
        Ok(result.with_metadata("detector", name))
    }

    /// Robust anomaly indices at `sensitivity`
    #[instrument(skip(self, data), fields(n = data.len()))]
    pub fn detect_anomalies(&self, data: &[f64], sensitivity: f64) -> Result<Vec<usize>> {
        let indices = detect_anomalies(data, sensitivity)?;
        debug!(flagged = indices.len(), "Anomaly scan finished");
        Ok(indices)
    }

    /// Pearson correlation matrix of equal-length variables
    #[instrument(skip(self, data), fields(variables = data.len()))]
    pub fn compute_correlation_matrix(&self, data: &[Vec<f64>]) -> Result<CorrelationMatrix> {
        correlation_matrix_with(&self.primitives, data)
    }
}

impl<P: ComputePrimitives + 'static> fmt::Debug for PatternAnalyzer<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.detectors.iter().map(|d| d.name()).collect();
        f.debug_struct("PatternAnalyzer")
            .field("config", &self.config)
            .field("backend", &self.primitives.backend_name())
            .field("detectors", &names)
            .finish()
    }
}
