//! Detector trait shared by the pattern detectors

use crate::types::PatternType;
use std::collections::HashMap;

/// Score reported by one detector
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Detection {
    /// Confidence in `[0, 1]`
    pub confidence: f64,
    /// Algorithm-specific detail
    pub metadata: HashMap<String, String>,
}

impl Detection {
    /// A detection with the given confidence, clamped to `[0, 1]`
    pub fn new(confidence: f64) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            confidence,
            metadata: HashMap::new(),
        }
    }

    /// Nothing detected
    pub fn none() -> Self {
        Self::default()
    }

    /// Add a metadata entry
    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }
}

/// A pattern detector
///
/// Callers guarantee that `data` and `timestamps` have equal length, that
/// `data` is finite and that it holds at least `minimum_sample_size` points.
/// Detectors never fail; degenerate input scores zero.
pub trait PatternDetector: Send + Sync {
    /// Pattern this detector scores
    fn pattern_type(&self) -> PatternType;

    /// Get the name of the detection algorithm
    fn name(&self) -> &'static str;

    /// Get the minimum sample size required for detection
    fn minimum_sample_size(&self) -> usize;

    /// Score the series
    fn detect(&self, data: &[f64], timestamps: &[u64]) -> Detection;
}

/// Format a float for metadata
pub(crate) fn fmt_f64(value: f64) -> String {
    format!("{value:.6}")
}
