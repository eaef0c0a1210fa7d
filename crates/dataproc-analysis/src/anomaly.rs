//! Robust anomaly scoring
//!
//! Each point is scored by its distance from the median in units of the
//! scaled median absolute deviation. When more than half of the points are
//! identical the MAD is zero, and the scaled mean absolute deviation is used
//! instead. A point is flagged when its score exceeds
//! `BASE_THRESHOLD / sensitivity`.

use crate::traits::{Detection, PatternDetector};
use crate::types::PatternType;
use dataproc_core::utils::{
    mean_absolute_deviation, median, median_absolute_deviation, MAD_CONSISTENCY,
    MEAN_AD_CONSISTENCY,
};
use dataproc_core::{Error, Result};

/// Sensitivity used when none is given
pub const DEFAULT_SENSITIVITY: f64 = 0.95;

/// Score threshold at sensitivity 1.0
pub const BASE_THRESHOLD: f64 = 3.0;

fn validate_sensitivity(sensitivity: f64) -> Result<()> {
    // Written to reject NaN
    if !(sensitivity > 0.0 && sensitivity <= 1.0) {
        return Err(Error::InvalidArgument(format!(
            "sensitivity ({sensitivity}) must be in (0, 1]"
        )));
    }
    Ok(())
}

/// Robust z-scores of every point
///
/// All scores are zero when the data has no spread.
pub fn robust_scores(data: &[f64]) -> Vec<f64> {
    if data.is_empty() {
        return Vec::new();
    }
    let center = median(data);
    let mut spread = MAD_CONSISTENCY * median_absolute_deviation(data, center);
    if spread == 0.0 {
        spread = MEAN_AD_CONSISTENCY * mean_absolute_deviation(data, center);
    }
    if spread == 0.0 {
        return vec![0.0; data.len()];
    }
    data.iter().map(|&x| (x - center).abs() / spread).collect()
}

/// Indices of anomalous points, strictly increasing
///
/// Higher sensitivity lowers the threshold, so every index flagged at one
/// sensitivity is also flagged at any higher one.
///
/// # Examples
///
/// ```rust
/// use dataproc_analysis::detect_anomalies;
///
/// let data = [10.0, 10.5, 9.8, 10.2, 55.0, 10.1, 9.9];
/// assert_eq!(detect_anomalies(&data, 0.95).unwrap(), vec![4]);
/// ```
pub fn detect_anomalies(data: &[f64], sensitivity: f64) -> Result<Vec<usize>> {
    validate_sensitivity(sensitivity)?;
    if !dataproc_core::utils::all_finite(data) {
        return Err(Error::non_finite("anomaly input"));
    }
    Ok(flag(data, sensitivity))
}

fn flag(data: &[f64], sensitivity: f64) -> Vec<usize> {
    let threshold = BASE_THRESHOLD / sensitivity;
    robust_scores(data)
        .iter()
        .enumerate()
        .filter(|(_, &score)| score > threshold)
        .map(|(i, _)| i)
        .collect()
}

/// Detector scoring the fraction of anomalous points
#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    sensitivity: f64,
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self {
            sensitivity: DEFAULT_SENSITIVITY,
        }
    }
}

impl AnomalyDetector {
    /// Detector flagging at `sensitivity`
    pub fn new(sensitivity: f64) -> Result<Self> {
        validate_sensitivity(sensitivity)?;
        Ok(Self { sensitivity })
    }

    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }
}

impl PatternDetector for AnomalyDetector {
    fn pattern_type(&self) -> PatternType {
        PatternType::Anomaly
    }

    fn name(&self) -> &'static str {
        "robust_zscore"
    }

    fn minimum_sample_size(&self) -> usize {
        3
    }

    fn detect(&self, data: &[f64], _timestamps: &[u64]) -> Detection {
        if data.is_empty() {
            return Detection::none();
        }
        let indices = flag(data, self.sensitivity);
        let list: Vec<String> = indices.iter().map(usize::to_string).collect();
        Detection::new(indices.len() as f64 / data.len() as f64)
            .with("anomaly_count", indices.len())
            .with("anomaly_indices", list.join(","))
    }
}
