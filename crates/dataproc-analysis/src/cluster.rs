//! One-dimensional cluster detection
//!
//! Values are sorted and split wherever the gap between neighbours exceeds
//! `max(3 × median gap, 10% of range)`. The score rewards a few balanced,
//! tight groups:
//!
//! ```text
//! balance    = (1 - largest_fraction) · k / (k - 1)
//! tightness  = 1 - Σ cluster widths / range
//! confidence = balance · tightness
//! ```
//!
//! A single group, constant data, or more than `N/2` groups score zero.

use crate::traits::{fmt_f64, Detection, PatternDetector};
use crate::types::PatternType;
use dataproc_core::utils::{median_sorted, sorted};

const GAP_MULTIPLIER: f64 = 3.0;
const RANGE_FRACTION: f64 = 0.1;

/// A run of sorted values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueCluster {
    pub min: f64,
    pub max: f64,
    pub size: usize,
}

impl ValueCluster {
    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

/// Group sorted values at gaps larger than `threshold`
pub fn split_at_gaps(sorted_values: &[f64], threshold: f64) -> Vec<ValueCluster> {
    let Some(&first) = sorted_values.first() else {
        return Vec::new();
    };
    let mut clusters = Vec::new();
    let mut current = ValueCluster {
        min: first,
        max: first,
        size: 1,
    };
    for pair in sorted_values.windows(2) {
        if pair[1] - pair[0] > threshold {
            clusters.push(current);
            current = ValueCluster {
                min: pair[1],
                max: pair[1],
                size: 1,
            };
        } else {
            current.max = pair[1];
            current.size += 1;
        }
    }
    clusters.push(current);
    clusters
}

/// Gap-threshold cluster detector
#[derive(Debug, Clone, Copy, Default)]
pub struct ClusterDetector;

impl PatternDetector for ClusterDetector {
    fn pattern_type(&self) -> PatternType {
        PatternType::Cluster
    }

    fn name(&self) -> &'static str {
        "gap_threshold"
    }

    fn minimum_sample_size(&self) -> usize {
        4
    }

    fn detect(&self, data: &[f64], _timestamps: &[u64]) -> Detection {
        let values = sorted(data);
        let (Some(&lo), Some(&hi)) = (values.first(), values.last()) else {
            return Detection::none();
        };
        let range = hi - lo;
        if range <= 0.0 {
            return Detection::none();
        }

        let gaps: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
        let threshold = (GAP_MULTIPLIER * median_sorted(&sorted(&gaps))).max(RANGE_FRACTION * range);
        let clusters = split_at_gaps(&values, threshold);

        let k = clusters.len();
        let largest = clusters.iter().map(|c| c.size).max().unwrap_or(0);
        let largest_fraction = largest as f64 / values.len() as f64;
        let describe = |detection: Detection| {
            detection
                .with("cluster_count", k)
                .with("largest_cluster_fraction", fmt_f64(largest_fraction))
                .with("gap_threshold", fmt_f64(threshold))
        };

        if k < 2 || k > values.len() / 2 {
            return describe(Detection::none());
        }

        let balance = (1.0 - largest_fraction) * k as f64 / (k - 1) as f64;
        let widths: f64 = clusters.iter().map(ValueCluster::width).sum();
        let tightness = 1.0 - widths / range;
        describe(Detection::new(balance * tightness))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_at_gaps() {
        let clusters = split_at_gaps(&[1.0, 1.1, 1.2, 5.0, 5.1, 9.0], 1.0);
        assert_eq!(clusters.len(), 3);
        assert_eq!(clusters[0].size, 3);
        assert_eq!(clusters[2], ValueCluster { min: 9.0, max: 9.0, size: 1 });
        assert!(split_at_gaps(&[], 1.0).is_empty());
    }

    #[test]
    fn test_two_tight_groups() {
        let data = [0.0, 10.0, 0.1, 10.1, 0.2, 10.2, 0.05, 10.05];
        let detection = ClusterDetector.detect(&data, &[0; 8]);
        assert!(detection.confidence > 0.9, "{}", detection.confidence);
        assert_eq!(detection.metadata["cluster_count"], "2");
        assert_eq!(detection.metadata["largest_cluster_fraction"], "0.500000");
    }

    #[test]
    fn test_uniform_spread_is_single_cluster() {
        let data: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let detection = ClusterDetector.detect(&data, &[0; 30]);
        assert_eq!(detection.confidence, 0.0);
        assert_eq!(detection.metadata["cluster_count"], "1");
    }

    #[test]
    fn test_constant_scores_zero() {
        assert_eq!(ClusterDetector.detect(&[4.0; 8], &[0; 8]), Detection::none());
    }

    #[test]
    fn test_unbalanced_groups_score_lower() {
        let balanced = [0.0, 0.1, 0.2, 0.3, 9.0, 9.1, 9.2, 9.3];
        let skewed = [0.0, 0.1, 0.2, 0.3, 0.15, 0.25, 0.05, 9.0];
        let b = ClusterDetector.detect(&balanced, &[0; 8]).confidence;
        let s = ClusterDetector.detect(&skewed, &[0; 8]).confidence;
        assert!(b > s, "balanced {b} skewed {s}");
    }
}
