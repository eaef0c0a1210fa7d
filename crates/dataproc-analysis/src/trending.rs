//! Linear trend detection
//!
//! Ordinary least squares of the values against their timestamps. The
//! confidence is the coefficient of determination of the fit.

use crate::traits::{fmt_f64, Detection, PatternDetector};
use crate::types::PatternType;
use dataproc_core::utils::is_constant;
use dataproc_core::{ComputePrimitives, ScalarBackend};

/// Fitted line `y = slope · t + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

/// OLS trend detector
#[derive(Debug, Clone, Default)]
pub struct TrendDetector<P: ComputePrimitives = ScalarBackend> {
    primitives: P,
}

impl<P: ComputePrimitives> TrendDetector<P> {
    pub fn new(primitives: P) -> Self {
        Self { primitives }
    }

    /// Least-squares fit, or `None` when timestamps or values are constant
    pub fn fit(&self, data: &[f64], timestamps: &[u64]) -> Option<LinearFit> {
        if is_constant(data) || timestamps.windows(2).all(|w| w[0] == w[1]) {
            return None;
        }
        // Shift to the first timestamp to keep large epochs well conditioned
        let origin = timestamps.iter().copied().min().unwrap_or(0);
        let t: Vec<f64> = timestamps.iter().map(|&ts| (ts - origin) as f64).collect();

        let moments = self.primitives.centered_moments(&t, data);
        if moments.sxx == 0.0 || moments.syy == 0.0 {
            return None;
        }

        let slope = moments.sxy / moments.sxx;
        let intercept_shifted = self.primitives.mean(data) - slope * self.primitives.mean(&t);
        let r_squared = moments.pearson().map(|r| r * r).unwrap_or(0.0);

        Some(LinearFit {
            slope,
            intercept: intercept_shifted - slope * origin as f64,
            r_squared,
        })
    }
}

impl<P: ComputePrimitives> PatternDetector for TrendDetector<P> {
    fn pattern_type(&self) -> PatternType {
        PatternType::Trending
    }

    fn name(&self) -> &'static str {
        "least_squares"
    }

    fn minimum_sample_size(&self) -> usize {
        3
    }

    fn detect(&self, data: &[f64], timestamps: &[u64]) -> Detection {
        if data.len() < self.minimum_sample_size() {
            return Detection::none();
        }
        match self.fit(data, timestamps) {
            Some(fit) => Detection::new(fit.r_squared)
                .with("slope", fmt_f64(fit.slope))
                .with("intercept", fmt_f64(fit.intercept))
                .with("r_squared", fmt_f64(fit.r_squared)),
            None => Detection::none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_perfect_line() {
        let detector = TrendDetector::<ScalarBackend>::default();
        let fit = detector
            .fit(&[1.0, 2.0, 3.0, 4.0, 5.0], &[0, 1, 2, 3, 4])
            .unwrap();
        assert_relative_eq!(fit.slope, 1.0, epsilon = 1e-12);
        assert_relative_eq!(fit.intercept, 1.0, epsilon = 1e-12);
        assert_relative_eq!(fit.r_squared, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_offset_timestamps() {
        let detector = TrendDetector::<ScalarBackend>::default();
        let ts: Vec<u64> = (0..10).map(|i| 1_700_000_000 + i * 60).collect();
        let data: Vec<f64> = (0..10).map(|i| 5.0 - 0.5 * i as f64).collect();
        let fit = detector.fit(&data, &ts).unwrap();
        assert_relative_eq!(fit.slope, -0.5 / 60.0, epsilon = 1e-12);
        assert_relative_eq!(fit.r_squared, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_inputs_score_zero() {
        let detector = TrendDetector::<ScalarBackend>::default();
        assert_eq!(detector.detect(&[1.0, 2.0], &[0, 1]).confidence, 0.0);
        assert_eq!(detector.detect(&[1.0, 2.0, 3.0], &[7, 7, 7]).confidence, 0.0);
        assert_eq!(detector.detect(&[4.0, 4.0, 4.0, 4.0], &[0, 1, 2, 3]).confidence, 0.0);
    }

    #[test]
    fn test_constant_values_with_inexact_mean() {
        let detector = TrendDetector::<ScalarBackend>::default();
        let ts: Vec<u64> = (0..7).collect();
        for c in [0.1, 0.7, 3.3] {
            assert_eq!(detector.fit(&[c; 7], &ts), None, "constant {c}");
            let detection = detector.detect(&[c; 7], &ts);
            assert_eq!(detection.confidence, 0.0);
            assert!(detection.metadata.is_empty());
        }
    }

    #[test]
    fn test_noise_has_low_r_squared() {
        let data = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        let ts: Vec<u64> = (0..8).collect();
        let detection = TrendDetector::<ScalarBackend>::default().detect(&data, &ts);
        assert!(detection.confidence < 0.2);
        assert!(detection.metadata.contains_key("slope"));
    }
}
