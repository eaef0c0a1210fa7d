//! Compute primitives trait
//!
//! The vector and moment operations the analysis layer is written against.
//! Every method has a scalar default so a backend only overrides what it
//! can do better.

use serde::{Deserialize, Serialize};

/// Vector norm selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NormType {
    /// Manhattan norm, sum of absolute values
    L1,
    /// Euclidean norm
    L2,
    /// Maximum absolute element
    Inf,
}

/// Centered second moments of a pair of equal-length vectors
///
/// These are the building blocks of the Pearson coefficient:
/// `r = sxy / sqrt(sxx * syy)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CenteredMoments {
    /// Σ (x - x̄)(y - ȳ)
    pub sxy: f64,
    /// Σ (x - x̄)²
    pub sxx: f64,
    /// Σ (y - ȳ)²
    pub syy: f64,
}

impl CenteredMoments {
    /// Pearson correlation, or `None` when either side has zero variance
    pub fn pearson(&self) -> Option<f64> {
        let denominator = (self.sxx * self.syy).sqrt();
        if denominator == 0.0 || !denominator.is_finite() {
            return None;
        }
        Some((self.sxy / denominator).clamp(-1.0, 1.0))
    }
}

/// Trait for computational primitives over `f64` slices
///
/// Empty inputs never panic; aggregate operations return `0.0`.
pub trait ComputePrimitives: Clone + Send + Sync {
    /// Get the name of this backend
    fn backend_name(&self) -> &'static str;

    /// Sum all elements in a slice
    fn sum(&self, data: &[f64]) -> f64 {
        data.iter().sum()
    }

    /// Compute dot product of two vectors
    ///
    /// Extra elements of the longer vector are ignored.
    fn dot_product(&self, a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len(), "Vectors must have same length");
        a.iter().zip(b.iter()).map(|(&x, &y)| x * y).sum()
    }

    /// Compute sum of squares
    fn sum_of_squares(&self, data: &[f64]) -> f64 {
        data.iter().map(|&x| x * x).sum()
    }

    /// Compute mean of a slice
    fn mean(&self, data: &[f64]) -> f64 {
        if data.is_empty() {
            return 0.0;
        }
        self.sum(data) / data.len() as f64
    }

    /// Compute sample variance (n - 1 denominator)
    fn variance(&self, data: &[f64]) -> f64 {
        if data.len() <= 1 {
            return 0.0;
        }
        let mean = self.mean(data);
        let sum_sq_diff: f64 = data
            .iter()
            .map(|&x| {
                let diff = x - mean;
                diff * diff
            })
            .sum();
        sum_sq_diff / (data.len() - 1) as f64
    }

    /// Compute a vector norm
    fn norm(&self, data: &[f64], norm_type: NormType) -> f64 {
        match norm_type {
            NormType::L1 => data.iter().map(|x| x.abs()).sum(),
            NormType::L2 => self.sum_of_squares(data).sqrt(),
            NormType::Inf => data.iter().fold(0.0, |acc: f64, x| acc.max(x.abs())),
        }
    }

    /// Centered cross and auto moments of two equal-length vectors
    fn centered_moments(&self, x: &[f64], y: &[f64]) -> CenteredMoments {
        debug_assert_eq!(x.len(), y.len(), "Vectors must have same length");
        let mean_x = self.mean(x);
        let mean_y = self.mean(y);

        let mut moments = CenteredMoments::default();
        for (&xi, &yi) in x.iter().zip(y.iter()) {
            let dx = xi - mean_x;
            let dy = yi - mean_y;
            moments.sxy += dx * dy;
            moments.sxx += dx * dx;
            moments.syy += dy * dy;
        }
        moments
    }

    /// Find index of maximum value
    fn argmax(&self, data: &[f64]) -> Option<usize> {
        data.iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
    }
}
