//! Periodicity detection through autocorrelation
//!
//! The series is mean-centered and its autocorrelation is computed for lags
//! `1..=N/2` with the unbiased normalization
//!
//! ```text
//! r(k) = (N / (N - k)) · Σ d[t]·d[t+k] / Σ d[t]²
//! ```
//!
//! Lags up to the first local minimum only reflect short-range smoothness,
//! so the peak search starts after it. The reported period is the shortest
//! local maximum within 5% of the best peak, which picks the fundamental
//! rather than one of its multiples.

use crate::traits::{fmt_f64, Detection, PatternDetector};
use crate::types::PatternType;
use dataproc_core::{ComputePrimitives, ScalarBackend};

/// Fraction of the best peak a shorter lag must reach to be preferred
const FUNDAMENTAL_TOLERANCE: f64 = 0.95;

/// Autocorrelation peak detector
#[derive(Debug, Clone, Default)]
pub struct PeriodicDetector<P: ComputePrimitives = ScalarBackend> {
    primitives: P,
}

impl<P: ComputePrimitives> PeriodicDetector<P> {
    pub fn new(primitives: P) -> Self {
        Self { primitives }
    }

    /// Autocorrelation for lags `0..=max_lag`, or `None` for constant data
    pub fn autocorrelation(&self, data: &[f64], max_lag: usize) -> Option<Vec<f64>> {
        let n = data.len();
        let mean = self.primitives.mean(data);
        let centered: Vec<f64> = data.iter().map(|&x| x - mean).collect();
        let c0 = self.primitives.sum_of_squares(&centered);
        if c0 == 0.0 || c0 <= f64::EPSILON * self.primitives.sum_of_squares(data) {
            return None;
        }

        let max_lag = max_lag.min(n.saturating_sub(1));
        let acf = (0..=max_lag)
            .map(|k| {
                let cross = self
                    .primitives
                    .dot_product(&centered[..n - k], &centered[k..]);
                cross * n as f64 / ((n - k) as f64 * c0)
            })
            .collect();
        Some(acf)
    }
}

impl<P: ComputePrimitives> PatternDetector for PeriodicDetector<P> {
    fn pattern_type(&self) -> PatternType {
        PatternType::Periodic
    }

    fn name(&self) -> &'static str {
        "autocorrelation"
    }

    fn minimum_sample_size(&self) -> usize {
        4
    }

    fn detect(&self, data: &[f64], _timestamps: &[u64]) -> Detection {
        let max_lag = data.len() / 2;
        let Some(acf) = self.autocorrelation(data, max_lag) else {
            return Detection::none();
        };
        let max_lag = acf.len() - 1;

        // Walk down to the first local minimum
        let mut first_min = 1;
        while first_min < max_lag && acf[first_min + 1] < acf[first_min] {
            first_min += 1;
        }
        if first_min >= max_lag {
            return Detection::none();
        }

        let search = &acf[first_min + 1..=max_lag];
        let Some(best_offset) = self.primitives.argmax(search) else {
            return Detection::none();
        };
        let best = search[best_offset];
        if best <= 0.0 {
            return Detection::none().with("autocorrelation", fmt_f64(best));
        }

        let is_local_max =
            |k: usize| acf[k] >= acf[k - 1] && (k == max_lag || acf[k] >= acf[k + 1]);
        let period = (first_min + 1..=max_lag)
            .find(|&k| is_local_max(k) && acf[k] >= best * FUNDAMENTAL_TOLERANCE)
            .unwrap_or(first_min + 1 + best_offset);
        let peak = acf[period];

        Detection::new(peak)
            .with("period", period)
            .with("autocorrelation", fmt_f64(peak))
    }
}
