//! Utility functions for working with data slices

use std::cmp::Ordering;

/// Consistency constant that makes the MAD comparable to a standard
/// deviation for normally distributed data
pub const MAD_CONSISTENCY: f64 = 1.4826;

/// Consistency constant for the mean absolute deviation (sqrt(pi / 2))
pub const MEAN_AD_CONSISTENCY: f64 = 1.253_314_137_315_500_3;

fn nan_last(a: &f64, b: &f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
    }
}

/// Sort data and return a new vector
///
/// Handles NaN values by placing them at the end.
///
/// # Examples
///
/// ```rust
/// use dataproc_core::utils::sorted;
///
/// let data = vec![3.0, 1.0, 5.0, 2.0, 4.0];
/// assert_eq!(sorted(&data), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
/// ```
pub fn sorted(data: &[f64]) -> Vec<f64> {
    let mut sorted = data.to_vec();
    sorted.sort_by(nan_last);
    sorted
}

/// Median of already sorted data
///
/// Returns 0.0 for empty slices.
pub fn median_sorted(sorted_data: &[f64]) -> f64 {
    let n = sorted_data.len();
    if n == 0 {
        return 0.0;
    }
    if n % 2 == 0 {
        (sorted_data[n / 2 - 1] + sorted_data[n / 2]) / 2.0
    } else {
        sorted_data[n / 2]
    }
}

/// Median of unsorted data
///
/// # Examples
///
/// ```rust
/// use dataproc_core::utils::median;
///
/// assert_eq!(median(&[5.0, 1.0, 3.0]), 3.0);
/// assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
/// ```
pub fn median(data: &[f64]) -> f64 {
    median_sorted(&sorted(data))
}

/// Unscaled median absolute deviation around `center`
pub fn median_absolute_deviation(data: &[f64], center: f64) -> f64 {
    let deviations: Vec<f64> = data.iter().map(|&x| (x - center).abs()).collect();
    median(&deviations)
}

/// Unscaled mean absolute deviation around `center`
pub fn mean_absolute_deviation(data: &[f64], center: f64) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().map(|&x| (x - center).abs()).sum::<f64>() / data.len() as f64
}

/// True when every value equals the first
///
/// Compares values directly, so a constant series is recognized even when
/// its mean is not exactly representable. Empty slices are constant.
///
/// # Examples
///
/// ```rust
/// use dataproc_core::utils::is_constant;
///
/// assert!(is_constant(&[0.1, 0.1, 0.1]));
/// assert!(!is_constant(&[0.1, 0.2]));
/// ```
pub fn is_constant(data: &[f64]) -> bool {
    data.windows(2).all(|w| w[0] == w[1])
}

/// True when every value is finite
pub fn all_finite(data: &[f64]) -> bool {
    data.iter().all(|x| x.is_finite())
}
