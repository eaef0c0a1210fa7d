//! Pearson correlation matrices

use crate::types::CorrelationMatrix;
use dataproc_core::utils::{all_finite, is_constant};
use dataproc_core::{ComputePrimitives, Error, Result, ScalarBackend};

/// Pearson correlation matrix of equal-length variables
///
/// The diagonal is exactly `1.0`. A constant variable has no defined
/// correlation with anything else; its off-diagonal entries are `0.0` and
/// the matrix carries a `zero_variance` warning.
///
/// # Examples
///
/// ```rust
/// use dataproc_analysis::compute_correlation_matrix;
///
/// let m = compute_correlation_matrix(&[vec![1.0, 2.0, 3.0], vec![3.0, 2.0, 1.0]]).unwrap();
/// assert_eq!(m.rows(), &[vec![1.0, -1.0], vec![-1.0, 1.0]]);
/// ```
pub fn compute_correlation_matrix(data: &[Vec<f64>]) -> Result<CorrelationMatrix> {
    correlation_matrix_with(&ScalarBackend, data)
}

/// [`compute_correlation_matrix`] on a specific primitives backend
pub fn correlation_matrix_with<P: ComputePrimitives>(
    primitives: &P,
    data: &[Vec<f64>],
) -> Result<CorrelationMatrix> {
    let Some(first) = data.first() else {
        return Ok(CorrelationMatrix::empty());
    };
    let n = first.len();
    for (i, column) in data.iter().enumerate() {
        if column.len() != n {
            return Err(Error::size_mismatch(
                n,
                column.len(),
                &format!("correlation variable {i}"),
            ));
        }
        if !all_finite(column) {
            return Err(Error::non_finite(&format!("correlation variable {i}")));
        }
    }
    if n < 2 {
        return Err(Error::InvalidArgument(format!(
            "correlation needs at least 2 points per variable, got {n}"
        )));
    }

    let k = data.len();
    let degenerate: Vec<usize> = (0..k).filter(|&i| is_constant(&data[i])).collect();

    let mut rows = vec![vec![0.0; k]; k];
    for i in 0..k {
        rows[i][i] = 1.0;
        for j in (i + 1)..k {
            let r = if degenerate.contains(&i) || degenerate.contains(&j) {
                0.0
            } else {
                primitives
                    .centered_moments(&data[i], &data[j])
                    .pearson()
                    .unwrap_or(0.0)
            };
            rows[i][j] = r;
            rows[j][i] = r;
        }
    }

    Ok(CorrelationMatrix::new(rows, degenerate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identical_variables() {
        let m = compute_correlation_matrix(&[vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0]]).unwrap();
        assert_eq!(m.rows(), &[vec![1.0, 1.0], vec![1.0, 1.0]]);
        assert!(!m.has_warning());
    }

    #[test]
    fn test_empty_collection() {
        let m = compute_correlation_matrix(&[]).unwrap();
        assert!(m.is_empty());
    }

    #[test]
    fn test_single_variable() {
        let m = compute_correlation_matrix(&[vec![4.0, 1.0]]).unwrap();
        assert_eq!(m.rows(), &[vec![1.0]]);
    }

    #[test]
    fn test_mismatched_lengths() {
        let err = compute_correlation_matrix(&[vec![1.0, 2.0, 3.0], vec![1.0, 2.0]]).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidArgument(
                "Size mismatch in correlation variable 1: expected 3, got 2".to_string()
            )
        );
    }

    #[test]
    fn test_too_few_points() {
        assert!(matches!(
            compute_correlation_matrix(&[vec![1.0], vec![2.0]]),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_zero_variance_column() {
        let data = vec![
            vec![5.0, 5.0, 5.0, 5.0],
            vec![1.0, 2.0, 3.0, 4.0],
            vec![2.0, 4.1, 5.9, 8.0],
        ];
        let m = compute_correlation_matrix(&data).unwrap();
        assert_eq!(m[(0, 0)], 1.0);
        assert_eq!(m[(0, 1)], 0.0);
        assert_eq!(m[(2, 0)], 0.0);
        assert!(m[(1, 2)] > 0.99);
        assert_eq!(m.degenerate_columns(), &[0]);
        assert_eq!(m.metadata()["warning"], "zero_variance");
    }

    #[test]
    fn test_constant_column_with_inexact_mean() {
        // The float mean of these constants does not round back to the value
        for c in [0.1, 0.7, 3.3] {
            let m = compute_correlation_matrix(&[vec![c, c, c], vec![1.0, 2.0, 4.0]]).unwrap();
            assert_eq!(m[(0, 1)], 0.0, "constant {c}");
            assert_eq!(m[(1, 0)], 0.0, "constant {c}");
            assert_eq!(m.degenerate_columns(), &[0], "constant {c}");
            assert!(m.has_warning(), "constant {c}");
        }
    }

    #[test]
    fn test_known_coefficient() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = vec![2.0, 1.0, 4.0, 3.0, 5.0];
        let m = compute_correlation_matrix(&[x, y]).unwrap();
        assert_relative_eq!(m[(0, 1)], 0.8, epsilon = 1e-12);
        assert_eq!(m[(0, 1)], m[(1, 0)]);
    }
}
