//! Pairwise distance matrices from feature vectors.

use crate::error::{Error, Result};
use ndarray::Array2;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Built-in metrics for [`distance_matrix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metric {
    /// Sum of squared coordinate differences.
    #[default]
    SquaredEuclidean,
    /// Square root of [`Metric::SquaredEuclidean`].
    Euclidean,
    /// Sum of absolute coordinate differences.
    Manhattan,
    /// Largest absolute coordinate difference.
    Chebyshev,
}

impl Metric {
    /// Distance between two equal-length points.
    #[inline]
    pub fn distance(&self, a: &[f32], b: &[f32]) -> f64 {
        let diffs = a.iter().zip(b).map(|(x, y)| (*x as f64 - *y as f64).abs());
        match self {
            Metric::SquaredEuclidean => diffs.map(|d| d * d).sum(),
            Metric::Euclidean => diffs.map(|d| d * d).sum::<f64>().sqrt(),
            Metric::Manhattan => diffs.sum(),
            Metric::Chebyshev => diffs.fold(0.0, f64::max),
        }
    }
}

/// Full `n x n` distance matrix of `data` under `metric`.
pub fn distance_matrix(data: &[Vec<f32>], metric: Metric) -> Result<Array2<f64>> {
    distance_matrix_with(data, |a, b| metric.distance(a, b))
}

/// Full `n x n` distance matrix of `data` under a custom metric.
///
/// `metric` is evaluated once per unordered pair; the diagonal is zero.
pub fn distance_matrix_with<F>(data: &[Vec<f32>], metric: F) -> Result<Array2<f64>>
where
    F: Fn(&[f32], &[f32]) -> f64 + Sync,
{
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }
    let n = data.len();
    let d = data[0].len();
    if let Some(p) = data.iter().find(|p| p.len() != d) {
        return Err(Error::DimensionMismatch {
            expected: d,
            found: p.len(),
        });
    }

    // Lower triangle, one row per point.
    let row = |i: usize| -> Vec<f64> { (0..i).map(|j| metric(&data[i], &data[j])).collect() };

    #[cfg(feature = "parallel")]
    let lower: Vec<Vec<f64>> = (0..n).into_par_iter().map(row).collect();
    #[cfg(not(feature = "parallel"))]
    let lower: Vec<Vec<f64>> = (0..n).map(row).collect();

    let mut out = Array2::zeros((n, n));
    for (i, r) in lower.iter().enumerate() {
        for (j, &v) in r.iter().enumerate() {
            out[[i, j]] = v;
            out[[j, i]] = v;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let a = [0.0, 0.0];
        let b = [3.0, 4.0];
        assert_eq!(Metric::SquaredEuclidean.distance(&a, &b), 25.0);
        assert_eq!(Metric::Euclidean.distance(&a, &b), 5.0);
        assert_eq!(Metric::Manhattan.distance(&a, &b), 7.0);
        assert_eq!(Metric::Chebyshev.distance(&a, &b), 4.0);
        assert_eq!(Metric::default(), Metric::SquaredEuclidean);
    }

    #[test]
    fn test_matrix_is_symmetric_with_zero_diagonal() {
        let data = vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 2.0]];
        let m = distance_matrix(&data, Metric::Euclidean).unwrap();
        assert_eq!(m.dim(), (3, 3));
        for i in 0..3 {
            assert_eq!(m[[i, i]], 0.0);
            for j in 0..3 {
                assert_eq!(m[[i, j]], m[[j, i]]);
            }
        }
        assert_eq!(m[[0, 2]], 2.0);
        assert!((m[[1, 2]] - 5.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_custom_metric() {
        let data = vec![vec![1.0], vec![4.0], vec![9.0]];
        let m = distance_matrix_with(&data, |a, b| if a == b { 0.0 } else { 1.0 }).unwrap();
        assert_eq!(m[[0, 1]], 1.0);
        assert_eq!(m[[2, 2]], 0.0);
    }

    #[test]
    fn test_errors() {
        let empty: Vec<Vec<f32>> = vec![];
        assert_eq!(
            distance_matrix(&empty, Metric::Euclidean).unwrap_err(),
            Error::EmptyInput
        );
        let ragged = vec![vec![0.0, 1.0], vec![2.0]];
        assert_eq!(
            distance_matrix(&ragged, Metric::Euclidean).unwrap_err(),
            Error::DimensionMismatch {
                expected: 2,
                found: 1
            }
        );
    }
}
