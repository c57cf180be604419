//! Clustering traits.

use super::packed::PackedSymmetricMatrix;
use crate::error::Result;
use ndarray::{Array2, ArrayView2};

/// Trait for clustering algorithms.
pub trait Clustering {
    /// Fit the model to data and return cluster assignments.
    ///
    /// Returns a vector of cluster labels, one per input point.
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>>;

    /// Get the number of clusters.
    fn n_clusters(&self) -> usize;
}

/// Read-only pairwise distances between original points.
///
/// Implementations must be symmetric; indices are trusted.
pub trait Dissimilarity {
    /// Distance between points `i` and `j`.
    fn distance(&self, i: usize, j: usize) -> f64;
}

impl Dissimilarity for PackedSymmetricMatrix {
    #[inline]
    fn distance(&self, i: usize, j: usize) -> f64 {
        self.get(i, j)
    }
}

impl Dissimilarity for Array2<f64> {
    #[inline]
    fn distance(&self, i: usize, j: usize) -> f64 {
        self[[i, j]]
    }
}

impl Dissimilarity for ArrayView2<'_, f64> {
    #[inline]
    fn distance(&self, i: usize, j: usize) -> f64 {
        self[[i, j]]
    }
}

impl<D: Dissimilarity + ?Sized> Dissimilarity for &D {
    #[inline]
    fn distance(&self, i: usize, j: usize) -> f64 {
        (**self).distance(i, j)
    }
}
