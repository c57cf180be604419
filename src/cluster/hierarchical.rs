//! Prototype clustering of feature vectors.
//!
//! Builds a distance matrix under a chosen [`Metric`], runs minimax-linkage
//! agglomeration, and cuts the dendrogram to `k` clusters. Every cluster
//! comes with a prototype: an actual input point that lies within the merge
//! height of every other member.
//!
//! # When to Use
//!
//! - **Interpretable summaries**: each cluster is represented by a real item
//! - **Unknown k**: keep the dendrogram and cut it at any height
//! - **Small-medium data**: O(n²) memory for the distance relation

use super::distance::{distance_matrix, Metric};
use super::protoclust::{Protoclust, ProtoclustConfig};
use super::traits::Clustering;
use crate::error::Result;
use crate::hierarchy::{Dendrogram, Partition};

/// Minimax-linkage hierarchical clustering over feature vectors.
#[derive(Debug, Clone)]
pub struct MinimaxClustering {
    /// Number of clusters to produce.
    n_clusters: usize,
    /// Metric for the pairwise distance matrix.
    metric: Metric,
    /// Engine configuration (seed, parallelism).
    config: ProtoclustConfig,
}

impl MinimaxClustering {
    /// Create a new minimax clusterer.
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            metric: Metric::default(),
            config: ProtoclustConfig::default(),
        }
    }

    /// Set distance metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config = self.config.with_seed(seed);
        self
    }

    /// Set the frontier size at which distance refreshes go parallel.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.config = self.config.with_parallel_threshold(threshold);
        self
    }

    /// Fit and return the full dendrogram.
    pub fn fit_dendrogram(&self, data: &[Vec<f32>]) -> Result<Dendrogram> {
        let distances = distance_matrix(data, self.metric)?;
        let mut engine = Protoclust::from_array(distances.view(), self.config.clone())?;
        engine.compute()?;
        engine.into_dendrogram()
    }

    /// Fit and return labels together with one prototype per cluster.
    pub fn fit_prototypes(&self, data: &[Vec<f32>]) -> Result<Partition> {
        let dendro = self.fit_dendrogram(data)?;
        Ok(dendro.cut_to_k(self.n_clusters))
    }
}

impl Clustering for MinimaxClustering {
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        Ok(self.fit_prototypes(data)?.labels)
    }

    fn n_clusters(&self) -> usize {
        self.n_clusters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_minimax_basic() {
        let data = vec![
            vec![0.0, 0.0],
            vec![0.1, 0.1],
            vec![10.0, 10.0],
            vec![10.1, 10.1],
        ];

        let mc = MinimaxClustering::new(2).with_seed(1);
        let labels = mc.fit_predict(&data).unwrap();

        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[2], labels[3]);
        assert_ne!(labels[0], labels[2]);
    }

    #[test]
    fn test_prototypes_belong_to_their_cluster() {
        let data = vec![
            vec![0.0, 0.0],
            vec![0.2, 0.0],
            vec![0.1, 0.1],
            vec![5.0, 5.0],
            vec![5.1, 5.2],
            vec![9.0, 0.0],
        ];

        let p = MinimaxClustering::new(3)
            .with_metric(Metric::Euclidean)
            .with_seed(5)
            .fit_prototypes(&data)
            .unwrap();

        assert_eq!(p.n_clusters(), 3);
        for (label, &proto) in p.prototypes.iter().enumerate() {
            assert_eq!(p.labels[proto], label);
        }
        assert_eq!(p.labels[0], p.labels[1]);
        assert_eq!(p.labels[0], p.labels[2]);
        assert_eq!(p.labels[3], p.labels[4]);
    }

    #[test]
    fn test_dendrogram() {
        let data = vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![10.0, 0.0]];

        let mc = MinimaxClustering::new(2).with_seed(3);
        let dendro = mc.fit_dendrogram(&data).unwrap();

        assert_eq!(dendro.n_items(), 3);
        assert_eq!(dendro.n_merges(), 2);
    }

    #[test]
    fn test_empty_input_error() {
        let data: Vec<Vec<f32>> = vec![];
        assert_eq!(
            MinimaxClustering::new(2).fit_predict(&data).unwrap_err(),
            Error::EmptyInput
        );
    }

    #[test]
    fn test_scaling_invariant() {
        // Uniform scaling shouldn't change cluster assignments.
        let data = vec![
            vec![0.0, 0.0],
            vec![0.1, 0.1],
            vec![10.0, 10.0],
            vec![10.1, 10.1],
            vec![20.0, 0.0],
        ];
        let scaled: Vec<Vec<f32>> = data
            .iter()
            .map(|v| v.iter().map(|x| x * 100.0).collect())
            .collect();

        let mc = MinimaxClustering::new(3).with_seed(11);
        assert_eq!(
            mc.fit_predict(&data).unwrap(),
            mc.fit_predict(&scaled).unwrap()
        );
    }
}
