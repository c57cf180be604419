//! # minimax
//!
//! Hierarchical clustering with prototypes: agglomerative clustering under
//! **minimax linkage**, driven by the nearest-neighbor chain.
//!
//! Output is a SciPy-compatible linkage table (`(left, right, height, size)`
//! per merge) plus an exemplar for every cluster the tree contains.
//!
//! ```rust
//! use minimax::{Protoclust, ProtoclustConfig};
//!
//! // Four points on a line at 0, 1, 2, 3.
//! let d: Vec<Vec<f64>> = (0..4)
//!     .map(|i| (0..4).map(|j| (i as f64 - j as f64).abs()).collect())
//!     .collect();
//!
//! let mut pc = Protoclust::from_matrix(&d, ProtoclustConfig::new().with_seed(1))?;
//! pc.compute()?;
//! let dendro = pc.into_dendrogram()?;
//!
//! assert_eq!(dendro.n_merges(), 3);
//! let p = dendro.cut_to_k(2);
//! assert_eq!(p.n_clusters(), 2);
//! # Ok::<(), minimax::Error>(())
//! ```

pub mod cluster;
/// Error types used across `minimax`.
pub mod error;
pub mod hierarchy;

#[cfg(test)]
mod protoclust_tests;

pub use cluster::{
    distance_matrix, minimax_linkage, protoclust, Clustering, Metric, MinimaxClustering,
    MinimaxLinkage, Protoclust, ProtoclustConfig,
};
pub use error::{Error, Result};
pub use hierarchy::{Dendrogram, Merge, Partition};
