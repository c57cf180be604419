//! Minimax-linkage hierarchical clustering.
//!
//! ## Minimax Linkage
//!
//! Agglomerative clustering needs a distance between clusters. Minimax
//! linkage uses the smallest radius of a ball, centered on a member, that
//! covers both clusters:
//!
//! ```text
//! d(G, H) = min_{c ∈ G∪H} max_{u ∈ G∪H} d(c, u)
//! ```
//!
//! | Linkage | Distance | Effect |
//! |---------|----------|--------|
//! | Single | min(pairwise) | Chaining; elongated clusters |
//! | Complete | max(pairwise) | Compact, spherical clusters |
//! | Minimax | min covering radius | Compact, with a prototype per cluster |
//!
//! The center achieving the minimum is the cluster's **exemplar** (or
//! prototype). Unlike a centroid it is a real input item, so every node of
//! the dendrogram can be summarized by one point, and every member lies
//! within the node's height of it.
//!
//! ## Nearest-Neighbor Chain
//!
//! Recomputing all cluster distances after each merge costs O(n³). The
//! engine instead follows nearest-neighbor links ([`NeighborChain`]) until
//! two clusters point at each other, merges them, and keeps the rest of the
//! chain for the next search.
//!
//! ```text
//! Protoclust::compute_index(i)
//!   ├─ NeighborChain::grow_chain        → reciprocal pair (a, b)
//!   ├─ minimax_linkage(a, b)            → height, exemplar of n+i
//!   ├─ minimax_linkage(n+i, k) for k    → refresh PackedSymmetricMatrix
//!   └─ NeighborChain::merge_indicies / trim_chain
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use minimax::cluster::{Clustering, MinimaxClustering, Metric};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//! ];
//!
//! let mc = MinimaxClustering::new(2).with_metric(Metric::Euclidean).with_seed(0);
//! let labels = mc.fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[1]);
//! assert_ne!(labels[0], labels[2]);
//!
//! let p = mc.fit_prototypes(&data).unwrap();
//! assert_eq!(p.prototypes.len(), 2);
//! ```

mod chain;
mod distance;
mod hierarchical;
mod minimax;
mod packed;
mod protoclust;
mod traits;

pub use chain::NeighborChain;
pub use distance::{distance_matrix, distance_matrix_with, Metric};
pub use hierarchical::MinimaxClustering;
pub use minimax::{minimax_linkage, MinimaxLinkage};
pub use packed::PackedSymmetricMatrix;
pub use protoclust::{protoclust, Protoclust, ProtoclustConfig};
pub use traits::{Clustering, Dissimilarity};

pub(crate) use protoclust::merges_to_array;
