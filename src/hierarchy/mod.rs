//! Dendrogram output of the clustering engine.
//!
//! Records the complete merge history, with the exemplar of every node:
//!
//! ```text
//!         6 (height=1.0, exemplar=1)
//!        / \
//!       4   5 (height=0.7, exemplar=3)
//!      / \ / \
//!     0  1 2  3 (leaves are their own exemplars)
//! ```
//!
//! Key property: "cut" at any height, or to any number of clusters, and
//! read off one prototype per cluster.

mod dendrogram;

pub use dendrogram::{Dendrogram, Merge, Partition};
