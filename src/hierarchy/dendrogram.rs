//! Dendrogram with a prototype at every node.
//!
//! A dendrogram represents the nested structure of clusters produced by
//! agglomerative (bottom-up) clustering. Ids follow the SciPy convention:
//! leaves are `0..n`, and merge `i` creates cluster `n + i`.
//!
//! Minimax linkage additionally names an **exemplar** for every node: the
//! member point that covers the whole cluster within the merge height.
//! Cutting the tree therefore yields a prototype per cluster for free.

use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A dendrogram representing hierarchical cluster merges.
///
/// Each merge combines two clusters into one, recording:
/// - Which clusters were merged
/// - The distance at which they merged
/// - The size of the resulting cluster
#[derive(Debug, Clone, PartialEq)]
pub struct Dendrogram {
    /// Merge history: (cluster_a, cluster_b, distance, new_size)
    merges: Vec<Merge>,
    /// Number of original items.
    n_items: usize,
    /// Exemplar of every id in `0..2n-1`.
    exemplars: Vec<usize>,
}

/// A single merge operation in the dendrogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Merge {
    /// First cluster being merged (index).
    pub cluster_a: usize,
    /// Second cluster being merged (index).
    pub cluster_b: usize,
    /// Distance/dissimilarity at which merge occurred.
    pub distance: f64,
    /// Size of resulting cluster.
    pub size: usize,
}

/// Flat clustering obtained by cutting a [`Dendrogram`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Cluster label of each original item, numbered by first appearance.
    pub labels: Vec<usize>,
    /// Prototype (exemplar point) of each cluster, indexed by label.
    pub prototypes: Vec<usize>,
    /// Dendrogram id of each cluster's subtree root, indexed by label.
    pub roots: Vec<usize>,
}

impl Partition {
    /// Number of clusters.
    pub fn n_clusters(&self) -> usize {
        self.roots.len()
    }
}

impl Dendrogram {
    /// Build from a complete merge table and the exemplar of every id.
    ///
    /// Checks the structural invariants: `n - 1` merges, each child formed
    /// before its parent and used once, sizes adding up, and one exemplar
    /// per id.
    pub fn with_exemplars(n_items: usize, merges: Vec<Merge>, exemplars: Vec<usize>) -> Result<Self> {
        if n_items == 0 {
            return Err(Error::EmptyInput);
        }
        let n_ids = 2 * n_items - 1;
        if merges.len() != n_items - 1 {
            return Err(Error::ShapeMismatch {
                expected: format!("{} merges", n_items - 1),
                actual: format!("{} merges", merges.len()),
            });
        }
        if exemplars.len() != n_ids {
            return Err(Error::ShapeMismatch {
                expected: format!("{n_ids} exemplars"),
                actual: format!("{} exemplars", exemplars.len()),
            });
        }
        if let Some(&index) = exemplars.iter().find(|&&e| e >= n_items) {
            return Err(Error::IndexOutOfRange { index, bound: n_items });
        }

        let mut sizes = vec![1usize; n_ids];
        let mut used = vec![false; n_ids];
        for (i, m) in merges.iter().enumerate() {
            let id = n_items + i;
            for child in [m.cluster_a, m.cluster_b] {
                if child >= id || used[child] {
                    return Err(Error::InvalidParameter {
                        name: "merges",
                        message: "child must be formed earlier and merged once",
                    });
                }
                used[child] = true;
            }
            sizes[id] = sizes[m.cluster_a] + sizes[m.cluster_b];
            if sizes[id] != m.size {
                return Err(Error::InvalidParameter {
                    name: "merges",
                    message: "merge size must equal the sum of its children",
                });
            }
        }

        Ok(Self {
            merges,
            n_items,
            exemplars,
        })
    }

    /// Dendrogram id of the root (`2n - 2`; `0` for a single item).
    pub fn root(&self) -> usize {
        2 * self.n_items - 2
    }

    /// Exemplar point of dendrogram id `id`.
    pub fn exemplar(&self, id: usize) -> Option<usize> {
        self.exemplars.get(id).copied()
    }

    /// Exemplars of every id in `0..2n-1`; leaves map to themselves.
    pub fn exemplars(&self) -> &[usize] {
        &self.exemplars
    }

    /// Height of dendrogram id `id` (`0.0` for leaves).
    pub fn height(&self, id: usize) -> Option<f64> {
        if id < self.n_items {
            Some(0.0)
        } else {
            self.merges.get(id - self.n_items).map(|m| m.distance)
        }
    }

    /// Children of internal id `id`.
    pub fn children(&self, id: usize) -> Option<(usize, usize)> {
        id.checked_sub(self.n_items)
            .and_then(|i| self.merges.get(i))
            .map(|m| (m.cluster_a, m.cluster_b))
    }

    /// Cluster items into maximal subtrees whose merges all lie at or below
    /// `threshold`.
    ///
    /// A merge above the threshold splits its subtree even if a later merge
    /// has a lower height, so the result is well defined without monotone
    /// heights.
    pub fn cut_at_height(&self, threshold: f64) -> Partition {
        let n_ids = self.exemplars.len();
        let mut kept = vec![true; n_ids];
        for (i, m) in self.merges.iter().enumerate() {
            kept[self.n_items + i] =
                kept[m.cluster_a] && kept[m.cluster_b] && m.distance <= threshold;
        }

        // Walk down from the root; every kept node reached is a cluster.
        let mut roots = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            if kept[id] {
                roots.push(id);
            } else if let Some((a, b)) = self.children(id) {
                stack.push(b);
                stack.push(a);
            }
        }
        self.partition_from_roots(roots)
    }

    /// Cluster items into `k` groups by removing the `k - 1` highest merges
    /// reachable from the root.
    ///
    /// Ties on height are removed latest-merge first. `k` is clamped to
    /// `1..=n`.
    pub fn cut_to_k(&self, k: usize) -> Partition {
        let k = k.clamp(1, self.n_items);

        let mut frontier = BinaryHeap::new();
        frontier.push(self.heap_entry(self.root()));
        let mut roots = Vec::with_capacity(k);

        while roots.len() + frontier.len() < k {
            let Some(top) = frontier.pop() else { break };
            match self.children(top.id) {
                Some((a, b)) => {
                    frontier.push(self.heap_entry(a));
                    frontier.push(self.heap_entry(b));
                }
                None => roots.push(top.id),
            }
        }

        roots.extend(frontier.into_iter().map(|e| e.id));
        self.partition_from_roots(roots)
    }

    fn heap_entry(&self, id: usize) -> Cut {
        Cut {
            height: self.height(id).unwrap_or(0.0),
            id,
        }
    }

    fn partition_from_roots(&self, roots: Vec<usize>) -> Partition {
        const UNSET: usize = usize::MAX;
        let mut owner = vec![UNSET; self.n_items];
        for &root in &roots {
            let mut stack = vec![root];
            while let Some(id) = stack.pop() {
                match self.children(id) {
                    Some((a, b)) => {
                        stack.push(a);
                        stack.push(b);
                    }
                    None => owner[id] = root,
                }
            }
        }

        // Renumber to consecutive integers in order of first appearance.
        let mut label_of_root = vec![UNSET; self.exemplars.len()];
        let mut labels = Vec::with_capacity(self.n_items);
        let mut ordered_roots = Vec::with_capacity(roots.len());
        for &root in &owner {
            if label_of_root[root] == UNSET {
                label_of_root[root] = ordered_roots.len();
                ordered_roots.push(root);
            }
            labels.push(label_of_root[root]);
        }

        let prototypes = ordered_roots.iter().map(|&r| self.exemplars[r]).collect();
        Partition {
            labels,
            prototypes,
            roots: ordered_roots,
        }
    }

    /// Whether merge heights never decrease from child to parent.
    ///
    /// Minimax linkage is not guaranteed reducible; this reports what
    /// happened rather than assuming it.
    pub fn is_monotone(&self) -> bool {
        self.merges.iter().all(|m| {
            let parent = m.distance;
            [m.cluster_a, m.cluster_b]
                .iter()
                .all(|&c| self.height(c).is_some_and(|h| h <= parent))
        })
    }

    /// Merge table in the SciPy `(n-1) x 4` layout.
    pub fn to_linkage_matrix(&self) -> ndarray::Array2<f64> {
        crate::cluster::merges_to_array(&self.merges)
    }

    /// Number of original items.
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Number of merges recorded.
    pub fn n_merges(&self) -> usize {
        self.merges.len()
    }

    /// Iterate over merges.
    pub fn merges(&self) -> impl Iterator<Item = &Merge> {
        self.merges.iter()
    }

    /// Get the merge distances (for visualization).
    pub fn distances(&self) -> Vec<f64> {
        self.merges.iter().map(|m| m.distance).collect()
    }
}

/// Max-heap entry for top-down cutting: highest first, later merge on ties.
#[derive(Debug, Clone, Copy)]
struct Cut {
    height: f64,
    id: usize,
}

impl PartialEq for Cut {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Cut {}

impl PartialOrd for Cut {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cut {
    fn cmp(&self, other: &Self) -> Ordering {
        self.height
            .total_cmp(&other.height)
            .then(self.id.cmp(&other.id))
    }
}
