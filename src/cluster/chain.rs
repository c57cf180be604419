//! Nearest-neighbor chain over the clusters still available for merging.
//!
//! Starting from any cluster, keep stepping to the nearest neighbor of the
//! chain's tail. Distances along the chain never increase, so the walk ends
//! at a pair of **reciprocal nearest neighbors**: two clusters that are each
//! other's nearest neighbor.
//!
//! ```text
//! chain:  a ──▶ b ──▶ c ──▶ d
//!                       ◀──       nn(d) == c  → (c, d) is the pair
//! ```
//!
//! After the pair is merged only `c, d` leave the chain; `a ──▶ b` seeds the
//! next search. Reusing that prefix is what keeps the total growth work over
//! all `n - 1` merges at `O(n²)`.
//!
//! The prefix stays a valid chain because minimax linkage is reducible: the
//! best center of `G ∪ H ∪ K` lies in `G ∪ K` or `H ∪ K`, so a merged
//! cluster is never closer to a third cluster than the nearer of its parts.
//!
//! # Ties
//!
//! Nearest neighbors are ordered by `(distance, id)`. With that total order
//! a chain can never walk back onto itself except at its predecessor, so
//! equal distances cannot produce self-loops.

use super::packed::PackedSymmetricMatrix;
use crate::error::{Error, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Marks an id with no slot in the available set.
const RETIRED: usize = usize::MAX;

/// Set of extended ids with O(1) insert, remove, and membership.
///
/// `ids` is dense; `slot[id]` is the position of `id` in `ids`.
#[derive(Debug, Clone)]
struct AvailableSet {
    ids: Vec<usize>,
    slot: Vec<usize>,
}

impl AvailableSet {
    fn new(n_items: usize, capacity: usize) -> Self {
        let mut slot = vec![RETIRED; capacity];
        for (i, s) in slot.iter_mut().enumerate().take(n_items) {
            *s = i;
        }
        Self {
            ids: (0..n_items).collect(),
            slot,
        }
    }

    fn contains(&self, id: usize) -> bool {
        self.slot.get(id).is_some_and(|&s| s != RETIRED)
    }

    fn insert(&mut self, id: usize) {
        if self.contains(id) {
            return;
        }
        self.slot[id] = self.ids.len();
        self.ids.push(id);
    }

    fn remove(&mut self, id: usize) -> bool {
        if !self.contains(id) {
            return false;
        }
        let pos = self.slot[id];
        let _ = self.ids.swap_remove(pos);
        if let Some(&moved) = self.ids.get(pos) {
            self.slot[moved] = pos;
        }
        self.slot[id] = RETIRED;
        true
    }
}

/// The evolving nearest-neighbor chain and the set of mergeable ids.
#[derive(Debug, Clone)]
pub struct NeighborChain {
    n_items: usize,
    chain: Vec<usize>,
    available: AvailableSet,
    rng: StdRng,
}

impl NeighborChain {
    /// Chain over `n_items` points, seeded from OS entropy.
    pub fn new(n_items: usize) -> Self {
        Self::with_rng(n_items, StdRng::from_os_rng())
    }

    /// Chain over `n_items` points with a fixed seed.
    pub fn with_seed(n_items: usize, seed: u64) -> Self {
        Self::with_rng(n_items, StdRng::seed_from_u64(seed))
    }

    fn with_rng(n_items: usize, rng: StdRng) -> Self {
        let capacity = (2 * n_items).saturating_sub(1);
        Self {
            n_items,
            chain: Vec::with_capacity(n_items),
            available: AvailableSet::new(n_items, capacity),
            rng,
        }
    }

    /// Grow the chain until its last two entries are reciprocal nearest
    /// neighbors, and return them as `(second_to_last, last)`.
    ///
    /// An empty chain is seeded with a uniformly random available id. Growth
    /// takes at most `available - 1` steps.
    pub fn grow_chain(&mut self, distances: &PackedSymmetricMatrix) -> Result<(usize, usize)> {
        let n_available = self.available.ids.len();
        if n_available < 2 {
            let index = self.available.ids.first().copied().unwrap_or(0);
            return Err(Error::NoNeighborFound { index });
        }

        if self.chain.is_empty() {
            let r = self.rng.random_range(0..n_available);
            self.chain.push(self.available.ids[r]);
        }

        for _ in 0..n_available - 1 {
            let tail = self.chain_end_1().ok_or(Error::NoNeighborFound { index: 0 })?;
            let neighbor = self.nearest(tail, distances)?;
            if self.chain_end_2() == Some(neighbor) {
                break;
            }
            tracing::trace!(tail, neighbor, len = self.chain.len() + 1, "chain grew");
            self.chain.push(neighbor);
        }

        match (self.chain_end_2(), self.chain_end_1()) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(Error::NoNeighborFound {
                index: self.chain.last().copied().unwrap_or(0),
            }),
        }
    }

    /// Last chain element.
    pub fn chain_end_1(&self) -> Option<usize> {
        self.chain.last().copied()
    }

    /// Second-to-last chain element.
    pub fn chain_end_2(&self) -> Option<usize> {
        self.chain.len().checked_sub(2).map(|i| self.chain[i])
    }

    /// Drop the last two chain entries (the pair that was just merged).
    pub fn trim_chain(&mut self) {
        let keep = self.chain.len().saturating_sub(2);
        self.chain.truncate(keep);
    }

    /// Retire `r1` and `r2` and admit the cluster formed at `iteration`.
    pub fn merge_indicies(&mut self, r1: usize, r2: usize, iteration: usize) {
        let _ = self.available.remove(r1);
        let _ = self.available.remove(r2);
        self.available.insert(self.n_items + iteration);
    }

    /// Ids still available for merging, in no particular order.
    pub fn available(&self) -> &[usize] {
        &self.available.ids
    }

    /// Whether `id` is still available for merging.
    pub fn is_available(&self, id: usize) -> bool {
        self.available.contains(id)
    }

    /// Current chain, oldest entry first.
    pub fn chain(&self) -> &[usize] {
        &self.chain
    }

    /// Nearest available neighbor of `index` under `(distance, id)`.
    fn nearest(&self, index: usize, distances: &PackedSymmetricMatrix) -> Result<usize> {
        self.available
            .ids
            .iter()
            .copied()
            .filter(|&j| j != index)
            .map(|j| (distances.get(index, j), j))
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
            .map(|(_, j)| j)
            .ok_or(Error::NoNeighborFound { index })
    }
}
