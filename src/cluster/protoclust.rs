//! Minimax-linkage agglomerative clustering driven by a nearest-neighbor chain.
//!
//! [`Protoclust`] owns every piece of mutable state: the packed distance
//! relation over all `2n - 1` extended ids, the [`NeighborChain`], the
//! member set and exemplar of every cluster formed so far, and the merge
//! table. One call to [`Protoclust::compute_index`] performs one merge:
//!
//! 1. grow the chain to a reciprocal pair `(a, b)`;
//! 2. form cluster `n + i` from the sorted union of their members;
//! 3. score it with [`minimax_linkage`] (height + exemplar);
//! 4. append `(a, b, height, size)` to the merge table;
//! 5. refresh the distance from `n + i` to every other available cluster;
//! 6. retire `a, b`, admit `n + i`, trim the chain.
//!
//! Step 5 is `O(|U|²)` per frontier cluster and dominates the run time. The
//! evaluations are independent, so with the `parallel` feature they fan out
//! over `rayon` and are joined before step 6 touches the chain.
//!
//! Steps are strictly sequential: step `i + 1` reads the available set and
//! distances committed by step `i`.

use super::chain::NeighborChain;
use super::minimax::minimax_linkage;
use super::packed::PackedSymmetricMatrix;
use crate::error::{Error, Result};
use crate::hierarchy::{Dendrogram, Merge};
use ndarray::{Array2, ArrayView2};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Relative tolerance for the symmetry check on full matrices.
const SYMMETRY_TOL: f64 = 1e-9;

/// Configuration for [`Protoclust`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtoclustConfig {
    /// Seed for the chain's starting points; `None` uses OS entropy.
    pub seed: Option<u64>,
    /// Frontier size at which the distance refresh goes parallel.
    ///
    /// Ignored without the `parallel` feature.
    pub parallel_threshold: usize,
}

impl Default for ProtoclustConfig {
    fn default() -> Self {
        Self {
            seed: None,
            parallel_threshold: 64,
        }
    }
}

impl ProtoclustConfig {
    /// Create a default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the frontier size at which the refresh runs in parallel.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }
}

/// Incremental minimax-linkage clustering.
///
/// ```rust
/// use minimax::cluster::{Protoclust, ProtoclustConfig};
///
/// let d = vec![
///     vec![0.0, 1.0, 2.0],
///     vec![1.0, 0.0, 3.0],
///     vec![2.0, 3.0, 0.0],
/// ];
/// let mut pc = Protoclust::from_matrix(&d, ProtoclustConfig::new().with_seed(7)).unwrap();
/// pc.compute().unwrap();
///
/// let first = pc.merges()[0];
/// assert_eq!((first.cluster_a.min(first.cluster_b), first.cluster_a.max(first.cluster_b)), (0, 1));
/// assert_eq!(first.distance, 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct Protoclust {
    n_items: usize,
    /// Distances over extended ids `0..2n-1`.
    distances: PackedSymmetricMatrix,
    chain: NeighborChain,
    /// Sorted original point ids of each extended id; empty until formed.
    clusters: Vec<Vec<usize>>,
    /// Exemplar of each extended id; only valid once formed.
    exemplars: Vec<usize>,
    merges: Vec<Merge>,
    config: ProtoclustConfig,
}

impl Protoclust {
    /// Engine for `n_items` points with every distance set to zero.
    ///
    /// Fill in distances with [`set_distance`](Self::set_distance) before the
    /// first merge step.
    pub fn new(n_items: usize, config: ProtoclustConfig) -> Result<Self> {
        if n_items == 0 {
            return Err(Error::EmptyInput);
        }

        let n_ids = 2 * n_items - 1;
        let chain = match config.seed {
            Some(seed) => NeighborChain::with_seed(n_items, seed),
            None => NeighborChain::new(n_items),
        };

        let mut clusters = vec![Vec::new(); n_ids];
        let mut exemplars = vec![0; n_ids];
        for i in 0..n_items {
            clusters[i].push(i);
            exemplars[i] = i;
        }

        Ok(Self {
            n_items,
            distances: PackedSymmetricMatrix::new(n_ids),
            chain,
            clusters,
            exemplars,
            merges: Vec::with_capacity(n_items - 1),
            config,
        })
    }

    /// Engine over a full `n x n` distance matrix given as rows.
    pub fn from_matrix(rows: &[Vec<f64>], config: ProtoclustConfig) -> Result<Self> {
        let n = rows.len();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if let Some(row) = rows.iter().find(|r| r.len() != n) {
            return Err(Error::ShapeMismatch {
                expected: format!("{n}x{n}"),
                actual: format!("row of length {}", row.len()),
            });
        }
        Self::load(n, |i, j| rows[i][j], config)
    }

    /// Engine over a full `n x n` distance matrix.
    pub fn from_array(matrix: ArrayView2<'_, f64>, config: ProtoclustConfig) -> Result<Self> {
        let (r, c) = matrix.dim();
        if r == 0 {
            return Err(Error::EmptyInput);
        }
        if r != c {
            return Err(Error::ShapeMismatch {
                expected: format!("{r}x{r}"),
                actual: format!("{r}x{c}"),
            });
        }
        Self::load(r, |i, j| matrix[[i, j]], config)
    }

    fn load(n: usize, at: impl Fn(usize, usize) -> f64, config: ProtoclustConfig) -> Result<Self> {
        let mut pc = Self::new(n, config)?;
        for i in 0..n {
            let diag = at(i, i);
            if diag != 0.0 {
                return Err(Error::InvalidDistance { i, j: i, value: diag });
            }
            for j in 0..i {
                let lower = at(i, j);
                let upper = at(j, i);
                let scale = lower.abs().max(upper.abs()).max(1.0);
                if (lower - upper).abs() > SYMMETRY_TOL * scale {
                    return Err(Error::AsymmetricDistance { i, j });
                }
                check_distance(i, j, lower)?;
                check_distance(j, i, upper)?;
                pc.distances.set(i, j, lower);
            }
        }
        Ok(pc)
    }

    /// Set `d(i, j) = d(j, i) = distance` between two original points.
    ///
    /// Only allowed before the first merge step.
    pub fn set_distance(&mut self, i: usize, j: usize, distance: f64) -> Result<()> {
        if !self.merges.is_empty() {
            return Err(Error::DistancesFrozen);
        }
        for index in [i, j] {
            if index >= self.n_items {
                return Err(Error::IndexOutOfRange {
                    index,
                    bound: self.n_items,
                });
            }
        }
        if i == j {
            if distance != 0.0 {
                return Err(Error::InvalidDistance { i, j, value: distance });
            }
            return Ok(());
        }
        check_distance(i, j, distance)?;
        self.distances.set(i, j, distance);
        Ok(())
    }

    /// Current distance between two extended ids.
    pub fn distance(&self, i: usize, j: usize) -> Result<f64> {
        let bound = self.distances.size();
        for index in [i, j] {
            if index >= bound {
                return Err(Error::IndexOutOfRange { index, bound });
            }
        }
        Ok(self.distances.get(i, j))
    }

    /// Run every remaining merge step.
    pub fn compute(&mut self) -> Result<()> {
        self.compute_with_progress(|_, _| {})
    }

    /// Run every remaining merge step, reporting `(done, total)` after each.
    pub fn compute_with_progress<F>(&mut self, mut progress: F) -> Result<()>
    where
        F: FnMut(usize, usize),
    {
        let total = self.n_steps();
        tracing::info!(n_items = self.n_items, steps = total, "minimax clustering started");
        for i in self.steps_done()..total {
            self.compute_index(i)?;
            progress(i + 1, total);
        }
        tracing::info!(n_items = self.n_items, "minimax clustering finished");
        Ok(())
    }

    /// Perform merge step `i`, forming cluster `n + i`.
    ///
    /// Steps must be called as `0, 1, ..., n - 2`. On error nothing is
    /// committed except chain growth, which stays valid, so the step may be
    /// retried.
    pub fn compute_index(&mut self, i: usize) -> Result<()> {
        let n_steps = self.n_steps();
        if i >= n_steps {
            return Err(Error::StepOutOfRange { step: i, n_steps });
        }
        if i != self.steps_done() {
            return Err(Error::StepOutOfOrder {
                expected: self.steps_done(),
                found: i,
            });
        }

        let (rnn1, rnn2) = self.chain.grow_chain(&self.distances)?;
        let new_id = self.n_items + i;

        let left = &self.clusters[rnn1];
        let right = &self.clusters[rnn2];
        let members = merge_sorted(left, right);
        let link = minimax_linkage(&self.distances, left, right)
            .ok_or(Error::NoNeighborFound { index: rnn1 })?;

        let targets: Vec<usize> = self
            .chain
            .available()
            .iter()
            .copied()
            .filter(|&a| a != rnn1 && a != rnn2)
            .collect();
        let refreshed = self.refresh(&members, &targets);

        tracing::debug!(
            step = i,
            left = rnn1,
            right = rnn2,
            height = link.radius,
            size = members.len(),
            exemplar = link.exemplar,
            "merged"
        );

        // Commit.
        for (a, d) in refreshed {
            self.distances.set(a, new_id, d);
        }
        self.merges.push(Merge {
            cluster_a: rnn1,
            cluster_b: rnn2,
            distance: link.radius,
            size: members.len(),
        });
        self.clusters[new_id] = members;
        self.exemplars[new_id] = link.exemplar;
        self.chain.merge_indicies(rnn1, rnn2, i);
        self.chain.trim_chain();

        Ok(())
    }

    /// Minimax distance from `members` to each target cluster.
    fn refresh(&self, members: &[usize], targets: &[usize]) -> Vec<(usize, f64)> {
        let eval = |&a: &usize| {
            let radius = minimax_linkage(&self.distances, members, &self.clusters[a])
                .map_or(0.0, |l| l.radius);
            (a, radius)
        };

        #[cfg(feature = "parallel")]
        {
            if targets.len() >= self.config.parallel_threshold {
                return targets.par_iter().map(eval).collect();
            }
        }

        targets.iter().map(eval).collect()
    }

    /// Configuration this engine was built with.
    pub fn config(&self) -> &ProtoclustConfig {
        &self.config
    }

    /// Number of original points.
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Total merge steps (`n - 1`).
    pub fn n_steps(&self) -> usize {
        self.n_items - 1
    }

    /// Merge steps committed so far.
    pub fn steps_done(&self) -> usize {
        self.merges.len()
    }

    /// Whether all `n - 1` merges have run.
    pub fn is_complete(&self) -> bool {
        self.steps_done() == self.n_steps()
    }

    /// Merge table so far; row `i` formed cluster `n + i`.
    pub fn merges(&self) -> &[Merge] {
        &self.merges
    }

    /// Sorted member points of extended id `id`, if it has been formed.
    pub fn members(&self, id: usize) -> Option<&[usize]> {
        if self.is_formed(id) {
            Some(&self.clusters[id])
        } else {
            None
        }
    }

    /// Exemplar of extended id `id`, if it has been formed.
    pub fn exemplar(&self, id: usize) -> Option<usize> {
        if self.is_formed(id) {
            Some(self.exemplars[id])
        } else {
            None
        }
    }

    /// Exemplars of every extended id formed so far (`n + steps_done`).
    pub fn exemplars(&self) -> &[usize] {
        &self.exemplars[..self.n_items + self.steps_done()]
    }

    /// Ids currently available for merging, in no particular order.
    pub fn available(&self) -> &[usize] {
        self.chain.available()
    }

    /// Merge table in the SciPy `(n-1) x 4` layout, rows so far.
    pub fn linkage_matrix(&self) -> Array2<f64> {
        merges_to_array(&self.merges)
    }

    /// Finished dendrogram; fails unless every merge has run.
    pub fn into_dendrogram(self) -> Result<Dendrogram> {
        if !self.is_complete() {
            return Err(Error::Incomplete {
                done: self.steps_done(),
                total: self.n_steps(),
            });
        }
        Dendrogram::with_exemplars(self.n_items, self.merges, self.exemplars)
    }

    fn is_formed(&self, id: usize) -> bool {
        id < self.n_items + self.steps_done()
    }
}

/// Cluster a full distance matrix in one call.
///
/// ```rust
/// let d = vec![
///     vec![0.0, 1.0, 2.0, 3.0],
///     vec![1.0, 0.0, 1.0, 2.0],
///     vec![2.0, 1.0, 0.0, 1.0],
///     vec![3.0, 2.0, 1.0, 0.0],
/// ];
/// let dendro = minimax::protoclust(&d).unwrap();
/// assert_eq!(dendro.n_merges(), 3);
/// assert!([1, 2].contains(&dendro.exemplar(dendro.root()).unwrap()));
/// ```
pub fn protoclust(distances: &[Vec<f64>]) -> Result<Dendrogram> {
    let mut pc = Protoclust::from_matrix(distances, ProtoclustConfig::default())?;
    pc.compute()?;
    pc.into_dendrogram()
}

pub(crate) fn merges_to_array(merges: &[Merge]) -> Array2<f64> {
    let mut z = Array2::zeros((merges.len(), 4));
    for (i, m) in merges.iter().enumerate() {
        z[[i, 0]] = m.cluster_a as f64;
        z[[i, 1]] = m.cluster_b as f64;
        z[[i, 2]] = m.distance;
        z[[i, 3]] = m.size as f64;
    }
    z
}

fn check_distance(i: usize, j: usize, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidDistance { i, j, value })
    }
}

/// Merge two sorted, disjoint id lists.
fn merge_sorted(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] <= b[j] {
            out.push(a[i]);
            i += 1;
        } else {
            out.push(b[j]);
            j += 1;
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}
