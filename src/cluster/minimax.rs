//! Minimax linkage between two groups of points.
//!
//! For groups G and H with union U, every member `c` of U is tried as a
//! center. Its covering radius is the largest distance from `c` to any other
//! member of U:
//!
//! ```text
//! r(c)      = max_{u ∈ U} d(c, u)
//! d(G, H)   = min_{c ∈ U} r(c)
//! ```
//!
//! The minimizing center is the **exemplar** of the merged cluster: a real
//! data point that covers every member within `d(G, H)`. Ties on the radius
//! go to the lowest id, so results never depend on input order.
//!
//! Cost is `O(|U|²)` distance lookups per call.

use super::traits::Dissimilarity;

/// Covering radius and center of a merged group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimaxLinkage {
    /// Smallest covering radius over all candidate centers.
    pub radius: f64,
    /// Member achieving `radius` (lowest id on ties).
    pub exemplar: usize,
}

/// Minimax linkage of `g ∪ h` under `distances`.
///
/// `g` and `h` hold original point ids and are expected to be disjoint.
/// Returns `None` when both are empty.
pub fn minimax_linkage<D>(distances: &D, g: &[usize], h: &[usize]) -> Option<MinimaxLinkage>
where
    D: Dissimilarity + ?Sized,
{
    let mut best: Option<MinimaxLinkage> = None;

    for &center in g.iter().chain(h) {
        let radius = g
            .iter()
            .chain(h)
            .filter(|&&u| u != center)
            .map(|&u| distances.distance(center, u))
            .fold(0.0_f64, f64::max);

        let better = match best {
            None => true,
            Some(b) => match radius.total_cmp(&b.radius) {
                core::cmp::Ordering::Less => true,
                core::cmp::Ordering::Equal => center < b.exemplar,
                core::cmp::Ordering::Greater => false,
            },
        };
        if better {
            best = Some(MinimaxLinkage {
                radius,
                exemplar: center,
            });
        }
    }

    best
}
