//! Edge scoring policies.
//!
//! A scoring policy assigns every adjacency edge a [`Score`]; the merge loop
//! always merges the edge with the lowest score next. After each merge the
//! loop notifies the policy so it can fold the statistics of the absorbed
//! region or edge into the survivor:
//!
//! ```text
//! merge edge (u, v) → notify_node_merge(v, u)
//!                   → notify_edge_merge(e, f)   for every pair of edges that
//!                                               now connect the same regions
//!                   → score(e)                  for every edge of u
//! ```
//!
//! ## Contract
//!
//! - `score` has no observable side effects and returns the same value until
//!   the next notification (except [`Random`], which draws a fresh value).
//! - Each merge is reported exactly once, with ids that are still active.
//!   Policies trust the caller: a stale id yields a meaningless score, not an
//!   error.
//! - No policy rescans a whole region. Updates are O(1), or O(k) in the number
//!   of absorbed original edges for [`MedianAffinity`].
//!
//! ## Policies
//!
//! | Policy | Score | State |
//! |--------|-------|-------|
//! | [`MinSize`] / [`MaxSize`] | min / max endpoint size | sizes accumulate on node merge |
//! | [`MinAffinity`] / [`MaxAffinity`] | edge affinity | extremum kept on edge merge |
//! | [`MedianAffinity`] | exact median of merged originals | affiliated edge lists |
//! | [`QuantileAffinity`] | histogram quantile | one histogram per edge |
//! | [`Random`] | uniform in `[0, 1)` | seeded generator |
//! | [`Const`] | fixed value | none |

pub mod affinity;
pub mod baseline;
pub mod config;
pub mod median;
pub mod quantile;
pub mod size;

use crate::graph::RegionGraph;
use crate::types::{NodeId, EdgeId, Score};

pub use affinity::{MinAffinity, MaxAffinity};
pub use baseline::{Random, Const};
pub use config::{ScoringFunction, ConfigError};
pub use median::MedianAffinity;
pub use quantile::QuantileAffinity;
pub use size::{MinSize, MaxSize};

/// Error constructing a scoring policy.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    /// Quantile outside `0..=100`.
    #[error("Quantile must be in 0..=100, got {0}")]
    InvalidQuantile(u8),
    /// A property map does not cover the graph.
    #[error("{map} map has {actual} entries, graph needs {expected}")]
    MapSizeMismatch {
        /// Which map is wrong.
        map: &'static str,
        /// Number of ids in the graph.
        expected: usize,
        /// Number of entries in the map.
        actual: usize,
    },
    /// Invalid scoring configuration.
    #[error("Invalid scoring configuration: {0}")]
    Config(#[from] ConfigError),
}

/// A strategy for scoring edges that stays correct across merges.
///
/// Policies are selected once per merge run and used through a generic
/// parameter, so scoring calls are statically dispatched.
pub trait EdgeScoring {
    /// Short policy name for logs.
    fn name(&self) -> &'static str;

    /// Score of an active edge. Lower scores merge earlier.
    ///
    /// Takes `&mut self` so policies may reorder scratch state or advance a
    /// generator; neither changes later scores.
    fn score(&mut self, graph: &RegionGraph, edge: EdgeId) -> Score;

    /// Region `from` was absorbed into region `to`.
    fn notify_node_merge(&mut self, from: NodeId, to: NodeId);

    /// Edge `from` collapsed into edge `to`; both connect the same regions.
    fn notify_edge_merge(&mut self, from: EdgeId, to: EdgeId);
}

impl<P: EdgeScoring + ?Sized> EdgeScoring for &mut P {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    #[inline]
    fn score(&mut self, graph: &RegionGraph, edge: EdgeId) -> Score {
        (**self).score(graph, edge)
    }

    #[inline]
    fn notify_node_merge(&mut self, from: NodeId, to: NodeId) {
        (**self).notify_node_merge(from, to)
    }

    #[inline]
    fn notify_edge_merge(&mut self, from: EdgeId, to: EdgeId) {
        (**self).notify_edge_merge(from, to)
    }
}
