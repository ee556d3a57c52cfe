//! Adjacency edge endpoints.

use serde::{Deserialize, Serialize};
use super::ids::NodeId;

/// Endpoints of an adjacency edge.
///
/// The pair is unordered; it is stored canonically with `u < v` so that two
/// edges between the same regions compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RegionEdge {
    /// Endpoint with the smaller id.
    pub u: NodeId,
    /// Endpoint with the larger id.
    pub v: NodeId,
}

impl RegionEdge {
    /// Create an edge between two regions, normalizing endpoint order.
    pub fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b {
            Self { u: a, v: b }
        } else {
            Self { u: b, v: a }
        }
    }

    /// The endpoint opposite to `node`.
    ///
    /// `node` must be one of the endpoints.
    pub fn other(&self, node: NodeId) -> NodeId {
        debug_assert!(self.contains(node), "{node} is not an endpoint of {self:?}");
        if self.u == node {
            self.v
        } else {
            self.u
        }
    }

    /// Whether `node` is one of the endpoints.
    pub fn contains(&self, node: NodeId) -> bool {
        self.u == node || self.v == node
    }

    /// Replace endpoint `from` by `to`, keeping the canonical order.
    pub(crate) fn relabel(&self, from: NodeId, to: NodeId) -> Self {
        Self::new(self.other(from), to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order() {
        let a = RegionEdge::new(NodeId::new(4), NodeId::new(1));
        let b = RegionEdge::new(NodeId::new(1), NodeId::new(4));

        assert_eq!(a, b);
        assert_eq!(a.u, NodeId::new(1));
        assert_eq!(a.v, NodeId::new(4));
    }

    #[test]
    fn test_other_endpoint() {
        let e = RegionEdge::new(NodeId::new(2), NodeId::new(5));
        assert_eq!(e.other(NodeId::new(2)), NodeId::new(5));
        assert_eq!(e.other(NodeId::new(5)), NodeId::new(2));
    }

    #[test]
    fn test_relabel_reorders() {
        let e = RegionEdge::new(NodeId::new(2), NodeId::new(5));
        let moved = e.relabel(NodeId::new(5), NodeId::new(0));

        assert_eq!(moved.u, NodeId::new(0));
        assert_eq!(moved.v, NodeId::new(2));
    }
}
