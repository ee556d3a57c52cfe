//! Region and edge identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a region (node) in the region adjacency graph.
///
/// Ids stay allocated for the whole merge run; an absorbed region keeps its id
/// but is no longer active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Create a node id from a dense index.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Dense index of this node.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl From<usize> for NodeId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// Identifier of an adjacency edge.
///
/// Edge ids are never reused. An edge that collapsed into another one, or
/// whose endpoints were merged, keeps its id but is inactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(usize);

impl EdgeId {
    /// Create an edge id from a dense index.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Dense index of this edge.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

impl From<usize> for EdgeId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(NodeId::new(3).to_string(), "n3");
        assert_eq!(EdgeId::new(12).to_string(), "e12");
    }

    #[test]
    fn test_ordering_follows_index() {
        assert!(EdgeId::new(1) < EdgeId::new(2));
        assert!(NodeId::new(0) < NodeId::from(7));
    }
}
