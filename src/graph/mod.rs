//! Region adjacency graph.
//!
//! Nodes are regions of an over-segmentation, edges connect regions that
//! touch. Ids are dense and never reused: merging deactivates ids instead of
//! freeing them, so property maps sized at construction stay valid for the
//! whole run.

pub mod maps;

use crate::types::{NodeId, EdgeId, RegionEdge};

pub use maps::{GraphId, IdMap, NodeMap, EdgeMap, AffinityMap, SizeMap};

/// Error building a region adjacency graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Edge endpoint outside `0..num_nodes`.
    #[error("Node {node} out of range for graph with {num_nodes} nodes")]
    NodeOutOfRange {
        /// The offending endpoint.
        node: usize,
        /// Number of nodes in the graph.
        num_nodes: usize,
    },
    /// Edge from a region to itself.
    #[error("Self loop on node {0}")]
    SelfLoop(NodeId),
    /// A second edge between the same pair of regions.
    #[error("Duplicate edge between {u} and {v} (existing {existing})")]
    DuplicateEdge {
        /// Smaller endpoint.
        u: NodeId,
        /// Larger endpoint.
        v: NodeId,
        /// The edge already connecting them.
        existing: EdgeId,
    },
}

/// Region adjacency graph with a fixed node set and append-only edge table.
///
/// At most one active edge connects any pair of regions.
#[derive(Debug, Clone, Default)]
pub struct RegionGraph {
    /// Endpoints per edge id, including inactive edges.
    edges: Vec<RegionEdge>,
    /// Whether each edge id is still active.
    active: Vec<bool>,
    /// Active edges incident to each node.
    incident: Vec<Vec<EdgeId>>,
    num_active_edges: usize,
}

impl RegionGraph {
    /// Create a graph with `num_nodes` regions and no edges.
    pub fn new(num_nodes: usize) -> Self {
        Self {
            edges: Vec::new(),
            active: Vec::new(),
            incident: vec![Vec::new(); num_nodes],
            num_active_edges: 0,
        }
    }

    /// Create a graph from a list of endpoint pairs. Edge ids follow list order.
    pub fn from_edges(num_nodes: usize, edges: &[(usize, usize)]) -> Result<Self, GraphError> {
        let mut graph = Self::new(num_nodes);
        for &(u, v) in edges {
            graph.add_edge(u, v)?;
        }
        Ok(graph)
    }

    /// Add an edge between regions `u` and `v`.
    pub fn add_edge(&mut self, u: usize, v: usize) -> Result<EdgeId, GraphError> {
        let num_nodes = self.num_nodes();
        for node in [u, v] {
            if node >= num_nodes {
                return Err(GraphError::NodeOutOfRange { node, num_nodes });
            }
        }
        let (u, v) = (NodeId::new(u), NodeId::new(v));
        if u == v {
            return Err(GraphError::SelfLoop(u));
        }
        if let Some(existing) = self.find_edge(u, v) {
            let edge = RegionEdge::new(u, v);
            return Err(GraphError::DuplicateEdge { u: edge.u, v: edge.v, existing });
        }

        let id = EdgeId::new(self.edges.len());
        self.edges.push(RegionEdge::new(u, v));
        self.active.push(true);
        self.incident[u.index()].push(id);
        self.incident[v.index()].push(id);
        self.num_active_edges += 1;
        Ok(id)
    }

    /// Number of regions, active or absorbed.
    pub fn num_nodes(&self) -> usize {
        self.incident.len()
    }

    /// Number of allocated edge ids, active or not.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Number of edges still active.
    pub fn num_active_edges(&self) -> usize {
        self.num_active_edges
    }

    /// Endpoints of an edge. Inactive edges report their last endpoints.
    #[inline]
    pub fn edge(&self, id: EdgeId) -> RegionEdge {
        self.edges[id.index()]
    }

    /// Whether the edge is still active.
    pub fn is_active(&self, id: EdgeId) -> bool {
        self.active[id.index()]
    }

    /// Active edges incident to `node`.
    pub fn incident_edges(&self, node: NodeId) -> &[EdgeId] {
        &self.incident[node.index()]
    }

    /// The active edge between `a` and `b`, if any.
    pub fn find_edge(&self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        let (near, far) = if self.incident[a.index()].len() <= self.incident[b.index()].len() {
            (a, b)
        } else {
            (b, a)
        };
        self.incident[near.index()]
            .iter()
            .copied()
            .find(|&e| self.edges[e.index()].other(near) == far)
    }

    /// All node ids.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> {
        (0..self.num_nodes()).map(NodeId::new)
    }

    /// All edge ids, including inactive ones.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> {
        (0..self.num_edges()).map(EdgeId::new)
    }

    /// Active edge ids in id order.
    pub fn active_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges().filter(|&e| self.is_active(e))
    }

    /// Deactivate an edge. Its id stays allocated.
    pub(crate) fn remove_edge(&mut self, id: EdgeId) {
        debug_assert!(self.is_active(id), "removing inactive edge {id}");
        let RegionEdge { u, v } = self.edge(id);
        self.incident[u.index()].retain(|&e| e != id);
        self.incident[v.index()].retain(|&e| e != id);
        self.active[id.index()] = false;
        self.num_active_edges -= 1;
    }

    /// Re-point the `from` endpoint of an edge to `to`.
    ///
    /// The caller guarantees that `to` has no edge to the other endpoint yet.
    pub(crate) fn move_edge(&mut self, id: EdgeId, from: NodeId, to: NodeId) {
        debug_assert!(self.find_edge(self.edge(id).other(from), to).is_none());
        self.incident[from.index()].retain(|&e| e != id);
        self.incident[to.index()].push(id);
        self.edges[id.index()] = self.edges[id.index()].relabel(from, to);
    }
}
