//! Region size scoring.
//!
//! Merging the smallest regions first removes tiny fragments early; merging
//! the largest first lets dominant regions grow. Sizes live on nodes, so only
//! node merges change state: the absorbed size is added to the survivor.

use crate::graph::{RegionGraph, SizeMap};
use crate::types::{NodeId, EdgeId, RegionEdge, Score};
use super::EdgeScoring;

/// Scores an edge with the smaller size of its two regions.
#[derive(Debug)]
pub struct MinSize<'a> {
    sizes: &'a mut SizeMap,
}

impl<'a> MinSize<'a> {
    /// Create the policy over a borrowed size map.
    pub fn new(sizes: &'a mut SizeMap) -> Self {
        Self { sizes }
    }

    /// Current region sizes.
    pub fn sizes(&self) -> &SizeMap {
        &*self.sizes
    }
}

impl EdgeScoring for MinSize<'_> {
    fn name(&self) -> &'static str {
        "min_size"
    }

    #[inline]
    fn score(&mut self, graph: &RegionGraph, edge: EdgeId) -> Score {
        let RegionEdge { u, v } = graph.edge(edge);
        self.sizes[u].min(self.sizes[v]) as Score
    }

    #[inline]
    fn notify_node_merge(&mut self, from: NodeId, to: NodeId) {
        accumulate(self.sizes, from, to);
    }

    fn notify_edge_merge(&mut self, _from: EdgeId, _to: EdgeId) {}
}

/// Scores an edge with the larger size of its two regions.
#[derive(Debug)]
pub struct MaxSize<'a> {
    sizes: &'a mut SizeMap,
}

impl<'a> MaxSize<'a> {
    /// Create the policy over a borrowed size map.
    pub fn new(sizes: &'a mut SizeMap) -> Self {
        Self { sizes }
    }

    /// Current region sizes.
    pub fn sizes(&self) -> &SizeMap {
        &*self.sizes
    }
}

impl EdgeScoring for MaxSize<'_> {
    fn name(&self) -> &'static str {
        "max_size"
    }

    #[inline]
    fn score(&mut self, graph: &RegionGraph, edge: EdgeId) -> Score {
        let RegionEdge { u, v } = graph.edge(edge);
        self.sizes[u].max(self.sizes[v]) as Score
    }

    #[inline]
    fn notify_node_merge(&mut self, from: NodeId, to: NodeId) {
        accumulate(self.sizes, from, to);
    }

    fn notify_edge_merge(&mut self, _from: EdgeId, _to: EdgeId) {}
}

#[inline]
fn accumulate(sizes: &mut SizeMap, from: NodeId, to: NodeId) {
    let absorbed = sizes[from];
    sizes[to] += absorbed;
}
