//! Extremum affinity scoring.
//!
//! The score is the edge's affinity. When two edges collapse, the survivor
//! keeps the smaller (or larger) affinity; by induction this is the exact
//! extremum over every original edge folded into it, whatever the merge order.

use crate::graph::{AffinityMap, RegionGraph};
use crate::types::{NodeId, EdgeId, Score};
use super::EdgeScoring;

/// Scores an edge with the minimum affinity of its original edges.
#[derive(Debug)]
pub struct MinAffinity<'a> {
    affinities: &'a mut AffinityMap,
}

impl<'a> MinAffinity<'a> {
    /// Create the policy over a borrowed affinity map.
    pub fn new(affinities: &'a mut AffinityMap) -> Self {
        Self { affinities }
    }

    /// Current edge affinities.
    pub fn affinities(&self) -> &AffinityMap {
        &*self.affinities
    }
}

impl EdgeScoring for MinAffinity<'_> {
    fn name(&self) -> &'static str {
        "min_affinity"
    }

    #[inline]
    fn score(&mut self, _graph: &RegionGraph, edge: EdgeId) -> Score {
        self.affinities[edge]
    }

    fn notify_node_merge(&mut self, _from: NodeId, _to: NodeId) {}

    #[inline]
    fn notify_edge_merge(&mut self, from: EdgeId, to: EdgeId) {
        self.affinities[to] = self.affinities[to].min(self.affinities[from]);
    }
}

/// Scores an edge with the maximum affinity of its original edges.
#[derive(Debug)]
pub struct MaxAffinity<'a> {
    affinities: &'a mut AffinityMap,
}

impl<'a> MaxAffinity<'a> {
    /// Create the policy over a borrowed affinity map.
    pub fn new(affinities: &'a mut AffinityMap) -> Self {
        Self { affinities }
    }

    /// Current edge affinities.
    pub fn affinities(&self) -> &AffinityMap {
        &*self.affinities
    }
}

impl EdgeScoring for MaxAffinity<'_> {
    fn name(&self) -> &'static str {
        "max_affinity"
    }

    #[inline]
    fn score(&mut self, _graph: &RegionGraph, edge: EdgeId) -> Score {
        self.affinities[edge]
    }

    fn notify_node_merge(&mut self, _from: NodeId, _to: NodeId) {}

    #[inline]
    fn notify_edge_merge(&mut self, from: EdgeId, to: EdgeId) {
        self.affinities[to] = self.affinities[to].max(self.affinities[from]);
    }
}
