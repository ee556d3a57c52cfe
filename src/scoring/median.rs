//! Exact median affinity scoring.
//!
//! Every edge is either *original* (scored with its own affinity) or
//! *compound*: it carries the ids of all original edges that collapsed into
//! it, and is scored with the median of their affinities. The median is found
//! by selection, not sorting, so a query is linear in the list length.

use std::mem;

use crate::graph::{AffinityMap, EdgeMap, RegionGraph};
use crate::types::{NodeId, EdgeId, Score};
use super::EdgeScoring;

/// Scores an edge with the median affinity of its original edges.
///
/// The median is the element of 0-based rank `len / 2`.
#[derive(Debug)]
pub struct MedianAffinity<'a> {
    affinities: &'a AffinityMap,
    /// Original edges folded into each compound edge; empty for originals and
    /// for edges that were absorbed.
    affiliated: EdgeMap<Vec<EdgeId>>,
}

impl<'a> MedianAffinity<'a> {
    /// Create the policy. Affinities are read, never written.
    pub fn new(graph: &RegionGraph, affinities: &'a AffinityMap) -> Self {
        Self {
            affinities,
            affiliated: EdgeMap::with_default(graph),
        }
    }

    /// Original edges represented by `edge`, or an empty slice if `edge` is
    /// itself original.
    pub fn affiliated_edges(&self, edge: EdgeId) -> &[EdgeId] {
        &self.affiliated[edge]
    }

    /// Whether `edge` still stands for itself only.
    pub fn is_original(&self, edge: EdgeId) -> bool {
        self.affiliated[edge].is_empty()
    }
}

impl EdgeScoring for MedianAffinity<'_> {
    fn name(&self) -> &'static str {
        "median_affinity"
    }

    fn score(&mut self, _graph: &RegionGraph, edge: EdgeId) -> Score {
        let affinities = self.affinities;
        let originals = &mut self.affiliated[edge];
        if originals.is_empty() {
            return affinities[edge];
        }

        let rank = originals.len() / 2;
        let (_, median, _) =
            originals.select_nth_unstable_by(rank, |a, b| affinities[*a].total_cmp(&affinities[*b]));
        affinities[*median]
    }

    fn notify_node_merge(&mut self, _from: NodeId, _to: NodeId) {}

    fn notify_edge_merge(&mut self, from: EdgeId, to: EdgeId) {
        let absorbed = mem::take(&mut self.affiliated[from]);
        let target = &mut self.affiliated[to];

        // the survivor stops being scored by its own affinity, so it has to
        // count itself among its originals
        if target.is_empty() {
            target.push(to);
        }

        if absorbed.is_empty() {
            target.push(from);
        } else if absorbed.len() > target.len() {
            let smaller = mem::replace(target, absorbed);
            target.extend(smaller);
        } else {
            target.extend(absorbed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e(i: usize) -> EdgeId {
        EdgeId::new(i)
    }

    /// `n` disjoint edges; the policy never looks at endpoints.
    fn matching_graph(n: usize) -> RegionGraph {
        let edges: Vec<_> = (0..n).map(|i| (2 * i, 2 * i + 1)).collect();
        RegionGraph::from_edges(2 * n, &edges).unwrap()
    }

    #[test]
    fn test_original_edge_uses_own_affinity() {
        let graph = matching_graph(2);
        let affinities: AffinityMap = EdgeMap::from_vec(vec![0.25, 0.75]);
        let mut scoring = MedianAffinity::new(&graph, &affinities);

        assert!(scoring.is_original(e(0)));
        assert_eq!(scoring.score(&graph, e(0)), 0.25);
        assert_eq!(scoring.score(&graph, e(1)), 0.75);
    }

    #[test]
    fn test_two_originals() {
        let graph = matching_graph(2);
        let affinities: AffinityMap = EdgeMap::from_vec(vec![0.25, 0.75]);
        let mut scoring = MedianAffinity::new(&graph, &affinities);

        scoring.notify_edge_merge(e(0), e(1));

        // rank 2 / 2 = 1 of [0.25, 0.75]
        assert_eq!(scoring.score(&graph, e(1)), 0.75);
        assert!(scoring.is_original(e(0)));
        assert_eq!(scoring.affiliated_edges(e(1)).len(), 2);
    }

    #[test]
    fn test_compound_into_compound() {
        let graph = matching_graph(5);
        let affinities: AffinityMap = EdgeMap::from_vec(vec![0.9, 0.1, 0.5, 0.3, 0.7]);
        let mut scoring = MedianAffinity::new(&graph, &affinities);

        scoring.notify_edge_merge(e(0), e(1));
        scoring.notify_edge_merge(e(2), e(3));
        scoring.notify_edge_merge(e(4), e(3));
        scoring.notify_edge_merge(e(1), e(3));

        // sorted: 0.1 0.3 0.5 0.7 0.9
        assert_eq!(scoring.score(&graph, e(3)), 0.5);
        assert!(scoring.affiliated_edges(e(1)).is_empty());

        let mut members: Vec<_> = scoring.affiliated_edges(e(3)).to_vec();
        members.sort();
        assert_eq!(members, vec![e(0), e(1), e(2), e(3), e(4)]);
    }

    #[test]
    fn test_larger_absorbed_list_is_swapped_in() {
        let graph = matching_graph(4);
        let affinities: AffinityMap = EdgeMap::from_vec(vec![0.2, 0.4, 0.6, 0.8]);
        let mut scoring = MedianAffinity::new(&graph, &affinities);

        scoring.notify_edge_merge(e(0), e(1));
        scoring.notify_edge_merge(e(2), e(1));
        scoring.notify_edge_merge(e(1), e(3));

        assert_eq!(scoring.affiliated_edges(e(3)).len(), 4);
        assert_eq!(scoring.score(&graph, e(3)), 0.6);
    }

    #[test]
    fn test_score_is_repeatable() {
        let graph = matching_graph(3);
        let affinities: AffinityMap = EdgeMap::from_vec(vec![0.6, 0.2, 0.4]);
        let mut scoring = MedianAffinity::new(&graph, &affinities);

        scoring.notify_edge_merge(e(0), e(2));
        scoring.notify_edge_merge(e(1), e(2));

        let first = scoring.score(&graph, e(2));
        let second = scoring.score(&graph, e(2));
        assert_eq!(first, 0.4);
        assert_eq!(first, second);
    }
}
