//! Priority-queue driven region merging.
//!
//! The merge loop repeatedly takes the edge with the lowest score, merges its
//! two regions and reports every resulting change to the scoring policy.
//!
//! ## Algorithm
//!
//! 1. Score every edge and push it onto a min-priority queue
//! 2. Pop the lowest candidate; drop it if its edge was removed or rescored
//!    since it was pushed
//! 3. Stop if its score reaches the threshold
//! 4. Merge edge `(u, v)`: `v` is absorbed into `u`
//!    - `notify_node_merge(v, u)`
//!    - every other edge of `v` either moves to `u`, or collapses via
//!      `notify_edge_merge` into the edge `u` already has to that neighbour
//!    - all edges of `u` are rescored and pushed again
//!
//! Ties are broken by edge id, so a run is deterministic for a deterministic
//! policy.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::canonical::{canonical_hash_hex, CanonicalError};
use crate::graph::{EdgeMap, NodeMap, RegionGraph};
use crate::scoring::EdgeScoring;
use crate::types::{NodeId, EdgeId, RegionEdge, Score};

/// A queued edge with the score it had when pushed.
#[derive(Debug, Clone, Copy)]
pub struct MergeCandidate {
    /// Edge to merge.
    pub edge: EdgeId,
    /// Score at push time.
    pub score: Score,
    /// Rescoring generation of the edge at push time.
    generation: u32,
}

// Ordering for the max-heap: the lowest score is the greatest candidate
impl PartialEq for MergeCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MergeCandidate {}

impl PartialOrd for MergeCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MergeCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Primary: lower score first
        // Secondary: lower edge id first
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.edge.cmp(&self.edge))
            .then_with(|| other.generation.cmp(&self.generation))
    }
}

/// One performed merge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MergeRecord {
    /// The edge that was merged.
    pub edge: EdgeId,
    /// Region that was absorbed.
    pub from: NodeId,
    /// Region that survived.
    pub to: NodeId,
    /// Score of the edge when it was merged.
    pub score: Score,
}

/// Merges in the order they were performed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergeHistory {
    merges: Vec<MergeRecord>,
}

impl MergeHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of merges.
    pub fn len(&self) -> usize {
        self.merges.len()
    }

    /// Whether no merge happened.
    pub fn is_empty(&self) -> bool {
        self.merges.is_empty()
    }

    /// All merges in order.
    pub fn records(&self) -> &[MergeRecord] {
        &self.merges
    }

    /// Merged edges in order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.merges.iter().map(|m| m.edge)
    }

    /// Scores of the merged edges in order.
    pub fn scores(&self) -> impl Iterator<Item = Score> + '_ {
        self.merges.iter().map(|m| m.score)
    }

    /// Hex digest of the merge sequence.
    ///
    /// Equal for two runs iff they merged the same edges, in the same order,
    /// with the same scores.
    pub fn fingerprint(&self) -> Result<String, CanonicalError> {
        canonical_hash_hex(&self.merges)
    }

    fn push(&mut self, record: MergeRecord) {
        self.merges.push(record);
    }
}

/// Agglomerates the regions of a graph, ordered by a scoring policy.
///
/// Owns the graph for the duration of the run: node and edge ids stay valid,
/// absorbed regions and collapsed edges simply become inactive.
#[derive(Debug)]
pub struct RegionMerging<P: EdgeScoring> {
    graph: RegionGraph,
    scoring: P,
    queue: BinaryHeap<MergeCandidate>,
    /// Bumped whenever an edge is rescored or removed; older candidates are stale.
    generation: EdgeMap<u32>,
    merged_into: NodeMap<Option<NodeId>>,
    history: MergeHistory,
}

impl<P: EdgeScoring> RegionMerging<P> {
    /// Score every active edge of `graph` and prepare the queue.
    pub fn new(graph: RegionGraph, scoring: P) -> Self {
        let generation = EdgeMap::new(&graph, 0);
        let merged_into = NodeMap::new(&graph, None);
        let mut merging = Self {
            queue: BinaryHeap::with_capacity(graph.num_active_edges()),
            graph,
            scoring,
            generation,
            merged_into,
            history: MergeHistory::new(),
        };

        let edges: Vec<EdgeId> = merging.graph.active_edges().collect();
        for edge in edges {
            merging.enqueue(edge);
        }

        debug!(
            policy = merging.scoring.name(),
            regions = merging.graph.num_nodes(),
            edges = merging.graph.num_active_edges(),
            "Initialized region merging"
        );
        merging
    }

    /// Merge regions while the lowest score is below `threshold`.
    ///
    /// Returns the number of merges performed by this call. Can be called
    /// again with a higher threshold to continue the same hierarchy.
    pub fn merge_until(&mut self, threshold: Score) -> usize {
        let mut merged = 0;

        while let Some(candidate) = self.queue.pop() {
            if !self.is_current(&candidate) {
                continue;
            }

            if candidate.score >= threshold {
                // keep it for a later call with a higher threshold
                self.queue.push(candidate);
                break;
            }

            self.merge_edge(candidate.edge, candidate.score);
            merged += 1;
        }

        info!(
            policy = self.scoring.name(),
            threshold,
            merged,
            total_merges = self.history.len(),
            remaining_edges = self.graph.num_active_edges(),
            "Merged regions"
        );
        merged
    }

    /// Lowest score still queued, if any edge remains.
    pub fn next_score(&mut self) -> Option<Score> {
        while let Some(candidate) = self.queue.peek() {
            if self.is_current(candidate) {
                return Some(candidate.score);
            }
            self.queue.pop();
        }
        None
    }

    /// Region that `node` currently belongs to.
    pub fn region_of(&self, node: NodeId) -> NodeId {
        let mut region = node;
        while let Some(parent) = self.merged_into[region] {
            region = parent;
        }
        region
    }

    /// Current region of every original node.
    pub fn labels(&self) -> NodeMap<NodeId> {
        NodeMap::from_fn(&self.graph, |node| self.region_of(node))
    }

    /// Merges performed so far.
    pub fn history(&self) -> &MergeHistory {
        &self.history
    }

    /// The graph in its current merged state.
    pub fn graph(&self) -> &RegionGraph {
        &self.graph
    }

    /// The scoring policy.
    pub fn scoring(&self) -> &P {
        &self.scoring
    }

    /// Release the graph, policy and history.
    pub fn into_parts(self) -> (RegionGraph, P, MergeHistory) {
        (self.graph, self.scoring, self.history)
    }

    fn is_current(&self, candidate: &MergeCandidate) -> bool {
        self.graph.is_active(candidate.edge)
            && self.generation[candidate.edge] == candidate.generation
    }

    fn enqueue(&mut self, edge: EdgeId) {
        let score = self.scoring.score(&self.graph, edge);
        trace!(%edge, score, "Scored edge");
        self.queue.push(MergeCandidate {
            edge,
            score,
            generation: self.generation[edge],
        });
    }

    fn retire(&mut self, edge: EdgeId) {
        self.graph.remove_edge(edge);
        self.generation[edge] += 1;
    }

    fn merge_edge(&mut self, edge: EdgeId, score: Score) {
        let RegionEdge { u: to, v: from } = self.graph.edge(edge);
        debug!(%edge, %from, %to, score, "Merging regions");

        self.retire(edge);
        self.scoring.notify_node_merge(from, to);
        self.merged_into[from] = Some(to);

        let moved: Vec<EdgeId> = self.graph.incident_edges(from).to_vec();
        for e in moved {
            let neighbor = self.graph.edge(e).other(from);
            match self.graph.find_edge(to, neighbor) {
                Some(existing) => {
                    debug!(from = %e, to = %existing, "Collapsing parallel edge");
                    self.scoring.notify_edge_merge(e, existing);
                    self.retire(e);
                }
                None => self.graph.move_edge(e, from, to),
            }
        }

        let touched: Vec<EdgeId> = self.graph.incident_edges(to).to_vec();
        for e in touched {
            self.generation[e] += 1;
            self.enqueue(e);
        }

        self.history.push(MergeRecord { edge, from, to, score });
    }
}

/// Result of a complete merge run.
#[derive(Debug)]
pub struct MergeOutcome {
    /// Merges in the order they were performed.
    pub history: MergeHistory,
    /// Region of every original node after the run.
    pub labels: NodeMap<NodeId>,
    /// The graph in its merged state.
    pub graph: RegionGraph,
}

/// Merge `graph` with `scoring` until the lowest score reaches `threshold`.
pub fn agglomerate<P: EdgeScoring>(graph: RegionGraph, scoring: P, threshold: Score) -> MergeOutcome {
    let mut merging = RegionMerging::new(graph, scoring);
    merging.merge_until(threshold);
    let labels = merging.labels();
    let (graph, _, history) = merging.into_parts();
    MergeOutcome { history, labels, graph }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{AffinityMap, SizeMap};
    use crate::scoring::{Const, MinAffinity, MinSize};

    fn e(i: usize) -> EdgeId {
        EdgeId::new(i)
    }

    fn n(i: usize) -> NodeId {
        NodeId::new(i)
    }

    #[test]
    fn test_candidate_ordering() {
        let low = MergeCandidate { edge: e(5), score: 0.1, generation: 0 };
        let high = MergeCandidate { edge: e(1), score: 0.9, generation: 0 };
        let tie = MergeCandidate { edge: e(2), score: 0.1, generation: 0 };

        // lower score is popped first
        assert!(low > high);
        // on ties the lower edge id is popped first
        assert!(tie > low);

        let mut heap: BinaryHeap<_> = [high, low, tie].into_iter().collect();
        assert_eq!(heap.pop().map(|c| c.edge), Some(e(2)));
        assert_eq!(heap.pop().map(|c| c.edge), Some(e(5)));
        assert_eq!(heap.pop().map(|c| c.edge), Some(e(1)));
    }

    #[test]
    fn test_merge_path_with_min_affinity() {
        // 0 -0.2- 1 -0.6- 2
        let graph = RegionGraph::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
        let mut affinities: AffinityMap = EdgeMap::from_vec(vec![0.2, 0.6]);
        let mut merging = RegionMerging::new(graph, MinAffinity::new(&mut affinities));

        assert_eq!(merging.merge_until(0.5), 1);
        assert_eq!(merging.region_of(n(1)), n(0));
        assert_eq!(merging.region_of(n(2)), n(2));
        // edge (1, 2) moved to (0, 2)
        assert_eq!(merging.graph().edge(e(1)), RegionEdge::new(n(0), n(2)));
        assert_eq!(merging.next_score(), Some(0.6));

        assert_eq!(merging.merge_until(1.0), 1);
        assert_eq!(merging.labels().values(), &[n(0), n(0), n(0)]);
        assert_eq!(merging.graph().num_active_edges(), 0);
        assert_eq!(merging.next_score(), None);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let graph = RegionGraph::from_edges(2, &[(0, 1)]).unwrap();
        let mut merging = RegionMerging::new(graph, Const::new(0.5));

        assert_eq!(merging.merge_until(0.5), 0);
        assert_eq!(merging.merge_until(0.51), 1);
    }

    #[test]
    fn test_parallel_edges_collapse() {
        // triangle: merging 1 into 0 leaves two edges to 2
        let graph = RegionGraph::from_edges(3, &[(0, 1), (0, 2), (1, 2)]).unwrap();
        let mut affinities: AffinityMap = EdgeMap::from_vec(vec![0.1, 0.8, 0.4]);
        {
            let mut merging = RegionMerging::new(graph, MinAffinity::new(&mut affinities));
            merging.merge_until(0.2);

            assert!(!merging.graph().is_active(e(2)));
            assert_eq!(merging.graph().num_active_edges(), 1);
            assert_eq!(merging.next_score(), Some(0.4));
        }

        assert_eq!(affinities[e(1)], 0.4);
    }

    #[test]
    fn test_size_scores_refresh_after_merge() {
        // 0 - 1 - 2 - 3, sizes make (0, 1) the smallest pair
        let graph = RegionGraph::from_edges(4, &[(0, 1), (1, 2), (2, 3)]).unwrap();
        let mut sizes: SizeMap = NodeMap::from_vec(vec![1, 2, 3, 4]);
        let mut merging = RegionMerging::new(graph, MinSize::new(&mut sizes));

        merging.merge_until(f32::INFINITY);

        let order: Vec<_> = merging.history().edges().collect();
        assert_eq!(order, vec![e(0), e(1), e(2)]);
        let scores: Vec<_> = merging.history().scores().collect();
        // min(1, 2), then min(1 + 2, 3), then min(6, 4)
        assert_eq!(scores, vec![1.0, 3.0, 4.0]);
    }

    #[test]
    fn test_fingerprint_depends_on_order() {
        let mut a = MergeHistory::new();
        let mut b = MergeHistory::new();
        let first = MergeRecord { edge: e(0), from: n(1), to: n(0), score: 0.1 };
        let second = MergeRecord { edge: e(1), from: n(2), to: n(0), score: 0.2 };
        a.push(first);
        a.push(second);
        b.push(second);
        b.push(first);

        assert_ne!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
        assert_eq!(a.fingerprint().unwrap(), a.clone().fingerprint().unwrap());
    }
}
