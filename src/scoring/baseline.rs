//! Baseline scoring for experiments and tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::graph::RegionGraph;
use crate::types::{NodeId, EdgeId, Score};
use super::EdgeScoring;

/// Scores every edge with a fresh uniform value in `[0, 1)`.
///
/// The generator is owned by the policy, so a run is reproducible from its
/// seed and never shares state with other runs.
#[derive(Debug, Clone)]
pub struct Random<R: Rng = StdRng> {
    rng: R,
}

impl Random<StdRng> {
    /// Create the policy with a generator seeded from `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    /// Create the policy with a generator seeded by the operating system.
    pub fn from_entropy() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }
}

impl<R: Rng> Random<R> {
    /// Create the policy around a caller-supplied generator.
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> EdgeScoring for Random<R> {
    fn name(&self) -> &'static str {
        "random"
    }

    #[inline]
    fn score(&mut self, _graph: &RegionGraph, _edge: EdgeId) -> Score {
        self.rng.random::<Score>()
    }

    fn notify_node_merge(&mut self, _from: NodeId, _to: NodeId) {}

    fn notify_edge_merge(&mut self, _from: EdgeId, _to: EdgeId) {}
}

/// Scores every edge with the same value.
///
/// With a constant score the merge order falls back to the merge loop's tie
/// break (lowest edge id first).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Const {
    value: Score,
}

impl Const {
    /// Create the policy with a fixed score.
    pub fn new(value: Score) -> Self {
        Self { value }
    }

    /// The fixed score.
    pub fn value(&self) -> Score {
        self.value
    }
}

impl EdgeScoring for Const {
    fn name(&self) -> &'static str {
        "constant"
    }

    #[inline]
    fn score(&mut self, _graph: &RegionGraph, _edge: EdgeId) -> Score {
        self.value
    }

    fn notify_node_merge(&mut self, _from: NodeId, _to: NodeId) {}

    fn notify_edge_merge(&mut self, _from: EdgeId, _to: EdgeId) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> RegionGraph {
        RegionGraph::from_edges(3, &[(0, 1), (1, 2)]).unwrap()
    }

    #[test]
    fn test_random_in_unit_interval() {
        let graph = graph();
        let mut scoring = Random::seeded(7);

        for _ in 0..1000 {
            let score = scoring.score(&graph, EdgeId::new(0));
            assert!((0.0..1.0).contains(&score));
        }
    }

    #[test]
    fn test_random_roughly_uniform() {
        let graph = graph();
        let mut scoring = Random::seeded(42);
        let mut buckets = [0usize; 10];
        let samples = 20_000;

        for _ in 0..samples {
            let score = scoring.score(&graph, EdgeId::new(1));
            buckets[(score * 10.0) as usize] += 1;
        }

        let expected = samples / 10;
        for count in buckets {
            assert!(count.abs_diff(expected) < expected / 5, "bucket count {count}");
        }
    }

    #[test]
    fn test_random_same_seed_same_sequence() {
        let graph = graph();
        let mut a = Random::seeded(3);
        let mut b = Random::seeded(3);

        let seq_a: Vec<_> = (0..16).map(|_| a.score(&graph, EdgeId::new(0))).collect();
        let seq_b: Vec<_> = (0..16).map(|_| b.score(&graph, EdgeId::new(0))).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn test_const_ignores_merges() {
        let graph = graph();
        let mut scoring = Const::new(0.25);

        assert_eq!(scoring.score(&graph, EdgeId::new(0)), 0.25);
        scoring.notify_node_merge(NodeId::new(0), NodeId::new(1));
        scoring.notify_edge_merge(EdgeId::new(0), EdgeId::new(1));
        assert_eq!(scoring.score(&graph, EdgeId::new(1)), 0.25);
        assert_eq!(scoring.value(), 0.25);
    }
}
