//! Histogram-approximated quantile affinity scoring.
//!
//! Each edge carries a histogram of the affinities of its original edges.
//! Collapsing edges adds histograms bucket-wise; scoring reads the requested
//! quantile off the histogram. The result is off by at most one bucket width,
//! `1 / (BINS - 1)`, and exact when `BINS` matches the discretization of the
//! affinities (256 for 8-bit affinity volumes).
//!
//! Affinities are expected in `[0, 1]`; values outside are clamped into the
//! first or last bucket.

use std::mem;

use tracing::info;

use crate::graph::{AffinityMap, EdgeMap, RegionGraph};
use crate::types::{NodeId, EdgeId, Score, Histogram, DEFAULT_BINS};
use super::{EdgeScoring, ScoringError};

/// Scores an edge with a quantile of its original affinities.
#[derive(Debug)]
pub struct QuantileAffinity<const BINS: usize = DEFAULT_BINS> {
    /// Target quantile in percent.
    quantile: u8,
    histograms: EdgeMap<Histogram<BINS>>,
}

impl<const BINS: usize> QuantileAffinity<BINS> {
    /// Build one single-count histogram per edge from its affinity.
    ///
    /// This is the expensive step (linear in the number of edges) and has to
    /// finish before the first score query.
    pub fn new(
        graph: &RegionGraph,
        affinities: &AffinityMap,
        quantile: u8,
    ) -> Result<Self, ScoringError> {
        if quantile > 100 {
            return Err(ScoringError::InvalidQuantile(quantile));
        }
        if affinities.len() != graph.num_edges() {
            return Err(ScoringError::MapSizeMismatch {
                map: "affinity",
                expected: graph.num_edges(),
                actual: affinities.len(),
            });
        }

        info!(edges = graph.num_edges(), bins = BINS, quantile, "Initializing affinity histograms");
        let histograms = EdgeMap::from_fn(graph, |edge| {
            let mut histogram = Histogram::new();
            histogram.insert(affinities[edge]);
            histogram
        });

        Ok(Self { quantile, histograms })
    }

    /// Target quantile in percent.
    pub fn quantile(&self) -> u8 {
        self.quantile
    }

    /// Histogram of original affinities represented by `edge`.
    pub fn histogram(&self, edge: EdgeId) -> &Histogram<BINS> {
        &self.histograms[edge]
    }
}

impl<const BINS: usize> EdgeScoring for QuantileAffinity<BINS> {
    fn name(&self) -> &'static str {
        "quantile_affinity"
    }

    fn score(&mut self, _graph: &RegionGraph, edge: EdgeId) -> Score {
        self.histograms[edge].quantile(self.quantile)
    }

    fn notify_node_merge(&mut self, _from: NodeId, _to: NodeId) {}

    fn notify_edge_merge(&mut self, from: EdgeId, to: EdgeId) {
        let absorbed = mem::take(&mut self.histograms[from]);
        self.histograms[to] += &absorbed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e(i: usize) -> EdgeId {
        EdgeId::new(i)
    }

    fn matching_graph(n: usize) -> RegionGraph {
        let edges: Vec<_> = (0..n).map(|i| (2 * i, 2 * i + 1)).collect();
        RegionGraph::from_edges(2 * n, &edges).unwrap()
    }

    #[test]
    fn test_rejects_invalid_quantile() {
        let graph = matching_graph(1);
        let affinities: AffinityMap = EdgeMap::from_vec(vec![0.5]);

        let result = QuantileAffinity::<256>::new(&graph, &affinities, 101);
        assert!(matches!(result, Err(ScoringError::InvalidQuantile(101))));
    }

    #[test]
    fn test_rejects_short_affinity_map() {
        let graph = matching_graph(2);
        let affinities: AffinityMap = EdgeMap::from_vec(vec![0.5]);

        let result = QuantileAffinity::<256>::new(&graph, &affinities, 50);
        assert!(matches!(
            result,
            Err(ScoringError::MapSizeMismatch { expected: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn test_original_edge_scores_its_bucket() {
        let graph = matching_graph(2);
        let affinities: AffinityMap = EdgeMap::from_vec(vec![0.0, 1.0]);
        let mut scoring = QuantileAffinity::<256>::new(&graph, &affinities, 50).unwrap();

        assert_eq!(scoring.score(&graph, e(0)), 0.0);
        assert_eq!(scoring.score(&graph, e(1)), 1.0);
        assert_eq!(scoring.histogram(e(1)).sum(), 1);
    }

    #[test]
    fn test_median_of_merged_edges() {
        // affinities on bucket centres of an 11-bucket histogram
        let graph = matching_graph(5);
        let affinities: AffinityMap = EdgeMap::from_vec(vec![0.9, 0.1, 0.5, 0.3, 0.7]);
        let mut scoring = QuantileAffinity::<11>::new(&graph, &affinities, 50).unwrap();

        for from in [0, 1, 3, 4] {
            scoring.notify_edge_merge(e(from), e(2));
        }

        let histogram = scoring.histogram(e(2));
        assert_eq!(histogram.sum(), 5);
        // pivot = 50 * 5 / 100 + 1 = 3 -> third smallest
        assert!((scoring.score(&graph, e(2)) - 0.5).abs() <= 1.0 / 10.0);
    }

    #[test]
    fn test_low_and_high_quantiles() {
        let graph = matching_graph(4);
        let affinities: AffinityMap = EdgeMap::from_vec(vec![0.0, 0.2, 0.6, 1.0]);
        let mut low = QuantileAffinity::<6>::new(&graph, &affinities, 0).unwrap();
        let mut high = QuantileAffinity::<6>::new(&graph, &affinities, 99).unwrap();

        for from in [0, 1, 2] {
            low.notify_edge_merge(e(from), e(3));
            high.notify_edge_merge(e(from), e(3));
        }

        assert_eq!(low.score(&graph, e(3)), 0.0);
        assert_eq!(high.score(&graph, e(3)), 1.0);
    }
}
