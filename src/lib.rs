//! # region-merge-kernel
//!
//! Edge scoring for hierarchical agglomeration of region adjacency graphs.
//!
//! An affinity field is over-segmented (e.g. by watershed) into regions; the
//! regions and their boundaries form a region adjacency graph whose edges
//! carry affinities in `[0, 1]`. Agglomeration repeatedly merges the two
//! adjacent regions whose edge has the lowest score. This crate provides the
//! scoring policies that define that order and keep it correct as regions and
//! edges merge.
//!
//! ## Architecture
//!
//! ```text
//! RegionGraph + AffinityMap + SizeMap
//!        ↓
//! ScoringFunction (config) → EdgeScoring policy
//!        ↓
//! RegionMerging: lowest score → merge → notify policy → rescore
//!        ↓
//! MergeHistory + region labels
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Equal scores are merged in edge id order
//! - Exact policies (size, min/max, median) do not depend on collapse order
//! - The random policy owns a seeded generator; same seed → same
//!   [`MergeHistory::fingerprint`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod graph;
pub mod scoring;
pub mod merging;
pub mod canonical;

// Re-exports
pub use types::{NodeId, EdgeId, RegionEdge, Score, Histogram, DEFAULT_BINS};
pub use graph::{RegionGraph, GraphError, NodeMap, EdgeMap, AffinityMap, SizeMap};
pub use scoring::{
    EdgeScoring, ScoringError, ScoringFunction, ConfigError,
    MinSize, MaxSize, MinAffinity, MaxAffinity, MedianAffinity, QuantileAffinity,
    Random, Const,
};
pub use merging::{RegionMerging, MergeCandidate, MergeRecord, MergeHistory, MergeOutcome, agglomerate};
pub use canonical::{to_canonical_bytes, canonical_hash, canonical_hash_hex, CanonicalError};
