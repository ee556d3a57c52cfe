//! Core types for region merging.

pub mod ids;
pub mod edge;
pub mod histogram;

pub use ids::{NodeId, EdgeId};
pub use edge::RegionEdge;
pub use histogram::{Histogram, DEFAULT_BINS};

/// Merge priority of an edge. Lower scores merge earlier.
pub type Score = f32;
