//! Dense id-indexed property maps.

use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use crate::types::{NodeId, EdgeId};
use super::RegionGraph;

/// An identifier that indexes a dense map over a [`RegionGraph`].
pub trait GraphId: Copy {
    /// Dense index of the id.
    fn index(self) -> usize;

    /// Build the id for a dense index.
    fn from_index(index: usize) -> Self;

    /// Number of ids of this kind allocated in `graph`.
    fn count(graph: &RegionGraph) -> usize;
}

impl GraphId for NodeId {
    fn index(self) -> usize {
        NodeId::index(self)
    }

    fn from_index(index: usize) -> Self {
        NodeId::new(index)
    }

    fn count(graph: &RegionGraph) -> usize {
        graph.num_nodes()
    }
}

impl GraphId for EdgeId {
    fn index(self) -> usize {
        EdgeId::index(self)
    }

    fn from_index(index: usize) -> Self {
        EdgeId::new(index)
    }

    fn count(graph: &RegionGraph) -> usize {
        graph.num_edges()
    }
}

/// A value per graph id, sized once at construction.
///
/// Lookups are unchecked beyond the slice bounds check: passing an id from a
/// different graph is a caller error.
#[derive(Debug, Clone, PartialEq)]
pub struct IdMap<I, T> {
    values: Vec<T>,
    _id: PhantomData<I>,
}

/// Value per region.
pub type NodeMap<T> = IdMap<NodeId, T>;

/// Value per adjacency edge.
pub type EdgeMap<T> = IdMap<EdgeId, T>;

/// Affinity in `[0, 1]` per edge.
pub type AffinityMap = EdgeMap<f32>;

/// Accumulated region size per node.
pub type SizeMap = NodeMap<u64>;

impl<I: GraphId, T: Clone> IdMap<I, T> {
    /// Create a map covering every id of `graph`, filled with `value`.
    pub fn new(graph: &RegionGraph, value: T) -> Self {
        Self::from_vec(vec![value; I::count(graph)])
    }
}

impl<I: GraphId, T: Default> IdMap<I, T> {
    /// Create a map covering every id of `graph`, filled with `T::default()`.
    pub fn with_default(graph: &RegionGraph) -> Self {
        Self::from_fn(graph, |_| T::default())
    }
}

impl<I: GraphId, T> IdMap<I, T> {
    /// Wrap values indexed by dense id.
    pub fn from_vec(values: Vec<T>) -> Self {
        Self {
            values,
            _id: PhantomData,
        }
    }

    /// Create a map covering every id of `graph`, computing each value.
    pub fn from_fn(graph: &RegionGraph, f: impl FnMut(I) -> T) -> Self {
        Self::from_vec((0..I::count(graph)).map(I::from_index).map(f).collect())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value for `id`, if in range.
    pub fn get(&self, id: I) -> Option<&T> {
        self.values.get(id.index())
    }

    /// `(id, value)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(index, value)| (I::from_index(index), value))
    }

    /// Values in id order.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Unwrap into the underlying values.
    pub fn into_vec(self) -> Vec<T> {
        self.values
    }
}

impl<I: GraphId, T> Index<I> for IdMap<I, T> {
    type Output = T;

    fn index(&self, id: I) -> &T {
        &self.values[id.index()]
    }
}

impl<I: GraphId, T> IndexMut<I> for IdMap<I, T> {
    fn index_mut(&mut self, id: I) -> &mut T {
        &mut self.values[id.index()]
    }
}
