//! Exact Euclidean k-nearest-neighbor indexes over a [`FeatureTable`]
//!
//! Two strategies are available and always agree, including on ties:
//! results are ordered by `(distance, row)` so equal distances keep table
//! order.

use ordered_float::OrderedFloat;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BinaryHeap;
use std::str::FromStr;
use tracing::debug;

use crate::flat::LinearIndex;
use crate::kdtree::KdTreeIndex;
use crate::{Error, FeatureTable, FeatureVector, Result};

/// Below this many rows `Auto` uses a linear scan
pub const KD_TREE_MIN_ROWS: usize = 64;

/// A query hit: row position in the indexed table and its Euclidean distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    pub row: usize,
    pub distance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexStrategy {
    /// Exhaustive scan over every row
    Linear,
    /// k-d tree with bounded best-first descent
    KdTree,
    /// Choose by table size
    #[default]
    Auto,
}

impl IndexStrategy {
    fn resolve(self, rows: usize) -> IndexStrategy {
        match self {
            IndexStrategy::Auto if rows >= KD_TREE_MIN_ROWS => IndexStrategy::KdTree,
            IndexStrategy::Auto => IndexStrategy::Linear,
            other => other,
        }
    }
}

impl FromStr for IndexStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(IndexStrategy::Linear),
            "kdtree" | "kd-tree" => Ok(IndexStrategy::KdTree),
            "auto" => Ok(IndexStrategy::Auto),
            other => Err(Error::InvalidConfig(format!("unknown index strategy '{}'", other))),
        }
    }
}

impl std::fmt::Display for IndexStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            IndexStrategy::Linear => "linear",
            IndexStrategy::KdTree => "kdtree",
            IndexStrategy::Auto => "auto",
        };
        f.write_str(name)
    }
}

/// Common interface of the index implementations
pub trait NeighborSearch: Send + Sync {
    /// Number of indexed vectors
    fn len(&self) -> usize;

    /// Dimension of every indexed vector
    fn dim(&self) -> usize;

    /// The `k` nearest rows to `query`, ascending by distance
    fn query(&self, query: &FeatureVector, k: usize) -> Result<Vec<Neighbor>>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A built index; immutable once constructed
#[derive(Debug, Clone)]
pub enum NeighborIndex {
    Linear(LinearIndex),
    KdTree(KdTreeIndex),
}

impl NeighborIndex {
    /// Build an index over the table's vectors in table order
    pub fn build(table: &FeatureTable, strategy: IndexStrategy) -> Self {
        let resolved = strategy.resolve(table.len());
        debug!(
            rows = table.len(),
            dim = table.dim(),
            strategy = %resolved,
            "building neighbor index"
        );
        match resolved {
            IndexStrategy::KdTree => NeighborIndex::KdTree(KdTreeIndex::build(table)),
            _ => NeighborIndex::Linear(LinearIndex::build(table)),
        }
    }

    pub fn strategy(&self) -> IndexStrategy {
        match self {
            NeighborIndex::Linear(_) => IndexStrategy::Linear,
            NeighborIndex::KdTree(_) => IndexStrategy::KdTree,
        }
    }

    fn inner(&self) -> &dyn NeighborSearch {
        match self {
            NeighborIndex::Linear(index) => index,
            NeighborIndex::KdTree(index) => index,
        }
    }

    /// Answer several independent queries in parallel, preserving input order
    pub fn query_batch(&self, queries: &[FeatureVector], k: usize) -> Result<Vec<Vec<Neighbor>>> {
        queries
            .par_iter()
            .map(|query| self.query(query, k))
            .collect()
    }
}

impl NeighborSearch for NeighborIndex {
    fn len(&self) -> usize {
        self.inner().len()
    }

    fn dim(&self) -> usize {
        self.inner().dim()
    }

    fn query(&self, query: &FeatureVector, k: usize) -> Result<Vec<Neighbor>> {
        self.inner().query(query, k)
    }
}

/// Shared argument validation for every index implementation
pub(crate) fn check_query(dim: usize, rows: usize, query: &FeatureVector, k: usize) -> Result<()> {
    if k == 0 || k > rows {
        return Err(Error::InvalidK { k, rows });
    }
    if query.dim() != dim {
        return Err(Error::DimensionMismatch {
            expected: dim,
            actual: query.dim(),
        });
    }
    Ok(())
}

/// Bounded max-heap keeping the `k` smallest `(squared distance, row)` pairs
pub(crate) struct TopK {
    k: usize,
    heap: BinaryHeap<(OrderedFloat<f32>, usize)>,
}

impl TopK {
    pub(crate) fn new(k: usize) -> Self {
        Self {
            k,
            heap: BinaryHeap::with_capacity(k + 1),
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, squared: f32, row: usize) {
        let candidate = (OrderedFloat(squared), row);
        if self.heap.len() < self.k {
            self.heap.push(candidate);
        } else if let Some(worst) = self.heap.peek() {
            if candidate < *worst {
                self.heap.pop();
                self.heap.push(candidate);
            }
        }
    }

    /// Squared distance of the current k-th best, once the heap is full
    #[inline]
    pub(crate) fn bound(&self) -> Option<f32> {
        if self.heap.len() < self.k {
            None
        } else {
            self.heap.peek().map(|(dist, _)| dist.0)
        }
    }

    pub(crate) fn into_neighbors(self) -> Vec<Neighbor> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|(squared, row)| Neighbor {
                row,
                distance: squared.0.sqrt(),
            })
            .collect()
    }
}
