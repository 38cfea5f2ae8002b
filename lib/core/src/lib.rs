//! # scoutx Core
//!
//! Core library for the scoutx player-season similarity search.
//!
//! This crate provides the fundamental data structures and algorithms:
//!
//! - [`FeatureVector`] - Cluster-distance profile with SIMD distance kernels
//! - [`FeatureTable`] - Validated, ordered rows of one position group
//! - [`NeighborIndex`] - Exact Euclidean k-NN index (linear scan or k-d tree)
//!
//! ## Example
//!
//! ```rust
//! use scoutx_core::{
//!     FeatureRow, FeatureTable, FeatureVector, IndexStrategy, NeighborIndex,
//!     NeighborSearch, PlayerSeason, Season,
//! };
//!
//! let season = Season::parse("1920").unwrap();
//! let table = FeatureTable::new(vec![
//!     FeatureRow::new(PlayerSeason::new("a", season.clone()), FeatureVector::from([0.0, 1.0, 2.0, 3.0])),
//!     FeatureRow::new(PlayerSeason::new("b", season), FeatureVector::from([0.5, 1.0, 2.0, 3.0])),
//! ]).unwrap();
//!
//! let index = NeighborIndex::build(&table, IndexStrategy::Auto);
//! let hits = index.query(&FeatureVector::from([0.0, 1.0, 2.0, 3.0]), 2).unwrap();
//! assert_eq!(hits[0].row, 0);
//! ```

pub mod error;
pub mod vector;
pub mod table;
pub mod index;
pub mod flat;
pub mod kdtree;

/// SIMD-optimized Euclidean distance
///
/// SSE on x86_64, scalar elsewhere
pub mod simd;

pub use error::{Error, Result};
pub use vector::FeatureVector;
pub use table::{FeatureRow, FeatureTable, InvalidSeason, PlayerSeason, Season};
pub use index::{IndexStrategy, Neighbor, NeighborIndex, NeighborSearch, KD_TREE_MIN_ROWS};
pub use flat::LinearIndex;
pub use kdtree::KdTreeIndex;
