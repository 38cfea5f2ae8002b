//! # scoutx Similarity
//!
//! Player-season similarity queries scoped to a position group.
//!
//! A query names a player and a season code. The matching row is located in
//! the group's feature table, its feature vector is used to query the
//! group's nearest-neighbor index, and the resulting rows are projected back
//! to `(player, season)` identities, nearest first. The target itself is part
//! of the result, normally in first place at distance zero.
//!
//! ## Example
//!
//! ```rust
//! use scoutx_core::{FeatureRow, FeatureTable, FeatureVector, PlayerSeason, Season};
//! use scoutx_similarity::find_similar;
//!
//! let s = Season::parse("1920").unwrap();
//! let table = FeatureTable::new(vec![
//!     FeatureRow::new(PlayerSeason::new("Jadon Sancho", s.clone()), FeatureVector::from([1.0, 2.0, 0.5, 3.0])),
//!     FeatureRow::new(PlayerSeason::new("Serge Gnabry", s.clone()), FeatureVector::from([1.2, 2.0, 0.6, 3.1])),
//!     FeatureRow::new(PlayerSeason::new("Erling Haaland", s), FeatureVector::from([3.0, 0.5, 2.5, 1.0])),
//! ]).unwrap();
//!
//! let similar = find_similar(&table, "Jadon Sancho", "1920", 2).unwrap();
//! assert_eq!(similar[0].player, "Jadon Sancho");
//! assert_eq!(similar[1].player, "Serge Gnabry");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Registry   │────>│   Lookup    │────>│  Neighbor   │
//! │ (group→tbl) │     │ (identity)  │     │   Index     │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                      ┌─────────────┐           │
//!                      │  Project    │<──────────┘
//!                      │ (rows→ids)  │
//!                      └─────────────┘
//! ```

pub mod config;
pub mod group;
pub mod lookup;
pub mod engine;
pub mod explain;

pub use config::{DuplicatePolicy, SimilarityConfig, DEFAULT_K};
pub use group::{GroupTable, PositionGroup, TableRegistry};
pub use lookup::{locate, project};
pub use engine::{find_similar, find_similar_with, SimilarityEngine};
pub use explain::{SimilarPlayer, SimilarResponse};
