//! # scoutx
//!
//! Find the player-seasons most similar to a given one within its position
//! group, by Euclidean distance between cluster-distance feature profiles.
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! scoutx --data-dir ./data query --group forwards --player "Robert Lewandowski" --season 1920
//! scoutx --data-dir ./data serve --http-port 6333
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use scoutx::prelude::*;
//! use std::sync::Arc;
//!
//! let registry = TableStore::new("./data").load_registry(IndexStrategy::Auto).unwrap();
//! let engine = SimilarityEngine::new(Arc::new(registry), SimilarityConfig::default()).unwrap();
//!
//! for id in engine.find_similar(PositionGroup::Forwards, "Robert Lewandowski", "1920", None).unwrap() {
//!     println!("{} {}", id.player, id.season);
//! }
//! ```
//!
//! ## Crate Structure
//!
//! - `scoutx-core` - Feature tables, distance kernels, linear and k-d tree indexes
//! - `scoutx-similarity` - Identity lookup, queries, position-group registry
//! - `scoutx-storage` - Feature table documents (JSON, gzip)
//! - `scoutx-api` - REST API

// Re-export core types
pub use scoutx_core::{
    FeatureRow, FeatureTable, FeatureVector, PlayerSeason, Season,
    IndexStrategy, Neighbor, NeighborIndex, NeighborSearch,
    Error, Result,
};

// Re-export similarity
pub use scoutx_similarity::{
    find_similar, find_similar_with, DuplicatePolicy, PositionGroup, SimilarResponse,
    SimilarityConfig, SimilarityEngine, TableRegistry,
};

// Re-export storage
pub use scoutx_storage::TableStore;

// Re-export API
pub use scoutx_api::{AppState, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        FeatureRow, FeatureTable, FeatureVector, PlayerSeason, Season,
        IndexStrategy, Neighbor, NeighborIndex, NeighborSearch,
        Error, Result,
        find_similar, DuplicatePolicy, PositionGroup, SimilarResponse,
        SimilarityConfig, SimilarityEngine, TableRegistry,
        TableStore,
    };
}
