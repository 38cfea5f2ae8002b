//! Query configuration

use scoutx_core::{Error, IndexStrategy, Result};
use serde::{Deserialize, Serialize};

/// Number of neighbors returned when the caller does not ask for a count
pub const DEFAULT_K: usize = 10;

/// What to do when more than one row carries the requested identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail with `AmbiguousMatch`
    #[default]
    Reject,
    /// Take the first matching row in table order
    FirstMatch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Neighbors per query, the target row included
    pub k: usize,
    /// Reserved. Accepted and validated but never limits results; the fixed
    /// `k` rule always applies.
    pub radius: f32,
    pub strategy: IndexStrategy,
    pub duplicates: DuplicatePolicy,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            radius: 1.0,
            strategy: IndexStrategy::Auto,
            duplicates: DuplicatePolicy::Reject,
        }
    }
}

impl SimilarityConfig {
    /// Check the radius. `k` is checked against the table at query time.
    pub fn validate(&self) -> Result<()> {
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "radius must be a non-negative number, got {}",
                self.radius
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: IndexStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }
}
