//! Position groups and the per-group table registry

use ahash::AHashMap;
use scoutx_core::{Error, FeatureTable, IndexStrategy, NeighborIndex, NeighborSearch, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

/// Coarse role partition; similarity is never computed across groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionGroup {
    Forwards,
    Midfielders,
}

impl PositionGroup {
    pub const ALL: [PositionGroup; 2] = [PositionGroup::Forwards, PositionGroup::Midfielders];

    pub fn as_str(&self) -> &'static str {
        match self {
            PositionGroup::Forwards => "forwards",
            PositionGroup::Midfielders => "midfielders",
        }
    }
}

impl FromStr for PositionGroup {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "forwards" | "forward" | "fw" => Ok(PositionGroup::Forwards),
            "midfielders" | "midfielder" | "mf" => Ok(PositionGroup::Midfielders),
            _ => Err(Error::UnknownGroup(s.to_string())),
        }
    }
}

impl std::fmt::Display for PositionGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A table together with the index built over it
#[derive(Debug, Clone)]
pub struct GroupTable {
    table: Arc<FeatureTable>,
    index: Arc<NeighborIndex>,
}

impl GroupTable {
    pub fn new(table: FeatureTable, strategy: IndexStrategy) -> Self {
        let index = NeighborIndex::build(&table, strategy);
        Self {
            table: Arc::new(table),
            index: Arc::new(index),
        }
    }

    pub fn table(&self) -> &FeatureTable {
        &self.table
    }

    pub fn index(&self) -> &NeighborIndex {
        &self.index
    }
}

/// Tables keyed by position group. Built once and read-only afterwards;
/// replacing data means building a new registry.
#[derive(Debug, Clone, Default)]
pub struct TableRegistry {
    groups: AHashMap<PositionGroup, GroupTable>,
    strategy: IndexStrategy,
}

impl TableRegistry {
    pub fn new(strategy: IndexStrategy) -> Self {
        Self {
            groups: AHashMap::new(),
            strategy,
        }
    }

    /// Register a group's table, building its index. Returns the table
    /// previously registered for that group, if any.
    pub fn insert(&mut self, group: PositionGroup, table: FeatureTable) -> Option<GroupTable> {
        let entry = GroupTable::new(table, self.strategy);
        info!(
            group = %group,
            rows = entry.table().len(),
            dim = entry.table().dim(),
            strategy = %entry.index().strategy(),
            "registered feature table"
        );
        self.groups.insert(group, entry)
    }

    pub fn get(&self, group: PositionGroup) -> Result<&GroupTable> {
        self.groups
            .get(&group)
            .ok_or_else(|| Error::UnknownGroup(group.to_string()))
    }

    pub fn contains(&self, group: PositionGroup) -> bool {
        self.groups.contains_key(&group)
    }

    /// Registered groups in a deterministic order
    pub fn groups(&self) -> Vec<PositionGroup> {
        let mut groups: Vec<_> = self.groups.keys().copied().collect();
        groups.sort();
        groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn strategy(&self) -> IndexStrategy {
        self.strategy
    }

    /// Total indexed rows across all groups
    pub fn total_rows(&self) -> usize {
        self.groups.values().map(|g| g.index().len()).sum()
    }
}
