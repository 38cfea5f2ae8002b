//! Similarity queries
//!
//! [`find_similar`] is the one-shot form: it builds a fresh index over the
//! table for each call. [`SimilarityEngine`] answers queries against a
//! [`TableRegistry`] whose indexes were built once at registration.

use crate::config::SimilarityConfig;
use crate::explain::SimilarResponse;
use crate::group::{PositionGroup, TableRegistry};
use crate::lookup::{locate, project};
use scoutx_core::{FeatureTable, Neighbor, NeighborIndex, NeighborSearch, PlayerSeason, Result};
use std::sync::Arc;
use tracing::debug;

/// The `k` player-seasons closest to `(player, season)`, the target included,
/// nearest first.
pub fn find_similar(
    table: &FeatureTable,
    player: &str,
    season: &str,
    k: usize,
) -> Result<Vec<PlayerSeason>> {
    let config = SimilarityConfig::default().with_k(k);
    find_similar_with(table, player, season, &config)
}

/// [`find_similar`] with explicit configuration
pub fn find_similar_with(
    table: &FeatureTable,
    player: &str,
    season: &str,
    config: &SimilarityConfig,
) -> Result<Vec<PlayerSeason>> {
    let index = NeighborIndex::build(table, config.strategy);
    let (_, neighbors) = query_index(table, &index, player, season, config)?;
    project(table, &neighbors)
}

fn query_index(
    table: &FeatureTable,
    index: &NeighborIndex,
    player: &str,
    season: &str,
    config: &SimilarityConfig,
) -> Result<(usize, Vec<Neighbor>)> {
    config.validate()?;
    let (row, features) = locate(table, player, season, config.duplicates)?;
    debug!(player, season, row, k = config.k, "querying neighbors");
    Ok((row, index.query(features, config.k)?))
}

/// Query front end over a shared registry
#[derive(Debug, Clone)]
pub struct SimilarityEngine {
    registry: Arc<TableRegistry>,
    config: SimilarityConfig,
}

impl SimilarityEngine {
    pub fn new(registry: Arc<TableRegistry>, config: SimilarityConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { registry, config })
    }

    pub fn registry(&self) -> &TableRegistry {
        &self.registry
    }

    pub fn config(&self) -> &SimilarityConfig {
        &self.config
    }

    fn config_for(&self, k: Option<usize>) -> SimilarityConfig {
        match k {
            Some(k) => self.config.clone().with_k(k),
            None => self.config.clone(),
        }
    }

    /// Full response with ranks and distances. `k` overrides the configured
    /// neighbor count when given.
    pub fn similar(
        &self,
        group: PositionGroup,
        player: &str,
        season: &str,
        k: Option<usize>,
    ) -> Result<SimilarResponse> {
        let entry = self.registry.get(group)?;
        let config = self.config_for(k);
        let (row, neighbors) = query_index(entry.table(), entry.index(), player, season, &config)?;
        // `row` comes from locate over this same table
        let query = entry.table().rows()[row].identity.clone();

        SimilarResponse::new(group, query, entry.table(), &neighbors)
    }

    /// Ranked identities only
    pub fn find_similar(
        &self,
        group: PositionGroup,
        player: &str,
        season: &str,
        k: Option<usize>,
    ) -> Result<Vec<PlayerSeason>> {
        let entry = self.registry.get(group)?;
        let config = self.config_for(k);
        let (_, neighbors) = query_index(entry.table(), entry.index(), player, season, &config)?;
        project(entry.table(), &neighbors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DuplicatePolicy;
    use scoutx_core::{Error, FeatureRow, FeatureVector, IndexStrategy, Season};

    fn row(player: &str, season: &str, features: [f32; 4]) -> FeatureRow {
        FeatureRow::new(
            PlayerSeason::new(player, Season::parse(season).unwrap()),
            FeatureVector::from(features),
        )
    }

    fn midfielders() -> FeatureTable {
        FeatureTable::new(vec![
            row("Luka Modrić", "1718", [1.0, 2.0, 2.0, 3.0]),
            row("Toni Kroos", "1718", [1.1, 2.0, 2.0, 3.0]),
            row("N'Golo Kanté", "1718", [3.0, 1.0, 0.5, 2.0]),
            row("Luka Modrić", "1819", [1.0, 2.2, 2.0, 3.0]),
            row("Toni Kroos", "1819", [1.0, 2.0, 2.0, 3.0]),
            row("Paul Pogba", "1819", [2.0, 2.5, 1.0, 2.5]),
        ])
        .unwrap()
    }

    fn names(ids: &[PlayerSeason]) -> Vec<String> {
        ids.iter().map(|p| format!("{} {}", p.player, p.season)).collect()
    }

    #[test]
    fn test_find_similar_self_first() {
        let table = midfielders();
        let ids = find_similar(&table, "Luka Modrić", "1718", 3).unwrap();
        // Kroos 1819 has an identical vector, so it ties at zero behind the target
        assert_eq!(
            names(&ids),
            vec!["Luka Modrić 1718", "Toni Kroos 1819", "Toni Kroos 1718"]
        );
    }

    #[test]
    fn test_tie_at_zero_keeps_table_order() {
        let table = midfielders();
        let ids = find_similar(&table, "Toni Kroos", "1819", 2).unwrap();
        assert_eq!(names(&ids), vec!["Luka Modrić 1718", "Toni Kroos 1819"]);
    }

    #[test]
    fn test_k_equals_n() {
        let table = midfielders();
        let ids = find_similar(&table, "Paul Pogba", "1819", table.len()).unwrap();
        assert_eq!(ids.len(), table.len());
        assert_eq!(ids[0].player, "Paul Pogba");
    }

    #[test]
    fn test_errors() {
        let table = midfielders();
        assert!(matches!(
            find_similar(&table, "Paul Pogba", "1819", 7),
            Err(Error::InvalidK { k: 7, rows: 6 })
        ));
        assert!(matches!(
            find_similar(&table, "Paul Pogba", "1819", 0),
            Err(Error::InvalidK { k: 0, rows: 6 })
        ));
        assert!(matches!(
            find_similar(&table, "Paul Pogba", "1718", 3),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn test_repeated_queries_are_identical() {
        let table = midfielders();
        let first = find_similar(&table, "N'Golo Kanté", "1718", 4).unwrap();
        for strategy in [IndexStrategy::Linear, IndexStrategy::KdTree] {
            let config = SimilarityConfig::default().with_k(4).with_strategy(strategy);
            let again = find_similar_with(&table, "N'Golo Kanté", "1718", &config).unwrap();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn test_engine_over_registry() {
        let mut registry = TableRegistry::new(IndexStrategy::Auto);
        registry.insert(PositionGroup::Midfielders, midfielders());
        let engine = SimilarityEngine::new(Arc::new(registry), SimilarityConfig::default()).unwrap();

        let response = engine
            .similar(PositionGroup::Midfielders, "Paul Pogba", "1819", Some(2))
            .unwrap();
        assert_eq!(response.result.len(), 2);
        assert_eq!(response.result[0].player, "Paul Pogba");
        assert_eq!(response.result[0].distance, 0.0);

        // default k of 10 exceeds the six midfielders
        assert!(matches!(
            engine.find_similar(PositionGroup::Midfielders, "Paul Pogba", "1819", None),
            Err(Error::InvalidK { k: 10, rows: 6 })
        ));
        assert!(matches!(
            engine.find_similar(PositionGroup::Forwards, "Paul Pogba", "1819", Some(1)),
            Err(Error::UnknownGroup(_))
        ));
    }

    #[test]
    fn test_zero_radius_does_not_limit_results() {
        let config = SimilarityConfig {
            radius: 0.0,
            ..SimilarityConfig::default()
        };
        let mut registry = TableRegistry::new(IndexStrategy::Auto);
        registry.insert(PositionGroup::Midfielders, midfielders());
        let engine = SimilarityEngine::new(Arc::new(registry), config.clone()).unwrap();

        let response = engine
            .similar(PositionGroup::Midfielders, "N'Golo Kanté", "1718", Some(4))
            .unwrap();
        assert_eq!(response.result.len(), 4);
        assert_eq!(response.result[0].distance, 0.0);
        assert!(response.result[1..].iter().all(|r| r.distance > 0.0));

        let table = midfielders();
        let narrow = find_similar_with(&table, "N'Golo Kanté", "1718", &config.with_k(4)).unwrap();
        let default = find_similar(&table, "N'Golo Kanté", "1718", 4).unwrap();
        assert_eq!(narrow, default);
    }

    #[test]
    fn test_engine_first_match_policy() {
        let mut rows = midfielders().into_rows();
        rows.push(row("Paul Pogba", "1819", [0.0, 0.0, 0.0, 0.0]));
        let mut registry = TableRegistry::new(IndexStrategy::Linear);
        registry.insert(PositionGroup::Midfielders, FeatureTable::new(rows).unwrap());
        let registry = Arc::new(registry);

        let strict = SimilarityEngine::new(registry.clone(), SimilarityConfig::default()).unwrap();
        assert!(matches!(
            strict.find_similar(PositionGroup::Midfielders, "Paul Pogba", "1819", Some(1)),
            Err(Error::AmbiguousMatch { count: 2, .. })
        ));

        let lenient = SimilarityEngine::new(
            registry,
            SimilarityConfig::default().with_duplicates(DuplicatePolicy::FirstMatch),
        )
        .unwrap();
        let response = lenient
            .similar(PositionGroup::Midfielders, "Paul Pogba", "1819", Some(1))
            .unwrap();
        assert_eq!(response.result[0].distance, 0.0);
    }
}
