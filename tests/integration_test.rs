// Integration tests for scoutx
use scoutx_core::{Error, FeatureRow, FeatureTable, FeatureVector, IndexStrategy, PlayerSeason, Season};
use scoutx_similarity::{find_similar, find_similar_with, PositionGroup, SimilarityConfig, SimilarityEngine, TableRegistry};
use scoutx_storage::TableStore;
use std::path::PathBuf;
use std::sync::Arc;

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("data")
}

fn registry(strategy: IndexStrategy) -> TableRegistry {
    TableStore::new(data_dir()).load_registry(strategy).unwrap()
}

fn forwards() -> FeatureTable {
    registry(IndexStrategy::Linear)
        .get(PositionGroup::Forwards)
        .unwrap()
        .table()
        .clone()
}

fn labels(ids: &[PlayerSeason]) -> Vec<String> {
    ids.iter().map(|p| format!("{} {}", p.player, p.season)).collect()
}

#[test]
fn test_fixture_loads_both_groups() {
    let registry = registry(IndexStrategy::Auto);
    assert_eq!(registry.groups(), vec![PositionGroup::Forwards, PositionGroup::Midfielders]);
    assert_eq!(registry.get(PositionGroup::Forwards).unwrap().table().len(), 13);
    assert_eq!(registry.get(PositionGroup::Midfielders).unwrap().table().dim(), 4);
}

#[test]
fn test_lewandowski_reference_order() {
    let expected = vec![
        "Robert Lewandowski 1920",
        "Karim Benzema 1920",
        "Zlatan Ibrahimović 1617",
        "Luis Suárez 1718",
        "Cristiano Ronaldo 1819",
        "Luis Suárez 1819",
        "Duván Zapata 1819",
        "Cristiano Ronaldo 1718",
        "Gabriel Jesus 1920",
        "Oumar Niasse 1718",
    ];

    for strategy in [IndexStrategy::Linear, IndexStrategy::KdTree, IndexStrategy::Auto] {
        let engine = SimilarityEngine::new(
            Arc::new(registry(strategy)),
            SimilarityConfig::default().with_strategy(strategy),
        )
        .unwrap();
        let ids = engine
            .find_similar(PositionGroup::Forwards, "Robert Lewandowski", "1920", None)
            .unwrap();
        assert_eq!(labels(&ids), expected, "strategy {}", strategy);
    }

    let ids = find_similar(&forwards(), "Robert Lewandowski", "1920", 10).unwrap();
    assert_eq!(labels(&ids), expected);
}

#[test]
fn test_every_row_finds_itself_first() {
    let table = forwards();
    for row in table.iter() {
        let ids = find_similar(&table, &row.identity.player, row.identity.season.as_str(), 3).unwrap();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids[0], row.identity);
    }
}

#[test]
fn test_results_are_top_k() {
    let registry = registry(IndexStrategy::KdTree);
    let engine = SimilarityEngine::new(Arc::new(registry), SimilarityConfig::default()).unwrap();
    let table = engine.registry().get(PositionGroup::Forwards).unwrap().table().clone();

    let response = engine
        .similar(PositionGroup::Forwards, "Gabriel Jesus", "1920", Some(5))
        .unwrap();
    assert_eq!(response.result.len(), 5);
    assert!(response.result.windows(2).all(|w| w[0].distance <= w[1].distance));
    assert_eq!(response.result[0].distance, 0.0);

    let query = FeatureVector::from([2.3, 1.3, 3.0, 4.2]);
    let worst = response.result.last().unwrap().distance;
    for row in table.iter() {
        let returned = response
            .result
            .iter()
            .any(|r| r.player == row.identity.player && r.season == row.identity.season.as_str());
        if !returned {
            assert!(row.features.l2_distance(&query) >= worst);
        }
    }
}

#[test]
fn test_deterministic_and_idempotent() {
    let config = SimilarityConfig::default().with_k(6);
    let first = find_similar_with(&forwards(), "Harry Kane", "1718", &config).unwrap();
    for _ in 0..3 {
        // fresh load, fresh index
        let again = find_similar_with(&forwards(), "Harry Kane", "1718", &config).unwrap();
        assert_eq!(first, again);
    }
}

#[test]
fn test_k_boundaries() {
    let table = forwards();
    let all = find_similar(&table, "Jamie Vardy", "1516", table.len()).unwrap();
    assert_eq!(all.len(), table.len());
    assert_eq!(all[0].player, "Jamie Vardy");
    assert_eq!(all.last().unwrap().player, "Pierre-Emerick Aubameyang");

    assert!(matches!(
        find_similar(&table, "Jamie Vardy", "1516", table.len() + 1),
        Err(Error::InvalidK { k: 14, rows: 13 })
    ));
}

#[test]
fn test_identity_errors() {
    let table = forwards();
    assert!(matches!(
        find_similar(&table, "Robert Lewandowski", "1819", 3),
        Err(Error::NotFound { .. })
    ));
    // groups are never mixed
    assert!(matches!(
        find_similar(&table, "Kevin De Bruyne", "1920", 3),
        Err(Error::NotFound { .. })
    ));
}

#[test]
fn test_midfielders_are_separate() {
    let engine = SimilarityEngine::new(Arc::new(registry(IndexStrategy::Auto)), SimilarityConfig::default()).unwrap();
    let ids = engine
        .find_similar(PositionGroup::Midfielders, "Kevin De Bruyne", "1920", Some(3))
        .unwrap();
    assert_eq!(
        labels(&ids),
        vec!["Kevin De Bruyne 1920", "Bruno Fernandes 1920", "Kevin De Bruyne 1718"]
    );
}

#[test]
fn test_registry_built_in_memory() {
    let season = Season::parse("2021").unwrap();
    let rows = (0..100)
        .map(|i| {
            FeatureRow::new(
                PlayerSeason::new(format!("player {}", i), season.clone()),
                FeatureVector::from([(i % 10) as f32, (i / 10) as f32, 1.0, 2.0]),
            )
        })
        .collect();
    let mut registry = TableRegistry::new(IndexStrategy::Auto);
    registry.insert(PositionGroup::Forwards, FeatureTable::new(rows).unwrap());
    let engine = SimilarityEngine::new(Arc::new(registry), SimilarityConfig::default()).unwrap();

    let response = engine
        .similar(PositionGroup::Forwards, "player 55", "2021", Some(5))
        .unwrap();
    let players: Vec<&str> = response.result.iter().map(|r| r.player.as_str()).collect();
    assert_eq!(players, vec!["player 55", "player 45", "player 54", "player 56", "player 65"]);
}
