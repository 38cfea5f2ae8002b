//! Serializable query results and their text rendering

use crate::group::PositionGroup;
use scoutx_core::{FeatureTable, Neighbor, PlayerSeason, Result};
use serde::Serialize;
use std::fmt::Write;

/// One neighbor of the query, ranked from 1
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarPlayer {
    pub rank: usize,
    pub player: String,
    pub season: String,
    pub distance: f32,
}

/// Response for a similarity query
#[derive(Debug, Clone, Serialize)]
pub struct SimilarResponse {
    pub group: PositionGroup,
    pub query: PlayerSeason,
    pub k: usize,
    pub result: Vec<SimilarPlayer>,
}

impl SimilarResponse {
    pub fn new(
        group: PositionGroup,
        query: PlayerSeason,
        table: &FeatureTable,
        neighbors: &[Neighbor],
    ) -> Result<Self> {
        let identities = crate::lookup::project(table, neighbors)?;
        let result = identities
            .into_iter()
            .zip(neighbors)
            .enumerate()
            .map(|(i, (identity, n))| SimilarPlayer {
                rank: i + 1,
                player: identity.player,
                season: identity.season.into(),
                distance: n.distance,
            })
            .collect();
        Ok(Self {
            group,
            query,
            k: neighbors.len(),
            result,
        })
    }

    /// The ranked identities without distances
    pub fn identities(&self) -> Vec<(String, String)> {
        self.result
            .iter()
            .map(|r| (r.player.clone(), r.season.clone()))
            .collect()
    }

    /// Plain listing of player and season, one per line, nearest first
    pub fn render_text(&self) -> String {
        let width = self
            .result
            .iter()
            .map(|r| r.player.chars().count())
            .max()
            .unwrap_or(0)
            .max("player".len());

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} most similar to {} ({}):",
            self.k, self.query.player, self.query.season
        );
        let _ = writeln!(out, "{:>3}  {:<width$}  season", "", "player", width = width);
        for r in &self.result {
            let _ = writeln!(out, "{:>3}  {:<width$}  {}", r.rank - 1, r.player, r.season, width = width);
        }
        out
    }
}
