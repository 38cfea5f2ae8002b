//! Identity lookup and result projection

use crate::config::DuplicatePolicy;
use scoutx_core::{Error, FeatureTable, FeatureVector, Neighbor, PlayerSeason, Result};

/// Resolve `(player, season)` to its row position and feature vector.
///
/// Matching is exact and case-sensitive on both fields.
pub fn locate<'a>(
    table: &'a FeatureTable,
    player: &str,
    season: &str,
    policy: DuplicatePolicy,
) -> Result<(usize, &'a FeatureVector)> {
    let mut matches = table
        .iter()
        .enumerate()
        .filter(|(_, row)| row.identity.matches(player, season));

    let (idx, row) = matches.next().ok_or_else(|| Error::NotFound {
        player: player.to_string(),
        season: season.to_string(),
    })?;

    if policy == DuplicatePolicy::Reject {
        let extra = matches.count();
        if extra > 0 {
            return Err(Error::AmbiguousMatch {
                player: player.to_string(),
                season: season.to_string(),
                count: extra + 1,
            });
        }
    }

    Ok((idx, &row.features))
}

/// Map neighbor rows back to identities, keeping distance order
pub fn project(table: &FeatureTable, neighbors: &[Neighbor]) -> Result<Vec<PlayerSeason>> {
    neighbors
        .iter()
        .map(|n| {
            table
                .row(n.row)
                .map(|row| row.identity.clone())
                .ok_or_else(|| {
                    Error::InvalidConfig(format!(
                        "index returned row {} but the table has {} rows; index was built over a different table",
                        n.row,
                        table.len()
                    ))
                })
        })
        .collect()
}
