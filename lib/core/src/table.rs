//! Player-season feature tables
//!
//! A [`FeatureTable`] is the immutable, ordered set of rows a position group
//! is searched over. Row order is significant: neighbor indexes refer to rows
//! by position, so a table is validated once on construction and never
//! mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::{Error, FeatureVector, Result};

/// A season code made of two year digits pairs, e.g. `"1920"` for 2019/20
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Season(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid season code '{0}': expected four digits such as \"1920\"")]
pub struct InvalidSeason(pub String);

impl Season {
    pub fn parse(code: &str) -> std::result::Result<Self, InvalidSeason> {
        let bytes = code.as_bytes();
        if bytes.len() != 4 || !bytes.iter().all(u8::is_ascii_digit) {
            return Err(InvalidSeason(code.to_string()));
        }
        let start = (bytes[0] - b'0') * 10 + (bytes[1] - b'0');
        let end = (bytes[2] - b'0') * 10 + (bytes[3] - b'0');
        if (start + 1) % 100 != end {
            return Err(InvalidSeason(code.to_string()));
        }
        Ok(Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable form, `"1920"` becomes `"2019/20"`
    pub fn label(&self) -> String {
        format!("20{}/{}", &self.0[..2], &self.0[2..])
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Season {
    type Error = InvalidSeason;

    fn try_from(code: String) -> std::result::Result<Self, Self::Error> {
        Season::parse(&code)
    }
}

impl From<Season> for String {
    fn from(season: Season) -> Self {
        season.0
    }
}

/// Identity of a row: one player's data for one season
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerSeason {
    pub player: String,
    pub season: Season,
}

impl PlayerSeason {
    pub fn new(player: impl Into<String>, season: Season) -> Self {
        Self {
            player: player.into(),
            season,
        }
    }

    /// Exact, case-sensitive identity comparison against raw query strings
    #[inline]
    pub fn matches(&self, player: &str, season: &str) -> bool {
        self.player == player && self.season.as_str() == season
    }
}

impl std::fmt::Display for PlayerSeason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.player, self.season)
    }
}

/// A single row of a feature table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    #[serde(flatten)]
    pub identity: PlayerSeason,
    pub features: FeatureVector,
}

impl FeatureRow {
    #[inline]
    #[must_use]
    pub fn new(identity: PlayerSeason, features: FeatureVector) -> Self {
        Self { identity, features }
    }
}

/// Ordered, validated rows sharing one feature dimension
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    rows: Vec<FeatureRow>,
    dim: usize,
}

impl FeatureTable {
    /// Validate and wrap rows. Fails with `MalformedInput` on an empty table,
    /// a row whose dimension differs from the first row, or any missing,
    /// non-finite or negative feature value.
    pub fn new(rows: Vec<FeatureRow>) -> Result<Self> {
        let dim = match rows.first() {
            Some(row) => row.features.dim(),
            None => return Err(Error::malformed(0, "table has no rows")),
        };

        for (idx, row) in rows.iter().enumerate() {
            if row.features.dim() != dim {
                return Err(Error::malformed(
                    idx,
                    format!("expected {} features, got {}", dim, row.features.dim()),
                ));
            }
            row.features.validate(idx)?;
        }

        Ok(Self { rows, dim })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    #[inline]
    pub fn row(&self, idx: usize) -> Option<&FeatureRow> {
        self.rows.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureRow> {
        self.rows.iter()
    }

    pub fn into_rows(self) -> Vec<FeatureRow> {
        self.rows
    }
}

impl<'a> IntoIterator for &'a FeatureTable {
    type Item = &'a FeatureRow;
    type IntoIter = std::slice::Iter<'a, FeatureRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
