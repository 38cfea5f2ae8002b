// Feature table documents: plain JSON, optionally gzip-compressed
use atomicwrites::{AtomicFile, OverwriteBehavior};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use scoutx_core::{Error, FeatureRow, FeatureTable, FeatureVector, PlayerSeason, Result, Season};
use scoutx_similarity::PositionGroup;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// One position group's table as exchanged with the clustering stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDocument {
    pub group: PositionGroup,
    pub rows: Vec<RowDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowDocument {
    pub player: String,
    pub season: String,
    /// `null` marks a missing value
    pub features: Vec<Option<f32>>,
}

impl TableDocument {
    pub fn from_table(group: PositionGroup, table: &FeatureTable) -> Self {
        let rows = table
            .iter()
            .map(|row| RowDocument {
                player: row.identity.player.clone(),
                season: row.identity.season.to_string(),
                features: row.features.as_slice().iter().copied().map(Some).collect(),
            })
            .collect();
        Self { group, rows }
    }

    /// Validate into a table, keeping document row order
    pub fn into_table(self) -> Result<FeatureTable> {
        let rows = self
            .rows
            .into_iter()
            .enumerate()
            .map(|(idx, row)| {
                let season = Season::parse(&row.season)
                    .map_err(|e| Error::malformed(idx, e.to_string()))?;
                let features = row
                    .features
                    .iter()
                    .enumerate()
                    .map(|(axis, value)| {
                        value.ok_or_else(|| Error::malformed(idx, format!("feature {} is missing", axis)))
                    })
                    .collect::<Result<Vec<f32>>>()?;
                Ok(FeatureRow::new(
                    PlayerSeason::new(row.player, season),
                    FeatureVector::new(features),
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        FeatureTable::new(rows)
    }
}

fn is_gzip(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("gz")
}

/// Read a `.json` or `.json.gz` document
pub fn read_document<P: AsRef<Path>>(path: P) -> Result<TableDocument> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let reader: Box<dyn Read> = if is_gzip(path) {
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    serde_json::from_reader(reader).map_err(|e| {
        Error::Serialization(format!("{}: {}", path.display(), e))
    })
}

/// Write a document atomically; gzip-compressed when the path ends in `.gz`
pub fn write_document<P: AsRef<Path>>(path: P, doc: &TableDocument) -> Result<()> {
    let path = path.as_ref();
    let json_data = serde_json::to_vec_pretty(doc)?;
    let gzip = is_gzip(path);

    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|file| {
            if gzip {
                let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
                encoder.write_all(&json_data)?;
                encoder.finish()?.flush()
            } else {
                let mut writer = BufWriter::new(file);
                writer.write_all(&json_data)?;
                writer.flush()
            }
        })
        .map_err(|e| match e {
            atomicwrites::Error::Internal(e) | atomicwrites::Error::User(e) => Error::Io(e),
        })
}
