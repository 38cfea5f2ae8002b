use crate::snapshot::{read_document, write_document, TableDocument};
use scoutx_core::{Error, FeatureTable, IndexStrategy, Result};
use scoutx_similarity::{PositionGroup, TableRegistry};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Directory of feature table documents, one per position group
pub struct TableStore {
    data_dir: PathBuf,
}

impl TableStore {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn is_document(path: &Path) -> bool {
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => return false,
        };
        name.ends_with(".json") || name.ends_with(".json.gz")
    }

    /// Document paths in the data directory, sorted by file name
    pub fn documents(&self) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.data_dir)? {
            let path = entry?.path();
            if path.is_file() && Self::is_document(&path) {
                paths.push(path);
            } else {
                debug!("Skipping {:?}", path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// Load every document and build a registry with the given index strategy.
    /// Any invalid document fails the whole load.
    pub fn load_registry(&self, strategy: IndexStrategy) -> Result<TableRegistry> {
        let mut registry = TableRegistry::new(strategy);
        let mut sources: HashMap<PositionGroup, PathBuf> = HashMap::new();

        for path in self.documents()? {
            let doc = read_document(&path)?;
            let group = doc.group;
            if let Some(previous) = sources.get(&group) {
                return Err(Error::InvalidConfig(format!(
                    "group {} defined in both {:?} and {:?}",
                    group, previous, path
                )));
            }
            let table = doc.into_table()?;
            info!("Loaded {} rows for {} from {:?}", table.len(), group, path);
            registry.insert(group, table);
            sources.insert(group, path);
        }

        if registry.is_empty() {
            warn!("No feature tables found in {:?}", self.data_dir);
        }
        Ok(registry)
    }

    /// Write `<group>.json` into the data directory
    pub fn save(&self, group: PositionGroup, table: &FeatureTable) -> Result<PathBuf> {
        fs::create_dir_all(&self.data_dir)?;
        let path = self.data_dir.join(format!("{}.json", group));
        write_document(&path, &TableDocument::from_table(group, table))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoutx_core::{FeatureRow, FeatureVector, NeighborSearch, PlayerSeason, Season};

    fn table(n: usize) -> FeatureTable {
        let season = Season::parse("2223").unwrap();
        FeatureTable::new(
            (0..n)
                .map(|i| {
                    FeatureRow::new(
                        PlayerSeason::new(format!("p{}", i), season.clone()),
                        FeatureVector::from([i as f32, 1.0, 2.0, 3.0]),
                    )
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_save_and_load_registry() {
        let dir = tempfile::tempdir().unwrap();
        let store = TableStore::new(dir.path());
        store.save(PositionGroup::Forwards, &table(4)).unwrap();
        store.save(PositionGroup::Midfielders, &table(3)).unwrap();
        fs::write(dir.path().join("README.txt"), b"not a table").unwrap();

        assert_eq!(store.documents().unwrap().len(), 2);
        let registry = store.load_registry(IndexStrategy::Linear).unwrap();
        assert_eq!(registry.groups(), vec![PositionGroup::Forwards, PositionGroup::Midfielders]);
        assert_eq!(registry.get(PositionGroup::Forwards).unwrap().index().len(), 4);
        assert_eq!(
            registry.get(PositionGroup::Midfielders).unwrap().table(),
            &table(3)
        );
    }

    #[test]
    fn test_duplicate_group_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = TableStore::new(dir.path());
        store.save(PositionGroup::Forwards, &table(2)).unwrap();
        let doc = TableDocument::from_table(PositionGroup::Forwards, &table(2));
        write_document(dir.path().join("forwards-copy.json.gz"), &doc).unwrap();

        assert!(matches!(
            store.load_registry(IndexStrategy::Auto),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_empty_dir_gives_empty_registry() {
        let dir = tempfile::tempdir().unwrap();
        let registry = TableStore::new(dir.path()).load_registry(IndexStrategy::Auto).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_missing_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = TableStore::new(dir.path().join("absent"));
        assert!(matches!(store.load_registry(IndexStrategy::Auto), Err(Error::Io(_))));
    }
}
