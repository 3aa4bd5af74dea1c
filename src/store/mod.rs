//! # Feature Store
//!
//! A feature store is a directory holding one Parquet file per raw-data file,
//! named after the raw file's stem:
//!
//! ```text
//! features/
//! ├── blank_01.features.parquet
//! ├── control_01.features.parquet
//! └── treated_01.features.parquet
//! ```
//!
//! Each file holds one row per feature (see [`crate::schema`]) and carries the
//! source file and processing history in its footer.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mzblank::feature::{Feature, FeatureMap};
//! use mzblank::store::FeatureStore;
//!
//! let store = FeatureStore::create("features")?;
//! let map = FeatureMap::with_features(
//!     "control_01.mzML",
//!     vec![Feature::new(1, 312.4, 301.1410, 2.5e6)],
//! );
//! store.save(&map)?;
//!
//! for stored in store.load_all()? {
//!     println!("{}: {} features", stored.map.source_file(), stored.map.len());
//! }
//! # Ok::<(), mzblank::store::StoreError>(())
//! ```

mod error;
mod reader;
mod utils;
mod writer;


pub use error::StoreError;
pub use reader::read_feature_map;
pub use writer::{
    write_feature_map, FeatureMapWriter, FeatureMapWriterConfig, FeatureMapWriterStats,
};

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use tempfile::NamedTempFile;

use crate::feature::{raw_file_stem, FeatureMap};
use crate::schema::FEATURE_MAP_EXTENSION;

/// A feature map together with the file it was loaded from
#[derive(Debug, Clone)]
pub struct StoredMap {
    /// File backing this map
    pub path: PathBuf,
    /// Loaded map
    pub map: FeatureMap,
}

/// Directory of persisted feature maps
#[derive(Debug, Clone)]
pub struct FeatureStore {
    dir: PathBuf,
    writer_config: FeatureMapWriterConfig,
}

impl FeatureStore {
    /// Open an existing store directory
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(StoreError::NotADirectory(dir.display().to_string()));
        }
        Ok(Self {
            dir: dir.to_path_buf(),
            writer_config: FeatureMapWriterConfig::default(),
        })
    }

    /// Open a store directory, creating it if needed
    pub fn create<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        fs::create_dir_all(dir.as_ref())?;
        Self::open(dir)
    }

    /// Use a custom writer configuration for saves and overwrites
    pub fn with_writer_config(mut self, config: FeatureMapWriterConfig) -> Self {
        self.writer_config = config;
        self
    }

    /// Store directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a map for the given raw file is saved under
    pub fn path_for(&self, source_file: &str) -> PathBuf {
        self.dir
            .join(format!("{}{}", raw_file_stem(source_file), FEATURE_MAP_EXTENSION))
    }

    /// Feature map files in the store, sorted by file name
    pub fn entries(&self) -> Result<Vec<PathBuf>, StoreError> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_feature_file = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(FEATURE_MAP_EXTENSION));
            if is_feature_file && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// Load one feature map
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<FeatureMap, StoreError> {
        read_feature_map(path)
    }

    /// Load every feature map in the store; the first unreadable file aborts the load
    pub fn load_all(&self) -> Result<Vec<StoredMap>, StoreError> {
        self.entries()?
            .into_iter()
            .map(|path| {
                let map = read_feature_map(&path)?;
                Ok(StoredMap { path, map })
            })
            .collect()
    }

    /// Save a map under its canonical path, replacing any existing file
    pub fn save(&self, map: &FeatureMap) -> Result<PathBuf, StoreError> {
        let path = self.path_for(map.source_file());
        self.overwrite(&path, map)?;
        Ok(path)
    }

    /// Replace the file at `path` with `map`.
    ///
    /// The map is written to a temporary file in the store directory first and
    /// then renamed over the target, so readers never observe a partial file.
    pub fn overwrite<P: AsRef<Path>>(
        &self,
        path: P,
        map: &FeatureMap,
    ) -> Result<FeatureMapWriterStats, StoreError> {
        let path = path.as_ref();
        let mut temp_file = NamedTempFile::new_in(&self.dir)?;
        let stats = write_feature_map(temp_file.as_file_mut(), map, self.writer_config.clone())?;
        temp_file.persist(path).map_err(|e| e.error)?;

        debug!("{} to {}", stats, path.display());
        Ok(stats)
    }

    /// Delete a feature map file
    pub fn delete<P: AsRef<Path>>(&self, path: P) -> Result<(), StoreError> {
        let path = path.as_ref();
        fs::remove_file(path)?;
        debug!("Deleted {}", path.display());
        Ok(())
    }
}
