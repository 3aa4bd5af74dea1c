//! # Blank Removal
//!
//! Removes features that are explained by blank (solvent/background) runs.
//!
//! Features are first grouped across all input maps by a
//! [`FeatureGrouper`]. For every consensus row the mean intensity over blank
//! columns and over sample columns is computed and the smoothed ratio
//!
//! ```text
//! ratio = (avg_blank + 1) / (avg_sample + 1)
//! ```
//!
//! decides the row: it is real signal iff `ratio < cutoff`. Rows without a
//! ratio (missing coverage under [`MissingValues::Propagate`]) are never real.
//! The ids of all features in real rows form the keep-set. Blank files are
//! deleted and every sample file is rewritten with only its kept features.
//!
//! [`BlankFilter::plan`] is the pure part and never touches the file system;
//! [`apply_plan`] persists a plan into a [`FeatureStore`].
//!
//! ## Example
//!
//! ```
//! use mzblank::blank::{BlankFilter, BlankFilterConfig, BlankSet};
//! use mzblank::feature::{Feature, FeatureMap};
//! use mzblank::grouping::NearestNeighborGrouper;
//!
//! let maps = vec![
//!     FeatureMap::with_features("s1.mzML", vec![Feature::new(1, 60.0, 250.1, 100.0)]),
//!     FeatureMap::with_features("blank.mzML", vec![Feature::new(2, 61.0, 250.1, 5.0)]),
//! ];
//!
//! let filter = BlankFilter::new(NearestNeighborGrouper::default(), BlankFilterConfig::default());
//! let plan = filter.plan(&maps, &BlankSet::new(["blank"]))?;
//!
//! assert_eq!(plan.deletions, vec!["blank.mzML".to_string()]);
//! assert_eq!(plan.retained[0].len(), 1);
//! # Ok::<(), mzblank::blank::BlankError>(())
//! ```

mod config;
mod error;
mod plan;
mod score;
mod set;

#[cfg(test)]
mod tests;

pub use config::{BlankFilterConfig, MissingValues, DEFAULT_CUTOFF};
pub use error::BlankError;
pub use plan::{
    BlankFilter, BlankRemovalPlan, BlankRemovalStats, BLANK_REMOVAL_STEP, SYNTHETIC_MAP_NAME,
};
pub use score::{blank_ratio, partition_mean, score_rows, Partition, RowScore};
pub use set::BlankSet;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::info;

use crate::feature::raw_file_stem;
use crate::grouping::FeatureGrouper;
use crate::store::{FeatureStore, StoredMap};

/// Persist a plan: overwrite every retained map, then delete every blank.
///
/// Maps are located through `stored_maps` by raw-file stem. All rewrites
/// happen before any deletion.
pub fn apply_plan(
    store: &FeatureStore,
    stored_maps: &[StoredMap],
    plan: &BlankRemovalPlan,
) -> Result<BlankRemovalStats, BlankError> {
    let paths: HashMap<&str, &PathBuf> = stored_maps
        .iter()
        .map(|stored| (stored.map.stem(), &stored.path))
        .collect();
    let path_of = |source_file: &str| {
        paths
            .get(raw_file_stem(source_file))
            .copied()
            .ok_or_else(|| BlankError::UnknownMap(source_file.to_string()))
    };

    for map in &plan.retained {
        store.overwrite(path_of(map.source_file())?, map)?;
    }
    for source_file in &plan.deletions {
        store.delete(path_of(source_file)?)?;
    }

    Ok(plan.stats.clone())
}

/// Run blank removal over every feature map in `dir`.
///
/// All maps are loaded before anything is written; an unreadable file aborts
/// the pass with the directory untouched.
pub fn remove_blanks_in_dir<P, G>(
    dir: P,
    blanks: &BlankSet,
    grouper: G,
    config: &BlankFilterConfig,
) -> Result<BlankRemovalStats, BlankError>
where
    P: AsRef<Path>,
    G: FeatureGrouper,
{
    let store = FeatureStore::open(dir)?;
    let stored_maps = store.load_all()?;
    info!(
        "Loaded {} feature maps from {}",
        stored_maps.len(),
        store.dir().display()
    );

    let maps: Vec<_> = stored_maps.iter().map(|stored| stored.map.clone()).collect();
    let plan = BlankFilter::new(grouper, config.clone()).plan(&maps, blanks)?;
    apply_plan(&store, &stored_maps, &plan)
}
