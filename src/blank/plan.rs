use std::collections::{HashMap, HashSet};
use std::fmt;

use log::{debug, info, warn};
use serde::Serialize;

use crate::consensus::ConsensusMap;
use crate::feature::FeatureMap;
use crate::grouping::FeatureGrouper;

use super::{score_rows, BlankError, BlankFilterConfig, BlankSet, Partition, RowScore};

/// File name of the empty map substituted when too few inputs are given
pub const SYNTHETIC_MAP_NAME: &str = "second-feature-map.mzML";

/// Processing step type recorded on rewritten maps
pub const BLANK_REMOVAL_STEP: &str = "blank removal";

/// Counts describing one blank removal pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BlankRemovalStats {
    /// Consensus rows formed by grouping
    pub consensus_rows: usize,
    /// Rows scored as real signal
    pub real_rows: usize,
    /// Rows scored as blank background
    pub background_rows: usize,
    /// Rows without a ratio (missing blank or sample coverage)
    pub unscored_rows: usize,
    /// Features across sample maps before filtering
    pub features_before: usize,
    /// Features across sample maps after filtering
    pub features_after: usize,
    /// Blank files deleted
    pub files_deleted: usize,
    /// Sample files rewritten
    pub files_rewritten: usize,
}

impl fmt::Display for BlankRemovalStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} consensus rows ({} real, {} background, {} unscored); \
             {} -> {} features in {} files, {} blank files deleted",
            self.consensus_rows,
            self.real_rows,
            self.background_rows,
            self.unscored_rows,
            self.features_before,
            self.features_after,
            self.files_rewritten,
            self.files_deleted
        )
    }
}

/// Outcome of blank filtering, ready to be persisted
#[derive(Debug, Clone)]
pub struct BlankRemovalPlan {
    /// Consensus map the scores were computed on
    pub consensus: ConsensusMap,
    /// Per-row verdicts, in consensus order
    pub scores: Vec<RowScore>,
    /// Union of feature ids of all real rows
    pub keep_ids: HashSet<u64>,
    /// Filtered sample maps, in input order
    pub retained: Vec<FeatureMap>,
    /// Source file names of blank maps to delete, in input order
    pub deletions: Vec<String>,
    /// Summary counts
    pub stats: BlankRemovalStats,
}

/// Blank-based feature filter over an injected grouping algorithm
#[derive(Debug, Clone)]
pub struct BlankFilter<G> {
    grouper: G,
    config: BlankFilterConfig,
}

impl<G: FeatureGrouper> BlankFilter<G> {
    /// Create a filter
    pub fn new(grouper: G, config: BlankFilterConfig) -> Self {
        Self { grouper, config }
    }

    /// Filter configuration
    pub fn config(&self) -> &BlankFilterConfig {
        &self.config
    }

    /// Group, score and filter `maps` without touching the file system
    pub fn plan(&self, maps: &[FeatureMap], blanks: &BlankSet) -> Result<BlankRemovalPlan, BlankError> {
        self.config.validate()?;
        check_unique_sources(maps)?;

        let is_blank: Vec<bool> = maps.iter().map(|m| blanks.contains(m.source_file())).collect();
        if is_blank.iter().all(|&b| b) {
            return Err(BlankError::NoSampleFiles);
        }
        warn_unmatched_blanks(maps, blanks);

        let min_maps = self.grouper.min_maps();
        let padded: Vec<FeatureMap>;
        let inputs: &[FeatureMap] = if maps.len() < min_maps {
            debug!(
                "Padding {} input map(s) with empty {} for grouping",
                maps.len(),
                SYNTHETIC_MAP_NAME
            );
            let mut with_padding = maps.to_vec();
            with_padding.resize_with(min_maps, || FeatureMap::new(SYNTHETIC_MAP_NAME));
            padded = with_padding;
            &padded
        } else {
            maps
        };

        let consensus = self.grouper.group(inputs)?;
        let rows = consensus.rows();
        let partition = Partition::from_columns(&consensus.column_names(), maps.len(), blanks);
        let scores = score_rows(&rows, &partition, &self.config);

        let keep_ids: HashSet<u64> = rows
            .iter()
            .zip(&scores)
            .filter(|(_, score)| score.is_real)
            .flat_map(|(row, _)| row.feature_ids.iter().copied())
            .collect();

        let real_rows = scores.iter().filter(|s| s.is_real).count();
        let unscored_rows = scores.iter().filter(|s| s.ratio.is_none()).count();
        if unscored_rows > 0 {
            debug!("{} consensus rows lack blank or sample coverage", unscored_rows);
        }

        let parameters = self.step_parameters(blanks);
        let mut retained = Vec::new();
        let mut deletions = Vec::new();
        let mut features_before = 0;
        let mut features_after = 0;

        for (map, blank) in maps.iter().zip(is_blank) {
            if blank {
                deletions.push(map.source_file().to_string());
                continue;
            }
            let mut filtered = map.retain_ids(&keep_ids);
            filtered
                .metadata
                .processing_history
                .record(BLANK_REMOVAL_STEP, parameters.clone());
            debug!(
                "{}: keeping {} of {} features",
                map.source_file(),
                filtered.len(),
                map.len()
            );
            features_before += map.len();
            features_after += filtered.len();
            retained.push(filtered);
        }

        let stats = BlankRemovalStats {
            consensus_rows: scores.len(),
            real_rows,
            background_rows: scores.len() - real_rows - unscored_rows,
            unscored_rows,
            features_before,
            features_after,
            files_deleted: deletions.len(),
            files_rewritten: retained.len(),
        };
        info!("Blank removal: {}", stats);

        Ok(BlankRemovalPlan {
            consensus,
            scores,
            keep_ids,
            retained,
            deletions,
            stats,
        })
    }

    fn step_parameters(&self, blanks: &BlankSet) -> HashMap<String, String> {
        let mut parameters = HashMap::new();
        parameters.insert("cutoff".to_string(), self.config.cutoff.to_string());
        parameters.insert("blanks".to_string(), blanks.stems().join(","));
        parameters.insert(
            "missing_values".to_string(),
            format!("{:?}", self.config.missing_values).to_lowercase(),
        );
        parameters
    }
}

fn check_unique_sources(maps: &[FeatureMap]) -> Result<(), BlankError> {
    let mut seen = HashSet::new();
    for map in maps {
        if !seen.insert(map.stem()) {
            return Err(BlankError::DuplicateSource(map.source_file().to_string()));
        }
    }
    Ok(())
}

fn warn_unmatched_blanks(maps: &[FeatureMap], blanks: &BlankSet) {
    for blank in blanks.unmatched(maps) {
        warn!("Blank {} matches no input file, ignoring", blank);
    }
}
