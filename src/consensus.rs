//! # Consensus Features
//!
//! A [`ConsensusMap`] is the output of feature grouping: each
//! [`ConsensusFeature`] links corresponding features from different feature
//! maps, and each column of the map stands for one input file.
//!
//! [`ConsensusMap::rows`] flattens the map into [`ConsensusRow`]s, the
//! tabular view used for blank scoring and export: one intensity cell per
//! column (`None` where the file has no corresponding feature) and the ids of
//! the contributing per-file features.

use serde::{Deserialize, Serialize};

/// Description of one input file (one column of the consensus map)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnHeader {
    /// Raw file name of the input map
    pub filename: String,

    /// Number of features in the input map
    pub size: usize,
}

/// Reference to one per-file feature inside a consensus feature
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureHandle {
    /// Column (input map index) the feature came from
    pub map_index: usize,

    /// Id of the original feature
    pub feature_id: u64,

    /// Retention time of the original feature
    pub rt: f64,

    /// m/z of the original feature
    pub mz: f64,

    /// Intensity of the original feature
    pub intensity: f64,

    /// Charge of the original feature
    pub charge: i32,
}

/// A group of corresponding features across input maps
#[derive(Debug, Clone, PartialEq)]
pub struct ConsensusFeature {
    /// Unique consensus id
    pub id: u64,

    /// Consensus retention time
    pub rt: f64,

    /// Consensus m/z
    pub mz: f64,

    /// Consensus intensity
    pub intensity: f64,

    /// Consensus charge, 0 when unknown
    pub charge: i32,

    /// Grouping quality in [0, 1]
    pub quality: f64,

    /// Member features, at most one per column, ordered by column
    pub handles: Vec<FeatureHandle>,
}

/// Result of grouping feature maps
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsensusMap {
    /// One header per input map, in input order
    pub column_headers: Vec<ColumnHeader>,

    /// Consensus features
    pub features: Vec<ConsensusFeature>,
}

/// Flat per-row view of a consensus feature
#[derive(Debug, Clone, PartialEq)]
pub struct ConsensusRow {
    /// Consensus id
    pub id: u64,

    /// Consensus m/z
    pub mz: f64,

    /// Consensus retention time
    pub rt: f64,

    /// Consensus charge
    pub charge: i32,

    /// Grouping quality
    pub quality: f64,

    /// Intensity per column, `None` when the file has no member feature
    pub intensities: Vec<Option<f64>>,

    /// Ids of the contributing per-file features
    pub feature_ids: Vec<u64>,
}

impl ConsensusMap {
    /// Number of consensus features
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True when there are no consensus features
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Column file names, in column order
    pub fn column_names(&self) -> Vec<&str> {
        self.column_headers
            .iter()
            .map(|h| h.filename.as_str())
            .collect()
    }

    /// Flatten into one row per consensus feature
    pub fn rows(&self) -> Vec<ConsensusRow> {
        let n_columns = self.column_headers.len();

        self.features
            .iter()
            .map(|cf| {
                let mut intensities = vec![None; n_columns];
                for handle in &cf.handles {
                    if let Some(cell) = intensities.get_mut(handle.map_index) {
                        *cell = Some(cell.unwrap_or(0.0) + handle.intensity);
                    }
                }

                ConsensusRow {
                    id: cf.id,
                    mz: cf.mz,
                    rt: cf.rt,
                    charge: cf.charge,
                    quality: cf.quality,
                    intensities,
                    feature_ids: cf.handles.iter().map(|h| h.feature_id).collect(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(map_index: usize, feature_id: u64, intensity: f64) -> FeatureHandle {
        FeatureHandle {
            map_index,
            feature_id,
            rt: 100.0,
            mz: 200.0,
            intensity,
            charge: 1,
        }
    }

    #[test]
    fn test_rows_mark_missing_columns() {
        let map = ConsensusMap {
            column_headers: vec![
                ColumnHeader { filename: "a.mzML".into(), size: 1 },
                ColumnHeader { filename: "b.mzML".into(), size: 0 },
                ColumnHeader { filename: "c.mzML".into(), size: 1 },
            ],
            features: vec![ConsensusFeature {
                id: 42,
                rt: 100.0,
                mz: 200.0,
                intensity: 150.0,
                charge: 1,
                quality: 0.5,
                handles: vec![handle(0, 1, 100.0), handle(2, 9, 200.0)],
            }],
        };

        let rows = map.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].intensities, vec![Some(100.0), None, Some(200.0)]);
        assert_eq!(rows[0].feature_ids, vec![1, 9]);
        assert_eq!(map.column_names(), vec!["a.mzML", "b.mzML", "c.mzML"]);
    }
}
