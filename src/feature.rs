//! # Features and Feature Maps
//!
//! A [`Feature`] is one detected chromatographic peak. A [`FeatureMap`] holds
//! all features detected in one raw-data file together with the metadata that
//! identifies that file.

use std::collections::HashSet;

use crate::metadata::FeatureMapMetadata;

/// Raw and processed file extensions stripped when comparing file identifiers
const KNOWN_EXTENSIONS: &[&str] = &[
    crate::schema::FEATURE_MAP_EXTENSION,
    ".featureXML",
    ".mzML",
    ".mzXML",
    ".raw",
    ".d",
];

/// A detected chromatographic peak
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Unique feature identifier
    pub id: u64,

    /// Apex retention time in seconds
    pub rt: f64,

    /// Monoisotopic m/z
    pub mz: f64,

    /// Feature intensity (area or height, as reported by the feature finder)
    pub intensity: f64,

    /// Charge state, 0 when unknown
    pub charge: i32,

    /// Quality score reported by the feature finder
    pub quality: Option<f64>,

    /// Peak width at half maximum in seconds
    pub fwhm: Option<f64>,
}

impl Feature {
    /// Create a feature with unknown charge and no optional annotations
    pub fn new(id: u64, rt: f64, mz: f64, intensity: f64) -> Self {
        Self {
            id,
            rt,
            mz,
            intensity,
            charge: 0,
            quality: None,
            fwhm: None,
        }
    }

    /// Set the charge state
    pub fn with_charge(mut self, charge: i32) -> Self {
        self.charge = charge;
        self
    }
}

/// All features extracted from one raw-data file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureMap {
    /// Provenance and processing history
    pub metadata: FeatureMapMetadata,

    /// Features in file order
    pub features: Vec<Feature>,
}

impl FeatureMap {
    /// Create an empty map for the given raw file name
    pub fn new(source_file: &str) -> Self {
        Self {
            metadata: FeatureMapMetadata::new(source_file),
            features: Vec::new(),
        }
    }

    /// Create a map from a raw file name and its features
    pub fn with_features(source_file: &str, features: Vec<Feature>) -> Self {
        Self {
            metadata: FeatureMapMetadata::new(source_file),
            features,
        }
    }

    /// Raw file name identifying this map (e.g. `sample1.mzML`)
    pub fn source_file(&self) -> &str {
        &self.metadata.source_file.name
    }

    /// Raw file stem (e.g. `sample1`)
    pub fn stem(&self) -> &str {
        raw_file_stem(self.source_file())
    }

    /// Number of features
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True when the map holds no features
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Ids of all features in this map
    pub fn feature_ids(&self) -> HashSet<u64> {
        self.features.iter().map(|f| f.id).collect()
    }

    /// Copy of this map keeping metadata and only the features whose id is in `keep`
    pub fn retain_ids(&self, keep: &HashSet<u64>) -> FeatureMap {
        FeatureMap {
            metadata: self.metadata.clone(),
            features: self
                .features
                .iter()
                .filter(|f| keep.contains(&f.id))
                .cloned()
                .collect(),
        }
    }
}

/// Reduce a file identifier to its raw-file stem.
///
/// Directory components are dropped and one known raw or feature file
/// extension is stripped (case-insensitive), so `/data/blank1.mzML`,
/// `blank1.mzML`, `blank1.features.parquet` and `blank1` all yield `blank1`.
/// Unknown extensions are kept, so `run.v2` stays `run.v2`.
pub fn raw_file_stem(name: &str) -> &str {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

    for ext in KNOWN_EXTENSIONS {
        if base.len() > ext.len() {
            let split = base.len() - ext.len();
            if base.is_char_boundary(split) && base[split..].eq_ignore_ascii_case(ext) {
                return &base[..split];
            }
        }
    }

    base
}
