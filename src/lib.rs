//! # mzblank - Blank-Based Feature Filtering for LC-MS Metabolomics
//!
//! `mzblank` removes features caused by blank (solvent, extraction or system)
//! runs from untargeted LC-MS feature maps. Features detected in each raw file
//! are stored as one Apache Parquet file per run; the filter groups them
//! across runs, compares blank and sample intensities per group and rewrites
//! the sample files with only the features that stand clearly above the blank
//! background. Blank files are removed from the set afterwards.
//!
//! ## Key Features
//!
//! - **Feature Store**: one `<raw stem>.features.parquet` file per run with
//!   ZSTD compression, embedded provenance and processing history in the
//!   Parquet footer, and atomic in-place rewrites.
//!
//! - **Feature Linking**: tolerance-based nearest-neighbor grouping of
//!   features across runs behind the [`grouping::FeatureGrouper`] trait.
//!
//! - **Blank Filtering**: smoothed blank/sample ratio per consensus feature
//!   with a configurable cutoff and missing-value policy.
//!
//! - **Export**: feature matrix and sample metadata template as TSV.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mzblank::blank::{remove_blanks_in_dir, BlankFilterConfig, BlankSet};
//! use mzblank::grouping::NearestNeighborGrouper;
//!
//! let stats = remove_blanks_in_dir(
//!     "results/feature-maps",
//!     &BlankSet::new(["blank_01.mzML", "blank_02.mzML"]),
//!     NearestNeighborGrouper::default(),
//!     &BlankFilterConfig::default(),
//! )?;
//! println!("{}", stats);
//! # Ok::<(), mzblank::blank::BlankError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`schema`]: Arrow schema of feature files and footer metadata keys
//! - [`metadata`]: source file provenance, processing history, sample sheets
//! - [`feature`]: in-memory features and feature maps
//! - [`store`]: Parquet reader/writer and the feature map directory
//! - [`consensus`]: grouped features across maps
//! - [`grouping`]: feature linking algorithms
//! - [`blank`]: the blank filter
//! - [`export`]: TSV exports of consensus maps

#![warn(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod blank;
pub mod consensus;
pub mod export;
pub mod feature;
pub mod grouping;
pub mod metadata;
pub mod schema;
pub mod store;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::blank::{
        apply_plan, remove_blanks_in_dir, BlankError, BlankFilter, BlankFilterConfig,
        BlankRemovalPlan, BlankRemovalStats, BlankSet, MissingValues,
    };
    pub use crate::consensus::{ConsensusFeature, ConsensusMap, ConsensusRow};
    pub use crate::export::{write_feature_matrix, write_sample_template, ExportError};
    pub use crate::feature::{raw_file_stem, Feature, FeatureMap};
    pub use crate::grouping::{
        ChargeMerging, FeatureGrouper, GroupingConfig, GroupingError, MzUnit,
        NearestNeighborGrouper,
    };
    pub use crate::metadata::{
        FeatureMapMetadata, ProcessingHistory, ProcessingStep, SampleSheet, SampleType,
        SourceFileInfo,
    };
    pub use crate::schema::{create_feature_schema, MZBLANK_FORMAT_VERSION};
    pub use crate::store::{
        read_feature_map, FeatureMapWriter, FeatureMapWriterConfig, FeatureStore, StoreError,
        StoredMap,
    };
}
