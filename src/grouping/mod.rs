//! # Feature Grouping
//!
//! Links corresponding features across feature maps into a
//! [`ConsensusMap`](crate::consensus::ConsensusMap).
//!
//! Grouping is a service behind the [`FeatureGrouper`] trait so callers, in
//! particular the blank filter, can be exercised against any implementation.
//! [`NearestNeighborGrouper`] is the built-in one: it links features whose
//! retention time and m/z fall within configurable tolerances, preferring the
//! nearest candidate per map.
//!
//! ## Example
//!
//! ```
//! use mzblank::feature::{Feature, FeatureMap};
//! use mzblank::grouping::{FeatureGrouper, GroupingConfig, NearestNeighborGrouper};
//!
//! let maps = vec![
//!     FeatureMap::with_features("a.mzML", vec![Feature::new(1, 100.0, 300.1000, 1e5)]),
//!     FeatureMap::with_features("b.mzML", vec![Feature::new(2, 103.0, 300.1005, 2e5)]),
//! ];
//!
//! let grouper = NearestNeighborGrouper::new(GroupingConfig::default());
//! let consensus = grouper.group(&maps)?;
//! assert_eq!(consensus.len(), 1);
//! assert_eq!(consensus.features[0].handles.len(), 2);
//! # Ok::<(), mzblank::grouping::GroupingError>(())
//! ```

mod config;
mod error;
mod nearest;


pub use config::{ChargeMerging, GroupingConfig, MzUnit};
pub use error::GroupingError;
pub use nearest::NearestNeighborGrouper;

use crate::consensus::ConsensusMap;
use crate::feature::FeatureMap;

/// Groups corresponding features from several feature maps
pub trait FeatureGrouper {
    /// Group `maps` into consensus features; column `i` of the result is `maps[i]`
    fn group(&self, maps: &[FeatureMap]) -> Result<ConsensusMap, GroupingError>;

    /// Minimum number of input maps accepted by [`group`](Self::group)
    fn min_maps(&self) -> usize {
        2
    }
}

impl<G: FeatureGrouper + ?Sized> FeatureGrouper for &G {
    fn group(&self, maps: &[FeatureMap]) -> Result<ConsensusMap, GroupingError> {
        (**self).group(maps)
    }

    fn min_maps(&self) -> usize {
        (**self).min_maps()
    }
}
