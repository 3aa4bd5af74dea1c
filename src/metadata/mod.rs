//! # Metadata Module
//!
//! Provenance and experiment annotations that travel with feature maps:
//!
//! 1. **Source file**: the raw file a feature map was detected in. Its name is
//!    the identifier used to match maps against blank lists and to label
//!    consensus columns.
//!
//! 2. **Processing history**: an audit trail of the steps applied to a map,
//!    serialized into the Parquet footer.
//!
//! 3. **Sample sheet**: a tab-separated table assigning each raw file a sample
//!    type, used to derive the blank list for a run.

mod error;
mod map;
mod processing;
mod samples;
mod source;

#[cfg(test)]
mod tests;

pub use error::MetadataError;
pub use map::FeatureMapMetadata;
pub use processing::{ProcessingHistory, ProcessingStep};
pub use samples::{SampleEntry, SampleSheet, SampleType};
pub use source::SourceFileInfo;
