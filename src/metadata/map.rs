use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{MetadataError, ProcessingHistory, SourceFileInfo};

/// Metadata stored alongside a persisted feature map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureMapMetadata {
    /// Raw file the features were detected in
    pub source_file: SourceFileInfo,

    /// Processing steps applied to this map so far
    pub processing_history: ProcessingHistory,
}

impl FeatureMapMetadata {
    /// Create metadata for a map detected in the given raw file
    pub fn new(source_name: &str) -> Self {
        Self {
            source_file: SourceFileInfo::new(source_name),
            processing_history: ProcessingHistory::new(),
        }
    }

    /// Convert all metadata to a HashMap suitable for Parquet key_value_metadata
    pub fn to_parquet_metadata(&self) -> Result<HashMap<String, String>, MetadataError> {
        use crate::schema::*;

        let mut metadata = HashMap::new();

        metadata.insert(KEY_FORMAT_VERSION.to_string(), MZBLANK_FORMAT_VERSION.to_string());
        metadata.insert(KEY_CREATED.to_string(), chrono::Utc::now().to_rfc3339());
        metadata.insert(
            KEY_SOFTWARE.to_string(),
            format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        );
        metadata.insert(KEY_SOURCE_FILE.to_string(), self.source_file.to_json()?);
        metadata.insert(
            KEY_PROCESSING_HISTORY.to_string(),
            self.processing_history.to_json()?,
        );

        Ok(metadata)
    }

    /// Reconstruct metadata from Parquet key_value_metadata
    ///
    /// Absent keys leave the corresponding field at its default; callers decide
    /// how to name a map whose source file was never recorded.
    pub fn from_parquet_metadata(
        metadata: &HashMap<String, String>,
    ) -> Result<Self, MetadataError> {
        use crate::schema::*;

        let mut result = Self::default();

        if let Some(json) = metadata.get(KEY_SOURCE_FILE) {
            result.source_file = SourceFileInfo::from_json(json)?;
        }

        if let Some(json) = metadata.get(KEY_PROCESSING_HISTORY) {
            result.processing_history = ProcessingHistory::from_json(json)?;
        }

        Ok(result)
    }
}
