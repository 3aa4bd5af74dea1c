use serde::{Deserialize, Serialize};

use super::MetadataError;

/// Source file information for provenance tracking
///
/// `name` is the raw file name (e.g. `sample1.mzML`) and doubles as the
/// identifier of the feature map within a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceFileInfo {
    /// Original file name
    pub name: String,

    /// Original file path
    pub path: Option<String>,

    /// File format (e.g., "mzML")
    pub format: Option<String>,

    /// File size in bytes
    pub size_bytes: Option<u64>,

    /// SHA-256 checksum of the original file
    pub sha256: Option<String>,
}

impl SourceFileInfo {
    /// Create new source file info with the given filename
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Serialize to JSON for Parquet footer storage
    pub fn to_json(&self) -> Result<String, MetadataError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, MetadataError> {
        Ok(serde_json::from_str(json)?)
    }
}
