use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::MetadataError;

/// Data processing history for audit trail
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingHistory {
    /// List of processing steps applied
    pub steps: Vec<ProcessingStep>,
}

/// A single data processing step in the processing history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStep {
    /// Step order (1-indexed)
    pub order: i32,

    /// Software name
    pub software: String,

    /// Software version
    pub version: Option<String>,

    /// Processing type (e.g., "feature detection", "blank removal")
    pub processing_type: String,

    /// Timestamp when processing was performed
    pub timestamp: Option<String>,

    /// Processing parameters
    pub parameters: HashMap<String, String>,
}

impl ProcessingHistory {
    /// Create a new empty processing history
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a processing step to the history
    pub fn add_step(&mut self, step: ProcessingStep) {
        self.steps.push(step);
    }

    /// Append a step performed now by this crate, numbered after the last step
    pub fn record(&mut self, processing_type: &str, parameters: HashMap<String, String>) {
        let order = self.steps.iter().map(|s| s.order).max().unwrap_or(0) + 1;
        self.add_step(ProcessingStep {
            order,
            software: env!("CARGO_PKG_NAME").to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
            processing_type: processing_type.to_string(),
            timestamp: Some(chrono::Utc::now().to_rfc3339()),
            parameters,
        });
    }

    /// Most recent step of the given type, if any
    pub fn last_of_type(&self, processing_type: &str) -> Option<&ProcessingStep> {
        self.steps
            .iter()
            .rev()
            .find(|s| s.processing_type == processing_type)
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
