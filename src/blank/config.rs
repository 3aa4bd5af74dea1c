use serde::{Deserialize, Serialize};

use super::BlankError;

/// Default blank/sample ratio cutoff
pub const DEFAULT_CUTOFF: f64 = 0.3;

/// How missing intensities enter the blank and sample averages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingValues {
    /// Any missing value makes the average missing, so the row is never real.
    /// An empty partition also averages to missing.
    #[default]
    Propagate,
    /// Missing values count as zero intensity; an empty partition averages to zero.
    Zero,
}

/// Parameters of the blank filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlankFilterConfig {
    /// A feature is real iff `(avg_blank + 1) / (avg_sample + 1) < cutoff`
    pub cutoff: f64,

    /// Treatment of missing intensities
    pub missing_values: MissingValues,
}

impl Default for BlankFilterConfig {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
            missing_values: MissingValues::Propagate,
        }
    }
}

impl BlankFilterConfig {
    /// Create a configuration with the given cutoff
    pub fn with_cutoff(cutoff: f64) -> Self {
        Self {
            cutoff,
            ..Default::default()
        }
    }

    /// Check that the cutoff is finite and positive
    pub fn validate(&self) -> Result<(), BlankError> {
        if !self.cutoff.is_finite() || self.cutoff <= 0.0 {
            return Err(BlankError::InvalidCutoff(self.cutoff));
        }
        Ok(())
    }
}
