use serde::{Deserialize, Serialize};

use super::GroupingError;

/// Unit of the m/z tolerance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MzUnit {
    /// Parts per million of the seed m/z
    #[default]
    Ppm,
    /// Absolute Dalton
    Da,
}

/// Which charge states may be linked together
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeMerging {
    /// Only identical charges
    Identical,
    /// Identical charges, or either charge unknown (0)
    #[default]
    WithChargeZero,
    /// Any charges
    Any,
}

impl ChargeMerging {
    /// Whether two features with these charges may be linked
    pub fn compatible(self, a: i32, b: i32) -> bool {
        match self {
            ChargeMerging::Identical => a == b,
            ChargeMerging::WithChargeZero => a == b || a == 0 || b == 0,
            ChargeMerging::Any => true,
        }
    }
}

/// Parameters for nearest-neighbor feature grouping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupingConfig {
    /// Maximum m/z distance between linked features
    pub mz_tol: f64,

    /// Unit of `mz_tol`
    pub mz_unit: MzUnit,

    /// Maximum retention time distance between linked features, in seconds
    pub rt_tol: f64,

    /// Charge compatibility rule
    pub charge_merging: ChargeMerging,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            mz_tol: 10.0,
            mz_unit: MzUnit::Ppm,
            rt_tol: 100.0,
            charge_merging: ChargeMerging::WithChargeZero,
        }
    }
}

impl GroupingConfig {
    /// Check that both tolerances are finite and positive
    pub fn validate(&self) -> Result<(), GroupingError> {
        for (name, value) in [("m/z", self.mz_tol), ("RT", self.rt_tol)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(GroupingError::InvalidTolerance { name, value });
            }
        }
        Ok(())
    }

    /// Absolute m/z half-window around `mz`
    pub fn mz_window(&self, mz: f64) -> f64 {
        match self.mz_unit {
            MzUnit::Ppm => mz.abs() * self.mz_tol * 1e-6,
            MzUnit::Da => self.mz_tol,
        }
    }
}
