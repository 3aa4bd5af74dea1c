//! TOML configuration file support.
//!
//! Settings for both blank removal and feature linking can be kept in a
//! config file; command-line flags take precedence:
//!
//! ```toml
//! # mzblank.toml
//! [blank_removal]
//! cutoff = 0.3
//! blanks = ["blank_01.mzML", "blank_02.mzML"]
//! missing_values = "propagate"
//!
//! [linking]
//! mz_tol = 10.0
//! mz_unit = "ppm"
//! rt_tol = 100.0
//! charge_merging = "with_charge_zero"
//!
//! [store]
//! compression_level = 9
//! row_group_size = 20000
//! write_statistics = true
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use mzblank::blank::{BlankFilterConfig, MissingValues};
use mzblank::grouping::{ChargeMerging, GroupingConfig, MzUnit};
use mzblank::store::FeatureMapWriterConfig;

use super::LinkingArgs;

/// Root configuration structure for mzblank.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Blank removal settings.
    #[serde(default)]
    pub blank_removal: BlankRemovalConfig,

    /// Feature linking settings.
    #[serde(default)]
    pub linking: LinkingConfig,

    /// Settings for rewritten feature files.
    #[serde(default)]
    pub store: StoreConfig,
}

/// Configuration for the remove-blanks command.
#[derive(Debug, Default, Deserialize)]
pub struct BlankRemovalConfig {
    /// Blank/sample ratio cutoff.
    pub cutoff: Option<f64>,

    /// Blank file names.
    #[serde(default)]
    pub blanks: Vec<String>,

    /// Sample sheet listing blanks by Sample_Type.
    pub sample_sheet: Option<PathBuf>,

    /// Missing value policy.
    pub missing_values: Option<MissingValues>,
}

/// Configuration for feature linking.
#[derive(Debug, Default, Deserialize)]
pub struct LinkingConfig {
    /// m/z tolerance.
    pub mz_tol: Option<f64>,

    /// Unit of the m/z tolerance.
    pub mz_unit: Option<MzUnit>,

    /// Retention time tolerance in seconds.
    pub rt_tol: Option<f64>,

    /// Charge compatibility rule.
    pub charge_merging: Option<ChargeMerging>,
}

/// Configuration for writing feature files.
#[derive(Debug, Default, Deserialize)]
pub struct StoreConfig {
    /// ZSTD compression level (1-22).
    pub compression_level: Option<i32>,

    /// Number of features per Parquet row group.
    pub row_group_size: Option<usize>,

    /// Write column statistics.
    pub write_statistics: Option<bool>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load the config file if one was given, else use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::from_file)
    }

    /// Grouping parameters: CLI flags, then config file, then defaults.
    pub fn grouping_config(&self, args: &LinkingArgs) -> GroupingConfig {
        let defaults = GroupingConfig::default();
        GroupingConfig {
            mz_tol: args.mz_tol.or(self.linking.mz_tol).unwrap_or(defaults.mz_tol),
            mz_unit: args
                .mz_unit
                .map(MzUnit::from)
                .or(self.linking.mz_unit)
                .unwrap_or(defaults.mz_unit),
            rt_tol: args.rt_tol.or(self.linking.rt_tol).unwrap_or(defaults.rt_tol),
            charge_merging: args
                .charge_merging
                .map(ChargeMerging::from)
                .or(self.linking.charge_merging)
                .unwrap_or(defaults.charge_merging),
        }
    }

    /// Blank filter parameters: CLI flags, then config file, then defaults.
    pub fn blank_filter_config(
        &self,
        cutoff: Option<f64>,
        missing_values: Option<MissingValues>,
    ) -> BlankFilterConfig {
        let defaults = BlankFilterConfig::default();
        BlankFilterConfig {
            cutoff: cutoff.or(self.blank_removal.cutoff).unwrap_or(defaults.cutoff),
            missing_values: missing_values
                .or(self.blank_removal.missing_values)
                .unwrap_or(defaults.missing_values),
        }
    }
}

impl StoreConfig {
    /// Writer parameters, defaults for anything left unset.
    pub fn writer_config(&self) -> FeatureMapWriterConfig {
        let defaults = FeatureMapWriterConfig::default();
        FeatureMapWriterConfig {
            compression_level: self.compression_level.unwrap_or(defaults.compression_level),
            row_group_size: self.row_group_size.unwrap_or(defaults.row_group_size),
            write_statistics: self.write_statistics.unwrap_or(defaults.write_statistics),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [blank_removal]
            cutoff = 0.25
            blanks = ["blank_01.mzML", "blank_02"]
            missing_values = "zero"

            [linking]
            mz_tol = 0.005
            mz_unit = "da"
            rt_tol = 30.0
            charge_merging = "identical"
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.blank_removal.cutoff, Some(0.25));
        assert_eq!(config.blank_removal.blanks, vec!["blank_01.mzML", "blank_02"]);
        assert_eq!(config.blank_removal.missing_values, Some(MissingValues::Zero));
        assert_eq!(config.linking.mz_tol, Some(0.005));
        assert_eq!(config.linking.mz_unit, Some(MzUnit::Da));
        assert_eq!(config.linking.rt_tol, Some(30.0));
        assert_eq!(config.linking.charge_merging, Some(ChargeMerging::Identical));
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [linking]
            rt_tol = 45.0
        "#;

        let config = Config::from_str(toml).unwrap();
        let grouping = config.grouping_config(&LinkingArgs::default());
        assert_eq!(grouping.rt_tol, 45.0);
        assert_eq!(grouping.mz_tol, 10.0);
        assert_eq!(grouping.mz_unit, MzUnit::Ppm);
        assert!(config.blank_removal.blanks.is_empty());
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.blank_removal.cutoff, None);
        assert_eq!(
            config.blank_filter_config(None, None),
            BlankFilterConfig::default()
        );
    }

    #[test]
    fn test_flags_override_config() {
        let config = Config::from_str("[blank_removal]\ncutoff = 0.5\n").unwrap();
        assert_eq!(config.blank_filter_config(None, None).cutoff, 0.5);
        assert_eq!(config.blank_filter_config(Some(0.1), None).cutoff, 0.1);

        let args = LinkingArgs {
            mz_tol: Some(5.0),
            ..Default::default()
        };
        assert_eq!(config.grouping_config(&args).mz_tol, 5.0);
    }

    #[test]
    fn test_unknown_policy_rejected() {
        assert!(Config::from_str("[blank_removal]\nmissing_values = \"mean\"\n").is_err());
    }

    #[test]
    fn test_store_section() {
        let toml = r#"
            [store]
            compression_level = 9
            row_group_size = 1000
        "#;

        let writer = Config::from_str(toml).unwrap().store.writer_config();
        assert_eq!(writer.compression_level, 9);
        assert_eq!(writer.row_group_size, 1000);
        assert!(writer.write_statistics);

        let defaults = Config::from_str("").unwrap().store.writer_config();
        assert_eq!(defaults.row_group_size, FeatureMapWriterConfig::default().row_group_size);
    }
}
