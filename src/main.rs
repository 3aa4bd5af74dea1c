//! # mzblank
//!
//! Command-line tool for blank-based feature filtering of LC-MS feature maps.
//!
//! ## Usage
//!
//! ```bash
//! # Generate demo feature maps and a sample sheet
//! mzblank demo demo_feature_maps
//!
//! # Remove blank features, reading blanks from the sample sheet
//! mzblank remove-blanks demo_feature_maps --sample-sheet demo_feature_maps/samples.tsv
//!
//! # Link the remaining maps and export the feature matrix
//! mzblank link demo_feature_maps
//!
//! # Inspect one feature file
//! mzblank info demo_feature_maps/sample_01.features.parquet
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
