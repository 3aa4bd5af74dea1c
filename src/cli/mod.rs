use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use mzblank::blank::MissingValues;
use mzblank::grouping::{ChargeMerging, MzUnit};

mod config;
mod demo;
mod info;
mod link;
mod remove_blanks;

/// mzblank - Blank-based feature filtering for LC-MS metabolomics
#[derive(Parser)]
#[command(name = "mzblank")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Unit of the m/z tolerance.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum MzUnitArg {
    /// Parts per million
    Ppm,
    /// Dalton
    Da,
}

impl From<MzUnitArg> for MzUnit {
    fn from(arg: MzUnitArg) -> Self {
        match arg {
            MzUnitArg::Ppm => MzUnit::Ppm,
            MzUnitArg::Da => MzUnit::Da,
        }
    }
}

/// Charge states allowed to link.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ChargeMergingArg {
    /// Only identical charges
    Identical,
    /// Identical charges or unknown charge
    WithChargeZero,
    /// Any charges
    Any,
}

impl From<ChargeMergingArg> for ChargeMerging {
    fn from(arg: ChargeMergingArg) -> Self {
        match arg {
            ChargeMergingArg::Identical => ChargeMerging::Identical,
            ChargeMergingArg::WithChargeZero => ChargeMerging::WithChargeZero,
            ChargeMergingArg::Any => ChargeMerging::Any,
        }
    }
}

/// Treatment of missing intensities when averaging.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum MissingValuesArg {
    /// A missing value makes the average missing
    Propagate,
    /// A missing value counts as zero
    Zero,
}

impl From<MissingValuesArg> for MissingValues {
    fn from(arg: MissingValuesArg) -> Self {
        match arg {
            MissingValuesArg::Propagate => MissingValues::Propagate,
            MissingValuesArg::Zero => MissingValues::Zero,
        }
    }
}

/// Feature linking overrides shared by `remove-blanks` and `link`.
#[derive(Args, Clone, Debug, Default)]
pub struct LinkingArgs {
    /// m/z tolerance
    #[arg(long)]
    mz_tol: Option<f64>,

    /// Unit of the m/z tolerance
    #[arg(long, value_enum)]
    mz_unit: Option<MzUnitArg>,

    /// Retention time tolerance in seconds
    #[arg(long)]
    rt_tol: Option<f64>,

    /// Which charge states may be linked
    #[arg(long, value_enum)]
    charge_merging: Option<ChargeMergingArg>,
}

#[derive(Subcommand)]
enum Commands {
    /// Remove blank features from a directory of feature maps
    ///
    /// Blank files are deleted and every sample file is rewritten in place
    /// with only the features that stand above the blank background.
    #[command(name = "remove-blanks")]
    RemoveBlanks {
        /// Directory of .features.parquet files
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Blank file (raw file name or stem); repeatable
        #[arg(short, long = "blank", value_name = "FILE")]
        blanks: Vec<String>,

        /// Sample sheet TSV; files of type "blank" are added to the blanks
        #[arg(short, long, value_name = "FILE")]
        sample_sheet: Option<PathBuf>,

        /// Blank/sample ratio cutoff (default 0.3)
        #[arg(long)]
        cutoff: Option<f64>,

        /// Missing value policy (default propagate)
        #[arg(long, value_enum)]
        missing_values: Option<MissingValuesArg>,

        /// Path to TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        #[command(flatten)]
        linking: LinkingArgs,

        /// Report what would change without modifying any file
        #[arg(long)]
        dry_run: bool,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Link feature maps and export the feature matrix
    Link {
        /// Directory of .features.parquet files
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Output directory (defaults to DIR)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Path to TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        #[command(flatten)]
        linking: LinkingArgs,
    },

    /// Display information about a feature file
    Info {
        /// Feature file to inspect
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Generate a demo directory of sample and blank feature maps
    Demo {
        /// Output directory
        #[arg(value_name = "DIR", default_value = "demo_feature_maps")]
        output: PathBuf,

        /// Number of sample runs
        #[arg(long, default_value = "3")]
        samples: usize,

        /// Number of blank runs
        #[arg(long, default_value = "1")]
        blanks: usize,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::RemoveBlanks {
            dir,
            blanks,
            sample_sheet,
            cutoff,
            missing_values,
            config,
            linking,
            dry_run,
            json,
        } => remove_blanks::run(remove_blanks::Options {
            dir,
            blanks,
            sample_sheet,
            cutoff,
            missing_values: missing_values.map(MissingValues::from),
            config,
            linking,
            dry_run,
            json,
        }),
        Commands::Link {
            dir,
            output,
            config,
            linking,
        } => link::run(dir, output, config, linking),
        Commands::Info { file } => info::run(file),
        Commands::Demo {
            output,
            samples,
            blanks,
        } => demo::run(output, samples, blanks),
    }
}
