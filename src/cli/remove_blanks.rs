use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use mzblank::blank::{
    apply_plan, BlankFilter, BlankRemovalPlan, BlankRemovalStats, BlankSet, MissingValues,
};
use mzblank::feature::FeatureMap;
use mzblank::grouping::NearestNeighborGrouper;
use mzblank::metadata::SampleSheet;
use mzblank::store::FeatureStore;

use super::config::Config;
use super::LinkingArgs;

#[cfg(feature = "colorized_output")]
use console::style;

/// Arguments of the remove-blanks command
pub struct Options {
    pub dir: PathBuf,
    pub blanks: Vec<String>,
    pub sample_sheet: Option<PathBuf>,
    pub cutoff: Option<f64>,
    pub missing_values: Option<MissingValues>,
    pub config: Option<PathBuf>,
    pub linking: LinkingArgs,
    pub dry_run: bool,
    pub json: bool,
}

/// Remove blank features from a directory of feature maps
pub fn run(options: Options) -> Result<()> {
    let config = Config::load(options.config.as_deref())?;
    let filter_config = config.blank_filter_config(options.cutoff, options.missing_values);
    let grouping_config = config.grouping_config(&options.linking);

    let mut blanks: BlankSet = options
        .blanks
        .iter()
        .chain(&config.blank_removal.blanks)
        .collect();
    if let Some(sheet_path) = options
        .sample_sheet
        .as_ref()
        .or(config.blank_removal.sample_sheet.as_ref())
    {
        let sheet = SampleSheet::from_tsv_file(sheet_path)
            .with_context(|| format!("Failed to read sample sheet: {}", sheet_path.display()))?;
        for name in sheet.blanks() {
            blanks.insert(&name);
        }
    }
    if blanks.is_empty() {
        anyhow::bail!("No blank files given; use --blank, --sample-sheet or the config file");
    }

    let store = FeatureStore::open(&options.dir)
        .with_context(|| format!("Failed to open feature directory: {}", options.dir.display()))?
        .with_writer_config(config.store.writer_config());
    let stored_maps = store.load_all().context("Failed to load feature maps")?;
    info!(
        "Loaded {} feature maps, {} blanks designated",
        stored_maps.len(),
        blanks.len()
    );

    let maps: Vec<_> = stored_maps.iter().map(|stored| stored.map.clone()).collect();
    let filter = BlankFilter::new(NearestNeighborGrouper::new(grouping_config), filter_config);
    let plan = filter.plan(&maps, &blanks).context("Blank removal failed")?;
    ensure_blanks_matched(&plan, &maps, &blanks)?;

    let stats = if options.dry_run {
        plan.stats.clone()
    } else {
        apply_plan(&store, &stored_maps, &plan).context("Failed to write filtered feature maps")?
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print!("{}", format_summary(&stats, &plan.deletions, options.dry_run));
    }

    Ok(())
}

/// Refuse a plan that deletes no blank file.
///
/// Without a single matched blank every consensus row lacks a ratio and all
/// sample files would be emptied.
fn ensure_blanks_matched(
    plan: &BlankRemovalPlan,
    maps: &[FeatureMap],
    blanks: &BlankSet,
) -> Result<()> {
    if plan.deletions.is_empty() {
        anyhow::bail!(
            "No feature map matches the given blanks: {}",
            blanks.unmatched(maps).join(", ")
        );
    }
    Ok(())
}

/// Human-readable summary, colorized when the feature is enabled
fn format_summary(stats: &BlankRemovalStats, deleted: &[String], dry_run: bool) -> String {
    let title = if dry_run {
        "Blank Removal (dry run)"
    } else {
        "Blank Removal"
    };
    let removed = stats.features_before - stats.features_after;

    #[cfg(feature = "colorized_output")]
    {
        let mut output = String::new();
        output.push_str(&format!("{}\n", style(title).bold().cyan()));
        output.push_str(&format!("{}\n", style("=".repeat(title.len())).cyan()));
        output.push_str(&format!(
            "Consensus features: {} ({} real, {} background, {} unscored)\n",
            stats.consensus_rows,
            style(stats.real_rows).green(),
            style(stats.background_rows).red(),
            style(stats.unscored_rows).yellow()
        ));
        output.push_str(&format!(
            "Features: {} -> {} ({} removed)\n",
            stats.features_before,
            style(stats.features_after).green().bold(),
            style(removed).red()
        ));
        output.push_str(&format!("Files rewritten: {}\n", stats.files_rewritten));
        for name in deleted {
            output.push_str(&format!("{} {}\n", style("deleted").red(), name));
        }
        output
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        let mut output = format!("{}\n{}\n", title, "=".repeat(title.len()));
        output.push_str(&format!(
            "Consensus features: {} ({} real, {} background, {} unscored)\n",
            stats.consensus_rows, stats.real_rows, stats.background_rows, stats.unscored_rows
        ));
        output.push_str(&format!(
            "Features: {} -> {} ({} removed)\n",
            stats.features_before, stats.features_after, removed
        ));
        output.push_str(&format!("Files rewritten: {}\n", stats.files_rewritten));
        for name in deleted {
            output.push_str(&format!("deleted {}\n", name));
        }
        output
    }
}
