use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use mzblank::export::{write_feature_matrix_file, write_sample_template_file};
use mzblank::grouping::{FeatureGrouper, NearestNeighborGrouper};
use mzblank::store::FeatureStore;

use super::config::Config;
use super::LinkingArgs;

/// Feature matrix file name
const FEATURE_MATRIX_FILE: &str = "FeatureMatrix.tsv";

/// Sample metadata template file name
const SAMPLE_TEMPLATE_FILE: &str = "MetaData.tsv";

/// Link all feature maps in `dir` and export the feature matrix
pub fn run(
    dir: PathBuf,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    linking: LinkingArgs,
) -> Result<()> {
    let config = Config::load(config.as_deref())?;
    let grouper = NearestNeighborGrouper::new(config.grouping_config(&linking));

    let store = FeatureStore::open(&dir)
        .with_context(|| format!("Failed to open feature directory: {}", dir.display()))?;
    let maps: Vec<_> = store
        .load_all()
        .context("Failed to load feature maps")?
        .into_iter()
        .map(|stored| stored.map)
        .collect();
    info!("Linking {} feature maps", maps.len());

    let consensus = grouper.group(&maps).context("Feature linking failed")?;

    let output = output.unwrap_or(dir);
    std::fs::create_dir_all(&output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))?;

    let matrix_path = output.join(FEATURE_MATRIX_FILE);
    write_feature_matrix_file(&consensus, &matrix_path)
        .with_context(|| format!("Failed to write {}", matrix_path.display()))?;

    let template_path = output.join(SAMPLE_TEMPLATE_FILE);
    if template_path.exists() {
        info!("Keeping existing {}", template_path.display());
    } else {
        write_sample_template_file(&consensus, &template_path)
            .with_context(|| format!("Failed to write {}", template_path.display()))?;
    }

    println!(
        "Linked {} feature maps into {} consensus features",
        consensus.column_headers.len(),
        consensus.len()
    );
    println!("Feature matrix: {}", matrix_path.display());
    println!("Sample template: {}", template_path.display());

    Ok(())
}
