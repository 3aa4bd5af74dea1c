use anyhow::{Context, Result};
use std::path::PathBuf;

use mzblank::store::read_feature_map;

/// Display information about a feature file
pub fn run(file: PathBuf) -> Result<()> {
    use parquet::file::reader::{FileReader, SerializedFileReader};
    use std::fs::File;

    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let file_handle = File::open(&file).context("Failed to open file")?;
    let reader = SerializedFileReader::new(file_handle).context("Failed to read Parquet file")?;
    let metadata = reader.metadata();
    let file_metadata = metadata.file_metadata();

    let map = read_feature_map(&file).context("Failed to read feature map")?;

    println!("Feature Map Information");
    println!("=======================");
    println!("File: {}", file.display());
    println!("Source: {}", map.source_file());
    println!();

    println!("File Statistics:");
    println!("  Row groups: {}", metadata.num_row_groups());
    println!("  Total rows: {}", file_metadata.num_rows());
    println!();

    println!("Features:");
    println!("  Count: {}", map.len());
    if let Some((rt_min, rt_max)) = range(map.features.iter().map(|f| f.rt)) {
        println!("  RT range: {:.2} - {:.2} s", rt_min, rt_max);
    }
    if let Some((mz_min, mz_max)) = range(map.features.iter().map(|f| f.mz)) {
        println!("  m/z range: {:.4} - {:.4}", mz_min, mz_max);
    }
    let charged = map.features.iter().filter(|f| f.charge != 0).count();
    println!("  With known charge: {}", charged);
    println!();

    let steps = &map.metadata.processing_history.steps;
    if !steps.is_empty() {
        println!("Processing History:");
        for step in steps {
            let mut parameters: Vec<_> = step.parameters.iter().collect();
            parameters.sort();
            let parameters: Vec<String> =
                parameters.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            println!(
                "  {}. {} ({} {}) {}",
                step.order,
                step.processing_type,
                step.software,
                step.version.as_deref().unwrap_or("?"),
                parameters.join(", ")
            );
        }
        println!();
    }

    println!("Schema:");
    for i in 0..file_metadata.schema_descr().num_columns() {
        let col = file_metadata.schema_descr().column(i);
        println!("  {:3}. {} ({})", i + 1, col.name(), col.physical_type());
    }

    Ok(())
}

fn range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
