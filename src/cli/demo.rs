use anyhow::{Context, Result};
use log::info;
use std::collections::HashMap;
use std::path::PathBuf;

use mzblank::feature::{Feature, FeatureMap};
use mzblank::store::FeatureStore;

/// Compounds present in samples well above the blank level
const REAL_COMPOUNDS: usize = 40;

/// Compounds dominated by the blank (solvent, plasticizers, column bleed)
const BACKGROUND_COMPOUNDS: usize = 15;

/// Generate a directory of mock sample and blank feature maps
pub fn run(output: PathBuf, samples: usize, blanks: usize) -> Result<()> {
    info!("Generating demo feature maps in {}", output.display());

    let store = FeatureStore::create(&output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))?;

    let mut sheet_rows = Vec::new();
    for run_index in 0..samples + blanks {
        let is_blank = run_index >= samples;
        let name = if is_blank {
            format!("blank_{:02}.mzML", run_index - samples + 1)
        } else {
            format!("sample_{:02}.mzML", run_index + 1)
        };

        let map = generate_mock_map(&name, run_index, is_blank);
        let path = store
            .save(&map)
            .with_context(|| format!("Failed to write feature map for {}", name))?;
        info!("  {} features -> {}", map.len(), path.display());

        sheet_rows.push((name, if is_blank { "Blank" } else { "Sample" }));
    }

    let sheet_path = output.join("samples.tsv");
    let mut sheet = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(&sheet_path)
        .context("Failed to create sample sheet")?;
    sheet.write_record(["filename", "Sample_Type"])?;
    for (name, sample_type) in &sheet_rows {
        sheet.write_record([name.as_str(), *sample_type])?;
    }
    sheet.flush()?;

    println!(
        "Wrote {} sample and {} blank feature maps to {}",
        samples,
        blanks,
        output.display()
    );
    println!("Sample sheet: {}", sheet_path.display());
    println!(
        "Compounds missing from the blanks are kept only with --missing-values zero"
    );
    println!(
        "Try: mzblank remove-blanks {} --sample-sheet {}",
        output.display(),
        sheet_path.display()
    );

    Ok(())
}

/// Deterministic offset in [-0.5, 0.5) for run `run` and compound `compound`
fn jitter(run: usize, compound: usize) -> f64 {
    ((run * 7919 + compound * 104_729) % 1000) as f64 / 1000.0 - 0.5
}

fn generate_mock_map(name: &str, run_index: usize, is_blank: bool) -> FeatureMap {
    let mut features = Vec::new();
    let mut next_id = (run_index as u64 + 1) * 100_000;

    let mut push = |rt: f64, mz: f64, intensity: f64, charge: i32, compound: usize| {
        let mut feature = Feature::new(next_id, rt, mz, intensity).with_charge(charge);
        feature.quality = Some(0.8 + 0.2 * (jitter(run_index, compound) + 0.5));
        feature.fwhm = Some(3.0 + jitter(run_index + 1, compound));
        features.push(feature);
        next_id += 1;
    };

    for k in 0..REAL_COMPOUNDS {
        let rt = 30.0 + 12.0 * k as f64 + 2.0 * jitter(run_index, k);
        let mz = 100.0 + 17.3 * k as f64 + 0.0005 * jitter(run_index + 7, k);
        let charge = if k % 5 == 0 { 2 } else { 1 };
        if is_blank {
            // trace-level carry-over; every seventh compound is absent from blanks
            if k % 7 != 0 {
                push(rt, mz, 150.0 * (1.0 + jitter(run_index, k)), charge, k);
            }
        } else {
            let intensity = 1e5 * (1.0 + (k % 10) as f64) * (1.0 + 0.2 * jitter(run_index, k));
            push(rt, mz, intensity, charge, k);
        }
    }

    for k in 0..BACKGROUND_COMPOUNDS {
        let compound = REAL_COMPOUNDS + k;
        let rt = 45.0 + 27.0 * k as f64 + 2.0 * jitter(run_index, compound);
        let mz = 150.05 + 23.7 * k as f64 + 0.0005 * jitter(run_index + 7, compound);
        let level = if is_blank { 5e5 } else { 2e4 };
        push(rt, mz, level * (1.0 + 0.2 * jitter(run_index, compound)), 0, compound);
    }

    let mut map = FeatureMap::with_features(name, features);
    let mut parameters = HashMap::new();
    parameters.insert("generator".to_string(), "mzblank demo".to_string());
    map.metadata
        .processing_history
        .record("feature detection", parameters);
    map
}
