//! # Consensus Export
//!
//! Tab-separated exports of a [`ConsensusMap`]:
//!
//! - [`write_feature_matrix`]: one row per consensus feature with its
//!   identity columns followed by one intensity column per input file
//! - [`write_sample_template`]: one row per input file with an empty
//!   `Sample_Type` column, to be filled in and read back as a
//!   [`SampleSheet`](crate::metadata::SampleSheet)

use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::debug;

use crate::consensus::ConsensusMap;

/// Errors that can occur while exporting
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV encoding error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

/// Header of the fixed leading matrix columns
pub const MATRIX_ID_COLUMNS: [&str; 6] = ["metabolite", "id", "charge", "mz", "RT", "quality"];

/// Label used for a consensus feature, e.g. `301.1410@120.50`
pub fn metabolite_label(mz: f64, rt: f64) -> String {
    format!("{:.4}@{:.2}", mz, rt)
}

fn tsv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new().delimiter(b'\t').from_writer(writer)
}

/// Write the feature matrix of `map` as TSV.
///
/// Intensities are rounded to integers; files without a member feature get 0.
pub fn write_feature_matrix<W: Write>(map: &ConsensusMap, writer: W) -> Result<(), ExportError> {
    let mut tsv = tsv_writer(writer);

    let mut header: Vec<&str> = MATRIX_ID_COLUMNS.to_vec();
    header.extend(map.column_names());
    tsv.write_record(&header)?;

    for row in map.rows() {
        let mut record = vec![
            metabolite_label(row.mz, row.rt),
            row.id.to_string(),
            row.charge.to_string(),
            row.mz.to_string(),
            row.rt.to_string(),
            row.quality.to_string(),
        ];
        record.extend(
            row.intensities
                .iter()
                .map(|cell| format!("{:.0}", cell.unwrap_or(0.0).round())),
        );
        tsv.write_record(&record)?;
    }

    tsv.flush()?;
    debug!("Exported {} consensus features", map.len());
    Ok(())
}

/// Write a sample metadata template listing every input file of `map`
pub fn write_sample_template<W: Write>(map: &ConsensusMap, writer: W) -> Result<(), ExportError> {
    let mut tsv = tsv_writer(writer);
    tsv.write_record(["filename", "Sample_Type"])?;
    for name in map.column_names() {
        tsv.write_record([name, ""])?;
    }
    tsv.flush()?;
    Ok(())
}

/// Write the feature matrix to a file
pub fn write_feature_matrix_file<P: AsRef<Path>>(
    map: &ConsensusMap,
    path: P,
) -> Result<(), ExportError> {
    write_feature_matrix(map, File::create(path)?)
}

/// Write the sample metadata template to a file
pub fn write_sample_template_file<P: AsRef<Path>>(
    map: &ConsensusMap,
    path: P,
) -> Result<(), ExportError> {
    write_sample_template(map, File::create(path)?)
}
