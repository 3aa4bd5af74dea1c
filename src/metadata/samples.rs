use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::MetadataError;

/// Role of a raw file within an experiment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleType {
    /// Biological sample
    Sample,
    /// Solvent or procedural blank
    Blank,
    /// Pooled QC sample
    Pool,
    /// Any other annotation, kept verbatim
    Other(String),
    /// Left empty in the sheet
    Unspecified,
}

impl SampleType {
    /// Parse a sample type annotation (case-insensitive)
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        match value.to_lowercase().as_str() {
            "" => SampleType::Unspecified,
            "sample" => SampleType::Sample,
            "blank" => SampleType::Blank,
            "pool" | "qc" => SampleType::Pool,
            _ => SampleType::Other(value.to_string()),
        }
    }
}

/// One row of a sample sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleEntry {
    /// Raw file name (e.g. `sample1.mzML`)
    pub filename: String,

    /// Role of the file
    pub sample_type: SampleType,

    /// Remaining columns, keyed by lowercased header
    pub attributes: HashMap<String, String>,
}

/// Sample metadata table mapping raw files to their role
///
/// Reads the tab-separated metadata tables exported for statistics tools:
/// a `filename` column plus either `Sample_Type` or `ATTRIBUTE_Sample_Type`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleSheet {
    /// Entries in file order
    pub entries: Vec<SampleEntry>,
}

impl SampleSheet {
    /// Parse a sample sheet from a TSV file
    pub fn from_tsv_file<P: AsRef<Path>>(path: P) -> Result<Self, MetadataError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader)
    }

    /// Parse a sample sheet from a reader
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, MetadataError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|s| s.to_lowercase().trim().to_string())
            .collect();

        let filename_idx = headers
            .iter()
            .position(|h| h == "filename")
            .ok_or_else(|| MetadataError::MissingColumn("filename".to_string()))?;
        let type_idx = headers
            .iter()
            .position(|h| h == "sample_type" || h == "attribute_sample_type")
            .ok_or_else(|| MetadataError::MissingColumn("Sample_Type".to_string()))?;

        let mut entries = Vec::new();

        for record in csv_reader.records() {
            let record = record?;

            let filename = record.get(filename_idx).unwrap_or("").trim();
            if filename.is_empty() {
                continue;
            }

            let sample_type = SampleType::parse(record.get(type_idx).unwrap_or(""));

            let mut attributes = HashMap::new();
            for (i, value) in record.iter().enumerate() {
                if i == filename_idx || i == type_idx || i >= headers.len() {
                    continue;
                }
                let value = value.trim();
                if !value.is_empty() {
                    attributes.insert(headers[i].clone(), value.to_string());
                }
            }

            entries.push(SampleEntry {
                filename: filename.to_string(),
                sample_type,
                attributes,
            });
        }

        Ok(Self { entries })
    }

    /// File names annotated as blanks
    pub fn blanks(&self) -> Vec<String> {
        self.of_type(&SampleType::Blank)
    }

    /// File names annotated with the given type
    pub fn of_type(&self, sample_type: &SampleType) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| &e.sample_type == sample_type)
            .map(|e| e.filename.clone())
            .collect()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the sheet has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
