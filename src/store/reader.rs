use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use arrow::record_batch::RecordBatch;
use log::debug;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::metadata::FileMetaData;

use crate::feature::{raw_file_stem, Feature, FeatureMap};
use crate::metadata::FeatureMapMetadata;
use crate::schema::{columns, validate_schema};

use super::utils::{
    get_float64_column, get_int32_column, get_optional_f64, get_optional_float64_column,
    get_uint64_column,
};
use super::StoreError;

/// Read a persisted feature map.
///
/// The schema is validated before any rows are decoded. A file written
/// without source file metadata is named after its own stem, so
/// `QC_01.features.parquet` becomes `QC_01.mzML`.
pub fn read_feature_map<P: AsRef<Path>>(path: P) -> Result<FeatureMap, StoreError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    validate_schema(builder.schema().as_ref())?;

    let kv_metadata = key_value_metadata(builder.metadata().file_metadata());
    let mut metadata = FeatureMapMetadata::from_parquet_metadata(&kv_metadata)?;
    if metadata.source_file.name.is_empty() {
        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        metadata.source_file.name = format!("{}.mzML", raw_file_stem(file_name));
    }

    let reader = builder.build()?;
    let mut features = Vec::new();
    for batch in reader {
        append_features(&batch?, &mut features)?;
    }

    debug!(
        "Loaded {} features for {} from {}",
        features.len(),
        metadata.source_file.name,
        path.display()
    );

    Ok(FeatureMap { metadata, features })
}

/// Collect the footer key-value pairs that carry a value
fn key_value_metadata(file_meta: &FileMetaData) -> HashMap<String, String> {
    let mut kv_metadata = HashMap::new();
    if let Some(kv_list) = file_meta.key_value_metadata() {
        for kv in kv_list {
            if let Some(value) = &kv.value {
                kv_metadata.insert(kv.key.clone(), value.clone());
            }
        }
    }
    kv_metadata
}

fn append_features(batch: &RecordBatch, features: &mut Vec<Feature>) -> Result<(), StoreError> {
    let ids = get_uint64_column(batch, columns::FEATURE_ID)?;
    let rts = get_float64_column(batch, columns::RETENTION_TIME)?;
    let mzs = get_float64_column(batch, columns::MZ)?;
    let intensities = get_float64_column(batch, columns::INTENSITY)?;
    let charges = get_int32_column(batch, columns::CHARGE)?;
    let quality = get_optional_float64_column(batch, columns::QUALITY);
    let fwhm = get_optional_float64_column(batch, columns::FWHM);

    features.reserve(batch.num_rows());
    for i in 0..batch.num_rows() {
        features.push(Feature {
            id: ids.value(i),
            rt: rts.value(i),
            mz: mzs.value(i),
            intensity: intensities.value(i),
            charge: charges.value(i),
            quality: get_optional_f64(quality, i),
            fwhm: get_optional_f64(fwhm, i),
        });
    }

    Ok(())
}
