use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Builder, Int32Builder, UInt64Builder};
use arrow::datatypes::Schema;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::{EnabledStatistics, WriterProperties};
use parquet::format::KeyValue;

use crate::feature::{Feature, FeatureMap};
use crate::metadata::FeatureMapMetadata;
use crate::schema::create_feature_schema_arc;

use super::StoreError;

/// Configuration for the feature map writer
#[derive(Debug, Clone)]
pub struct FeatureMapWriterConfig {
    /// ZSTD compression level
    pub compression_level: i32,

    /// Target row group size (features per row group)
    pub row_group_size: usize,

    /// Whether to write statistics for columns
    pub write_statistics: bool,
}

impl Default for FeatureMapWriterConfig {
    fn default() -> Self {
        Self {
            compression_level: 3,
            row_group_size: 50_000,
            write_statistics: true,
        }
    }
}

impl FeatureMapWriterConfig {
    /// Create writer properties from this configuration
    fn to_writer_properties(&self, metadata: &HashMap<String, String>) -> WriterProperties {
        let compression = Compression::ZSTD(
            ZstdLevel::try_new(self.compression_level).unwrap_or(ZstdLevel::default()),
        );

        let statistics = if self.write_statistics {
            EnabledStatistics::Chunk
        } else {
            EnabledStatistics::None
        };

        let kv_metadata: Vec<KeyValue> = metadata
            .iter()
            .map(|(k, v)| KeyValue {
                key: k.clone(),
                value: Some(v.clone()),
            })
            .collect();

        WriterProperties::builder()
            .set_compression(compression)
            .set_statistics_enabled(statistics)
            .set_max_row_group_size(self.row_group_size)
            .set_key_value_metadata(Some(kv_metadata))
            .build()
    }
}

/// Streaming writer for feature map Parquet files
pub struct FeatureMapWriter<W: Write + Send> {
    writer: ArrowWriter<W>,
    schema: Arc<Schema>,
    features_written: usize,
}

impl<W: Write + Send> FeatureMapWriter<W> {
    /// Create a new writer to any Write implementation
    pub fn new(
        writer: W,
        metadata: &FeatureMapMetadata,
        config: FeatureMapWriterConfig,
    ) -> Result<Self, StoreError> {
        let schema = create_feature_schema_arc();
        let parquet_metadata = metadata.to_parquet_metadata()?;
        let props = config.to_writer_properties(&parquet_metadata);

        let arrow_writer = ArrowWriter::try_new(writer, schema.clone(), Some(props))?;

        Ok(Self {
            writer: arrow_writer,
            schema,
            features_written: 0,
        })
    }

    /// Write a batch of features
    pub fn write_features(&mut self, features: &[Feature]) -> Result<(), StoreError> {
        if features.is_empty() {
            return Ok(());
        }

        let n = features.len();
        let mut id_builder = UInt64Builder::with_capacity(n);
        let mut rt_builder = Float64Builder::with_capacity(n);
        let mut mz_builder = Float64Builder::with_capacity(n);
        let mut intensity_builder = Float64Builder::with_capacity(n);
        let mut charge_builder = Int32Builder::with_capacity(n);
        let mut quality_builder = Float64Builder::with_capacity(n);
        let mut fwhm_builder = Float64Builder::with_capacity(n);

        for feature in features {
            id_builder.append_value(feature.id);
            rt_builder.append_value(feature.rt);
            mz_builder.append_value(feature.mz);
            intensity_builder.append_value(feature.intensity);
            charge_builder.append_value(feature.charge);
            quality_builder.append_option(feature.quality);
            fwhm_builder.append_option(feature.fwhm);
        }

        let arrays: Vec<ArrayRef> = vec![
            Arc::new(id_builder.finish()),
            Arc::new(rt_builder.finish()),
            Arc::new(mz_builder.finish()),
            Arc::new(intensity_builder.finish()),
            Arc::new(charge_builder.finish()),
            Arc::new(quality_builder.finish()),
            Arc::new(fwhm_builder.finish()),
        ];

        let batch = RecordBatch::try_new(self.schema.clone(), arrays)?;
        self.writer.write(&batch)?;

        self.features_written += n;

        Ok(())
    }

    /// Flush any buffered data and finalize the file
    pub fn finish(self) -> Result<FeatureMapWriterStats, StoreError> {
        let file_metadata = self.writer.close()?;

        Ok(FeatureMapWriterStats {
            features_written: self.features_written,
            row_groups_written: file_metadata.row_groups.len(),
        })
    }
}

/// Statistics from a completed feature map write
#[derive(Debug, Clone)]
pub struct FeatureMapWriterStats {
    /// Number of feature rows written
    pub features_written: usize,
    /// Number of Parquet row groups
    pub row_groups_written: usize,
}

impl std::fmt::Display for FeatureMapWriterStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Wrote {} features in {} row groups",
            self.features_written, self.row_groups_written
        )
    }
}

/// Write a whole feature map to any Write implementation
pub fn write_feature_map<W: Write + Send>(
    writer: W,
    map: &FeatureMap,
    config: FeatureMapWriterConfig,
) -> Result<FeatureMapWriterStats, StoreError> {
    let mut writer = FeatureMapWriter::new(writer, &map.metadata, config)?;
    writer.write_features(&map.features)?;
    writer.finish()
}
