use std::collections::HashMap;
use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema, SchemaBuilder};

use super::columns;
use super::constants::{KEY_FORMAT_VERSION, MZBLANK_FORMAT_VERSION};

/// Creates a Field with CV term metadata annotation
fn field_with_cv(name: &str, data_type: DataType, nullable: bool, cv_accession: &str) -> Field {
    let mut metadata = HashMap::new();
    metadata.insert("cv_accession".to_string(), cv_accession.to_string());
    Field::new(name, data_type, nullable).with_metadata(metadata)
}

/// Creates the Arrow schema for a persisted feature map.
///
/// One row per feature. Identity, position and intensity columns are required;
/// quality and peak width are optional because not every feature finder
/// reports them.
///
/// # Example
///
/// ```
/// use mzblank::schema::create_feature_schema;
///
/// let schema = create_feature_schema();
/// assert_eq!(schema.fields().len(), 7);
/// ```
pub fn create_feature_schema() -> Schema {
    let mut builder = SchemaBuilder::new();

    builder.push(Field::new(columns::FEATURE_ID, DataType::UInt64, false));

    builder.push(field_with_cv(
        columns::RETENTION_TIME,
        DataType::Float64,
        false,
        "MS:1000894", // retention time
    ));

    builder.push(field_with_cv(
        columns::MZ,
        DataType::Float64,
        false,
        "MS:1000040", // m/z
    ));

    builder.push(field_with_cv(
        columns::INTENSITY,
        DataType::Float64,
        false,
        "MS:1000042", // peak intensity
    ));

    builder.push(field_with_cv(
        columns::CHARGE,
        DataType::Int32,
        false,
        "MS:1000041", // charge state
    ));

    builder.push(Field::new(columns::QUALITY, DataType::Float64, true));
    builder.push(Field::new(columns::FWHM, DataType::Float64, true));

    let mut schema_metadata = HashMap::new();
    schema_metadata.insert(
        KEY_FORMAT_VERSION.to_string(),
        MZBLANK_FORMAT_VERSION.to_string(),
    );

    builder.finish().with_metadata(schema_metadata)
}

/// Creates an Arc-wrapped feature schema for use with Arrow writers
pub fn create_feature_schema_arc() -> Arc<Schema> {
    Arc::new(create_feature_schema())
}
