use arrow::datatypes::{DataType, Schema};

use super::columns;

/// Validates that a schema is compatible with the feature map format.
///
/// Returns `Ok(())` if the schema contains all required columns with correct types,
/// or an error describing the incompatibility. Optional columns are only
/// type-checked when present.
pub fn validate_schema(schema: &Schema) -> Result<(), SchemaValidationError> {
    let required_columns = [
        (columns::FEATURE_ID, DataType::UInt64),
        (columns::RETENTION_TIME, DataType::Float64),
        (columns::MZ, DataType::Float64),
        (columns::INTENSITY, DataType::Float64),
        (columns::CHARGE, DataType::Int32),
    ];

    for (name, expected_type) in required_columns {
        match schema.field_with_name(name) {
            Ok(field) => check_type(name, field.data_type(), &expected_type)?,
            Err(_) => {
                return Err(SchemaValidationError::MissingColumn(name.to_string()));
            }
        }
    }

    for name in [columns::QUALITY, columns::FWHM] {
        if let Ok(field) = schema.field_with_name(name) {
            check_type(name, field.data_type(), &DataType::Float64)?;
        }
    }

    Ok(())
}

fn check_type(
    name: &str,
    found: &DataType,
    expected: &DataType,
) -> Result<(), SchemaValidationError> {
    if found != expected {
        return Err(SchemaValidationError::TypeMismatch {
            column: name.to_string(),
            expected: format!("{:?}", expected),
            found: format!("{:?}", found),
        });
    }
    Ok(())
}

/// Errors that can occur during schema validation
#[derive(Debug, thiserror::Error)]
pub enum SchemaValidationError {
    /// A required column is missing from the schema
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A column has an incorrect data type
    #[error("Type mismatch for column '{column}': expected {expected}, found {found}")]
    TypeMismatch {
        /// Name of the column with the type mismatch
        column: String,
        /// Expected data type
        expected: String,
        /// Actual data type found
        found: String,
    },
}
