use arrow::array::{Array, Float64Array, Int32Array, UInt64Array};
use arrow::record_batch::RecordBatch;

use super::StoreError;

/// Get a required UInt64 column by name.
pub(super) fn get_uint64_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a UInt64Array, StoreError> {
    batch
        .column_by_name(name)
        .ok_or_else(|| StoreError::ColumnNotFound(name.to_string()))?
        .as_any()
        .downcast_ref::<UInt64Array>()
        .ok_or_else(|| StoreError::InvalidFormat(format!("{} is not UInt64", name)))
}

/// Get a required Int32 column by name.
pub(super) fn get_int32_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a Int32Array, StoreError> {
    batch
        .column_by_name(name)
        .ok_or_else(|| StoreError::ColumnNotFound(name.to_string()))?
        .as_any()
        .downcast_ref::<Int32Array>()
        .ok_or_else(|| StoreError::InvalidFormat(format!("{} is not Int32", name)))
}

/// Get a required Float64 column by name.
pub(super) fn get_float64_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a Float64Array, StoreError> {
    batch
        .column_by_name(name)
        .ok_or_else(|| StoreError::ColumnNotFound(name.to_string()))?
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| StoreError::InvalidFormat(format!("{} is not Float64", name)))
}

/// Get an optional Float64 column by name.
pub(super) fn get_optional_float64_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Option<&'a Float64Array> {
    batch.column_by_name(name)?.as_any().downcast_ref::<Float64Array>()
}

/// Read an optional f64 value from a nullable array.
pub(super) fn get_optional_f64(array: Option<&Float64Array>, idx: usize) -> Option<f64> {
    array.and_then(|arr| if arr.is_null(idx) { None } else { Some(arr.value(idx)) })
}
