//! # Feature Map Schema Definition
//!
//! This module defines the Apache Arrow schema used to persist one feature map
//! (the features detected in a single raw-data file) as a Parquet file.
//!
//! ## Schema Columns
//!
//! | Column | Type | Description | CV Term |
//! |--------|------|-------------|---------|
//! | feature_id | UInt64 | Unique feature identifier | |
//! | retention_time | Float64 | Apex RT in seconds | MS:1000894 |
//! | mz | Float64 | Mass-to-charge ratio | MS:1000040 |
//! | intensity | Float64 | Feature intensity | MS:1000042 |
//! | charge | Int32 | Charge state (0 = unknown) | MS:1000041 |
//! | quality | Float64 (nullable) | Feature quality score | |
//! | fwhm | Float64 (nullable) | Chromatographic peak width at half maximum | |
//!
//! ## File Footer Metadata
//!
//! - `mzblank:format_version`: Format version string
//! - `mzblank:source_file`: Source raw file provenance (JSON)
//! - `mzblank:processing_history`: Processing audit trail (JSON)
//! - `mzblank:created`: Write timestamp (RFC 3339)
//! - `mzblank:software`: Writing software and version

mod builders;
/// Feature table column name constants.
pub mod columns;
mod constants;
mod validation;


pub use builders::{create_feature_schema, create_feature_schema_arc};
pub use columns::*;
pub use constants::*;
pub use validation::{validate_schema, SchemaValidationError};
