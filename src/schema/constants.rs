/// mzblank feature file format version - follows semantic versioning
pub const MZBLANK_FORMAT_VERSION: &str = "1.0.0";

/// File extension for persisted feature maps
pub const FEATURE_MAP_EXTENSION: &str = ".features.parquet";

/// Metadata key for format version in Parquet footer
pub const KEY_FORMAT_VERSION: &str = "mzblank:format_version";

/// Metadata key for source file information
pub const KEY_SOURCE_FILE: &str = "mzblank:source_file";

/// Metadata key for data processing history
pub const KEY_PROCESSING_HISTORY: &str = "mzblank:processing_history";

/// Metadata key for write timestamp
pub const KEY_CREATED: &str = "mzblank:created";

/// Metadata key for writing software info
pub const KEY_SOFTWARE: &str = "mzblank:software";
