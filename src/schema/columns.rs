/// Column names as constants for type safety
/// Unique feature identifier
pub const FEATURE_ID: &str = "feature_id";
/// Apex retention time in seconds
pub const RETENTION_TIME: &str = "retention_time";
/// Mass-to-charge ratio (MS:1000040)
pub const MZ: &str = "mz";
/// Feature intensity (MS:1000042)
pub const INTENSITY: &str = "intensity";
/// Charge state, 0 when unknown (MS:1000041)
pub const CHARGE: &str = "charge";
/// Feature quality reported by the feature finder
pub const QUALITY: &str = "quality";
/// Peak width at half maximum in seconds
pub const FWHM: &str = "fwhm";
