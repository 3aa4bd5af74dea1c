/// Errors that can occur during feature grouping
#[derive(Debug, thiserror::Error)]
pub enum GroupingError {
    /// Fewer input maps than the grouping algorithm needs
    #[error("Feature grouping needs at least {required} feature maps, got {found}")]
    TooFewMaps {
        /// Minimum number of maps
        required: usize,
        /// Number of maps supplied
        found: usize,
    },

    /// A tolerance is zero, negative or not finite
    #[error("Invalid {name} tolerance: {value}")]
    InvalidTolerance {
        /// Tolerance name
        name: &'static str,
        /// Offending value
        value: f64,
    },
}
