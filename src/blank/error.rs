use crate::grouping::GroupingError;
use crate::store::StoreError;

/// Errors that can occur during blank removal
#[derive(Debug, thiserror::Error)]
pub enum BlankError {
    /// Cutoff is not a finite positive number
    #[error("Invalid blank/sample ratio cutoff: {0}")]
    InvalidCutoff(f64),

    /// Two input maps share the same raw file stem
    #[error("Duplicate input file: {0}")]
    DuplicateSource(String),

    /// No input map is left once blanks are set aside
    #[error("No sample files: every input is a blank")]
    NoSampleFiles,

    /// A planned rewrite or deletion refers to a map that was never loaded
    #[error("No stored feature map for {0}")]
    UnknownMap(String),

    /// Feature grouping failed
    #[error("Grouping error: {0}")]
    Grouping(#[from] GroupingError),

    /// Loading or persisting a feature map failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
