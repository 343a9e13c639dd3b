use thiserror::Error;

/// Result type for wadocat operations
pub type Result<T> = std::result::Result<T, WadocatError>;

/// Error types for wadocat operations
#[derive(Error, Debug)]
pub enum WadocatError {
    /// Series metadata retrieval failed; fatal to the whole batch
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// A required PET attribute is absent; fails that instance only
    #[error("Required metadata missing: {0}")]
    RequiredMetadataMissing(String),

    /// The batched SUV scaling call failed; recovered by the pipeline
    #[error("Scaling computation error: {0}")]
    ScalingComputation(String),

    /// Attribute value present but not convertible to the expected shape
    #[error("Invalid attribute value: {0}")]
    InvalidValue(String),

    /// JSON payload error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// Helper conversions
impl From<String> for WadocatError {
    fn from(s: String) -> Self {
        WadocatError::InvalidValue(s)
    }
}

impl From<&str> for WadocatError {
    fn from(s: &str) -> Self {
        WadocatError::InvalidValue(s.to_string())
    }
}
