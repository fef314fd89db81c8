//! Scoring error types
//!
//! One error enum for the whole pipeline. Inference-facing variants map onto the
//! three boundary conditions (model unavailable, bad input, schema mismatch); the
//! rest only surface during training or artifact I/O.

use thiserror::Error;

/// Errors raised by training, persistence and scoring
#[derive(Debug, Error)]
pub enum ScoringError {
    /// Model artifacts are absent or failed to load
    #[error("Model not loaded: {0}")]
    ModelNotLoaded(String),

    /// Out-of-range or missing required input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Persisted feature schema is absent, corrupt or disagrees with the model
    #[error("Feature schema mismatch: {0}")]
    FeatureSchemaMismatch(String),

    /// Artifact storage error (checksum, kind, layout)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Training run failed
    #[error("Training failed: {0}")]
    Training(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Scoring result type
pub type Result<T> = std::result::Result<T, ScoringError>;

impl ScoringError {
    /// Errors the caller can recover from without restarting the process
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ModelNotLoaded(_) | Self::InvalidInput(_) | Self::FeatureSchemaMismatch(_)
        )
    }

    /// Errors that must be reported as "model unavailable" at the boundary
    pub fn is_model_unavailable(&self) -> bool {
        matches!(self, Self::ModelNotLoaded(_) | Self::FeatureSchemaMismatch(_))
    }
}

impl From<bincode::Error> for ScoringError {
    fn from(err: bincode::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for ScoringError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScoringError::ModelNotLoaded("phishing".to_string());
        assert_eq!(err.to_string(), "Model not loaded: phishing");
    }

    #[test]
    fn test_error_is_recoverable() {
        assert!(ScoringError::InvalidInput("login_hour".to_string()).is_recoverable());
        assert!(ScoringError::FeatureSchemaMismatch("len".to_string()).is_recoverable());
        assert!(!ScoringError::Training("single class".to_string()).is_recoverable());
    }

    #[test]
    fn test_schema_mismatch_is_unavailable() {
        let err = ScoringError::FeatureSchemaMismatch("missing file".to_string());
        assert!(err.is_model_unavailable());
        assert!(!ScoringError::InvalidInput("x".to_string()).is_model_unavailable());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ScoringError = io.into();
        assert!(matches!(err, ScoringError::Io(_)));
    }
}
