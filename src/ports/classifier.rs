//! Classifier port: Trait for pre-trained model inference.
//!
//! This trait abstracts the model artifact format from the application logic.

/// Errors that can occur while loading or running a classifier.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("Feature mismatch: {0}")]
    FeatureMismatch(String),

    #[error("Model digest mismatch (expected {expected}, got {actual})")]
    DigestMismatch { expected: String, actual: String },

    #[error("Model digest required but none configured for {0}")]
    DigestMissing(String),
}

/// Trait for inference against an already-fitted model.
///
/// Implementations are immutable after loading and safe to share.
pub trait Classifier: Send + Sync {
    /// Predict the class label for one feature vector.
    ///
    /// # Errors
    /// Returns `ClassifierError::FeatureMismatch` if the vector length does
    /// not match the model.
    fn predict(&self, features: &[f64]) -> Result<i64, ClassifierError>;

    /// Number of input features the model expects.
    fn n_features(&self) -> usize;

    /// Short human-readable description of the model.
    fn describe(&self) -> String;
}
