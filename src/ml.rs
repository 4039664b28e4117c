//! Statistical intent prediction.
//!
//! The rule resolver in [`crate::intent`] is always available; the model
//! here is an optional second opinion trained offline on labelled chat
//! messages.

pub mod intent_classifier;

/// Machine learning error types.
#[derive(Debug, thiserror::Error)]
pub enum MLError {
    #[error("Model not trained: {message}")]
    ModelNotTrained { message: String },

    #[error("Training data insufficient: need at least {min_samples} samples, got {actual}")]
    InsufficientTrainingData { min_samples: usize, actual: usize },

    #[error("Training data needs at least two distinct intents")]
    SingleLabel,

    #[error("Model artifact mismatch: {message}")]
    ArtifactMismatch { message: String },
}
