//! Error types for the Phonewise library.
//!
//! All fallible library operations return [`PhonewiseError`] through the
//! crate-wide [`Result`] alias. The conversational pipeline itself degrades
//! gracefully on most failures; only catalog access errors reach the caller.
//!
//! # Examples
//!
//! ```
//! use phonewise::error::{PhonewiseError, Result};
//!
//! fn lookup(id: u64) -> Result<()> {
//!     Err(PhonewiseError::not_found(format!("phone {id}")))
//! }
//!
//! assert_eq!(lookup(7).unwrap_err().to_string(), "Error: Not found: phone 7");
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Phonewise operations.
#[derive(Error, Debug)]
pub enum PhonewiseError {
    /// I/O errors (config, catalog or model files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Catalog store errors
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Intent model errors (training, loading, prediction)
    #[error("Model error: {0}")]
    Model(String),

    /// Conversation context errors
    #[error("Context error: {0}")]
    Context(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with PhonewiseError.
pub type Result<T> = std::result::Result<T, PhonewiseError>;

impl PhonewiseError {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        PhonewiseError::Analysis(msg.into())
    }

    /// Create a new catalog error.
    pub fn catalog<S: Into<String>>(msg: S) -> Self {
        PhonewiseError::Catalog(msg.into())
    }

    /// Create a new config error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        PhonewiseError::Config(msg.into())
    }

    /// Create a new model error.
    pub fn model<S: Into<String>>(msg: S) -> Self {
        PhonewiseError::Model(msg.into())
    }

    /// Create a new context error.
    pub fn context<S: Into<String>>(msg: S) -> Self {
        PhonewiseError::Context(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        PhonewiseError::Other(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        PhonewiseError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Create a new not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        PhonewiseError::Other(format!("Not found: {}", msg.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = PhonewiseError::catalog("store offline");
        assert_eq!(error.to_string(), "Catalog error: store offline");

        let error = PhonewiseError::model("artifact truncated");
        assert_eq!(error.to_string(), "Model error: artifact truncated");

        let error = PhonewiseError::invalid_argument("top_n must be positive");
        assert_eq!(
            error.to_string(),
            "Error: Invalid argument: top_n must be positive"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = PhonewiseError::from(io_error);

        match error {
            PhonewiseError::Io(_) => {}
            _ => panic!("Expected IO error variant"),
        }
    }
}
