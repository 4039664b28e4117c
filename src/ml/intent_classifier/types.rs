//! Common types for intent classification.

use serde::{Deserialize, Serialize};

/// Training sample for intent classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentSample {
    /// Message text.
    pub query: String,
    /// Intent label, e.g. `budget_query`.
    pub intent: String,
}

impl IntentSample {
    pub fn new<Q: Into<String>, I: Into<String>>(query: Q, intent: I) -> Self {
        IntentSample {
            query: query.into(),
            intent: intent.into(),
        }
    }
}

/// A predicted label with its confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentPrediction {
    pub label: String,
    /// Normalized margin between the two best labels, in `[0, 1]`.
    pub confidence: f64,
}
