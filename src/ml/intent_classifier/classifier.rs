//! Intent classifier trait definition.

use anyhow::Result;

use crate::ml::intent_classifier::types::IntentPrediction;

/// Intent classifier trait.
///
/// Implementations return a single label with a confidence in `[0, 1]`;
/// callers decide whether the confidence is high enough to act on.
pub trait IntentClassifier: Send + Sync {
    /// Predict the intent for a given message.
    fn predict(&self, text: &str) -> Result<IntentPrediction>;

    /// Get the name of this classifier for debugging and logging.
    fn name(&self) -> &str;
}
