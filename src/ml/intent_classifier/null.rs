//! Stand-in model used when no trained artifact is available.

use anyhow::Result;

use crate::ml::intent_classifier::classifier::IntentClassifier;
use crate::ml::intent_classifier::types::IntentPrediction;

/// Always answers `general` with zero confidence, so every caller falls
/// through to rule-based resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullIntentModel;

impl IntentClassifier for NullIntentModel {
    fn predict(&self, _text: &str) -> Result<IntentPrediction> {
        Ok(IntentPrediction {
            label: "general".to_string(),
            confidence: 0.0,
        })
    }

    fn name(&self) -> &str {
        "null"
    }
}
