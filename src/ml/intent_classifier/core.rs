//! Training data and model loading helpers.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use log::warn;

use crate::config::ClassifierConfig;
use crate::ml::intent_classifier::classifier::IntentClassifier;
use crate::ml::intent_classifier::linear::LinearIntentClassifier;
use crate::ml::intent_classifier::null::NullIntentModel;
use crate::ml::intent_classifier::types::IntentSample;

/// Load training data from a JSON file of `[{"query": .., "intent": ..}]`.
pub fn load_training_data<P: AsRef<Path>>(path: P) -> Result<Vec<IntentSample>> {
    let content = std::fs::read_to_string(path)?;
    let samples: Vec<IntentSample> = serde_json::from_str(&content)?;
    Ok(samples)
}

/// Load the configured model artifact, or fall back to [`NullIntentModel`]
/// when there is none or it cannot be read.
pub fn load_or_null(config: &ClassifierConfig) -> Arc<dyn IntentClassifier> {
    let Some(path) = &config.model_path else {
        return Arc::new(NullIntentModel);
    };
    match LinearIntentClassifier::load(path) {
        Ok(model) => Arc::new(model),
        Err(e) => {
            warn!("intent model unavailable, using rules only: {e:#}");
            Arc::new(NullIntentModel)
        }
    }
}

const SAMPLES: &[(&str, &str)] = &[
    ("hello", "greeting"),
    ("hello there", "greeting"),
    ("hi", "greeting"),
    ("hey", "greeting"),
    ("good morning", "greeting"),
    ("good evening", "greeting"),
    ("hi there, how are you", "greeting"),
    ("help", "help"),
    ("what can you do", "help"),
    ("how does this work", "help"),
    ("i need help", "help"),
    ("how do i use this", "help"),
    ("show me iphone 15 pro", "model_search"),
    ("galaxy s24 ultra", "model_search"),
    ("tell me about pixel 8", "model_search"),
    ("xiaomi 14 ultra price", "model_search"),
    ("is the redmi note 13 good", "model_search"),
    ("iphone 15 and galaxy s24", "multi_model_search"),
    ("pixel 8, iphone 15 and xiaomi 14", "multi_model_search"),
    ("show me galaxy s23 & iphone 14", "multi_model_search"),
    ("poco x6 and redmi note 13", "multi_model_search"),
    ("battery above 5000mah", "spec_filter"),
    ("at least 8gb ram", "spec_filter"),
    ("camera over 64mp", "spec_filter"),
    ("256gb storage phones", "spec_filter"),
    ("phone with 12gb ram and 5000mah", "spec_filter"),
    ("long lasting battery", "battery_focused"),
    ("best battery life", "battery_focused"),
    ("phone that lasts all day", "battery_focused"),
    ("good battery phone", "battery_focused"),
    ("which phone charges fastest", "battery_focused"),
    ("best camera phone", "camera_focused"),
    ("good camera for selfies", "camera_focused"),
    ("phone for photos and video", "camera_focused"),
    ("night mode camera", "camera_focused"),
    ("zoom lens phone", "camera_focused"),
    ("phone for gaming", "usage_recommendation"),
    ("good for work and business", "usage_recommendation"),
    ("phone for watching netflix", "usage_recommendation"),
    ("phone for my grandma", "usage_recommendation"),
    ("student phone", "usage_recommendation"),
    ("for instagram and tiktok", "usage_recommendation"),
    ("samsung phones", "brand_query"),
    ("i love apple", "brand_query"),
    ("show me xiaomi", "brand_query"),
    ("i hate oppo", "brand_query"),
    ("anything but huawei", "brand_query"),
    ("phones under 2000", "budget_query"),
    ("budget rm1500", "budget_query"),
    ("between 1000 and 2000", "budget_query"),
    ("cheap phone around 800", "budget_query"),
    ("something below rm3000", "budget_query"),
    ("compare these two", "comparison"),
    ("which is better", "comparison"),
    ("difference between them", "comparison"),
    ("compare phones", "comparison"),
    ("versus", "comparison"),
    ("what's new", "general"),
    ("recommend me a phone", "general"),
    ("i need a new phone", "general"),
    ("any suggestions", "general"),
    ("phone with nfc", "general"),
];

/// Built-in labelled messages covering every intent.
pub fn default_training_samples() -> Vec<IntentSample> {
    SAMPLES
        .iter()
        .map(|(query, intent)| IntentSample::new(*query, *intent))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_samples_cover_all_intents() {
        let samples = default_training_samples();
        let mut labels: Vec<&str> = samples.iter().map(|s| s.intent.as_str()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), 12);
    }

    #[test]
    fn test_load_training_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("samples.json");
        std::fs::write(
            &path,
            r#"[{"query": "hi", "intent": "greeting"}, {"query": "phones under 900", "intent": "budget_query"}]"#,
        )
        .unwrap();

        let samples = load_training_data(&path).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1], IntentSample::new("phones under 900", "budget_query"));
    }

    #[test]
    fn test_missing_artifact_falls_back_to_null() {
        let config = ClassifierConfig {
            model_path: Some("/nonexistent/intent.bin".into()),
            ..Default::default()
        };
        assert_eq!(load_or_null(&config).name(), "null");
        assert_eq!(load_or_null(&ClassifierConfig::default()).name(), "null");
    }
}
