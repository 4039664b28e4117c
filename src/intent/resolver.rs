//! Combines the rule resolver with an optional statistical model.

use std::sync::Arc;

use log::{debug, warn};
use serde::Serialize;

use crate::intent::label::Intent;
use crate::intent::rules::RuleBasedResolver;
use crate::ml::intent_classifier::{IntentClassifier, IntentPrediction};
use crate::nlu::types::ExtractedQuery;

/// Which strategy produced the final intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentSource {
    Rules,
    Model,
}

/// The resolved intent plus what the model said, if it was consulted.
#[derive(Debug, Clone, PartialEq)]
pub struct IntentDecision {
    pub intent: Intent,
    pub source: IntentSource,
    pub prediction: Option<IntentPrediction>,
}

pub struct IntentResolver {
    rules: RuleBasedResolver,
    model: Arc<dyn IntentClassifier>,
    confidence_floor: f64,
}

impl std::fmt::Debug for IntentResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentResolver")
            .field("rules", &self.rules)
            .field("model", &self.model.name())
            .field("confidence_floor", &self.confidence_floor)
            .finish()
    }
}

impl IntentResolver {
    pub fn new(rules: RuleBasedResolver, model: Arc<dyn IntentClassifier>, confidence_floor: f64) -> Self {
        IntentResolver {
            rules,
            model,
            confidence_floor,
        }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Resolve the intent of one message.
    ///
    /// Extracted model names always decide the intent. Otherwise a model
    /// prediction at or above the confidence floor is used, and anything
    /// else falls back to the rules.
    pub fn resolve(&self, query: &ExtractedQuery) -> IntentDecision {
        let rule_intent = self.rules.resolve(query);
        let rules_only = |prediction: Option<IntentPrediction>| IntentDecision {
            intent: rule_intent,
            source: IntentSource::Rules,
            prediction,
        };

        if !query.models_mentioned.is_empty() {
            return rules_only(None);
        }

        let prediction = match self.model.predict(&query.original_text) {
            Ok(prediction) => prediction,
            Err(e) => {
                warn!("intent model '{}' failed, using rules: {e:#}", self.model.name());
                return rules_only(None);
            }
        };

        if prediction.confidence < self.confidence_floor {
            debug!(
                "intent model unsure ({} at {:.2}), using rules: {}",
                prediction.label, prediction.confidence, rule_intent
            );
            return rules_only(Some(prediction));
        }

        match prediction.label.parse::<Intent>() {
            // model-name intents need extracted names to act on
            Ok(Intent::ModelSearch | Intent::MultiModelSearch) => rules_only(Some(prediction)),
            Ok(intent) => {
                debug!(
                    "intent model chose {} at {:.2} (rules said {})",
                    intent, prediction.confidence, rule_intent
                );
                IntentDecision {
                    intent,
                    source: IntentSource::Model,
                    prediction: Some(prediction),
                }
            }
            Err(_) => {
                warn!("intent model returned unknown label '{}', using rules", prediction.label);
                rules_only(Some(prediction))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NluConfig;
    use crate::ml::intent_classifier::NullIntentModel;
    use crate::nlu::extractor::{ContinuationHints, QueryExtractor};

    struct FixedModel(&'static str, f64);

    impl IntentClassifier for FixedModel {
        fn predict(&self, _text: &str) -> anyhow::Result<IntentPrediction> {
            Ok(IntentPrediction {
                label: self.0.to_string(),
                confidence: self.1,
            })
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct BrokenModel;

    impl IntentClassifier for BrokenModel {
        fn predict(&self, _text: &str) -> anyhow::Result<IntentPrediction> {
            anyhow::bail!("weights missing")
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    fn decide(model: Arc<dyn IntentClassifier>, text: &str) -> IntentDecision {
        let config = NluConfig::default();
        let query = QueryExtractor::new(&config)
            .unwrap()
            .extract(text, &ContinuationHints::default())
            .unwrap();
        IntentResolver::new(RuleBasedResolver::new(&config).unwrap(), model, 0.25).resolve(&query)
    }

    #[test]
    fn test_confident_model_wins() {
        let decision = decide(Arc::new(FixedModel("camera_focused", 0.9)), "phones under 2000");
        assert_eq!(decision.intent, Intent::CameraFocused);
        assert_eq!(decision.source, IntentSource::Model);
    }

    #[test]
    fn test_unsure_or_missing_model_defers_to_rules() {
        let decision = decide(Arc::new(FixedModel("camera_focused", 0.1)), "phones under 2000");
        assert_eq!(decision.intent, Intent::BudgetQuery);
        assert_eq!(decision.source, IntentSource::Rules);

        let decision = decide(Arc::new(NullIntentModel), "phones under 2000");
        assert_eq!(decision.intent, Intent::BudgetQuery);

        let decision = decide(Arc::new(BrokenModel), "phones under 2000");
        assert_eq!(decision.intent, Intent::BudgetQuery);
        assert!(decision.prediction.is_none());

        let decision = decide(Arc::new(FixedModel("shopping", 0.9)), "phones under 2000");
        assert_eq!(decision.intent, Intent::BudgetQuery);
    }

    #[test]
    fn test_model_names_cannot_be_overridden() {
        let decision = decide(Arc::new(FixedModel("budget_query", 1.0)), "iPhone 15 under 3000");
        assert_eq!(decision.intent, Intent::ModelSearch);
        assert!(decision.prediction.is_none());
    }
}
