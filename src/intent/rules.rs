//! Priority-ordered intent rules over extracted entities.

use crate::config::NluConfig;
use crate::error::Result;
use crate::intent::label::Intent;
use crate::nlu::keyword::{KeywordSet, MatchMode};
use crate::nlu::types::ExtractedQuery;

/// Resolves an intent from extractor output. The first matching rule wins:
/// models, spec thresholds, usage, battery focus, camera focus, brands,
/// budget, then greeting, help and comparison phrases.
#[derive(Debug, Clone)]
pub struct RuleBasedResolver {
    greeting: KeywordSet,
    help: KeywordSet,
    comparison: KeywordSet,
}

impl RuleBasedResolver {
    pub fn new(config: &NluConfig) -> Result<Self> {
        Ok(RuleBasedResolver {
            greeting: KeywordSet::new(&config.greeting_phrases, MatchMode::Word)?,
            help: KeywordSet::new(&config.help_phrases, MatchMode::Word)?,
            comparison: KeywordSet::new(&config.comparison_phrases, MatchMode::Word)?,
        })
    }

    pub fn resolve(&self, query: &ExtractedQuery) -> Intent {
        let text = query.original_text.to_lowercase();

        if !query.models_mentioned.is_empty() {
            if query.is_multi_model {
                Intent::MultiModelSearch
            } else {
                Intent::ModelSearch
            }
        } else if !query.spec_min.is_empty() {
            Intent::SpecFilter
        } else if query.usage_type.is_some() {
            Intent::UsageRecommendation
        } else if query.battery_focus {
            Intent::BatteryFocused
        } else if query.camera_focus {
            Intent::CameraFocused
        } else if query.has_brands() {
            Intent::BrandQuery
        } else if query.budget.is_some() {
            Intent::BudgetQuery
        } else if self.greeting.is_match(&text) {
            Intent::Greeting
        } else if self.help.is_match(&text) {
            Intent::Help
        } else if self.comparison.is_match(&text) {
            Intent::Comparison
        } else {
            Intent::General
        }
    }
}
