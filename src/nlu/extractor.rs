//! Runs every extractor over one message and assembles an [`ExtractedQuery`].

use log::debug;

use crate::config::NluConfig;
use crate::error::Result;
use crate::nlu::brand::BrandExtractor;
use crate::nlu::budget::BudgetExtractor;
use crate::nlu::keyword::{KeywordSet, MatchMode};
use crate::nlu::model::ModelExtractor;
use crate::nlu::spec::SpecExtractor;
use crate::nlu::types::{BudgetRange, ExtractedQuery, Persona, UsageType};

/// Session facts that decide whether a bare brand message continues a
/// previous search.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContinuationHints {
    pub has_last_intent: bool,
    pub has_active_filters: bool,
    pub battery_focus: bool,
    pub camera_focus: bool,
}

#[derive(Debug)]
struct PersonaMatcher {
    persona: Persona,
    keywords: KeywordSet,
    usage: UsageType,
    budget: Option<BudgetRange>,
}

/// Entity extraction for chat messages.
///
/// All regexes and keyword tables are compiled once from [`NluConfig`].
#[derive(Debug)]
pub struct QueryExtractor {
    budget: BudgetExtractor,
    brands: BrandExtractor,
    models: ModelExtractor,
    specs: SpecExtractor,
    usage: Vec<(UsageType, KeywordSet)>,
    personas: Vec<PersonaMatcher>,
    features: Vec<(String, KeywordSet)>,
    battery_focus: KeywordSet,
    camera_focus: KeywordSet,
}

impl QueryExtractor {
    pub fn new(config: &NluConfig) -> Result<Self> {
        let usage = config
            .usage_keywords
            .iter()
            .map(|u| Ok((u.usage, KeywordSet::new(&u.keywords, MatchMode::Prefix)?)))
            .collect::<Result<Vec<_>>>()?;
        let personas = config
            .personas
            .iter()
            .map(|p| {
                Ok(PersonaMatcher {
                    persona: p.persona,
                    keywords: KeywordSet::new(&p.keywords, MatchMode::Prefix)?,
                    usage: p.usage,
                    budget: p.budget,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let features = config
            .features
            .iter()
            .map(|f| Ok((f.feature.clone(), KeywordSet::new(&f.keywords, MatchMode::Prefix)?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(QueryExtractor {
            budget: BudgetExtractor::new(config),
            brands: BrandExtractor::new(config)?,
            models: ModelExtractor::new(),
            specs: SpecExtractor::new(),
            usage,
            personas,
            features,
            battery_focus: KeywordSet::new(&config.battery_focus_keywords, MatchMode::Prefix)?,
            camera_focus: KeywordSet::new(&config.camera_focus_keywords, MatchMode::Prefix)?,
        })
    }

    pub fn extract(&self, text: &str, hints: &ContinuationHints) -> Result<ExtractedQuery> {
        let lower = text.to_lowercase();

        let mentions = self.brands.extract(&lower)?;
        let models_mentioned = self.models.extract(&lower);
        let (spec_min, spec_other) = self.specs.extract(&lower);
        let mut budget = self.budget.extract(&lower);

        let mut usage_type = self
            .usage
            .iter()
            .find(|(_, keywords)| keywords.is_match(&lower))
            .map(|(usage, _)| *usage);
        let persona = self.personas.iter().find(|p| p.keywords.is_match(&lower));
        if let Some(matched) = persona {
            usage_type = Some(matched.usage);
            if budget.is_none() {
                budget = matched.budget;
            }
        }

        let feature = self
            .features
            .iter()
            .find(|(_, keywords)| keywords.is_match(&lower))
            .map(|(feature, _)| feature.clone());

        let is_simple_brand_query = self.brands.is_simple_brand_query(&lower, &mentions)?;
        let context_continuation = self.brands.is_bare_brand_keyword(&lower)
            && hints.has_last_intent
            && (hints.has_active_filters || hints.battery_focus || hints.camera_focus);
        let is_multi_model = models_mentioned.len() > 1
            || (!models_mentioned.is_empty()
                && (lower.contains(" and ") || lower.contains(" & ") || lower.contains(',')));

        let query = ExtractedQuery {
            original_text: text.to_string(),
            budget,
            has_explicit_sentiment: self.brands.has_explicit_sentiment(&lower),
            brands_preferred: mentions.preferred,
            brands_excluded: mentions.excluded,
            models_mentioned,
            spec_min,
            spec_other,
            usage_type,
            persona: persona.map(|p| p.persona),
            feature,
            battery_focus: self.battery_focus.is_match(&lower),
            camera_focus: self.camera_focus.is_match(&lower),
            is_simple_brand_query,
            context_continuation,
            is_multi_model,
        };

        debug!(
            "extracted from {:?}: budget={:?} preferred={:?} excluded={:?} models={} usage={:?} persona={:?}",
            text,
            query.budget,
            query.brands_preferred,
            query.brands_excluded,
            query.models_mentioned.len(),
            query.usage_type,
            query.persona
        );

        Ok(query)
    }
}
