//! The top-level chat pipeline.
//!
//! One message runs through extraction, intent resolution, context merge,
//! ranking and composition while holding its session's lock. Only catalog
//! failures reach the caller; everything else degrades to a plainer answer.

use std::sync::Arc;

use chrono::Utc;
use log::{debug, info, warn};
use uuid::Uuid;

use crate::assistant::history::{ChatRecord, HistorySink, NoopHistory};
use crate::catalog::CatalogStore;
use crate::catalog::entry::CatalogEntry;
use crate::compare::{ComparisonResult, compare_entries};
use crate::config::AssistantConfig;
use crate::context::{ContextStore, ConversationContext};
use crate::error::Result;
use crate::intent::{Intent, IntentDecision, IntentResolver, RuleBasedResolver};
use crate::ml::intent_classifier::{IntentClassifier, load_or_null};
use crate::nlu::{ExtractedQuery, QueryExtractor};
use crate::recommend::{RankedResult, RecommendationEngine, SearchConstraints};
use crate::respond::{ChatReply, ComposedReply, PhoneSummary, ReplyMetadata, ResponseComposer};

/// Conversational phone assistant.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use phonewise::assistant::Assistant;
/// use phonewise::catalog::entry::CatalogEntry;
/// use phonewise::catalog::memory::InMemoryCatalog;
/// use phonewise::config::AssistantConfig;
/// use phonewise::intent::Intent;
///
/// # fn main() -> phonewise::error::Result<()> {
/// let catalog = InMemoryCatalog::from_entries(vec![
///     CatalogEntry::new(1, "Samsung", "Galaxy A55", 1699.0),
///     CatalogEntry::new(2, "Apple", "iPhone 15", 3999.0),
/// ]);
/// let assistant = Assistant::new(Arc::new(catalog), Arc::new(AssistantConfig::default()))?;
///
/// let reply = assistant.classify_and_respond("s1", None, "phones under 2000")?;
/// assert_eq!(reply.intent, Intent::BudgetQuery);
/// assert_eq!(reply.phone_ids(), vec![1]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Assistant {
    config: Arc<AssistantConfig>,
    extractor: QueryExtractor,
    resolver: IntentResolver,
    contexts: ContextStore,
    engine: RecommendationEngine,
    composer: ResponseComposer,
    history: Arc<dyn HistorySink>,
}

impl Assistant {
    /// Build an assistant over a catalog. The intent model configured in
    /// [`ClassifierConfig::model_path`](crate::config::ClassifierConfig) is
    /// loaded if present; otherwise the rules decide alone.
    pub fn new(catalog: Arc<dyn CatalogStore>, config: Arc<AssistantConfig>) -> Result<Self> {
        config.validate()?;
        let model = load_or_null(&config.classifier);
        info!("Intent model: {}", model.name());

        Ok(Assistant {
            extractor: QueryExtractor::new(&config.nlu)?,
            resolver: IntentResolver::new(
                RuleBasedResolver::new(&config.nlu)?,
                model,
                config.classifier.confidence_floor,
            ),
            contexts: ContextStore::new(config.context.clone()),
            engine: RecommendationEngine::new(catalog, config.ranking.clone()),
            composer: ResponseComposer::new(config.templates.clone()),
            history: Arc::new(NoopHistory),
            config,
        })
    }

    /// Replace the intent model.
    pub fn with_intent_model(mut self, model: Arc<dyn IntentClassifier>) -> Result<Self> {
        info!("Intent model: {}", model.name());
        self.resolver = IntentResolver::new(
            RuleBasedResolver::new(&self.config.nlu)?,
            model,
            self.config.classifier.confidence_floor,
        );
        Ok(self)
    }

    pub fn with_history(mut self, history: Arc<dyn HistorySink>) -> Self {
        self.history = history;
        self
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    pub fn contexts(&self) -> &ContextStore {
        &self.contexts
    }

    pub fn engine(&self) -> &RecommendationEngine {
        &self.engine
    }

    /// Answer one chat message.
    ///
    /// An empty `session_id` starts a new session whose id is returned in
    /// the metadata. History is only recorded for known users.
    pub fn classify_and_respond(
        &self,
        session_id: &str,
        user_id: Option<&str>,
        text: &str,
    ) -> Result<ChatReply> {
        let session_id = if session_id.trim().is_empty() {
            new_session_id(user_id)
        } else {
            session_id.to_string()
        };

        let ctx = self.contexts.get_or_create(&session_id);
        let mut ctx = ctx.lock();

        let query = self
            .extractor
            .extract(text, &ctx.hints())
            .unwrap_or_else(|e| {
                warn!("Extraction failed, answering without entities: {e}");
                ExtractedQuery {
                    original_text: text.to_string(),
                    ..ExtractedQuery::default()
                }
            });
        let decision = self.resolver.resolve(&query);
        debug!(
            "Session {session_id}: intent {} via {:?}",
            decision.intent, decision.source
        );

        ctx.merge(
            &query,
            decision.intent,
            Utc::now(),
            self.config.context.max_messages,
        );
        let (composed, ranked) = self.respond(&query, &decision, &ctx)?;
        drop(ctx);

        let reply = ChatReply {
            reply_text: composed.text,
            intent: decision.intent,
            metadata: ReplyMetadata {
                session_id: session_id.clone(),
                reply_type: composed.reply_type,
                phones: ranked.iter().map(PhoneSummary::from).collect(),
                statistical_intent: decision.prediction,
                quick_replies: composed.quick_replies,
                action: composed.action,
            },
            ranked_results: ranked,
        };

        if let Some(user_id) = user_id {
            self.record_history(&session_id, user_id, text, &reply);
        }
        Ok(reply)
    }

    /// Compare two catalog entries. `None` if either id is unknown.
    pub fn compare(&self, entry_a_id: u64, entry_b_id: u64) -> Result<Option<ComparisonResult>> {
        let catalog = self.engine.catalog();
        let (Some(a), Some(b)) = (catalog.get_by_id(entry_a_id)?, catalog.get_by_id(entry_b_id)?)
        else {
            return Ok(None);
        };
        Ok(Some(compare_entries(&a, &b)))
    }

    /// Reset a session's filters and focus flags.
    pub fn clear_filters(&self, session_id: &str) -> bool {
        self.contexts.clear_filters(session_id)
    }

    fn respond(
        &self,
        query: &ExtractedQuery,
        decision: &IntentDecision,
        ctx: &ConversationContext,
    ) -> Result<(ComposedReply, Vec<RankedResult>)> {
        let top_n = self.config.ranking.top_n;
        let composer = &self.composer;
        let filters = &ctx.active_filters;
        let preferred = &ctx.brand_preferences.preferred;
        let constraints = SearchConstraints::new()
            .with_brands(preferred.clone())
            .with_excluded_brands(ctx.brand_preferences.excluded.clone())
            .with_budget(filters.budget);

        let answer = match decision.intent {
            Intent::Greeting => (composer.greeting(), Vec::new()),
            Intent::Help => (composer.help(), Vec::new()),
            Intent::Comparison => (composer.comparison(), Vec::new()),
            Intent::ModelSearch => {
                let mention = query
                    .models_mentioned
                    .first()
                    .map_or(query.original_text.as_str(), |m| m.text.as_str());
                let matches = self.engine.find_models(mention)?;
                (composer.model(mention, &matches), model_results(&matches))
            }
            Intent::MultiModelSearch => {
                let mut matches = if query.models_mentioned.is_empty() {
                    Vec::new()
                } else {
                    let joined = query
                        .models_mentioned
                        .iter()
                        .map(|m| m.text.as_str())
                        .collect::<Vec<_>>()
                        .join(", ");
                    self.engine.find_model_list(&joined)?
                };
                if matches.is_empty() {
                    matches = self.engine.find_model_list(&query.original_text)?;
                }
                (composer.multi_model(&matches), model_results(&matches))
            }
            Intent::SpecFilter => {
                let mut spec = query.spec_min.clone();
                spec.battery = spec.battery.or(filters.battery_min);
                spec.camera = spec.camera.or(filters.camera_min);
                spec.ram = spec.ram.or(filters.ram_min);
                spec.storage = spec.storage.or(filters.storage_min);
                let results = self.engine.recommend_by_specs(&spec, &constraints, top_n)?;
                (composer.spec_filter(&spec, preferred, &results), results)
            }
            Intent::BatteryFocused => self.battery_answer(&constraints, ctx)?,
            Intent::CameraFocused => self.camera_answer(&constraints, ctx)?,
            Intent::UsageRecommendation => match query.usage_type.or(filters.usage_type) {
                Some(usage) => {
                    let results = self.engine.recommend_by_usage(
                        usage,
                        query.persona,
                        &constraints,
                        top_n,
                    )?;
                    (composer.usage(usage, filters.budget, &results), results)
                }
                None => (composer.general(), Vec::new()),
            },
            Intent::BrandQuery => {
                if ctx.focus.battery && !preferred.is_empty() {
                    debug!("Brand query in a battery-focused session");
                    self.battery_answer(&constraints, ctx)?
                } else if ctx.focus.camera && !preferred.is_empty() {
                    debug!("Brand query in a camera-focused session");
                    self.camera_answer(&constraints, ctx)?
                } else {
                    let results = self.engine.recommend_by_brand(&constraints, top_n)?;
                    (composer.brand(preferred, filters.budget, &results), results)
                }
            }
            Intent::BudgetQuery => {
                let budget = query.budget.or(filters.budget);
                if budget.is_none() {
                    (composer.budget(None, &[]), Vec::new())
                } else {
                    let constraints = constraints.with_budget(budget);
                    let results = self.engine.recommend_by_budget(&constraints, top_n)?;
                    (composer.budget(budget, &results), results)
                }
            }
            Intent::General => match query.feature.as_deref() {
                Some(feature) => {
                    let results = self
                        .engine
                        .recommend_by_feature(feature, &constraints, top_n)?;
                    (composer.feature(feature, filters.budget, &results), results)
                }
                None => (composer.general(), Vec::new()),
            },
        };
        Ok(answer)
    }

    fn battery_answer(
        &self,
        constraints: &SearchConstraints,
        ctx: &ConversationContext,
    ) -> Result<(ComposedReply, Vec<RankedResult>)> {
        let results = self
            .engine
            .recommend_by_battery(constraints, self.config.ranking.top_n)?;
        let reply = self.composer.battery(
            &ctx.brand_preferences.preferred,
            ctx.active_filters.budget,
            &results,
        );
        Ok((reply, results))
    }

    fn camera_answer(
        &self,
        constraints: &SearchConstraints,
        ctx: &ConversationContext,
    ) -> Result<(ComposedReply, Vec<RankedResult>)> {
        let min_mp = ctx
            .active_filters
            .camera_min
            .unwrap_or(self.config.ranking.photography_min_mp);
        let results = self.engine.recommend_for_photography(
            Some(min_mp),
            constraints,
            self.config.ranking.top_n,
        )?;
        let reply = self.composer.camera(
            &ctx.brand_preferences.preferred,
            ctx.active_filters.budget,
            min_mp,
            &results,
        );
        Ok((reply, results))
    }

    fn record_history(&self, session_id: &str, user_id: &str, message: &str, reply: &ChatReply) {
        let record = ChatRecord {
            session_id: session_id.to_string(),
            user_id: user_id.to_string(),
            message: message.to_string(),
            reply: reply.reply_text.clone(),
            intent: reply.intent,
            timestamp: Utc::now(),
            phone_ids: reply.phone_ids(),
        };
        if let Err(e) = self.history.record(&record) {
            warn!("Failed to save chat history for session {session_id}: {e}");
        }
    }
}

fn model_results(matches: &[(CatalogEntry, f64)]) -> Vec<RankedResult> {
    matches
        .iter()
        .map(|(entry, similarity)| {
            RankedResult::new(
                entry.clone(),
                *similarity,
                format!("{similarity:.0}% name match"),
            )
        })
        .collect()
}

/// `session_<user>_<uuid>`, with `guest` for anonymous callers.
pub fn new_session_id(user_id: Option<&str>) -> String {
    format!(
        "session_{}_{}",
        user_id.unwrap_or("guest"),
        Uuid::new_v4().simple()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::history::InMemoryHistory;
    use crate::catalog::entry::SpecSet;
    use crate::catalog::memory::InMemoryCatalog;
    use crate::error::PhonewiseError;
    use crate::ml::intent_classifier::IntentPrediction;

    fn catalog() -> InMemoryCatalog {
        let phone = |id, brand: &str, model: &str, price, mah, mp| {
            CatalogEntry::new(id, brand, model, price).with_specs(SpecSet {
                battery_capacity_mah: Some(mah),
                rear_camera_main_mp: Some(mp),
                ..SpecSet::default()
            })
        };
        InMemoryCatalog::from_entries(vec![
            phone(1, "Samsung", "Galaxy A15", 799.0, 5000, 50),
            phone(2, "Samsung", "Galaxy S24", 3999.0, 4000, 50),
            phone(3, "Apple", "iPhone 15", 3999.0, 3349, 48),
            phone(4, "Xiaomi", "Redmi Note 13", 899.0, 5000, 108),
        ])
    }

    fn assistant() -> Assistant {
        Assistant::new(Arc::new(catalog()), Arc::new(AssistantConfig::default())).unwrap()
    }

    #[derive(Debug)]
    struct FailingHistory;

    impl HistorySink for FailingHistory {
        fn record(&self, _record: &ChatRecord) -> Result<()> {
            Err(PhonewiseError::other("disk full"))
        }
    }

    #[derive(Debug)]
    struct ConfidentModel(&'static str);

    impl IntentClassifier for ConfidentModel {
        fn predict(&self, _text: &str) -> anyhow::Result<IntentPrediction> {
            Ok(IntentPrediction {
                label: self.0.to_string(),
                confidence: 0.9,
            })
        }

        fn name(&self) -> &str {
            "confident"
        }
    }

    #[test]
    fn test_greeting() {
        let reply = assistant().classify_and_respond("s", None, "hello").unwrap();
        assert_eq!(reply.intent, Intent::Greeting);
        assert!(reply.ranked_results.is_empty());
        assert_eq!(reply.metadata.quick_replies.len(), 3);
    }

    #[test]
    fn test_generated_session_id() {
        let reply = assistant().classify_and_respond("", Some("u42"), "hi").unwrap();
        assert!(reply.metadata.session_id.starts_with("session_u42_"));
        assert!(new_session_id(None).starts_with("session_guest_"));
    }

    #[test]
    fn test_model_search() {
        let reply = assistant()
            .classify_and_respond("s", None, "tell me about redmi note 13")
            .unwrap();
        assert_eq!(reply.intent, Intent::ModelSearch);
        assert_eq!(reply.phone_ids(), vec![4]);
        assert!(reply.reply_text.starts_with("I found Xiaomi Redmi Note 13:"));
    }

    #[test]
    fn test_battery_then_brand_delegates() {
        let assistant = assistant();
        let reply = assistant
            .classify_and_respond("s", None, "phone with long battery life")
            .unwrap();
        assert_eq!(reply.intent, Intent::BatteryFocused);
        assert_eq!(reply.phone_ids(), vec![1, 4, 2]);

        let reply = assistant.classify_and_respond("s", None, "samsung").unwrap();
        assert_eq!(reply.intent, Intent::BrandQuery);
        assert_eq!(reply.phone_ids(), vec![1, 2]);
        assert!(reply.reply_text.contains("with battery"));
    }

    #[test]
    fn test_compare() {
        let assistant = assistant();
        let result = assistant.compare(1, 3).unwrap().unwrap();
        assert_eq!(result.entry_a_id, 1);
        assert!(assistant.compare(1, 99).unwrap().is_none());
    }

    #[test]
    fn test_history_failure_does_not_abort() {
        let assistant = assistant().with_history(Arc::new(FailingHistory));
        let reply = assistant
            .classify_and_respond("s", Some("u1"), "phones under 1000")
            .unwrap();
        assert_eq!(reply.intent, Intent::BudgetQuery);
        assert_eq!(reply.phone_ids(), vec![4, 1]);
    }

    #[test]
    fn test_history_only_for_users() {
        let history = Arc::new(InMemoryHistory::new());
        let assistant = assistant().with_history(history.clone());
        assistant.classify_and_respond("s", None, "hi").unwrap();
        assistant.classify_and_respond("s", Some("u1"), "hi").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history.records()[0].intent, Intent::Greeting);
    }

    #[test]
    fn test_injected_model_decides() {
        let assistant = assistant()
            .with_intent_model(Arc::new(ConfidentModel("help")))
            .unwrap();
        let reply = assistant
            .classify_and_respond("s", None, "what now")
            .unwrap();
        assert_eq!(reply.intent, Intent::Help);
        let prediction = reply.metadata.statistical_intent.unwrap();
        assert_eq!(prediction.label, "help");
    }
}
