use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::intent::Intent;
use crate::nlu::extractor::ContinuationHints;
use crate::nlu::types::{BudgetRange, ExtractedQuery, UsageType};

/// Accumulated brand likes and dislikes. A brand is never in both lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BrandPreferences {
    pub preferred: Vec<String>,
    pub excluded: Vec<String>,
}

impl BrandPreferences {
    pub fn prefer(&mut self, brand: &str) {
        self.excluded.retain(|b| b != brand);
        if !self.preferred.iter().any(|b| b == brand) {
            self.preferred.push(brand.to_string());
        }
    }

    pub fn is_excluded(&self, brand: &str) -> bool {
        self.excluded.iter().any(|b| b == brand)
    }

    pub fn exclude(&mut self, brand: &str) {
        self.preferred.retain(|b| b != brand);
        if !self.excluded.iter().any(|b| b == brand) {
            self.excluded.push(brand.to_string());
        }
    }
}

/// Filters that stay in force until a later message replaces them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActiveFilters {
    pub budget: Option<BudgetRange>,
    pub battery_min: Option<u32>,
    pub camera_min: Option<u32>,
    pub ram_min: Option<u32>,
    pub storage_min: Option<u32>,
    pub usage_type: Option<UsageType>,
}

impl ActiveFilters {
    pub fn is_empty(&self) -> bool {
        *self == ActiveFilters::default()
    }

    /// Last write wins per field; absent values leave the old one alone.
    fn apply(&mut self, query: &ExtractedQuery) {
        if query.budget.is_some() {
            self.budget = query.budget;
        }
        if query.spec_min.battery.is_some() {
            self.battery_min = query.spec_min.battery;
        }
        if query.spec_min.camera.is_some() {
            self.camera_min = query.spec_min.camera;
        }
        if query.spec_min.ram.is_some() {
            self.ram_min = query.spec_min.ram;
        }
        if query.spec_min.storage.is_some() {
            self.storage_min = query.spec_min.storage;
        }
        if query.usage_type.is_some() {
            self.usage_type = query.usage_type;
        }
    }
}

/// Sticky interest flags. Only [`ConversationContext::clear_filters`] resets them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FocusFlags {
    pub battery: bool,
    pub camera: bool,
    pub photography: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversationContext {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    /// Extracted messages, oldest first.
    pub messages: Vec<ExtractedQuery>,
    pub brand_preferences: BrandPreferences,
    pub active_filters: ActiveFilters,
    pub focus: FocusFlags,
    pub last_intent: Option<Intent>,
}

impl ConversationContext {
    pub fn new<S: Into<String>>(session_id: S, now: DateTime<Utc>) -> Self {
        ConversationContext {
            session_id: session_id.into(),
            created_at: now,
            last_updated: now,
            messages: Vec::new(),
            brand_preferences: BrandPreferences::default(),
            active_filters: ActiveFilters::default(),
            focus: FocusFlags::default(),
            last_intent: None,
        }
    }

    /// What the extractor needs to know about this session.
    pub fn hints(&self) -> ContinuationHints {
        ContinuationHints {
            has_last_intent: self.last_intent.is_some(),
            has_active_filters: !self.active_filters.is_empty(),
            battery_focus: self.focus.battery,
            camera_focus: self.focus.camera,
        }
    }

    /// Fold one message into the session.
    ///
    /// A bare brand message that does not continue the previous search
    /// starts over: earlier filters and preferred brands are dropped and
    /// excluded brands are kept, even when the message names one of them.
    /// Every other message accumulates.
    pub fn merge(&mut self, query: &ExtractedQuery, intent: Intent, now: DateTime<Utc>, max_messages: usize) {
        self.last_updated = now;
        self.messages.push(query.clone());
        if self.messages.len() > max_messages {
            let overflow = self.messages.len() - max_messages;
            self.messages.drain(..overflow);
        }

        let fresh_search = !query.has_explicit_sentiment
            && query.is_simple_brand_query
            && !query.context_continuation;
        if fresh_search {
            self.active_filters = ActiveFilters::default();
            self.brand_preferences.preferred.clear();
        }

        for brand in &query.brands_preferred {
            // a neutral mention on a fresh search cannot lift an exclusion
            if fresh_search && self.brand_preferences.is_excluded(brand) {
                continue;
            }
            self.brand_preferences.prefer(brand);
        }
        for brand in &query.brands_excluded {
            self.brand_preferences.exclude(brand);
        }

        self.active_filters.apply(query);

        if query.battery_focus {
            self.focus.battery = true;
        }
        if query.camera_focus {
            self.focus.camera = true;
            self.focus.photography = true;
        }

        self.last_intent = Some(intent);
    }

    /// Drop filters and focus flags. Brand preferences survive.
    pub fn clear_filters(&mut self) {
        self.active_filters = ActiveFilters::default();
        self.focus = FocusFlags::default();
    }

    pub fn is_expired(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        now - self.last_updated > timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlu::types::SpecMinimums;

    fn query(preferred: &[&str], excluded: &[&str], explicit: bool) -> ExtractedQuery {
        ExtractedQuery {
            brands_preferred: preferred.iter().map(|s| s.to_string()).collect(),
            brands_excluded: excluded.iter().map(|s| s.to_string()).collect(),
            has_explicit_sentiment: explicit,
            ..Default::default()
        }
    }

    #[test]
    fn test_sentiment_accumulates_and_moves_between_lists() {
        let now = Utc::now();
        let mut ctx = ConversationContext::new("s1", now);
        ctx.merge(&query(&["Samsung"], &["Apple"], true), Intent::BrandQuery, now, 50);
        ctx.merge(&query(&["Apple"], &[], true), Intent::BrandQuery, now, 50);

        assert_eq!(ctx.brand_preferences.preferred, vec!["Samsung", "Apple"]);
        assert!(ctx.brand_preferences.excluded.is_empty());
    }

    #[test]
    fn test_bare_brand_starts_fresh_search_but_keeps_exclusions() {
        let now = Utc::now();
        let mut ctx = ConversationContext::new("s1", now);
        let mut first = query(&["Samsung"], &["Apple"], true);
        first.budget = Some(BudgetRange::new(500.0, 2000.0));
        ctx.merge(&first, Intent::BrandQuery, now, 50);

        let mut bare = query(&["Xiaomi"], &[], false);
        bare.is_simple_brand_query = true;
        ctx.merge(&bare, Intent::BrandQuery, now, 50);

        assert_eq!(ctx.brand_preferences.preferred, vec!["Xiaomi"]);
        assert_eq!(ctx.brand_preferences.excluded, vec!["Apple"]);
        assert!(ctx.active_filters.budget.is_none());
    }

    #[test]
    fn test_bare_mention_of_excluded_brand_keeps_it_excluded() {
        let now = Utc::now();
        let mut ctx = ConversationContext::new("s1", now);
        ctx.merge(&query(&["Samsung"], &["Apple"], true), Intent::BrandQuery, now, 50);

        let mut bare = query(&["Apple"], &[], false);
        bare.is_simple_brand_query = true;
        ctx.merge(&bare, Intent::BrandQuery, now, 50);

        assert!(ctx.brand_preferences.preferred.is_empty());
        assert_eq!(ctx.brand_preferences.excluded, vec!["Apple"]);

        // explicit sentiment still moves a brand across
        ctx.merge(&query(&["Apple"], &[], true), Intent::BrandQuery, now, 50);
        assert_eq!(ctx.brand_preferences.preferred, vec!["Apple"]);
        assert!(ctx.brand_preferences.excluded.is_empty());
    }

    #[test]
    fn test_filters_last_write_wins_and_focus_is_sticky() {
        let now = Utc::now();
        let mut ctx = ConversationContext::new("s1", now);
        let mut q = query(&[], &[], false);
        q.spec_min = SpecMinimums {
            battery: Some(4000),
            ..Default::default()
        };
        q.camera_focus = true;
        ctx.merge(&q, Intent::SpecFilter, now, 50);

        let mut q = query(&[], &[], false);
        q.spec_min.battery = Some(5000);
        ctx.merge(&q, Intent::SpecFilter, now, 50);

        assert_eq!(ctx.active_filters.battery_min, Some(5000));
        assert!(ctx.focus.camera && ctx.focus.photography);

        ctx.clear_filters();
        assert!(ctx.active_filters.is_empty());
        assert!(!ctx.focus.camera);
    }

    #[test]
    fn test_message_history_is_bounded() {
        let now = Utc::now();
        let mut ctx = ConversationContext::new("s1", now);
        for i in 0..5 {
            let mut q = query(&[], &[], false);
            q.original_text = format!("message {i}");
            ctx.merge(&q, Intent::General, now, 3);
        }
        assert_eq!(ctx.messages.len(), 3);
        assert_eq!(ctx.messages[0].original_text, "message 2");
    }

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        let ctx = ConversationContext::new("s1", now);
        assert!(!ctx.is_expired(now + Duration::minutes(29), Duration::minutes(30)));
        assert!(ctx.is_expired(now + Duration::minutes(31), Duration::minutes(30)));
    }
}
