//! Session-keyed context store with idle expiry.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::debug;
use parking_lot::{Mutex, RwLock};

use crate::config::ContextConfig;
use crate::context::conversation::ConversationContext;

/// Owns every live [`ConversationContext`].
///
/// The map is guarded by a read-write lock and each context by its own
/// mutex, so writes to one session are serialized while different
/// sessions proceed independently.
#[derive(Debug)]
pub struct ContextStore {
    contexts: RwLock<HashMap<String, Arc<Mutex<ConversationContext>>>>,
    config: ContextConfig,
}

impl ContextStore {
    pub fn new(config: ContextConfig) -> Self {
        ContextStore {
            contexts: RwLock::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// Fetch the session's context, creating it if missing.
    /// Idle sessions are evicted first.
    pub fn get_or_create(&self, session_id: &str) -> Arc<Mutex<ConversationContext>> {
        self.get_or_create_at(session_id, Utc::now())
    }

    /// [`get_or_create`](Self::get_or_create) with an explicit clock.
    pub fn get_or_create_at(&self, session_id: &str, now: DateTime<Utc>) -> Arc<Mutex<ConversationContext>> {
        let timeout = self.config.idle_timeout();
        let mut contexts = self.contexts.write();

        let before = contexts.len();
        // a context that is locked right now is in use, not idle
        contexts.retain(|_, ctx| ctx.try_lock().is_none_or(|ctx| !ctx.is_expired(now, timeout)));
        if contexts.len() < before {
            debug!("evicted {} idle session(s)", before - contexts.len());
        }

        contexts
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(ConversationContext::new(session_id, now))))
            .clone()
    }

    /// Run `f` with exclusive access to the session's context.
    pub fn with_context<R>(&self, session_id: &str, f: impl FnOnce(&mut ConversationContext) -> R) -> R {
        let ctx = self.get_or_create(session_id);
        let mut guard = ctx.lock();
        f(&mut guard)
    }

    /// A copy of the session's context, if it exists. Does not evict.
    pub fn snapshot(&self, session_id: &str) -> Option<ConversationContext> {
        self.contexts
            .read()
            .get(session_id)
            .map(|ctx| ctx.lock().clone())
    }

    /// Forget a session entirely.
    pub fn clear_context(&self, session_id: &str) -> bool {
        self.contexts.write().remove(session_id).is_some()
    }

    /// Clear filters and focus flags for a session.
    pub fn clear_filters(&self, session_id: &str) -> bool {
        let ctx = self.contexts.read().get(session_id).cloned();
        match ctx {
            Some(ctx) => {
                ctx.lock().clear_filters();
                true
            }
            None => false,
        }
    }

    pub fn session_count(&self) -> usize {
        self.contexts.read().len()
    }
}

impl Default for ContextStore {
    fn default() -> Self {
        Self::new(ContextConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::intent::Intent;
    use crate::nlu::types::ExtractedQuery;

    #[test]
    fn test_sessions_are_independent() {
        let store = ContextStore::default();
        store.with_context("a", |ctx| ctx.brand_preferences.exclude("Apple"));
        store.with_context("b", |ctx| ctx.brand_preferences.prefer("Apple"));

        assert_eq!(store.session_count(), 2);
        assert_eq!(store.snapshot("a").unwrap().brand_preferences.excluded, vec!["Apple"]);
        assert!(store.snapshot("b").unwrap().brand_preferences.excluded.is_empty());
    }

    #[test]
    fn test_idle_session_is_replaced() {
        let store = ContextStore::default();
        let start = Utc::now();
        {
            let ctx = store.get_or_create_at("s", start);
            ctx.lock()
                .merge(&ExtractedQuery::default(), Intent::Greeting, start, 50);
        }

        let later = start + Duration::minutes(31);
        let ctx = store.get_or_create_at("s", later);
        let ctx = ctx.lock();
        assert!(ctx.last_intent.is_none());
        assert_eq!(ctx.created_at, later);
    }

    #[test]
    fn test_active_session_survives_sweep() {
        let store = ContextStore::default();
        let start = Utc::now();
        store.get_or_create_at("old", start);
        store.get_or_create_at("new", start + Duration::minutes(20));

        store.get_or_create_at("new", start + Duration::minutes(40));
        assert!(store.snapshot("old").is_none());
        assert!(store.snapshot("new").is_some());
    }

    #[test]
    fn test_clear() {
        let store = ContextStore::default();
        store.with_context("s", |ctx| ctx.focus.battery = true);
        assert!(store.clear_filters("s"));
        assert!(!store.snapshot("s").unwrap().focus.battery);
        assert!(store.clear_context("s"));
        assert!(!store.clear_context("s"));
        assert!(!store.clear_filters("s"));
    }
}
