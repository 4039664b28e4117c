//! Per-session conversation state.
//!
//! A [`ConversationContext`] carries brand preferences, active filters and
//! focus flags from one message to the next. The [`ContextStore`] owns one
//! context per session id and evicts idle sessions lazily.

pub mod conversation;
pub mod store;

pub use conversation::{ActiveFilters, BrandPreferences, ConversationContext, FocusFlags};
pub use store::ContextStore;
