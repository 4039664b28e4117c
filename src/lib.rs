//! # Phonewise
//!
//! A conversational smartphone recommender for Rust.
//!
//! ## Features
//!
//! - Rule-based entity extraction: budgets, brands with sentiment, model
//!   names, spec thresholds, usage and personas
//! - Intent resolution with an optional TF-IDF linear classifier
//! - Per-session conversation context with filter accumulation
//! - Explainable ranking with per-brand fan-out
//! - Side-by-side phone comparison
//! - Templated replies with structured metadata
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use phonewise::assistant::Assistant;
//! use phonewise::catalog::entry::CatalogEntry;
//! use phonewise::catalog::memory::InMemoryCatalog;
//! use phonewise::config::AssistantConfig;
//!
//! # fn main() -> phonewise::error::Result<()> {
//! let catalog = InMemoryCatalog::from_entries(vec![
//!     CatalogEntry::new(1, "Samsung", "Galaxy A55", 1699.0),
//!     CatalogEntry::new(2, "Xiaomi", "Redmi Note 13", 899.0),
//! ]);
//! let assistant = Assistant::new(Arc::new(catalog), Arc::new(AssistantConfig::default()))?;
//!
//! let reply = assistant.classify_and_respond("", None, "show me samsung phones")?;
//! assert_eq!(reply.phone_ids(), vec![1]);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod assistant;
pub mod catalog;
pub mod cli;
pub mod compare;
pub mod config;
pub mod context;
pub mod error;
pub mod intent;
pub mod ml;
pub mod nlu;
pub mod recommend;
pub mod respond;
pub mod util;

pub mod prelude {
    pub use crate::assistant::Assistant;
    pub use crate::catalog::CatalogStore;
    pub use crate::catalog::entry::{CatalogEntry, SpecSet};
    pub use crate::catalog::memory::InMemoryCatalog;
    pub use crate::config::AssistantConfig;
    pub use crate::error::{PhonewiseError, Result};
    pub use crate::intent::Intent;
    pub use crate::respond::ChatReply;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
