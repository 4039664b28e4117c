//! Entity extraction: turning a chat message into typed constraints.
//!
//! [`QueryExtractor`] is the entry point. The individual extractors are
//! public so they can be used and tested on their own.

pub mod brand;
pub mod budget;
pub mod extractor;
pub mod keyword;
pub mod model;
pub mod spec;
pub mod types;

pub use extractor::{ContinuationHints, QueryExtractor};
pub use types::{
    BudgetRange, ExtractedQuery, MatchType, ModelMention, Persona, SpecMinimums, UsageType,
};
