//! Intent labels and how a message is assigned one.
//!
//! [`RuleBasedResolver`] applies a fixed priority order to the extracted
//! entities. [`IntentResolver`] adds an optional statistical model on top
//! and falls back to the rules whenever the model is unsure.

pub mod label;
pub mod resolver;
pub mod rules;

pub use label::Intent;
pub use resolver::{IntentDecision, IntentResolver, IntentSource};
pub use rules::RuleBasedResolver;
