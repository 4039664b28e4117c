//! The chat assistant: one entry point tying extraction, intent resolution,
//! conversation context, ranking and reply composition together.

pub mod history;
pub mod pipeline;

pub use history::{ChatRecord, HistorySink, InMemoryHistory, JsonLinesHistory, NoopHistory};
pub use pipeline::{Assistant, new_session_id};
