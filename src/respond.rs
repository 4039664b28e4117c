//! Reply composition.
//!
//! The [`ResponseComposer`] renders the configured templates for every
//! intent; [`reply`] holds the payload types returned to the caller.

pub mod composer;
pub mod reply;

pub use composer::{REDIRECT_COMPARE, ResponseComposer};
pub use reply::{ChatReply, ComposedReply, PhoneSummary, ReplyMetadata, ReplyType};
