//! Shared utility modules used across Phonewise components.

pub mod fuzzy;
pub mod levenshtein;
pub mod spec_text;
