//! Text analysis for chat utterances.
//!
//! Tokenizers split raw text into [`token::Token`]s, token filters reshape the
//! stream, and analyzers chain the two. The statistical intent model builds its
//! word and character features on top of these pieces.

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
