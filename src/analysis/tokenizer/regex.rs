//! Regex-based tokenizer implementation.

use std::sync::Arc;

use regex::Regex;

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::tokenizer::Tokenizer;
use crate::error::{PhonewiseError, Result};

/// Pattern that keeps decimal spec values such as `6.7` in one token.
const QUERY_TERM_PATTERN: &str = r"[A-Za-z0-9]+(?:\.[0-9]+)?";

/// Emits every match of a pattern as a token.
#[derive(Clone, Debug)]
pub struct RegexTokenizer {
    pattern: Arc<Regex>,
}

impl RegexTokenizer {
    /// Word tokens for chat messages. Decimals like `6.7` stay whole and
    /// punctuation is dropped.
    pub fn query_terms() -> Result<Self> {
        Self::with_pattern(QUERY_TERM_PATTERN)
    }

    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| PhonewiseError::analysis(format!("Invalid regex pattern: {e}")))?;

        Ok(RegexTokenizer {
            pattern: Arc::new(regex),
        })
    }
}

impl Tokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let tokens: Vec<Token> = self
            .pattern
            .find_iter(text)
            .map(|mat| Token::with_offsets(mat.as_str(), mat.start(), mat.end()))
            .collect();

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "regex"
    }
}
