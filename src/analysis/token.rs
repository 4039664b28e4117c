//! Tokens produced by tokenizers.
//!
//! A token keeps its byte span in the source text so callers can look at
//! what lies between two tokens (the brand extractor checks for clause
//! punctuation there).
//!
//! ```
//! use phonewise::analysis::token::Token;
//!
//! let text = "galaxy s24";
//! let token = Token::with_offsets("s24", 7, 10);
//! assert_eq!(&text[token.start_offset..token.end_offset], token.text);
//! ```

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    /// Byte offset of the first byte in the source text.
    pub start_offset: usize,
    /// Byte offset one past the last byte.
    pub end_offset: usize,
}

/// A stream of tokens flowing through the analysis pipeline.
pub type TokenStream = Box<dyn Iterator<Item = Token> + Send>;

impl Token {
    /// A token with no known source span.
    pub fn new<S: Into<String>>(text: S) -> Self {
        Token {
            text: text.into(),
            start_offset: 0,
            end_offset: 0,
        }
    }

    pub fn with_offsets<S: Into<String>>(text: S, start_offset: usize, end_offset: usize) -> Self {
        Token {
            text: text.into(),
            start_offset,
            end_offset,
        }
    }

    /// Same span, new text.
    pub fn with_text<S: Into<String>>(self, text: S) -> Self {
        Token {
            text: text.into(),
            ..self
        }
    }
}
