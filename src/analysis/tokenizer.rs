//! Tokenizer implementations for text analysis.
//!
//! - [`regex::RegexTokenizer`] - Custom regex-based tokenization
//! - [`ngram::NgramTokenizer`] - Character n-gram tokenization
//! - [`unicode_word::UnicodeWordTokenizer`] - UAX #29 word boundaries

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
///
/// # Examples
///
/// ```
/// use phonewise::analysis::token::{Token, TokenStream};
/// use phonewise::analysis::tokenizer::Tokenizer;
/// use phonewise::error::Result;
///
/// struct CommaTokenizer;
///
/// impl Tokenizer for CommaTokenizer {
///     fn tokenize(&self, text: &str) -> Result<TokenStream> {
///         let tokens: Vec<Token> = text
///             .split(',')
///             .map(|s| Token::new(s.trim()))
///             .collect();
///         Ok(Box::new(tokens.into_iter()))
///     }
///
///     fn name(&self) -> &'static str {
///         "comma"
///     }
/// }
///
/// let tokens: Vec<_> = CommaTokenizer.tokenize("8GB, 12GB").unwrap().collect();
/// assert_eq!(tokens[1].text, "12GB");
/// ```
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod ngram;
pub mod regex;
pub mod unicode_word;
