//! Unicode word tokenizer implementation.
//!
//! Splits text on UAX #29 word boundaries and drops punctuation and
//! whitespace. Contractions such as `don't` stay a single token, which the
//! brand sentiment window relies on.
//!
//! # Examples
//!
//! ```
//! use phonewise::analysis::tokenizer::Tokenizer;
//! use phonewise::analysis::tokenizer::unicode_word::UnicodeWordTokenizer;
//!
//! let tokenizer = UnicodeWordTokenizer::new();
//! let tokens: Vec<_> = tokenizer.tokenize("I don't want Apple, thanks!").unwrap().collect();
//!
//! assert_eq!(tokens[1].text, "don't");
//! assert_eq!(tokens[3].text, "Apple");
//! assert_eq!(tokens.len(), 5);
//! ```

use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// A tokenizer that splits text on Unicode word boundaries.
#[derive(Clone, Debug, Default)]
pub struct UnicodeWordTokenizer;

impl UnicodeWordTokenizer {
    /// Create a new Unicode word tokenizer.
    pub fn new() -> Self {
        UnicodeWordTokenizer
    }
}

impl Tokenizer for UnicodeWordTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let tokens: Vec<Token> = text
            .unicode_word_indices()
            .map(|(start, word)| Token::with_offsets(word, start, start + word.len()))
            .collect();

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "unicode_word"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_point_into_source() {
        let text = "love  Samsung,hate apple";
        let tokens: Vec<Token> = UnicodeWordTokenizer::new().tokenize(text).unwrap().collect();

        assert_eq!(tokens.len(), 4);
        for token in &tokens {
            assert_eq!(&text[token.start_offset..token.end_offset], token.text);
        }
    }

    #[test]
    fn test_decimals_and_units() {
        let texts: Vec<String> = UnicodeWordTokenizer::new()
            .tokenize("6.7\" screen, 5000mAh")
            .unwrap()
            .map(|t| t.text)
            .collect();

        assert_eq!(texts, vec!["6.7", "screen", "5000mAh"]);
    }
}
