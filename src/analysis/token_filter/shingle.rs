//! Shingle filter: word n-grams built from adjacent tokens.
//!
//! Longer shingles join adjacent tokens with a single space and span from
//! the first token's start to the last token's end.

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::{PhonewiseError, Result};

/// Emits word n-grams of length `min_size..=max_size`.
///
/// ```
/// use phonewise::analysis::token_filter::Filter;
/// use phonewise::analysis::token_filter::shingle::ShingleFilter;
/// use phonewise::analysis::token::Token;
///
/// let filter = ShingleFilter::new(1, 2).unwrap();
/// let tokens = vec![Token::new("long"), Token::new("lasting")];
/// let texts: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
///     .unwrap()
///     .map(|t| t.text)
///     .collect();
///
/// assert_eq!(texts, vec!["long", "long lasting", "lasting"]);
/// ```
#[derive(Clone, Debug)]
pub struct ShingleFilter {
    min_size: usize,
    max_size: usize,
}

impl ShingleFilter {
    /// Create a new shingle filter.
    pub fn new(min_size: usize, max_size: usize) -> Result<Self> {
        if min_size == 0 || max_size < min_size {
            return Err(PhonewiseError::analysis(format!(
                "invalid shingle range {min_size}..={max_size}"
            )));
        }
        Ok(ShingleFilter { min_size, max_size })
    }
}

impl Filter for ShingleFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let words: Vec<Token> = tokens.collect();
        let mut shingles = Vec::new();

        for start in 0..words.len() {
            for size in self.min_size..=self.max_size {
                let end = start + size;
                if end > words.len() {
                    break;
                }
                let text = words[start..end]
                    .iter()
                    .map(|t| t.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                shingles.push(Token::with_offsets(
                    text,
                    words[start].start_offset,
                    words[end - 1].end_offset,
                ));
            }
        }

        Ok(Box::new(shingles.into_iter()))
    }

    fn name(&self) -> &'static str {
        "shingle"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bigrams_only() {
        let filter = ShingleFilter::new(2, 2).unwrap();
        let tokens = vec![
            Token::with_offsets("best", 0, 4),
            Token::with_offsets("camera", 5, 11),
            Token::with_offsets("phone", 12, 17),
        ];

        let texts: Vec<(String, usize, usize)> = filter
            .filter(Box::new(tokens.into_iter()))
            .unwrap()
            .map(|t| (t.text, t.start_offset, t.end_offset))
            .collect();

        assert_eq!(
            texts,
            vec![("best camera".to_string(), 0, 11), ("camera phone".to_string(), 5, 17)]
        );
    }

    #[test]
    fn test_invalid_range() {
        assert!(ShingleFilter::new(0, 2).is_err());
        assert!(ShingleFilter::new(3, 2).is_err());
    }
}
