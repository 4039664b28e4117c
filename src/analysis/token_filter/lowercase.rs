//! Lowercasing of token text.
//!
//! ```
//! use phonewise::analysis::token_filter::Filter;
//! use phonewise::analysis::token_filter::lowercase::LowercaseFilter;
//! use phonewise::analysis::token::Token;
//!
//! let tokens = vec![Token::new("iPhone"), Token::new("PRO")];
//! let texts: Vec<_> = LowercaseFilter::new()
//!     .filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .map(|t| t.text)
//!     .collect();
//!
//! assert_eq!(texts, vec!["iphone", "pro"]);
//! ```

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

#[derive(Clone, Debug, Default)]
pub struct LowercaseFilter;

impl LowercaseFilter {
    pub fn new() -> Self {
        LowercaseFilter
    }
}

impl Filter for LowercaseFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(tokens.map(|token| {
            let lowered = token.text.to_lowercase();
            token.with_text(lowered)
        })))
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}
