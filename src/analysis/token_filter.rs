//! Token filter implementations for token transformation.
//!
//! - [`lowercase::LowercaseFilter`] - Converts tokens to lowercase
//! - [`stop::StopFilter`] - Removes filler words
//! - [`shingle::ShingleFilter`] - Emits word n-grams ("shingles")
//!
//! Filters are chained inside an analyzer:
//!
//! ```text
//! Tokenizer → Lowercase → Stop Words → Shingles
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform token streams.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod lowercase;
pub mod shingle;
pub mod stop;
