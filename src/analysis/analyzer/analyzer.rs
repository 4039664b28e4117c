//! Core analyzer trait definition.
//!
//! ```text
//! Raw Text → Analyzer → Token Stream
//!             ↓
//!         Tokenizer
//!             ↓
//!         Filter 1 … Filter N
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
///
/// The trait requires `Send + Sync` so one analyzer can be shared by every
/// request thread through an `Arc`.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use phonewise::analysis::analyzer::{Analyzer, PipelineAnalyzer};
    /// use phonewise::analysis::token_filter::lowercase::LowercaseFilter;
    /// use phonewise::analysis::token_filter::stop::StopFilter;
    /// use phonewise::analysis::tokenizer::regex::RegexTokenizer;
    ///
    /// let analyzer = PipelineAnalyzer::new(Arc::new(RegexTokenizer::query_terms().unwrap()))
    ///     .add_filter(Arc::new(LowercaseFilter::new()))
    ///     .add_filter(Arc::new(StopFilter::from_words(["the", "a"])));
    /// let tokens: Vec<_> = analyzer.analyze("The cheapest Phone").unwrap().collect();
    ///
    /// assert_eq!(tokens.len(), 2);
    /// assert_eq!(tokens[0].text, "cheapest");
    /// ```
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;
}
