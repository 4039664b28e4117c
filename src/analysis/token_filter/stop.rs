//! Filler-word removal.
//!
//! The brand extractor keeps one of these to decide whether a message says
//! anything besides brand names ("samsung phones pls" does not).

use std::collections::HashSet;
use std::sync::Arc;

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Drops tokens whose text is in the word list. Matching is exact, so feed
/// it lowercased tokens and words.
///
/// ```
/// use phonewise::analysis::token_filter::Filter;
/// use phonewise::analysis::token_filter::stop::StopFilter;
/// use phonewise::analysis::token::Token;
///
/// let filter = StopFilter::from_words(["show", "me", "pls"]);
/// let tokens = vec![Token::new("show"), Token::new("me"), Token::new("oppo"), Token::new("pls")];
/// let left: Vec<_> = filter.filter(Box::new(tokens.into_iter())).unwrap().map(|t| t.text).collect();
///
/// assert_eq!(left, vec!["oppo"]);
/// ```
#[derive(Clone, Debug)]
pub struct StopFilter {
    words: Arc<HashSet<String>>,
}

impl StopFilter {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StopFilter {
            words: Arc::new(words.into_iter().map(Into::into).collect()),
        }
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.words.contains(word)
    }
}

impl Filter for StopFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let words = Arc::clone(&self.words);
        Ok(Box::new(tokens.filter(move |token| !words.contains(&token.text))))
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}
