//! Token-order-insensitive fuzzy matching for model names.
//!
//! Both sides are split into words, lowercased, sorted and re-joined before an
//! edit-distance ratio is taken, so "pro 15 iphone" and "iPhone 15 Pro" score
//! 100. Scores are on a 0-100 scale.

use unicode_segmentation::UnicodeSegmentation;

use crate::util::levenshtein::levenshtein_ratio;

/// Lowercase, split into words, sort and join with single spaces.
pub fn token_sort_key(text: &str) -> String {
    let mut words: Vec<String> = text.unicode_words().map(|w| w.to_lowercase()).collect();
    words.sort();
    words.join(" ")
}

/// Token-sort similarity between two strings on a 0-100 scale.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    let key_a = token_sort_key(a);
    let key_b = token_sort_key(b);
    if key_a.is_empty() || key_b.is_empty() {
        return 0.0;
    }
    (levenshtein_ratio(&key_a, &key_b) * 100.0).clamp(0.0, 100.0)
}

/// Scores many candidates against one query, sorting the query once.
#[derive(Debug, Clone)]
pub struct TokenSortMatcher {
    query: String,
    key: String,
}

impl TokenSortMatcher {
    /// Create a new matcher for the given query string.
    pub fn new<S: Into<String>>(query: S) -> Self {
        let query = query.into();
        let key = token_sort_key(&query);
        TokenSortMatcher { query, key }
    }

    /// Get the original query string.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Similarity of a candidate to the query (0-100).
    ///
    /// A candidate whose lowercase text contains the whole query, or is
    /// contained in it, scores 100.
    pub fn score(&self, candidate: &str) -> f64 {
        if self.key.is_empty() {
            return 0.0;
        }
        let candidate_key = token_sort_key(candidate);
        if candidate_key.is_empty() {
            return 0.0;
        }
        let query_lower = self.query.trim().to_lowercase();
        let candidate_lower = candidate.trim().to_lowercase();
        if candidate_lower.contains(&query_lower) || query_lower.contains(&candidate_lower) {
            return 100.0;
        }
        (levenshtein_ratio(&self.key, &candidate_key) * 100.0).clamp(0.0, 100.0)
    }

    /// Check whether the candidate meets the given threshold.
    pub fn is_match(&self, candidate: &str, threshold: f64) -> bool {
        self.score(candidate) >= threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_sort_key() {
        assert_eq!(token_sort_key("Pro 15 iPhone"), "15 iphone pro");
        assert_eq!(token_sort_key("  "), "");
    }

    #[test]
    fn test_token_sort_ratio_ignores_order() {
        assert!((token_sort_ratio("pro 15 iphone", "iPhone 15 Pro") - 100.0).abs() < 1e-9);
        assert_eq!(token_sort_ratio("", "iPhone 15"), 0.0);
    }

    #[test]
    fn test_matcher_thresholds() {
        let matcher = TokenSortMatcher::new("iphone 15 pro");

        assert_eq!(matcher.query(), "iphone 15 pro");
        assert!(matcher.is_match("Apple iPhone 15 Pro", 60.0));
        assert!(matcher.score("Apple iPhone 15 Pro") >= 60.0);
        assert!(!matcher.is_match("Xiaomi Redmi Note 13", 60.0));
    }

    #[test]
    fn test_substring_fast_path() {
        let matcher = TokenSortMatcher::new("galaxy s24");
        assert_eq!(matcher.score("Samsung Galaxy S24 Ultra"), 100.0);
    }
}
