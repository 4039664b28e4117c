//! Compiled keyword lists.

use regex::Regex;

use crate::error::{PhonewiseError, Result};

/// How a keyword must line up with word boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Whole words only: `hi` does not match inside `which`.
    Word,
    /// Keyword starts a word, or follows a digit: `gam` matches `gaming`,
    /// `mah` matches `5000mah`, but `play` does not match `display`.
    Prefix,
}

/// A set of keywords compiled into one alternation.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    regex: Option<Regex>,
}

impl KeywordSet {
    pub fn new<S: AsRef<str>>(keywords: &[S], mode: MatchMode) -> Result<Self> {
        let mut escaped: Vec<String> = keywords
            .iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .map(|k| {
                k.split_whitespace()
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join(r"\s+")
            })
            .collect();

        if escaped.is_empty() {
            return Ok(KeywordSet { regex: None });
        }

        // longest first so multi-word phrases win over their prefixes
        escaped.sort_by_key(|k| std::cmp::Reverse(k.len()));
        let alternation = escaped.join("|");
        let pattern = match mode {
            MatchMode::Word => format!(r"(?i)(?:^|[^\p{{L}}\p{{N}}'])(?P<kw>{alternation})(?:$|[^\p{{L}}\p{{N}}'])"),
            MatchMode::Prefix => format!(r"(?i)(?:^|[^\p{{L}}'])(?P<kw>{alternation})"),
        };

        let regex = Regex::new(&pattern)
            .map_err(|e| PhonewiseError::config(format!("Invalid keyword list: {e}")))?;
        Ok(KeywordSet { regex: Some(regex) })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.as_ref().is_some_and(|re| re.is_match(text))
    }

    /// The first keyword occurrence in the text.
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        let caps = self.regex.as_ref()?.captures(text)?;
        caps.name("kw").map(|m| m.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.regex.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_mode_respects_boundaries() {
        let set = KeywordSet::new(&["hi", "hello", "good morning"], MatchMode::Word).unwrap();

        assert!(set.is_match("hi there"));
        assert!(set.is_match("oh, hi!"));
        assert!(set.is_match("good   morning"));
        assert!(!set.is_match("which phone"));
        assert!(!set.is_match("this"));
    }

    #[test]
    fn test_prefix_mode() {
        let set = KeywordSet::new(&["gam", "play", "mah"], MatchMode::Prefix).unwrap();

        assert!(set.is_match("best for gaming"));
        assert!(set.is_match("a 5000mah battery"));
        assert!(!set.is_match("big display"));
        assert_eq!(set.find("phone for gamers"), Some("gam"));
    }

    #[test]
    fn test_contractions_are_not_split() {
        let set = KeywordSet::new(&["t"], MatchMode::Word).unwrap();
        assert!(!set.is_match("don't"));
        let set = KeywordSet::new(&["don't want"], MatchMode::Word).unwrap();
        assert!(set.is_match("i don't want apple"));
    }

    #[test]
    fn test_empty_set_matches_nothing() {
        let set = KeywordSet::new::<&str>(&[], MatchMode::Word).unwrap();
        assert!(set.is_empty());
        assert!(!set.is_match("anything"));
        assert_eq!(set.find("anything"), None);
    }
}
