//! Model-name candidates such as "iPhone 15 Pro" or "Galaxy S24 Ultra".
//!
//! Candidates are only text; resolving them to catalog entries happens later
//! through fuzzy lookup.

use std::sync::LazyLock;

use regex::Regex;

use crate::nlu::types::{MatchType, ModelMention};

const SUFFIX: &str = r"(pro\s*max|pro\s*plus|pro|max|ultra|plus|lite|se|fe|note|mix|fold|flip|air|neo|c|x|t|s)";

static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // series keyword + number, e.g. "iphone 15 pro", "galaxy s24"
        format!(
            r"\b(iphone|galaxy|redmi|poco|pixel|xperia|honor|oppo|vivo|iqoo|realme|oneplus|nothing\s+phone|moto|mi|reno|find)\s+([a-z]?\d+[a-z]?)(?:\s*{SUFFIX})?\b"
        ),
        // maker + series word + number, e.g. "samsung galaxy s23", "xiaomi redmi note 13"
        format!(
            r"\b(xiaomi|samsung|apple|huawei|google|sony|nokia|motorola|asus|redmi|honor|oppo|vivo|realme|tecno|infinix)\s+([a-z]+)\s+([a-z]?\d+[a-z]?)(?:\s*{SUFFIX})?\b"
        ),
        // maker + bare number, e.g. "xiaomi 14 ultra"
        format!(r"\b(xiaomi|oneplus|huawei|nokia)\s+(\d+[a-z]?)(?:\s*{SUFFIX})?\b"),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("model patterns are valid"))
    .collect()
});

/// Words that cannot be a series name between maker and number.
const NON_SERIES_WORDS: &[&str] = &[
    "under", "below", "above", "over", "within", "around", "about", "between", "with", "and", "or",
    "than", "for", "to", "from", "at", "less", "more", "max", "rm", "budget", "price", "is", "are",
    "has", "have", "but", "not", "no", "only", "phone", "phones",
];

static UNIT_AFTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:mah|mp|gb|tb|hz|w\b|inch|inches|mm|fps|k\b)").expect("unit pattern is valid")
});

/// Extracts model-name candidates from a message.
#[derive(Debug, Clone, Default)]
pub struct ModelExtractor;

impl ModelExtractor {
    pub fn new() -> Self {
        ModelExtractor
    }

    /// Candidates in order of appearance. Overlapping matches keep the
    /// longest; duplicates are removed case-insensitively.
    pub fn extract(&self, text: &str) -> Vec<ModelMention> {
        let text = text.to_lowercase();
        let mut spans: Vec<(usize, usize, String)> = Vec::new();

        for pattern in PATTERNS.iter() {
            for caps in pattern.captures_iter(&text) {
                let Some(whole) = caps.get(0) else { continue };
                if UNIT_AFTER.is_match(&text[whole.end()..]) {
                    continue;
                }
                let parts: Vec<&str> = caps
                    .iter()
                    .skip(1)
                    .flatten()
                    .map(|m| m.as_str())
                    .collect();
                if parts.iter().any(|p| NON_SERIES_WORDS.contains(p)) {
                    continue;
                }
                let normalized = parts
                    .iter()
                    .flat_map(|p| p.split_whitespace())
                    .collect::<Vec<_>>()
                    .join(" ");
                spans.push((whole.start(), whole.end(), normalized));
            }
        }

        // longest spans claim their text first
        spans.sort_by(|a, b| (b.1 - b.0).cmp(&(a.1 - a.0)).then(a.0.cmp(&b.0)));
        let mut kept: Vec<(usize, usize, String)> = Vec::new();
        for span in spans {
            if !kept.iter().any(|k| span.0 < k.1 && k.0 < span.1) {
                kept.push(span);
            }
        }
        kept.sort_by_key(|k| k.0);

        let mut mentions: Vec<ModelMention> = Vec::new();
        for (_, _, text) in kept {
            if !mentions.iter().any(|m| m.text == text) {
                mentions.push(ModelMention {
                    text,
                    match_type: MatchType::Exact,
                });
            }
        }
        mentions
    }
}
