//! Brand mentions and the sentiment attached to them.
//!
//! Each brand keyword occurrence is classified by looking at up to
//! `sentiment_window` words on either side, without crossing a clause
//! boundary (punctuation or a contrastive conjunction). Negative wording is
//! checked first, then positive; a mention with neither counts as preferred.

use std::sync::Arc;

use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer};
use crate::analysis::token::Token;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::token_filter::stop::StopFilter;
use crate::analysis::tokenizer::unicode_word::UnicodeWordTokenizer;
use crate::config::NluConfig;
use crate::error::Result;
use crate::nlu::keyword::{KeywordSet, MatchMode};

const CLAUSE_WORDS: &[&str] = &["but", "however", "though", "although", "whereas", "while"];
const CLAUSE_PUNCTUATION: &[char] = &[',', ';', '.', '!', '?', '\n'];

/// Sentiment of a single brand mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// Brands found in one message, in order of first mention.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrandMentions {
    pub preferred: Vec<String>,
    pub excluded: Vec<String>,
}

#[derive(Debug, Clone)]
struct BrandKeyword {
    brand: String,
    words: Vec<String>,
}

/// Finds brand keywords and classifies their sentiment.
#[derive(Debug)]
pub struct BrandExtractor {
    analyzer: PipelineAnalyzer,
    keywords: Vec<BrandKeyword>,
    positive: KeywordSet,
    negative: KeywordSet,
    window: usize,
    filler: StopFilter,
}

impl BrandExtractor {
    pub fn new(config: &NluConfig) -> Result<Self> {
        let analyzer = PipelineAnalyzer::new(Arc::new(UnicodeWordTokenizer::new()))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .with_name("brand_words");

        let keywords = config
            .brand_aliases
            .iter()
            .flat_map(|alias| {
                alias.keywords.iter().map(move |keyword| BrandKeyword {
                    brand: alias.brand.clone(),
                    words: keyword.to_lowercase().split_whitespace().map(String::from).collect(),
                })
            })
            .filter(|k| !k.words.is_empty())
            .collect();

        Ok(BrandExtractor {
            analyzer,
            keywords,
            positive: KeywordSet::new(&config.positive_words, MatchMode::Word)?,
            negative: KeywordSet::new(&config.negative_words, MatchMode::Word)?,
            window: config.sentiment_window,
            filler: StopFilter::from_words(
                config.brand_query_filler_words.iter().map(|w| w.to_lowercase()),
            ),
        })
    }

    fn tokens(&self, text: &str) -> Result<Vec<Token>> {
        Ok(self.analyzer.analyze(text)?.collect())
    }

    /// Brands mentioned in the text, split by sentiment. A brand that is both
    /// praised and rejected in one message ends up excluded.
    pub fn extract(&self, text: &str) -> Result<BrandMentions> {
        let tokens = self.tokens(text)?;
        let mut mentions = BrandMentions::default();

        for (start, end, brand) in self.find_keywords(&tokens) {
            match self.sentiment(text, &tokens, start, end) {
                Sentiment::Negative => {
                    mentions.preferred.retain(|b| b != brand);
                    push_unique(&mut mentions.excluded, brand);
                }
                Sentiment::Positive => {
                    if !mentions.excluded.iter().any(|b| b == brand) {
                        push_unique(&mut mentions.preferred, brand);
                    }
                }
                Sentiment::Neutral => {
                    if !mentions.excluded.iter().any(|b| b == brand) {
                        push_unique(&mut mentions.preferred, brand);
                    }
                }
            }
        }

        Ok(mentions)
    }

    /// Whether any sentiment word appears anywhere in the text.
    pub fn has_explicit_sentiment(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.positive.is_match(&text) || self.negative.is_match(&text)
    }

    /// Whether the whole message is one brand keyword, optionally plural.
    pub fn is_bare_brand_keyword(&self, text: &str) -> bool {
        let text = text.trim().to_lowercase();
        let text = text.trim_end_matches(|c: char| c.is_ascii_punctuation());
        self.keywords.iter().any(|k| {
            let keyword = k.words.join(" ");
            text == keyword || text == format!("{keyword}s")
        })
    }

    /// Whether the message names brands and nothing else of substance.
    pub fn is_simple_brand_query(&self, text: &str, mentions: &BrandMentions) -> Result<bool> {
        let lower = text.trim().to_lowercase();
        let lower = lower.trim_end_matches(|c: char| c.is_ascii_punctuation());
        for keyword in &self.keywords {
            let keyword = keyword.words.join(" ");
            if [
                keyword.clone(),
                format!("{keyword}s"),
                format!("{keyword} phone"),
                format!("{keyword} phones"),
            ]
            .iter()
            .any(|form| form == lower)
            {
                return Ok(true);
            }
        }

        if mentions.preferred.is_empty() {
            return Ok(false);
        }

        let tokens = self.tokens(text)?;
        let mut covered = vec![false; tokens.len()];
        for (start, end, _) in self.find_keywords(&tokens) {
            covered[start..end].iter_mut().for_each(|c| *c = true);
        }

        Ok(tokens
            .iter()
            .zip(covered)
            .all(|(token, covered)| covered || self.filler.is_stop_word(&token.text)))
    }

    /// Keyword occurrences as `(first_token, end_token, brand)`.
    fn find_keywords<'a>(&'a self, tokens: &[Token]) -> Vec<(usize, usize, &'a str)> {
        let mut found = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let hit = self
                .keywords
                .iter()
                .filter(|k| {
                    k.words.len() <= tokens.len() - i
                        && k.words
                            .iter()
                            .zip(&tokens[i..])
                            .all(|(word, token)| *word == token.text)
                })
                .max_by_key(|k| k.words.len());

            match hit {
                Some(keyword) => {
                    found.push((i, i + keyword.words.len(), keyword.brand.as_str()));
                    i += keyword.words.len();
                }
                None => i += 1,
            }
        }
        found
    }

    fn sentiment(&self, text: &str, tokens: &[Token], start: usize, end: usize) -> Sentiment {
        let breaks_after = |idx: usize| -> bool {
            // punctuation between token idx and idx + 1
            let from = tokens[idx].end_offset;
            let to = tokens.get(idx + 1).map_or(text.len(), |t| t.start_offset);
            text[from..to].contains(CLAUSE_PUNCTUATION)
        };
        let is_clause_word = |idx: usize| CLAUSE_WORDS.contains(&tokens[idx].text.as_str());

        let mut lo = start;
        while lo > 0 && start - lo < self.window && !breaks_after(lo - 1) && !is_clause_word(lo - 1) {
            lo -= 1;
        }
        let mut hi = end;
        while hi < tokens.len() && hi - end < self.window && !breaks_after(hi - 1) && !is_clause_word(hi) {
            hi += 1;
        }

        let context = tokens[lo..start]
            .iter()
            .chain(&tokens[end..hi])
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        if self.negative.is_match(&context) {
            Sentiment::Negative
        } else if self.positive.is_match(&context) {
            Sentiment::Positive
        } else {
            Sentiment::Neutral
        }
    }
}

fn push_unique(list: &mut Vec<String>, brand: &str) {
    if !list.iter().any(|b| b == brand) {
        list.push(brand.to_string());
    }
}
