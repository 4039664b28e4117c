//! TF-IDF vectorizer over word shingles and character n-grams.

use std::collections::HashSet;
use std::sync::Arc;

use ahash::AHashMap;
use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer};
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::token_filter::shingle::ShingleFilter;
use crate::analysis::tokenizer::ngram::NgramTokenizer;
use crate::analysis::tokenizer::regex::RegexTokenizer;
use crate::config::ClassifierConfig;

/// Sparse feature vector as `(feature index, weight)` pairs, sorted by index.
pub type SparseVector = Vec<(usize, f64)>;

/// N-gram ranges used to build features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureParams {
    pub word_min: usize,
    pub word_max: usize,
    pub char_min: usize,
    pub char_max: usize,
}

impl From<&ClassifierConfig> for FeatureParams {
    fn from(config: &ClassifierConfig) -> Self {
        FeatureParams {
            word_min: config.word_ngram_min,
            word_max: config.word_ngram_max,
            char_min: config.char_ngram_min,
            char_max: config.char_ngram_max,
        }
    }
}

/// TF-IDF vectorizer for text feature extraction.
///
/// Word features are prefixed `w:` and character features `c:` so the two
/// spaces never collide. Output vectors are L2-normalized.
pub struct TfIdfVectorizer {
    params: FeatureParams,
    /// Feature -> index mapping.
    vocabulary: AHashMap<String, usize>,
    /// Inverse document frequency for each feature.
    idf: Vec<f64>,
    /// Total number of documents seen during training.
    n_documents: usize,
    word_analyzer: Arc<dyn Analyzer>,
    char_analyzer: Arc<dyn Analyzer>,
}

impl std::fmt::Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field("params", &self.params)
            .field("vocabulary_size", &self.vocabulary.len())
            .field("n_documents", &self.n_documents)
            .finish()
    }
}

impl TfIdfVectorizer {
    /// Create an unfitted vectorizer.
    pub fn new(params: FeatureParams) -> Result<Self> {
        let word_analyzer = PipelineAnalyzer::new(Arc::new(RegexTokenizer::query_terms()?))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .add_filter(Arc::new(ShingleFilter::new(params.word_min, params.word_max)?))
            .with_name("intent_words");
        let char_analyzer =
            PipelineAnalyzer::new(Arc::new(NgramTokenizer::new(params.char_min, params.char_max)?))
                .add_filter(Arc::new(LowercaseFilter::new()))
                .with_name("intent_chars");

        Ok(Self {
            params,
            vocabulary: AHashMap::new(),
            idf: Vec::new(),
            n_documents: 0,
            word_analyzer: Arc::new(word_analyzer),
            char_analyzer: Arc::new(char_analyzer),
        })
    }

    /// Rebuild a fitted vectorizer from its persisted parts.
    pub fn from_parts(params: FeatureParams, terms: Vec<String>, idf: Vec<f64>, n_documents: usize) -> Result<Self> {
        if terms.len() != idf.len() {
            anyhow::bail!("vocabulary has {} terms but {} idf weights", terms.len(), idf.len());
        }
        let mut vectorizer = Self::new(params)?;
        vectorizer.vocabulary = terms.into_iter().enumerate().map(|(i, t)| (t, i)).collect();
        vectorizer.idf = idf;
        vectorizer.n_documents = n_documents;
        Ok(vectorizer)
    }

    /// Fit the vectorizer on training documents.
    pub fn fit(&mut self, documents: &[String]) -> Result<()> {
        self.n_documents = documents.len();
        let mut vocabulary = AHashMap::new();
        let mut document_frequency: Vec<usize> = Vec::new();

        for doc in documents {
            let unique: HashSet<String> = self.features(doc)?.into_iter().collect();
            // sorted so indices do not depend on hash order
            let mut unique: Vec<String> = unique.into_iter().collect();
            unique.sort();
            for feature in unique {
                let next = vocabulary.len();
                let idx = *vocabulary.entry(feature).or_insert(next);
                if idx == document_frequency.len() {
                    document_frequency.push(0);
                }
                document_frequency[idx] += 1;
            }
        }

        // IDF = ln((N + 1) / (df + 1)) + 1
        let n = self.n_documents as f64;
        self.idf = document_frequency
            .iter()
            .map(|&df| ((n + 1.0) / (df as f64 + 1.0)).ln() + 1.0)
            .collect();
        self.vocabulary = vocabulary;

        Ok(())
    }

    /// Transform a document into a normalized TF-IDF vector.
    pub fn transform(&self, document: &str) -> Result<SparseVector> {
        let features = self.features(document)?;
        let mut counts: AHashMap<usize, f64> = AHashMap::new();
        for feature in &features {
            if let Some(&idx) = self.vocabulary.get(feature) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let total = features.len().max(1) as f64;
        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(idx, count)| (idx, count / total * self.idf[idx]))
            .collect();
        vector.sort_by_key(|(idx, _)| *idx);

        let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|(_, w)| *w /= norm);
        }
        Ok(vector)
    }

    fn features(&self, text: &str) -> Result<Vec<String>> {
        let mut features: Vec<String> = self
            .word_analyzer
            .analyze(text)?
            .map(|token| format!("w:{}", token.text))
            .collect();

        let padded = format!(" {} ", text.split_whitespace().collect::<Vec<_>>().join(" "));
        features.extend(
            self.char_analyzer
                .analyze(&padded)?
                .map(|token| format!("c:{}", token.text)),
        );
        Ok(features)
    }

    pub fn params(&self) -> FeatureParams {
        self.params
    }

    /// Vocabulary terms ordered by feature index.
    pub fn terms(&self) -> Vec<String> {
        let mut terms = vec![String::new(); self.vocabulary.len()];
        for (term, &idx) in &self.vocabulary {
            terms[idx] = term.clone();
        }
        terms
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    pub fn n_documents(&self) -> usize {
        self.n_documents
    }

    /// Get the size of the vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }
}
