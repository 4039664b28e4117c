//! Averaged multi-class perceptron over TF-IDF features.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::config::ClassifierConfig;
use crate::ml::MLError;
use crate::ml::intent_classifier::classifier::IntentClassifier;
use crate::ml::intent_classifier::tfidf::{FeatureParams, SparseVector, TfIdfVectorizer};
use crate::ml::intent_classifier::types::{IntentPrediction, IntentSample};

const ARTIFACT_VERSION: u32 = 1;
const MIN_SAMPLES: usize = 2;

/// What gets written to disk.
#[derive(Debug, Serialize, Deserialize)]
struct ModelArtifact {
    version: u32,
    params: FeatureParams,
    terms: Vec<String>,
    idf: Vec<f64>,
    n_documents: usize,
    labels: Vec<String>,
    weights: Vec<Vec<f64>>,
    bias: Vec<f64>,
}

/// Linear intent classifier: one averaged weight vector per label.
#[derive(Debug)]
pub struct LinearIntentClassifier {
    vectorizer: TfIdfVectorizer,
    labels: Vec<String>,
    weights: Vec<Vec<f64>>,
    bias: Vec<f64>,
}

impl LinearIntentClassifier {
    /// Train on labelled samples. Sample order is shuffled per epoch with
    /// the configured seed, so training is reproducible.
    pub fn train(samples: &[IntentSample], config: &ClassifierConfig) -> Result<Self> {
        if samples.len() < MIN_SAMPLES {
            return Err(MLError::InsufficientTrainingData {
                min_samples: MIN_SAMPLES,
                actual: samples.len(),
            }
            .into());
        }

        let mut labels: Vec<String> = samples.iter().map(|s| s.intent.clone()).collect();
        labels.sort();
        labels.dedup();
        if labels.len() < 2 {
            return Err(MLError::SingleLabel.into());
        }

        let documents: Vec<String> = samples.iter().map(|s| s.query.clone()).collect();
        let mut vectorizer = TfIdfVectorizer::new(FeatureParams::from(config))?;
        vectorizer.fit(&documents)?;

        let examples: Vec<(SparseVector, usize)> = samples
            .iter()
            .map(|s| {
                let label = labels.binary_search(&s.intent).unwrap_or(0);
                Ok((vectorizer.transform(&s.query)?, label))
            })
            .collect::<Result<_>>()?;

        let dims = vectorizer.vocabulary_size();
        let mut weights = vec![vec![0.0; dims]; labels.len()];
        let mut bias = vec![0.0; labels.len()];
        // running sums of step-weighted updates for averaging
        let mut weight_acc = vec![vec![0.0; dims]; labels.len()];
        let mut bias_acc = vec![0.0; labels.len()];

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut order: Vec<usize> = (0..examples.len()).collect();
        let mut step = 1.0;
        let mut mistakes = 0;

        for _ in 0..config.epochs.max(1) {
            order.shuffle(&mut rng);
            mistakes = 0;
            for &i in &order {
                let (features, gold) = &examples[i];
                let predicted = argmax(&scores(&weights, &bias, features));
                if predicted != *gold {
                    mistakes += 1;
                    for &(idx, value) in features {
                        weights[*gold][idx] += value;
                        weights[predicted][idx] -= value;
                        weight_acc[*gold][idx] += step * value;
                        weight_acc[predicted][idx] -= step * value;
                    }
                    bias[*gold] += 1.0;
                    bias[predicted] -= 1.0;
                    bias_acc[*gold] += step;
                    bias_acc[predicted] -= step;
                }
                step += 1.0;
            }
        }

        for (w, acc) in weights.iter_mut().zip(&weight_acc) {
            for (wi, ai) in w.iter_mut().zip(acc) {
                *wi -= ai / step;
            }
        }
        for (b, acc) in bias.iter_mut().zip(&bias_acc) {
            *b -= acc / step;
        }

        info!(
            "trained intent model: {} samples, {} labels, {} features, {} errors in last epoch",
            samples.len(),
            labels.len(),
            dims,
            mistakes
        );

        Ok(Self {
            vectorizer,
            labels,
            weights,
            bias,
        })
    }

    /// Write the model as a bincode artifact.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let artifact = ModelArtifact {
            version: ARTIFACT_VERSION,
            params: self.vectorizer.params(),
            terms: self.vectorizer.terms(),
            idf: self.vectorizer.idf().to_vec(),
            n_documents: self.vectorizer.n_documents(),
            labels: self.labels.clone(),
            weights: self.weights.clone(),
            bias: self.bias.clone(),
        };
        let bytes = bincode::serialize(&artifact).context("failed to encode intent model")?;
        fs::write(path.as_ref(), bytes)
            .with_context(|| format!("failed to write {}", path.as_ref().display()))?;
        Ok(())
    }

    /// Read a model written by [`save`](Self::save).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path.as_ref())
            .with_context(|| format!("failed to read {}", path.as_ref().display()))?;
        let artifact: ModelArtifact =
            bincode::deserialize(&bytes).context("failed to decode intent model")?;

        if artifact.version != ARTIFACT_VERSION {
            return Err(MLError::ArtifactMismatch {
                message: format!("unsupported version {}", artifact.version),
            }
            .into());
        }
        let dims = artifact.terms.len();
        if artifact.weights.len() != artifact.labels.len()
            || artifact.bias.len() != artifact.labels.len()
            || artifact.weights.iter().any(|w| w.len() != dims)
        {
            return Err(MLError::ArtifactMismatch {
                message: "weight shapes do not match the vocabulary".to_string(),
            }
            .into());
        }

        let vectorizer = TfIdfVectorizer::from_parts(
            artifact.params,
            artifact.terms,
            artifact.idf,
            artifact.n_documents,
        )?;
        info!(
            "loaded intent model from {} ({} labels)",
            path.as_ref().display(),
            artifact.labels.len()
        );

        Ok(Self {
            vectorizer,
            labels: artifact.labels,
            weights: artifact.weights,
            bias: artifact.bias,
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl IntentClassifier for LinearIntentClassifier {
    fn predict(&self, text: &str) -> Result<IntentPrediction> {
        if self.labels.is_empty() {
            return Err(MLError::ModelNotTrained {
                message: "no labels".to_string(),
            }
            .into());
        }

        let features = self.vectorizer.transform(text)?;
        let scores = scores(&self.weights, &self.bias, &features);
        let best = argmax(&scores);
        let runner_up = scores
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != best)
            .map(|(_, s)| *s)
            .fold(f64::NEG_INFINITY, f64::max);

        // normalized margin between the two best labels
        let confidence = if runner_up.is_finite() {
            let denominator = scores[best].abs() + runner_up.abs();
            if denominator > 0.0 {
                ((scores[best] - runner_up) / denominator).clamp(0.0, 1.0)
            } else {
                0.0
            }
        } else {
            1.0
        };

        Ok(IntentPrediction {
            label: self.labels[best].clone(),
            confidence,
        })
    }

    fn name(&self) -> &str {
        "linear_tfidf"
    }
}

fn scores(weights: &[Vec<f64>], bias: &[f64], features: &SparseVector) -> Vec<f64> {
    weights
        .iter()
        .zip(bias)
        .map(|(w, b)| b + features.iter().map(|&(idx, value)| w[idx] * value).sum::<f64>())
        .collect()
}

/// Index of the highest score; the first one wins ties.
fn argmax(scores: &[f64]) -> usize {
    let mut best = 0;
    for (i, &score) in scores.iter().enumerate() {
        if score > scores[best] {
            best = i;
        }
    }
    best
}
