//! TF-IDF features with a linear intent classifier.
//!
//! - [`IntentClassifier`]: common interface, implemented by the trained
//!   [`LinearIntentClassifier`] and the always-unsure [`NullIntentModel`]
//! - [`TfIdfVectorizer`]: word shingles plus character n-grams
//! - [`IntentSample`]: one labelled training message
//!
//! # Example
//!
//! ```
//! use phonewise::config::ClassifierConfig;
//! use phonewise::ml::intent_classifier::{
//!     default_training_samples, IntentClassifier, LinearIntentClassifier,
//! };
//!
//! let model = LinearIntentClassifier::train(&default_training_samples(), &ClassifierConfig::default()).unwrap();
//! let prediction = model.predict("hello there").unwrap();
//! assert_eq!(prediction.label, "greeting");
//! ```

mod classifier;
mod core;
mod linear;
mod null;
mod tfidf;
mod types;

pub use classifier::IntentClassifier;
pub use core::{default_training_samples, load_or_null, load_training_data};
pub use linear::LinearIntentClassifier;
pub use null::NullIntentModel;
pub use tfidf::{FeatureParams, SparseVector, TfIdfVectorizer};
pub use types::{IntentPrediction, IntentSample};
