//! Command implementations for the phonewise CLI.

use std::io::{self, BufRead};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info};

use crate::assistant::{Assistant, JsonLinesHistory};
use crate::catalog::CatalogStore;
use crate::catalog::memory::InMemoryCatalog;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::compare::compare_entries;
use crate::config::AssistantConfig;
use crate::error::{PhonewiseError, Result};
use crate::ml::intent_classifier::{
    IntentClassifier, LinearIntentClassifier, default_training_samples, load_training_data,
};
use crate::nlu::types::BudgetRange;
use crate::recommend::{RecommendationEngine, SearchConstraints};

/// Execute a CLI command.
pub fn execute_command(args: PhonewiseArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    match &args.command {
        Command::Chat(chat_args) => chat(chat_args, config, &args),
        Command::Recommend(recommend_args) => recommend(recommend_args, config, &args),
        Command::Compare(compare_args) => compare(compare_args, &args),
        Command::Train(train_args) => train(train_args, config, &args),
    }
}

fn load_config(path: Option<&Path>) -> Result<AssistantConfig> {
    match path {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            AssistantConfig::from_json_file(path)
        }
        None => Ok(AssistantConfig::default()),
    }
}

fn load_catalog(path: &Path) -> Result<Arc<InMemoryCatalog>> {
    let catalog = InMemoryCatalog::from_json_file(path)?;
    info!(
        "Loaded {} phones from {}",
        catalog.len()?,
        path.display()
    );
    Ok(Arc::new(catalog))
}

/// Send messages to the assistant within one session.
fn chat(args: &ChatArgs, mut config: AssistantConfig, cli_args: &PhonewiseArgs) -> Result<()> {
    if let Some(model) = &args.model {
        config.classifier.model_path = Some(model.clone());
    }
    let catalog = load_catalog(&args.catalog)?;
    let mut assistant = Assistant::new(catalog, Arc::new(config))?;
    if let Some(path) = &args.history {
        assistant = assistant.with_history(Arc::new(JsonLinesHistory::open(path)?));
    }

    let messages = if args.messages.is_empty() {
        io::stdin()
            .lock()
            .lines()
            .filter(|line| !matches!(line, Ok(l) if l.trim().is_empty()))
            .collect::<io::Result<Vec<String>>>()?
    } else {
        args.messages.clone()
    };

    let mut session_id = args.session.clone();
    let mut turns = Vec::with_capacity(messages.len());
    for message in messages {
        let reply = assistant.classify_and_respond(&session_id, args.user.as_deref(), &message)?;
        session_id.clone_from(&reply.metadata.session_id);
        turns.push(ChatTurn { message, reply });
    }

    output_result(
        "Chat finished",
        &ChatTranscript { session_id, turns },
        cli_args,
    )
}

/// Rank phones with one engine strategy.
fn recommend(args: &RecommendArgs, config: AssistantConfig, cli_args: &PhonewiseArgs) -> Result<()> {
    let catalog = load_catalog(&args.catalog)?;
    let top_n = args.limit.unwrap_or(config.ranking.top_n);
    let engine = RecommendationEngine::new(catalog, config.ranking);

    let budget = match (args.min_price, args.max_price) {
        (None, None) => None,
        (min, max) => Some(BudgetRange::new(
            min.unwrap_or(0.0),
            max.unwrap_or(f64::MAX),
        )),
    };
    let constraints = SearchConstraints::new()
        .with_brands(args.brands.clone())
        .with_excluded_brands(args.exclude.clone())
        .with_budget(budget);

    let results = match args.mode {
        RecommendMode::Budget => engine.recommend_by_budget(&constraints, top_n)?,
        RecommendMode::Battery => engine.recommend_by_battery(&constraints, top_n)?,
        RecommendMode::Camera => engine.recommend_for_photography(None, &constraints, top_n)?,
        RecommendMode::Brand => engine.recommend_by_brand(&constraints, top_n)?,
        RecommendMode::Usage => {
            let usage = args.usage.ok_or_else(|| {
                PhonewiseError::invalid_argument("--usage is required with --by usage")
            })?;
            engine.recommend_by_usage(usage.into(), None, &constraints, top_n)?
        }
        RecommendMode::Feature => {
            let feature = args.feature.as_deref().ok_or_else(|| {
                PhonewiseError::invalid_argument("--feature is required with --by feature")
            })?;
            engine.recommend_by_feature(feature, &constraints, top_n)?
        }
        RecommendMode::Similar => {
            let id = args.similar_to.ok_or_else(|| {
                PhonewiseError::invalid_argument("--similar-to is required with --by similar")
            })?;
            engine.similar_to(id, top_n)?
        }
    };

    output_result(
        "Recommendations",
        &RecommendationList {
            mode: args.mode,
            results,
        },
        cli_args,
    )
}

/// Compare two phones by id.
fn compare(args: &CompareArgs, cli_args: &PhonewiseArgs) -> Result<()> {
    let catalog = load_catalog(&args.catalog)?;
    let find = |id: u64| {
        catalog
            .get_by_id(id)?
            .ok_or_else(|| PhonewiseError::not_found(format!("Phone {id} is not in the catalog")))
    };
    let a = find(args.phone_a)?;
    let b = find(args.phone_b)?;

    output_result(
        "Comparison",
        &ComparisonReport {
            phone_a: a.display_name(),
            phone_b: b.display_name(),
            comparison: compare_entries(&a, &b),
        },
        cli_args,
    )
}

/// Train the intent model and write its artifact.
fn train(args: &TrainArgs, mut config: AssistantConfig, cli_args: &PhonewiseArgs) -> Result<()> {
    if let Some(epochs) = args.epochs {
        config.classifier.epochs = epochs;
    }
    if let Some(seed) = args.seed {
        config.classifier.seed = seed;
    }

    let samples = match &args.data {
        Some(path) => load_training_data(path)?,
        None => default_training_samples(),
    };

    let start_time = Instant::now();
    let model = LinearIntentClassifier::train(&samples, &config.classifier)?;
    let duration = start_time.elapsed();
    model.save(&args.output)?;

    let correct = samples
        .iter()
        .filter(|s| matches!(model.predict(&s.query), Ok(p) if p.label == s.intent))
        .count();

    output_result(
        "Training finished",
        &TrainingSummary {
            output: args.output.display().to_string(),
            samples: samples.len(),
            labels: model.labels().to_vec(),
            training_accuracy: correct as f64 / samples.len().max(1) as f64,
            duration_ms: duration.as_millis() as u64,
        },
        cli_args,
    )
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_train_writes_loadable_model() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("intent.bin");
        let args = PhonewiseArgs::try_parse_from([
            "phonewise",
            "--quiet",
            "--format",
            "json",
            "train",
            output.to_str().unwrap(),
            "--epochs",
            "5",
        ])
        .unwrap();

        execute_command(args).unwrap();
        let model = LinearIntentClassifier::load(&output).unwrap();
        assert!(model.labels().iter().any(|l| l == "greeting"));
    }

    #[test]
    fn test_compare_unknown_phone() {
        let dir = TempDir::new().unwrap();
        let catalog = dir.path().join("phones.json");
        fs::write(
            &catalog,
            r#"[{"id": 1, "brand": "Samsung", "model_name": "Galaxy A15", "price": 799.0}]"#,
        )
        .unwrap();

        let args = PhonewiseArgs::try_parse_from([
            "phonewise",
            "compare",
            catalog.to_str().unwrap(),
            "1",
            "2",
        ])
        .unwrap();
        let err = execute_command(args).unwrap_err();
        assert!(err.to_string().contains("Phone 2"));
    }
}
