//! Criterion benchmarks for Phonewise.
//!
//! Covers the hot paths of a chat message:
//! - Entity extraction
//! - Intent classification
//! - Ranking over a catalog
//! - The full pipeline

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use phonewise::assistant::Assistant;
use phonewise::catalog::entry::{CatalogEntry, SpecSet};
use phonewise::catalog::memory::InMemoryCatalog;
use phonewise::config::{AssistantConfig, ClassifierConfig, NluConfig, RankingConfig};
use phonewise::ml::intent_classifier::{
    IntentClassifier, LinearIntentClassifier, default_training_samples,
};
use phonewise::nlu::{ContinuationHints, QueryExtractor};
use phonewise::recommend::{RecommendationEngine, SearchConstraints};

const MESSAGES: &[&str] = &[
    "hello",
    "phones under 2000",
    "I love Samsung but hate Apple",
    "iPhone 15 pro and Xiaomi 14 pro",
    "samsung with battery above 5000mah",
    "best phone for gaming between rm1500 and rm3000",
    "good camera for my grandma",
    "phone with nfc and wireless charging",
];

const BRANDS: &[&str] = &["Samsung", "Apple", "Xiaomi", "Oppo", "Vivo", "Realme", "Honor"];

/// Generate a synthetic catalog.
fn generate_catalog(count: usize) -> InMemoryCatalog {
    let entries = (0..count)
        .map(|i| {
            let brand = BRANDS[i % BRANDS.len()];
            let price = 500.0 + (i % 60) as f64 * 100.0;
            CatalogEntry::new(i as u64 + 1, brand, format!("Model {}", i + 1), price).with_specs(
                SpecSet {
                    battery_capacity_mah: Some(3000 + (i % 25) as u32 * 100),
                    rear_camera_main_mp: Some([12, 48, 50, 64, 108, 200][i % 6]),
                    ram_options: Some(format!("{}GB", [4, 6, 8, 12][i % 4])),
                    storage_options: Some(format!("{}GB", [64, 128, 256][i % 3])),
                    refresh_rate: Some([60, 90, 120][i % 3]),
                    screen_size: Some(6.1 + (i % 8) as f64 * 0.1),
                    screen_type: Some(if i % 2 == 0 { "AMOLED" } else { "LCD" }.to_string()),
                    ..SpecSet::default()
                },
            )
        })
        .collect();
    InMemoryCatalog::from_entries(entries)
}

/// Benchmark entity extraction.
fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extraction");
    let extractor = QueryExtractor::new(&NluConfig::default()).unwrap();
    let hints = ContinuationHints::default();

    group.bench_function("extract_single_message", |b| {
        b.iter(|| black_box(extractor.extract(black_box(MESSAGES[4]), &hints).unwrap()))
    });

    group.throughput(Throughput::Elements(MESSAGES.len() as u64));
    group.bench_function("extract_message_batch", |b| {
        b.iter(|| {
            for message in MESSAGES {
                black_box(extractor.extract(message, &hints).unwrap());
            }
        })
    });

    group.finish();
}

/// Benchmark the statistical intent model.
fn bench_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("classification");
    group.sample_size(20);
    let samples = default_training_samples();
    let config = ClassifierConfig::default();

    group.bench_function("train_default_samples", |b| {
        b.iter(|| black_box(LinearIntentClassifier::train(&samples, &config).unwrap()))
    });

    let model = LinearIntentClassifier::train(&samples, &config).unwrap();
    group.throughput(Throughput::Elements(MESSAGES.len() as u64));
    group.bench_function("predict_message_batch", |b| {
        b.iter(|| {
            for message in MESSAGES {
                black_box(model.predict(message).unwrap());
            }
        })
    });

    group.finish();
}

/// Benchmark ranking at several catalog sizes.
fn bench_ranking(c: &mut Criterion) {
    let mut group = c.benchmark_group("ranking");
    group.sample_size(20);

    for size in [100, 1_000, 10_000] {
        let engine = RecommendationEngine::new(
            Arc::new(generate_catalog(size)),
            RankingConfig::default(),
        );
        let single = SearchConstraints::new();
        let fan_out = SearchConstraints::new()
            .with_brands(vec!["Samsung".to_string(), "Xiaomi".to_string(), "Oppo".to_string()]);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("battery", size), &size, |b, _| {
            b.iter(|| black_box(engine.recommend_by_battery(&single, 5).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("brand_fan_out", size), &size, |b, _| {
            b.iter(|| black_box(engine.recommend_by_brand(&fan_out, 5).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("fuzzy_model", size), &size, |b, _| {
            b.iter(|| black_box(engine.find_models("model 42").unwrap()))
        });
    }

    group.finish();
}

/// Benchmark the full message pipeline.
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let assistant = Assistant::new(
        Arc::new(generate_catalog(1_000)),
        Arc::new(AssistantConfig::default()),
    )
    .unwrap();

    group.throughput(Throughput::Elements(MESSAGES.len() as u64));
    group.bench_function("classify_and_respond", |b| {
        b.iter(|| {
            for message in MESSAGES {
                black_box(
                    assistant
                        .classify_and_respond("bench", None, message)
                        .unwrap(),
                );
            }
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_extraction,
    bench_classification,
    bench_ranking,
    bench_pipeline
);
criterion_main!(benches);
