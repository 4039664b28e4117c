use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use phonewise::catalog::memory::InMemoryCatalog;
use phonewise::config::RankingConfig;
use phonewise::error::Result;
use phonewise::nlu::types::{BudgetRange, Persona, UsageType};
use phonewise::recommend::{PreferenceOverride, RecommendationEngine, SearchConstraints};

fn build_engine() -> Result<RecommendationEngine> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/phones.json");
    let catalog = InMemoryCatalog::from_json_file(path)?;
    Ok(RecommendationEngine::new(
        Arc::new(catalog),
        RankingConfig::default(),
    ))
}

fn three_brands() -> SearchConstraints {
    SearchConstraints::new().with_brands(vec![
        "Samsung".to_string(),
        "Apple".to_string(),
        "Xiaomi".to_string(),
    ])
}

#[test]
fn fan_out_gives_every_brand_a_share() -> Result<()> {
    let engine = build_engine()?;

    let results = engine.recommend_by_brand(&three_brands(), 6)?;
    assert!(results.len() <= 6);

    let mut per_brand: HashMap<&str, usize> = HashMap::new();
    for result in &results {
        *per_brand.entry(result.entry.brand.as_str()).or_default() += 1;
    }
    assert!(per_brand["Samsung"] >= 2);
    assert!(per_brand["Apple"] >= 2);
    assert!(per_brand["Xiaomi"] >= 2);
    Ok(())
}

#[test]
fn ranking_is_deterministic() -> Result<()> {
    let engine = build_engine()?;
    let constraints = SearchConstraints::new().with_budget(Some(BudgetRange::new(500.0, 6000.0)));

    for _ in 0..5 {
        let first = engine.recommend_by_usage(UsageType::Gaming, None, &constraints, 5)?;
        let second = engine.recommend_by_usage(UsageType::Gaming, None, &constraints, 5)?;
        assert_eq!(first, second);
    }
    Ok(())
}

#[test]
fn excluded_brands_never_appear() -> Result<()> {
    let engine = build_engine()?;
    let constraints = SearchConstraints::new().with_excluded_brands(vec!["apple".to_string()]);

    let results = engine.recommend_by_budget(&constraints, 10)?;
    assert!(!results.is_empty());
    assert!(results.iter().all(|r| r.entry.brand != "Apple"));
    Ok(())
}

#[test]
fn persona_changes_the_ranking() -> Result<()> {
    let engine = build_engine()?;
    let constraints = SearchConstraints::new();

    let senior = engine.recommend_by_usage(UsageType::Basic, Some(Persona::Senior), &constraints, 3)?;
    assert_eq!(senior.len(), 3);
    // cheap phones with big batteries suit seniors
    assert!(senior.iter().all(|r| r.entry.price <= 2000.0));
    Ok(())
}

#[test]
fn similar_phones_are_priced_alike() -> Result<()> {
    let engine = build_engine()?;

    let results = engine.similar_to(7, 5)?;
    let ids: Vec<u64> = results.iter().map(|r| r.catalog_entry_id).collect();
    assert_eq!(ids, vec![4]);
    assert!(engine.similar_to(404, 5)?.is_empty());
    Ok(())
}

#[test]
fn feature_search_prefers_known_support() -> Result<()> {
    let engine = build_engine()?;

    let results = engine.recommend_by_feature("wireless charging", &SearchConstraints::new(), 3)?;
    let ids: Vec<u64> = results.iter().map(|r| r.catalog_entry_id).collect();
    assert_eq!(ids.len(), 3);
    for id in ids {
        assert!([1, 4, 5, 7].contains(&id));
    }
    Ok(())
}

#[test]
fn preferences_balance_brands() -> Result<()> {
    let engine = build_engine()?;
    let config = RankingConfig::default();

    let preference = PreferenceOverride::from_defaults(&config.preference_defaults)
        .with_preferred_brands(vec!["Samsung".to_string(), "Xiaomi".to_string()]);
    let results = engine.recommend_with_preferences(&preference, &["Apple".to_string()], 4)?;

    assert!(!results.is_empty());
    assert!(results.len() <= 4);
    assert!(results.iter().all(|r| r.entry.brand != "Apple"));
    assert!(results.iter().any(|r| r.entry.brand == "Samsung"));
    assert!(results.iter().any(|r| r.entry.brand == "Xiaomi"));
    Ok(())
}
