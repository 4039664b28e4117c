use std::path::PathBuf;
use std::sync::Arc;

use phonewise::assistant::Assistant;
use phonewise::catalog::memory::InMemoryCatalog;
use phonewise::compare::{OverallWinner, Winner};
use phonewise::config::AssistantConfig;
use phonewise::error::Result;
use phonewise::intent::Intent;
use phonewise::respond::ReplyType;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn build_assistant() -> Result<Assistant> {
    let catalog = InMemoryCatalog::from_json_file(fixture("phones.json"))?;
    Assistant::new(Arc::new(catalog), Arc::new(AssistantConfig::default()))
}

fn brands(reply: &phonewise::respond::ChatReply) -> Vec<&str> {
    reply
        .ranked_results
        .iter()
        .map(|r| r.entry.brand.as_str())
        .collect()
}

#[test]
fn brand_sentiment_is_remembered_across_messages() -> Result<()> {
    let assistant = build_assistant()?;

    let reply = assistant.classify_and_respond("s1", None, "I love Samsung but hate Apple")?;
    assert_eq!(reply.intent, Intent::BrandQuery);
    assert_eq!(brands(&reply), vec!["Samsung"; 3]);

    let ctx = assistant.contexts().snapshot("s1").unwrap();
    assert_eq!(ctx.brand_preferences.preferred, vec!["Samsung"]);
    assert_eq!(ctx.brand_preferences.excluded, vec!["Apple"]);

    assistant.classify_and_respond("s1", None, "Samsung")?;
    let ctx = assistant.contexts().snapshot("s1").unwrap();
    assert_eq!(ctx.brand_preferences.excluded, vec!["Apple"]);
    assert!(!ctx.brand_preferences.preferred.contains(&"Apple".to_string()));
    Ok(())
}

#[test]
fn naming_an_excluded_brand_does_not_lift_the_exclusion() -> Result<()> {
    let assistant = build_assistant()?;

    assistant.classify_and_respond("s1", None, "I love Samsung but hate Apple")?;
    let reply = assistant.classify_and_respond("s1", None, "Apple")?;
    assert_eq!(reply.intent, Intent::BrandQuery);
    assert!(!brands(&reply).contains(&"Apple"));

    let ctx = assistant.contexts().snapshot("s1").unwrap();
    assert_eq!(ctx.brand_preferences.excluded, vec!["Apple"]);
    assert!(!ctx.brand_preferences.preferred.contains(&"Apple".to_string()));
    Ok(())
}

#[test]
fn model_names_outrank_budgets() -> Result<()> {
    let assistant = build_assistant()?;

    let reply = assistant.classify_and_respond("s1", None, "iPhone 15 under 3000")?;
    assert_eq!(reply.intent, Intent::ModelSearch);
    assert!(reply.phone_ids().contains(&4));
    Ok(())
}

#[test]
fn several_models_are_looked_up_individually() -> Result<()> {
    let assistant = build_assistant()?;

    let reply = assistant.classify_and_respond("s1", None, "iphone 15 pro and xiaomi 14 pro")?;
    assert_eq!(reply.intent, Intent::MultiModelSearch);
    assert_eq!(reply.phone_ids(), vec![5, 7]);
    assert_eq!(reply.metadata.reply_type, ReplyType::Recommendation);
    Ok(())
}

#[test]
fn budget_carries_over_to_usage_question() -> Result<()> {
    let assistant = build_assistant()?;

    let reply = assistant.classify_and_respond("s1", None, "phones under 2000")?;
    assert_eq!(reply.intent, Intent::BudgetQuery);
    assert!(!reply.ranked_results.is_empty());
    assert!(reply.ranked_results.iter().all(|r| r.entry.price <= 2000.0));
    // inactive entries never show up
    assert!(!reply.phone_ids().contains(&9));

    let reply = assistant.classify_and_respond("s1", None, "what about gaming")?;
    assert_eq!(reply.intent, Intent::UsageRecommendation);
    assert!(!reply.ranked_results.is_empty());
    assert!(reply.ranked_results.iter().all(|r| r.entry.price <= 2000.0));
    assert!(reply.reply_text.contains("Gaming"));
    Ok(())
}

#[test]
fn video_resolution_is_not_a_budget() -> Result<()> {
    let assistant = build_assistant()?;

    let reply = assistant.classify_and_respond("s1", None, "phone that records 4k video")?;
    assert_ne!(reply.intent, Intent::BudgetQuery);
    let ctx = assistant.contexts().snapshot("s1").unwrap();
    assert!(ctx.active_filters.budget.is_none());
    Ok(())
}

#[test]
fn brand_follow_up_keeps_battery_focus() -> Result<()> {
    let assistant = build_assistant()?;

    let reply = assistant.classify_and_respond("s1", None, "long lasting phone")?;
    assert_eq!(reply.intent, Intent::BatteryFocused);
    assert_eq!(reply.phone_ids(), vec![1, 2, 3, 6, 7]);

    let reply = assistant.classify_and_respond("s1", None, "xiaomi")?;
    assert_eq!(reply.intent, Intent::BrandQuery);
    assert_eq!(reply.phone_ids(), vec![6, 7]);
    assert!(reply.reply_text.contains("with battery"));
    Ok(())
}

#[test]
fn spec_thresholds_filter_strictly() -> Result<()> {
    let assistant = build_assistant()?;

    let reply =
        assistant.classify_and_respond("s1", None, "samsung with battery above 5000mah")?;
    assert_eq!(reply.intent, Intent::SpecFilter);
    let mut ids = reply.phone_ids();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3]);
    assert!(reply.reply_text.contains("5000mAh"));
    Ok(())
}

#[test]
fn phones_without_specs_do_not_break_scoring() -> Result<()> {
    let assistant = build_assistant()?;

    let reply = assistant.classify_and_respond("s1", None, "best phone for business")?;
    assert_eq!(reply.intent, Intent::UsageRecommendation);
    assert!(!reply.ranked_results.is_empty());
    assert!(reply.ranked_results.iter().all(|r| r.score.is_finite()));
    Ok(())
}

#[test]
fn comparison_requests_redirect() -> Result<()> {
    let assistant = build_assistant()?;

    let reply = assistant.classify_and_respond("s1", None, "compare them")?;
    assert_eq!(reply.intent, Intent::Comparison);
    assert!(reply.ranked_results.is_empty());
    assert_eq!(reply.metadata_json()["action"], "redirect_compare");
    assert_eq!(reply.metadata_json()["type"], "text");
    Ok(())
}

#[test]
fn empty_session_id_starts_a_session() -> Result<()> {
    let assistant = build_assistant()?;

    let reply = assistant.classify_and_respond("", None, "hello")?;
    assert_eq!(reply.intent, Intent::Greeting);
    let session_id = reply.metadata.session_id.clone();
    assert!(session_id.starts_with("session_guest_"));

    assistant.classify_and_respond(&session_id, None, "phones under 2000")?;
    assert_eq!(assistant.contexts().session_count(), 1);
    let ctx = assistant.contexts().snapshot(&session_id).unwrap();
    assert_eq!(ctx.messages.len(), 2);
    assert_eq!(ctx.last_intent, Some(Intent::BudgetQuery));
    Ok(())
}

#[test]
fn clearing_filters_keeps_brands() -> Result<()> {
    let assistant = build_assistant()?;

    assistant.classify_and_respond("s1", None, "I hate Apple")?;
    assistant.classify_and_respond("s1", None, "phones under 2000")?;
    assert!(assistant.clear_filters("s1"));

    let ctx = assistant.contexts().snapshot("s1").unwrap();
    assert!(ctx.active_filters.budget.is_none());
    assert_eq!(ctx.brand_preferences.excluded, vec!["Apple"]);
    assert!(!assistant.clear_filters("unknown"));
    Ok(())
}

#[test]
fn comparison_is_symmetric() -> Result<()> {
    let assistant = build_assistant()?;

    let forward = assistant.compare(4, 5)?.unwrap();
    let backward = assistant.compare(5, 4)?.unwrap();
    for (f, b) in forward.attributes.iter().zip(&backward.attributes) {
        assert_eq!(f.label, b.label);
        assert_eq!(f.winner.mirror(), b.winner);
    }
    assert_eq!(forward.attribute("Price").unwrap().winner, Winner::A);
    match forward.overall_winner {
        OverallWinner::A => assert_eq!(backward.overall_winner, OverallWinner::B),
        OverallWinner::B => assert_eq!(backward.overall_winner, OverallWinner::A),
        OverallWinner::Tie => assert_eq!(backward.overall_winner, OverallWinner::Tie),
    }

    assert!(assistant.compare(4, 404)?.is_none());
    Ok(())
}
