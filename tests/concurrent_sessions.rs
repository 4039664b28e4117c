use std::path::PathBuf;
use std::sync::Arc;

use phonewise::assistant::{Assistant, InMemoryHistory};
use phonewise::catalog::memory::InMemoryCatalog;
use phonewise::config::AssistantConfig;
use phonewise::error::Result;
use phonewise::intent::Intent;

fn build_assistant(history: Arc<InMemoryHistory>) -> Result<Arc<Assistant>> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/phones.json");
    let catalog = InMemoryCatalog::from_json_file(path)?;
    let assistant = Assistant::new(Arc::new(catalog), Arc::new(AssistantConfig::default()))?
        .with_history(history);
    Ok(Arc::new(assistant))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn sessions_are_isolated_under_load() -> Result<()> {
    let history = Arc::new(InMemoryHistory::new());
    let assistant = build_assistant(history.clone())?;

    let mut handles = Vec::new();
    for i in 0..8 {
        let assistant = assistant.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let session = format!("session_{i}");
            let user = format!("user_{i}");
            let (liked, other) = if i % 2 == 0 {
                ("Samsung", "Xiaomi")
            } else {
                ("Xiaomi", "Samsung")
            };
            assistant.classify_and_respond(&session, Some(&user), &format!("I love {liked}"))?;
            assistant.classify_and_respond(&session, Some(&user), &format!("I hate {other}"))?;
            assistant.classify_and_respond(&session, Some(&user), "phones under 2000")
        }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        let reply = handle.await.expect("task panicked")?;
        assert_eq!(reply.intent, Intent::BudgetQuery);

        let expected = if i % 2 == 0 { "Samsung" } else { "Xiaomi" };
        assert!(
            reply
                .ranked_results
                .iter()
                .all(|r| r.entry.brand == expected)
        );
    }

    assert_eq!(assistant.contexts().session_count(), 8);
    assert_eq!(history.len(), 24);
    assert_eq!(history.for_user("user_3").len(), 3);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn one_session_serialises_its_writes() -> Result<()> {
    let assistant = build_assistant(Arc::new(InMemoryHistory::new()))?;

    let mut handles = Vec::new();
    for _ in 0..16 {
        let assistant = assistant.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            assistant.classify_and_respond("shared", None, "phones under 3000")
        }));
    }
    for handle in handles {
        handle.await.expect("task panicked")?;
    }

    let ctx = assistant.contexts().snapshot("shared").unwrap();
    assert_eq!(ctx.messages.len(), 16);
    assert_eq!(ctx.last_intent, Some(Intent::BudgetQuery));
    Ok(())
}
