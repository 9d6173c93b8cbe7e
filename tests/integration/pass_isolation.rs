//! One topic failing never affects the topics around it

use std::sync::Arc;
use tidbit::catalog::SnippetStore;
use tidbit::generation::GenerationPipeline;
use tidbit::scheduler::{PassRunner, PassTrigger};

use crate::integration::test_utils::{numbered_response, temp_store, FailingStore, ScriptedClient};

#[tokio::test]
async fn persistence_failure_is_isolated_to_its_topic() {
    let (_dir, store) = temp_store();
    let first = store.create_topic("Alpha", None).unwrap();
    let broken = store.create_topic("Beta", None).unwrap();
    let last = store.create_topic("Gamma", None).unwrap();

    let client = Arc::new(ScriptedClient::new().default_reply(&numbered_response("science", 3)));
    let failing = Arc::new(FailingStore::new(store.clone(), broken.topic_id));
    let runner = PassRunner::new(failing, GenerationPipeline::new(client.clone(), 10));

    let report = runner.run_pass(PassTrigger::Manual).await;

    assert_eq!(client.calls(), vec!["Alpha", "Beta", "Gamma"]);
    assert_eq!(report.results.len(), 3);
    assert_eq!(report.results[0].generated, 3);
    assert!(report.results[0].error.is_none());
    assert_eq!(report.results[1].generated, 0);
    let error = report.results[1].error.as_deref().unwrap();
    assert!(error.contains("simulated write failure"));
    assert_eq!(report.results[2].generated, 3);
    assert_eq!(report.total_generated, 6);
    assert_eq!(report.failed_topics(), 1);

    assert_eq!(store.list_snippets(first.topic_id).unwrap().len(), 3);
    assert!(store.list_snippets(broken.topic_id).unwrap().is_empty());
    assert_eq!(store.list_snippets(last.topic_id).unwrap().len(), 3);
}

#[tokio::test]
async fn generation_failure_yields_zero_without_error() {
    let (_dir, store) = temp_store();
    store.create_topic("Offline", None).unwrap();
    let online = store.create_topic("Online", None).unwrap();

    let client = Arc::new(
        ScriptedClient::new()
            .fail_for("Offline", "connection refused")
            .reply_for("Online", &numbered_response("networks", 2)),
    );
    let runner = PassRunner::new(store.clone(), GenerationPipeline::new(client, 10));

    let report = runner.run_pass(PassTrigger::Timer).await;
    assert_eq!(report.trigger, PassTrigger::Timer);
    assert_eq!(report.results[0].generated, 0);
    assert!(report.results[0].error.is_none());
    assert_eq!(report.results[1].generated, 2);
    assert_eq!(store.list_snippets(online.topic_id).unwrap().len(), 2);
}

#[tokio::test]
async fn generated_snippets_respect_quota_and_start_unflagged() {
    let (_dir, store) = temp_store();
    let topic = store.create_topic("Quota", None).unwrap();

    let client = Arc::new(ScriptedClient::new().default_reply(&numbered_response("limits", 12)));
    let runner = PassRunner::new(store.clone(), GenerationPipeline::new(client, 5));

    let report = runner.generate_for_topic(Some(topic.topic_id)).await.unwrap();
    assert_eq!(report.trigger, PassTrigger::Topic);
    assert_eq!(report.total_generated, 5);

    let stored = store.list_snippets(topic.topic_id).unwrap();
    assert_eq!(stored.len(), 5);
    assert!(stored.iter().all(|s| !s.liked && !s.disliked && !s.deep_dive));
    assert!(stored[0].body.contains("Fact number 1 about limits"));
}
