//! Response parsing scenarios, end to end through the pipeline where it matters

use std::sync::Arc;
use tidbit::generation::{parse, GenerationPipeline};
use tidbit::scheduler::PassRunner;

use crate::integration::test_utils::{temp_store, ScriptedClient};

#[test]
fn numbered_response_yields_exact_bodies() {
    let raw = "1. Fact about gravity. It pulls objects together.\n2. Did you know photons have no mass?";
    let accepted = parse(raw, 10);
    assert_eq!(accepted.len(), 2);
    assert_eq!(accepted[0], "Fact about gravity. It pulls objects together.");
    assert_eq!(accepted[1], "Did you know photons have no mass?");
}

#[test]
fn empty_response_yields_nothing() {
    assert!(parse("", 10).is_empty());
    assert!(parse("   \n\t\n  ", 10).is_empty());
}

#[test]
fn unnumbered_prose_falls_back_to_paragraphs() {
    let raw = "Rainbows form when sunlight refracts inside raindrops.\n\nOk.\n\nA double rainbow has its colors reversed in the outer arc.";
    assert_eq!(
        parse(raw, 10),
        vec![
            "Rainbows form when sunlight refracts inside raindrops.",
            "A double rainbow has its colors reversed in the outer arc.",
        ]
    );
}

#[test]
fn result_is_capped_at_max_count() {
    let raw = (1..=8)
        .map(|i| format!("{}. This is numbered snippet {} with enough words.", i, i))
        .collect::<Vec<_>>()
        .join("\n");
    let accepted = parse(&raw, 3);
    assert_eq!(accepted.len(), 3);
    assert!(accepted[0].contains("snippet 1"));
    assert!(accepted[2].contains("snippet 3"));
}

#[tokio::test]
async fn empty_response_skips_topic_and_pass_continues() {
    let (_dir, store) = temp_store();
    let quiet = store.create_topic("Quiet", None).unwrap();
    let chatty = store.create_topic("Chatty", None).unwrap();

    let client = Arc::new(
        ScriptedClient::new()
            .reply_for("Quiet", "")
            .reply_for("Chatty", "1. Chatty topics always have something long to say."),
    );
    let runner = PassRunner::new(
        store.clone(),
        GenerationPipeline::new(client.clone(), 10),
    );

    let report = runner.generate_for_topic(None).await.unwrap();
    assert_eq!(report.results.len(), 2);
    assert_eq!(report.results[0].topic_id, quiet.topic_id);
    assert_eq!(report.results[0].generated, 0);
    assert!(report.results[0].error.is_none());
    assert_eq!(report.results[1].topic_id, chatty.topic_id);
    assert_eq!(report.results[1].generated, 1);
    assert_eq!(report.total_generated, 1);
    assert_eq!(client.calls(), vec!["Quiet", "Chatty"]);
}
