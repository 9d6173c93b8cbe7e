//! CLI route table against a temp workspace

use std::path::PathBuf;
use tempfile::TempDir;
use tidbit::catalog::SnippetStore;
use tidbit::cli::{Commands, RunContext, SnippetCommands, TopicCommands};
use tidbit::config::TidbitConfig;
use tidbit::error::ApiError;
use tidbit::provider::profile::ProviderType;

fn context() -> (TempDir, RunContext) {
    let workspace = TempDir::new().unwrap();
    let mut config = TidbitConfig::default();
    config.storage.store_path = PathBuf::from(".tidbit/store");
    config.provider.provider_type = ProviderType::Ollama;
    config.provider.model = "llama3".to_string();
    let ctx = RunContext::from_config(workspace.path(), config).unwrap();
    (workspace, ctx)
}

fn json(output: &str) -> serde_json::Value {
    serde_json::from_str(output).unwrap()
}

#[tokio::test]
async fn topic_lifecycle() {
    let (workspace, ctx) = context();
    assert!(workspace.path().join(".tidbit/store").exists());

    ctx.execute(&Commands::Topic {
        command: TopicCommands::Add {
            name: "Linguistics".to_string(),
            description: Some("How languages change".to_string()),
        },
    })
    .await
    .unwrap();

    let listed = json(
        &ctx.execute(&Commands::Topic {
            command: TopicCommands::List {
                format: "json".to_string(),
            },
        })
        .await
        .unwrap(),
    );
    assert_eq!(listed["total"], 1);
    let topic_id = listed["topics"][0]["topic_id"].as_u64().unwrap();

    let shown = ctx
        .execute(&Commands::Topic {
            command: TopicCommands::Show {
                topic_id,
                format: "text".to_string(),
            },
        })
        .await
        .unwrap();
    assert!(shown.contains("How languages change"));

    let duplicate = ctx
        .execute(&Commands::Topic {
            command: TopicCommands::Add {
                name: "Linguistics".to_string(),
                description: None,
            },
        })
        .await
        .unwrap_err();
    assert!(duplicate.to_string().contains("already exists"));

    ctx.execute(&Commands::Topic {
        command: TopicCommands::Remove { topic_id },
    })
    .await
    .unwrap();
    let err = ctx
        .execute(&Commands::Topic {
            command: TopicCommands::Remove { topic_id },
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::TopicNotFound(id) if id == topic_id));
}

#[tokio::test]
async fn snippet_feedback_and_stats() {
    let (_workspace, ctx) = context();
    let store = ctx.store();
    let topic = store.create_topic("Geography", None).unwrap();
    let created = store
        .create_snippets(
            topic.topic_id,
            &[
                "Mount Everest grows a few millimeters each year.".to_string(),
                "The Nile and the Amazon compete for longest river.".to_string(),
            ],
        )
        .unwrap();

    let out = ctx
        .execute(&Commands::Snippet {
            command: SnippetCommands::Feedback {
                snippet_id: created[0].snippet_id,
                liked: Some(true),
                disliked: None,
                deep_dive: Some(true),
            },
        })
        .await
        .unwrap();
    assert!(out.contains("liked=true"));
    assert!(out.contains("deep_dive=true"));

    let liked_page = json(
        &ctx.execute(&Commands::Snippet {
            command: SnippetCommands::List {
                topic: Some(topic.topic_id),
                liked: Some(true),
                disliked: None,
                deep_dive: None,
                limit: 50,
                offset: 0,
                format: "json".to_string(),
            },
        })
        .await
        .unwrap(),
    );
    assert_eq!(liked_page["total_count"], 1);
    assert_eq!(
        liked_page["snippets"][0]["snippet_id"].as_u64(),
        Some(created[0].snippet_id)
    );

    ctx.execute(&Commands::Snippet {
        command: SnippetCommands::Remove {
            snippet_id: created[1].snippet_id,
        },
    })
    .await
    .unwrap();
    assert_eq!(store.list_snippets(topic.topic_id).unwrap().len(), 1);

    let stats = json(
        &ctx.execute(&Commands::Stats {
            format: "json".to_string(),
        })
        .await
        .unwrap(),
    );
    assert_eq!(stats["total_snippets"], 1);
    assert_eq!(stats["liked_snippets"], 1);
    assert_eq!(stats["deep_dive_snippets"], 1);
    assert_eq!(stats["engagement_rate"], 100.0);
}

#[tokio::test]
async fn status_reports_provider_and_catalog() {
    let (_workspace, ctx) = context();
    ctx.store().create_topic("Status", None).unwrap();

    let status = json(
        &ctx.execute(&Commands::Status {
            format: "json".to_string(),
        })
        .await
        .unwrap(),
    );
    assert_eq!(status["provider"], "ollama");
    assert_eq!(status["model"], "llama3");
    assert_eq!(status["api_key_configured"], true);
    assert_eq!(status["topics"], 1);
    assert_eq!(status["scheduler"]["running"], false);
    assert_eq!(status["scheduler"]["interval_secs"], 6 * 3600);
}

#[tokio::test]
async fn generate_for_unknown_topic_fails_before_any_call() {
    let (_workspace, ctx) = context();
    let err = ctx
        .execute(&Commands::Generate {
            topic: Some(42),
            format: "text".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::TopicNotFound(42)));
}
