//! Sled catalog: topics, snippets, queries and durability across reopen

use tidbit::catalog::{SledCatalogStore, SnippetQuery, SnippetStore, TopicStore};
use tidbit::error::StorageError;

use crate::integration::test_utils::temp_store;

#[test]
fn catalog_survives_reopen() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("store");

    let (topic_id, snippet_id) = {
        let store = SledCatalogStore::new(&path).unwrap();
        let topic = store.create_topic("Durable", Some("Stays put")).unwrap();
        let snippet = store
            .create_snippet(topic.topic_id, "Written once, read after reopening.")
            .unwrap();
        store.flush().unwrap();
        (topic.topic_id, snippet.snippet_id)
    };

    let store = SledCatalogStore::new(&path).unwrap();
    let topic = store.get_topic(topic_id).unwrap().unwrap();
    assert_eq!(topic.name, "Durable");
    assert_eq!(topic.description.as_deref(), Some("Stays put"));
    let snippet = store.get_snippet(snippet_id).unwrap().unwrap();
    assert_eq!(snippet.topic_id, topic_id);

    // Ids keep increasing after reopen
    let next = store.create_topic("Another", None).unwrap();
    assert!(next.topic_id > snippet_id);
}

#[test]
fn topics_list_in_id_order_and_names_are_unique() {
    let (_dir, store) = temp_store();
    let a = store.create_topic("Zoology", None).unwrap();
    let b = store.create_topic("Astronomy", None).unwrap();

    let names: Vec<_> = store
        .list_topics()
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["Zoology", "Astronomy"]);
    assert!(a.topic_id < b.topic_id);

    let err = store.create_topic("  Zoology ", None).unwrap_err();
    assert!(matches!(err, StorageError::DuplicateTopic(name) if name == "Zoology"));
}

#[test]
fn snippets_are_isolated_per_topic() {
    let (_dir, store) = temp_store();
    let one = store.create_topic("One", None).unwrap();
    let two = store.create_topic("Two", None).unwrap();
    store.create_snippet(one.topic_id, "Belongs to topic one.").unwrap();
    store.create_snippet(two.topic_id, "Belongs to topic two.").unwrap();
    store.create_snippet(one.topic_id, "Also topic one.").unwrap();

    let bodies: Vec<_> = store
        .list_snippets(one.topic_id)
        .unwrap()
        .into_iter()
        .map(|s| s.body)
        .collect();
    assert_eq!(bodies, vec!["Belongs to topic one.", "Also topic one."]);
}

#[test]
fn deleting_a_topic_removes_its_snippets_only() {
    let (_dir, store) = temp_store();
    let keep = store.create_topic("Keep", None).unwrap();
    let drop = store.create_topic("Drop", None).unwrap();
    let kept = store.create_snippet(keep.topic_id, "Still here afterwards.").unwrap();
    let dropped = store.create_snippet(drop.topic_id, "Gone with the topic.").unwrap();

    store.delete_topic(drop.topic_id).unwrap();

    assert!(store.get_topic(drop.topic_id).unwrap().is_none());
    assert!(store.get_snippet(dropped.snippet_id).unwrap().is_none());
    assert!(store.get_snippet(kept.snippet_id).unwrap().is_some());
    assert_eq!(store.stats().unwrap().total_snippets, 1);

    // The name is free again
    store.create_topic("Drop", None).unwrap();
}

#[test]
fn snippet_writes_to_unknown_topic_fail() {
    let (_dir, store) = temp_store();
    let err = store
        .create_snippets(999, &["Nowhere to go.".to_string()])
        .unwrap_err();
    assert!(matches!(err, StorageError::TopicNotFound(999)));
    assert_eq!(store.stats().unwrap().total_snippets, 0);
}

#[test]
fn query_filters_and_pages_newest_first() {
    let (_dir, store) = temp_store();
    let topic = store.create_topic("Feed", None).unwrap();
    let other = store.create_topic("Elsewhere", None).unwrap();
    let created = store
        .create_snippets(
            topic.topic_id,
            &(1..=5).map(|i| format!("Feed item {}", i)).collect::<Vec<_>>(),
        )
        .unwrap();
    store.create_snippet(other.topic_id, "Other feed item").unwrap();
    store
        .update_feedback(
            created[1].snippet_id,
            tidbit::catalog::FeedbackUpdate {
                deep_dive: Some(true),
                ..Default::default()
            },
        )
        .unwrap();

    let page = store
        .query_snippets(&SnippetQuery {
            topic_id: Some(topic.topic_id),
            limit: 2,
            ..Default::default()
        })
        .unwrap();
    assert_eq!(page.total_count, 5);
    assert_eq!(page.snippets.len(), 2);
    assert_eq!(page.snippets[0].snippet_id, created[4].snippet_id);
    assert_eq!(page.snippets[1].snippet_id, created[3].snippet_id);
    assert!(page.has_more);
    assert_eq!(page.next_offset, Some(2));

    let last = store
        .query_snippets(&SnippetQuery {
            topic_id: Some(topic.topic_id),
            limit: 2,
            offset: 4,
            ..Default::default()
        })
        .unwrap();
    assert_eq!(last.snippets.len(), 1);
    assert!(!last.has_more);
    assert_eq!(last.next_offset, None);

    let deep = store
        .query_snippets(&SnippetQuery {
            deep_dive: Some(true),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(deep.total_count, 1);
    assert_eq!(deep.snippets[0].snippet_id, created[1].snippet_id);

    let everything = store.query_snippets(&SnippetQuery::default()).unwrap();
    assert_eq!(everything.total_count, 6);
}
