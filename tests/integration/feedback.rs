//! Feedback updates through the persistent catalog

use tidbit::catalog::{FeedbackUpdate, SnippetStore};
use tidbit::error::StorageError;

use crate::integration::test_utils::temp_store;

fn liked(value: bool) -> FeedbackUpdate {
    FeedbackUpdate {
        liked: Some(value),
        ..Default::default()
    }
}

fn disliked(value: bool) -> FeedbackUpdate {
    FeedbackUpdate {
        disliked: Some(value),
        ..Default::default()
    }
}

#[test]
fn like_then_dislike_is_exclusive_when_persisted() {
    let (_dir, store) = temp_store();
    let topic = store.create_topic("Physics", None).unwrap();
    let snippet = store
        .create_snippet(topic.topic_id, "Sound travels faster in water than in air.")
        .unwrap();
    assert!(!snippet.liked && !snippet.disliked && !snippet.deep_dive);

    let after_like = store.update_feedback(snippet.snippet_id, liked(true)).unwrap();
    assert!(after_like.liked);
    assert!(!after_like.disliked);

    let after_dislike = store
        .update_feedback(snippet.snippet_id, disliked(true))
        .unwrap();
    assert!(!after_dislike.liked);
    assert!(after_dislike.disliked);

    let reread = store.get_snippet(snippet.snippet_id).unwrap().unwrap();
    assert_eq!(reread, after_dislike);
}

#[test]
fn deep_dive_survives_like_and_dislike() {
    let (_dir, store) = temp_store();
    let topic = store.create_topic("Chemistry", None).unwrap();
    let snippet = store
        .create_snippet(topic.topic_id, "Noble gases rarely form compounds.")
        .unwrap();

    store
        .update_feedback(
            snippet.snippet_id,
            FeedbackUpdate {
                deep_dive: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
    store.update_feedback(snippet.snippet_id, liked(true)).unwrap();
    let updated = store
        .update_feedback(snippet.snippet_id, disliked(true))
        .unwrap();

    assert!(updated.deep_dive);
    assert!(updated.disliked);
    assert!(!updated.liked);
}

#[test]
fn clearing_a_flag_leaves_the_other_alone() {
    let (_dir, store) = temp_store();
    let topic = store.create_topic("Music", None).unwrap();
    let snippet = store
        .create_snippet(topic.topic_id, "A piano has eighty-eight keys.")
        .unwrap();

    store.update_feedback(snippet.snippet_id, disliked(true)).unwrap();
    let updated = store.update_feedback(snippet.snippet_id, liked(false)).unwrap();
    assert!(!updated.liked);
    assert!(updated.disliked);
}

#[test]
fn feedback_on_missing_snippet_is_not_found() {
    let (_dir, store) = temp_store();
    let err = store.update_feedback(404, liked(true)).unwrap_err();
    assert!(matches!(err, StorageError::SnippetNotFound(404)));
}

#[test]
fn feedback_counts_show_in_stats() {
    let (_dir, store) = temp_store();
    let topic = store.create_topic("Art", None).unwrap();
    let created = store
        .create_snippets(
            topic.topic_id,
            &[
                "Impressionism began in France.".to_string(),
                "Cubism broke objects into planes.".to_string(),
                "Fresco is painted on wet plaster.".to_string(),
            ],
        )
        .unwrap();
    store.update_feedback(created[0].snippet_id, liked(true)).unwrap();
    store.update_feedback(created[1].snippet_id, disliked(true)).unwrap();

    let stats = store.stats().unwrap();
    assert_eq!(stats.total_topics, 1);
    assert_eq!(stats.total_snippets, 3);
    assert_eq!(stats.liked_snippets, 1);
    assert_eq!(stats.disliked_snippets, 1);
    assert_eq!(stats.engagement_rate, 66.7);
}
