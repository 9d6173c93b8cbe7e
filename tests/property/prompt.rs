//! Property-based tests for prompt completeness

use chrono::Utc;
use proptest::prelude::*;
use tidbit::catalog::Snippet;
use tidbit::generation::prompt::{
    build_prompt, DEEP_DIVE_LABEL, DISLIKED_LABEL, EMPTY_MARKER, LIKED_LABEL,
};

fn history() -> impl Strategy<Value = Vec<Snippet>> {
    prop::collection::vec(
        ("[a-zA-Z \"\\\\\n]{1,80}", any::<bool>(), any::<bool>(), any::<bool>()),
        0..12,
    )
    .prop_map(|items| {
        items
            .into_iter()
            .enumerate()
            .map(|(i, (body, liked, disliked, deep_dive))| Snippet {
                snippet_id: i as u64 + 1,
                topic_id: 1,
                body,
                created_at: Utc::now(),
                liked,
                // stored snippets never carry both flags
                disliked: disliked && !liked,
                deep_dive,
            })
            .collect()
    })
}

/// Each category is either listed or explicitly marked empty
#[test]
fn test_prompt_lists_every_category_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(history(), 1usize..20), |(history, quota)| {
            let prompt = build_prompt("Topic", None, &history, quota);

            let checks = [
                (LIKED_LABEL, history.iter().any(|s| s.liked)),
                (DISLIKED_LABEL, history.iter().any(|s| s.disliked)),
                (DEEP_DIVE_LABEL, history.iter().any(|s| s.deep_dive)),
            ];
            for (label, populated) in checks {
                let empty = format!("    {}: {}\n", label, EMPTY_MARKER);
                let listed = format!("    {}:\n        - ", label);
                if populated {
                    prop_assert!(prompt.contains(&listed), "{} missing entries", label);
                    prop_assert!(!prompt.contains(&empty));
                } else {
                    prop_assert!(prompt.contains(&empty), "{} missing empty marker", label);
                }
            }
            Ok(())
        })
        .unwrap();
}

/// The same inputs always render the same prompt
#[test]
fn test_prompt_is_deterministic_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(history(), "[a-zA-Z ]{0,40}"), |(history, description)| {
            let first = build_prompt("Topic", Some(&description), &history, 10);
            let second = build_prompt("Topic", Some(&description), &history, 10);
            prop_assert_eq!(first, second);
            Ok(())
        })
        .unwrap();
}
