//! Prompt construction
//!
//! Renders a fixed instruction block followed by a YAML-like section carrying
//! the topic and the feedback-categorized history. All three preference lists
//! are always present; an empty list is rendered as `[]` so the model sees the
//! full structure on every call.

use crate::catalog::{FeedbackCategorization, Snippet};

/// Substituted when a topic has no (or a blank) description.
pub const FALLBACK_DESCRIPTION: &str =
    "Educational content focused on practical understanding and real-world applications.";

pub const LIKED_LABEL: &str = "liked_snippets";
pub const DISLIKED_LABEL: &str = "disliked_snippets";
pub const DEEP_DIVE_LABEL: &str = "dive_deep_topics";
pub const EMPTY_MARKER: &str = "[]";

/// Target length stated to the model. The parser allows some slack over it.
pub const TARGET_WORDS: usize = 100;

const NO_HISTORY_NOTE: &str =
    "(No earlier snippets for this topic yet: cover a broad, varied introduction.)";

/// Build the generation prompt for one topic.
///
/// Pure and deterministic: the same inputs always render the same text.
/// History order is preserved inside every category.
pub fn build_prompt(
    topic_name: &str,
    topic_description: Option<&str>,
    history: &[Snippet],
    quota: usize,
) -> String {
    let description = topic_description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(FALLBACK_DESCRIPTION);

    let mut prompt = instructions(quota);
    prompt.push_str("\ntopic:\n");
    prompt.push_str(&format!("    name: {}\n", quote(topic_name)));
    prompt.push_str(&format!("    description: {}\n", quote(description)));
    prompt.push_str("preferences:\n");

    let view = FeedbackCategorization::from_history(history);
    render_category(&mut prompt, LIKED_LABEL, &view.liked);
    render_category(&mut prompt, DISLIKED_LABEL, &view.disliked);
    render_category(&mut prompt, DEEP_DIVE_LABEL, &view.deep_dive);

    if history.is_empty() {
        prompt.push_str("    ");
        prompt.push_str(NO_HISTORY_NOTE);
        prompt.push('\n');
    }

    prompt
}

fn instructions(quota: usize) -> String {
    format!(
        "## Educational Snippet Writer

Role: you write short, engaging educational snippets for a personal learning feed.

Task: write exactly {quota} new snippets about the topic below. Each one must be new: \
do not repeat or lightly reword any snippet listed under preferences.

The input has two parts:
- topic: the subject name and a description of the flavor of content the reader wants.
- preferences:
  - {liked}: examples whose style, tone and content the reader enjoyed.
  - {disliked}: examples whose style, tone or content the reader wants less of.
  - {deep}: subjects the reader asked to explore in more depth.

Rules:
1. Keep every snippet at or under {words} words, and vary the lengths.
2. Mix the formats: surprising facts, short question and answer pairs, plain definitions, practical applications.
3. Let the topic description guide the content more than anything else.
4. Explain the {deep} entries more thoroughly while staying within the word limit.
5. Use clear, accurate, non-sensational language. Explain any jargon simply.
6. No hashtags or other social media conventions.

Output: a single numbered list (1., 2., 3., ...) with one snippet per item and nothing else.
",
        quota = quota,
        liked = LIKED_LABEL,
        disliked = DISLIKED_LABEL,
        deep = DEEP_DIVE_LABEL,
        words = TARGET_WORDS,
    )
}

fn render_category(prompt: &mut String, label: &str, snippets: &[&Snippet]) {
    if snippets.is_empty() {
        prompt.push_str(&format!("    {}: {}\n", label, EMPTY_MARKER));
        return;
    }
    prompt.push_str(&format!("    {}:\n", label));
    for snippet in snippets {
        prompt.push_str(&format!("        - {}\n", quote(&snippet.body)));
    }
}

/// Double-quote a value, escaping embedded quotes and flattening line breaks
/// so every entry stays on one line.
fn quote(text: &str) -> String {
    let flattened = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('\\', "\\\\")
        .replace('"', "\\\"");
    format!("\"{}\"", flattened)
}
