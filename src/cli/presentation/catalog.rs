//! Topic, snippet and stats presentation.

use super::to_pretty_json;
use crate::catalog::{CatalogStats, FeedbackCategorization, Snippet, SnippetPage, Topic};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::{ContentArrangement, Table};
use serde_json::json;

const BODY_COLUMN_WIDTH: u16 = 100;

fn flags(snippet: &Snippet) -> String {
    let mut out = Vec::new();
    if snippet.liked {
        out.push("liked");
    }
    if snippet.disliked {
        out.push("disliked");
    }
    if snippet.deep_dive {
        out.push("deep-dive");
    }
    if out.is_empty() {
        "-".to_string()
    } else {
        out.join(", ")
    }
}

pub fn format_topic_created(topic: &Topic) -> String {
    format!("Created topic {} ({})", topic.topic_id, topic.name)
}

pub fn format_topic_list_text(topics: &[Topic]) -> String {
    if topics.is_empty() {
        return "No topics found.\n\nUse 'tidbit topic add <NAME>' to create one.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["ID", "Name", "Description", "Created"]);
    for topic in topics {
        table.add_row(vec![
            topic.topic_id.to_string(),
            topic.name.clone(),
            topic.description.clone().unwrap_or_else(|| "-".to_string()),
            topic.created_at.format("%Y-%m-%d %H:%M").to_string(),
        ]);
    }
    format!("{}\n\nTotal: {} topic(s)", table, topics.len())
}

pub fn format_topic_list_json(topics: &[Topic]) -> String {
    to_pretty_json(&json!({ "topics": topics, "total": topics.len() }))
}

pub fn format_topic_show_text(topic: &Topic, history: &[Snippet]) -> String {
    let view = FeedbackCategorization::from_history(history);
    let mut output = format!("Topic: {} ({})\n", topic.name, topic.topic_id);
    output.push_str(&format!(
        "Description: {}\n",
        topic.description.as_deref().unwrap_or("(none)")
    ));
    output.push_str(&format!("Created: {}\n", topic.created_at.to_rfc3339()));
    output.push_str(&format!("Snippets: {}\n", history.len()));
    output.push_str(&format!("  liked: {}\n", view.liked.len()));
    output.push_str(&format!("  disliked: {}\n", view.disliked.len()));
    output.push_str(&format!("  deep dive: {}", view.deep_dive.len()));
    output
}

pub fn format_topic_show_json(topic: &Topic, history: &[Snippet]) -> String {
    let view = FeedbackCategorization::from_history(history);
    to_pretty_json(&json!({
        "topic": topic,
        "snippet_count": history.len(),
        "liked": view.liked.len(),
        "disliked": view.disliked.len(),
        "deep_dive": view.deep_dive.len(),
    }))
}

pub fn format_snippet_page_text(page: &SnippetPage) -> String {
    if page.snippets.is_empty() {
        return "No snippets found.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_width(BODY_COLUMN_WIDTH + 40);
    table.set_header(vec!["ID", "Topic", "Snippet", "Feedback"]);
    for snippet in &page.snippets {
        table.add_row(vec![
            snippet.snippet_id.to_string(),
            snippet.topic_id.to_string(),
            snippet.body.clone(),
            flags(snippet),
        ]);
    }
    let mut output = format!(
        "{}\n\nShowing {} of {} snippet(s)",
        table,
        page.snippets.len(),
        page.total_count
    );
    if let Some(next) = page.next_offset {
        output.push_str(&format!(" (next page: --offset {})", next));
    }
    output
}

pub fn format_snippet_page_json(page: &SnippetPage) -> String {
    to_pretty_json(page)
}

pub fn format_feedback_result(snippet: &Snippet) -> String {
    format!(
        "Snippet {}: liked={} disliked={} deep_dive={}",
        snippet.snippet_id, snippet.liked, snippet.disliked, snippet.deep_dive
    )
}

pub fn format_stats_text(stats: &CatalogStats) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Topics".to_string(), stats.total_topics.to_string()]);
    table.add_row(vec!["Snippets".to_string(), stats.total_snippets.to_string()]);
    table.add_row(vec!["Liked".to_string(), stats.liked_snippets.to_string()]);
    table.add_row(vec!["Disliked".to_string(), stats.disliked_snippets.to_string()]);
    table.add_row(vec!["Deep dive".to_string(), stats.deep_dive_snippets.to_string()]);
    table.add_row(vec![
        "Engagement".to_string(),
        format!("{:.1}%", stats.engagement_rate),
    ]);
    table.to_string()
}

pub fn format_stats_json(stats: &CatalogStats) -> String {
    to_pretty_json(stats)
}
