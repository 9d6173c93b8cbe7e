//! CLI presentation: text and json formatters per command family.

mod catalog;
mod generation;

pub use catalog::{
    format_feedback_result, format_snippet_page_json, format_snippet_page_text,
    format_stats_json, format_stats_text, format_topic_created, format_topic_list_json,
    format_topic_list_text, format_topic_show_json, format_topic_show_text,
};
pub use generation::{
    format_pass_report_json, format_pass_report_text, format_status_json, format_status_text,
    StatusSummary,
};

fn to_pretty_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}
