//! Pass report and scheduler status presentation.

use super::to_pretty_json;
use crate::scheduler::{PassReport, SchedulerStatus};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use serde::Serialize;
use std::path::PathBuf;

/// What `tidbit status` reports: scheduler settings plus where it reads from.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSummary {
    pub scheduler: SchedulerStatus,
    pub provider: String,
    pub model: String,
    pub api_key_configured: bool,
    pub store_path: PathBuf,
    pub topics: usize,
}

pub fn format_pass_report_text(report: &PassReport) -> String {
    if let Some(error) = &report.error {
        return format!("Pass ({}) failed: {}", report.trigger, error);
    }
    if report.results.is_empty() {
        return format!("Pass ({}) finished: no topics to generate for.", report.trigger);
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Topic", "Name", "Generated", "Error"]);
    for outcome in &report.results {
        table.add_row(vec![
            outcome.topic_id.to_string(),
            outcome.topic_name.clone(),
            outcome.generated.to_string(),
            outcome.error.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }
    let elapsed = report.finished_at - report.started_at;
    format!(
        "{}\n\nPass ({}) generated {} snippet(s) across {} topic(s) in {}ms; {} failed",
        table,
        report.trigger,
        report.total_generated,
        report.results.len(),
        elapsed.num_milliseconds(),
        report.failed_topics()
    )
}

pub fn format_pass_report_json(report: &PassReport) -> String {
    to_pretty_json(report)
}

pub fn format_status_text(summary: &StatusSummary) -> String {
    let status = &summary.scheduler;
    let mut output = String::from("Scheduler:\n");
    output.push_str(&format!(
        "  running: {}\n",
        if status.running { "yes" } else { "no" }
    ));
    output.push_str(&format!(
        "  interval: {}h\n",
        status.interval_secs / 3600
    ));
    output.push_str(&format!(
        "  snippets per topic: {}\n",
        status.snippets_per_topic
    ));
    if let Some(next) = status.next_run_at {
        output.push_str(&format!("  next run: {}\n", next.to_rfc3339()));
    }
    if let Some(last) = &status.last_pass {
        output.push_str(&format!(
            "  last pass: {} generated at {}\n",
            last.total_generated,
            last.finished_at.to_rfc3339()
        ));
    }
    output.push_str("\nProvider:\n");
    output.push_str(&format!("  type: {}\n", summary.provider));
    output.push_str(&format!("  model: {}\n", summary.model));
    output.push_str(&format!(
        "  api key: {}\n",
        if summary.api_key_configured {
            "configured"
        } else {
            "missing"
        }
    ));
    output.push_str("\nCatalog:\n");
    output.push_str(&format!("  store: {}\n", summary.store_path.display()));
    output.push_str(&format!("  topics: {}", summary.topics));
    output
}

pub fn format_status_json(summary: &StatusSummary) -> String {
    to_pretty_json(summary)
}
