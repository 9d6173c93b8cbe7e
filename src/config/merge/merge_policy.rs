//! Merge rules: defaults, override order, conflict handling.
//!
//! Later sources win key by key; tables merge rather than replace.

use super::super::{
    default_store_path, DEFAULT_INTERVAL_HOURS, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SNIPPETS_PER_TOPIC,
};
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("generation.interval_hours", DEFAULT_INTERVAL_HOURS)?
        .set_default(
            "generation.snippets_per_topic",
            DEFAULT_SNIPPETS_PER_TOPIC as u64,
        )?
        .set_default(
            "generation.request_timeout_secs",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?
        .set_default("provider.provider_type", "gemini")?
        .set_default("provider.model", "gemini-2.5-flash")?
        .set_default(
            "storage.store_path",
            default_store_path().to_string_lossy().to_string(),
        )
}
