//! Generation pipeline for a single topic: prompt, call, parse.
//!
//! Does not persist anything; the scheduler owns writes.

use crate::catalog::{Snippet, Topic};
use crate::generation::client::GenerationClient;
use crate::generation::{parser, prompt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

pub struct GenerationPipeline {
    client: Arc<dyn GenerationClient>,
    snippets_per_topic: usize,
}

impl GenerationPipeline {
    pub fn new(client: Arc<dyn GenerationClient>, snippets_per_topic: usize) -> Self {
        Self {
            client,
            snippets_per_topic,
        }
    }

    /// Per-topic quota: the most snippets one run may return.
    pub fn snippets_per_topic(&self) -> usize {
        self.snippets_per_topic
    }

    pub fn build_prompt(&self, topic: &Topic, existing: &[Snippet]) -> String {
        prompt::build_prompt(
            &topic.name,
            topic.description.as_deref(),
            existing,
            self.snippets_per_topic,
        )
    }

    /// Generate new snippet bodies for `topic`.
    ///
    /// A generation failure yields an empty result rather than an error.
    pub async fn run_for_topic(&self, topic: &Topic, existing: &[Snippet]) -> Vec<String> {
        let started = Instant::now();
        let prompt = self.build_prompt(topic, existing);
        debug!(
            topic_id = topic.topic_id,
            topic_name = %topic.name,
            history = existing.len(),
            prompt = %prompt,
            "Built generation prompt"
        );

        let raw = match self.client.generate(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    topic_id = topic.topic_id,
                    topic_name = %topic.name,
                    error = %e,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Generation failed, no snippets this round"
                );
                return Vec::new();
            }
        };
        debug!(topic_id = topic.topic_id, response = %raw, "Raw generation response");

        let accepted = parser::parse(&raw, self.snippets_per_topic);
        debug!(
            topic_id = topic.topic_id,
            topic_name = %topic.name,
            accepted = accepted.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Parsed generation response"
        );
        accepted
    }
}
