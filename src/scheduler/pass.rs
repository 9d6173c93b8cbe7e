//! Generation passes: run the pipeline over topics and persist the results,
//! one isolated unit of work per topic.

use crate::catalog::{CatalogStore, Topic};
use crate::error::{ApiError, StorageError};
use crate::generation::GenerationPipeline;
use crate::types::TopicId;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// What started a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PassTrigger {
    Timer,
    Manual,
    Topic,
}

impl std::fmt::Display for PassTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PassTrigger::Timer => "timer",
            PassTrigger::Manual => "manual",
            PassTrigger::Topic => "topic",
        })
    }
}

/// Result of one topic within a pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicOutcome {
    pub topic_id: TopicId,
    pub topic_name: String,
    /// Snippets committed for this topic
    pub generated: usize,
    /// Set when loading history or persisting failed for this topic
    pub error: Option<String>,
}

/// Summary of a completed pass
#[derive(Debug, Clone, Serialize)]
pub struct PassReport {
    pub trigger: PassTrigger,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total_generated: usize,
    pub results: Vec<TopicOutcome>,
    /// Set when the pass could not run at all (the topic list was unreadable)
    pub error: Option<String>,
}

impl PassReport {
    fn from_outcomes(
        trigger: PassTrigger,
        started_at: DateTime<Utc>,
        results: Vec<TopicOutcome>,
    ) -> Self {
        Self {
            trigger,
            started_at,
            finished_at: Utc::now(),
            total_generated: results.iter().map(|r| r.generated).sum(),
            results,
            error: None,
        }
    }

    fn aborted(trigger: PassTrigger, started_at: DateTime<Utc>, error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::from_outcomes(trigger, started_at, Vec::new())
        }
    }

    pub fn failed_topics(&self) -> usize {
        self.results.iter().filter(|r| r.error.is_some()).count()
    }
}

/// Runs generation passes against a catalog store
pub struct PassRunner {
    store: Arc<dyn CatalogStore>,
    pipeline: GenerationPipeline,
}

impl PassRunner {
    pub fn new(store: Arc<dyn CatalogStore>, pipeline: GenerationPipeline) -> Self {
        Self { store, pipeline }
    }

    pub fn pipeline(&self) -> &GenerationPipeline {
        &self.pipeline
    }

    /// Run one pass over every topic.
    ///
    /// Always produces a report. If the topic list itself cannot be read the
    /// report has no results and carries the failure in `error`.
    pub async fn run_pass(&self, trigger: PassTrigger) -> PassReport {
        let started_at = Utc::now();
        match self.store.list_topics() {
            Ok(topics) => self.run_topics(trigger, topics).await,
            Err(e) => {
                error!(error = %e, trigger = %trigger, "Failed to list topics for generation pass");
                PassReport::aborted(trigger, started_at, e.to_string())
            }
        }
    }

    /// Run the pipeline for one topic, or for all topics when `topic_id` is `None`.
    pub async fn generate_for_topic(
        &self,
        topic_id: Option<TopicId>,
    ) -> Result<PassReport, ApiError> {
        match topic_id {
            Some(topic_id) => {
                let topic = self
                    .store
                    .get_topic(topic_id)
                    .map_err(ApiError::from_storage)?
                    .ok_or(ApiError::TopicNotFound(topic_id))?;
                Ok(self.run_topics(PassTrigger::Topic, vec![topic]).await)
            }
            None => {
                let topics = self.store.list_topics()?;
                Ok(self.run_topics(PassTrigger::Manual, topics).await)
            }
        }
    }

    async fn run_topics(&self, trigger: PassTrigger, topics: Vec<Topic>) -> PassReport {
        let started_at = Utc::now();
        let started = Instant::now();
        info!(trigger = %trigger, topics = topics.len(), "Starting generation pass");

        let mut results = Vec::with_capacity(topics.len());
        for topic in topics {
            results.push(self.process_topic(topic).await);
        }

        let report = PassReport::from_outcomes(trigger, started_at, results);
        info!(
            trigger = %trigger,
            accepted = report.total_generated,
            failed_topics = report.failed_topics(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Generation pass complete"
        );
        report
    }

    async fn process_topic(&self, topic: Topic) -> TopicOutcome {
        let started = Instant::now();
        let result = self.generate_and_store(&topic).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(generated) => {
                info!(
                    topic_id = topic.topic_id,
                    topic_name = %topic.name,
                    accepted = generated,
                    duration_ms,
                    "Topic generation finished"
                );
                TopicOutcome {
                    topic_id: topic.topic_id,
                    topic_name: topic.name,
                    generated,
                    error: None,
                }
            }
            Err(e) => {
                error!(
                    topic_id = topic.topic_id,
                    topic_name = %topic.name,
                    error = %e,
                    duration_ms,
                    "Topic generation failed"
                );
                TopicOutcome {
                    topic_id: topic.topic_id,
                    topic_name: topic.name,
                    generated: 0,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// History read, pipeline run and a single all-or-nothing write.
    async fn generate_and_store(&self, topic: &Topic) -> Result<usize, StorageError> {
        let history = self.store.list_snippets(topic.topic_id)?;
        let bodies = self.pipeline.run_for_topic(topic, &history).await;
        if bodies.is_empty() {
            return Ok(0);
        }
        let created = self.store.create_snippets(topic.topic_id, &bodies)?;
        Ok(created.len())
    }
}
