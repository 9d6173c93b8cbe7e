//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::catalog::{
    FeedbackUpdate, SledCatalogStore, SnippetQuery, SnippetStore, TopicStore,
};
use crate::cli::parse::{Commands, SnippetCommands, TopicCommands};
use crate::cli::presentation::{
    format_feedback_result, format_pass_report_json, format_pass_report_text,
    format_snippet_page_json, format_snippet_page_text, format_stats_json, format_stats_text,
    format_status_json, format_status_text, format_topic_created, format_topic_list_json,
    format_topic_list_text, format_topic_show_json, format_topic_show_text, StatusSummary,
};
use crate::config::{ConfigLoader, TidbitConfig};
use crate::error::{ApiError, StorageError};
use crate::generation::{build_prompt, GenerationPipeline, ProviderGenerationClient};
use crate::provider::profile::ProviderType;
use crate::scheduler::{GenerationScheduler, PassRunner, SchedulerStatus};
use crate::types::TopicId;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Runtime context for CLI execution: loaded config and the opened catalog.
pub struct RunContext {
    config: TidbitConfig,
    store: Arc<SledCatalogStore>,
    store_path: PathBuf,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Self::from_config(&workspace_root, config)
    }

    /// Validate `config` and open its catalog store.
    pub fn from_config(workspace_root: &Path, config: TidbitConfig) -> Result<Self, ApiError> {
        config.validate().map_err(|errors| {
            ApiError::ConfigError(
                errors
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        })?;

        let store_path = config.storage.resolve_store_path(workspace_root);
        std::fs::create_dir_all(&store_path)
            .map_err(|e| ApiError::StorageError(StorageError::IoError(e)))?;
        let store = Arc::new(SledCatalogStore::new(&store_path)?);

        Ok(Self {
            config,
            store,
            store_path,
        })
    }

    pub fn config(&self) -> &TidbitConfig {
        &self.config
    }

    pub fn store(&self) -> Arc<SledCatalogStore> {
        Arc::clone(&self.store)
    }

    /// Execute a CLI command via the single route table.
    pub async fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Serve => self.serve().await,
            Commands::Generate { topic, format } => {
                let runner = self.pass_runner()?;
                let report = runner.generate_for_topic(*topic).await?;
                self.store.flush()?;
                Ok(if format == "json" {
                    format_pass_report_json(&report)
                } else {
                    format_pass_report_text(&report)
                })
            }
            Commands::Status { format } => {
                let summary = self.status_summary()?;
                Ok(if format == "json" {
                    format_status_json(&summary)
                } else {
                    format_status_text(&summary)
                })
            }
            Commands::Prompt { topic } => self.render_prompt(*topic),
            Commands::Topic { command } => self.handle_topic_command(command),
            Commands::Snippet { command } => self.handle_snippet_command(command),
            Commands::Stats { format } => {
                let stats = self.store.stats()?;
                Ok(if format == "json" {
                    format_stats_json(&stats)
                } else {
                    format_stats_text(&stats)
                })
            }
        }
    }

    fn generation_client(&self) -> Result<ProviderGenerationClient, ApiError> {
        ProviderGenerationClient::from_config(
            &self.config.provider,
            self.config.generation.request_timeout(),
        )
    }

    fn pass_runner(&self) -> Result<PassRunner, ApiError> {
        let client = self.generation_client()?;
        let pipeline =
            GenerationPipeline::new(Arc::new(client), self.config.generation.snippets_per_topic);
        Ok(PassRunner::new(self.store.clone(), pipeline))
    }

    async fn serve(&self) -> Result<String, ApiError> {
        let client = self.generation_client()?;
        info!(
            provider = client.provider_name(),
            model = client.model_name(),
            store_path = %self.store_path.display(),
            "Starting scheduler"
        );
        let scheduler = GenerationScheduler::with_client(
            self.store.clone(),
            Arc::new(client),
            self.config.generation.snippets_per_topic,
            self.config.generation.interval(),
        );
        scheduler.start()?;

        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for shutdown signal; stopping now");
        }

        info!("Shutdown requested, waiting for in-flight pass");
        scheduler.stop().await?;
        self.store.flush()?;

        let status = scheduler.status();
        Ok(match status.last_pass {
            Some(last) => format!(
                "Scheduler stopped. Last pass generated {} snippet(s).",
                last.total_generated
            ),
            None => "Scheduler stopped.".to_string(),
        })
    }

    fn status_summary(&self) -> Result<StatusSummary, ApiError> {
        let provider = &self.config.provider;
        let api_key_configured =
            provider.provider_type == ProviderType::Ollama || provider.resolve_api_key().is_some();
        Ok(StatusSummary {
            scheduler: SchedulerStatus {
                running: false,
                next_run_at: None,
                interval_secs: self.config.generation.interval().as_secs(),
                snippets_per_topic: self.config.generation.snippets_per_topic,
                last_pass: None,
            },
            provider: provider.provider_type.to_string(),
            model: provider.model.clone(),
            api_key_configured,
            store_path: self.store_path.clone(),
            topics: self.store.list_topics()?.len(),
        })
    }

    fn render_prompt(&self, topic_id: TopicId) -> Result<String, ApiError> {
        let topic = self
            .store
            .get_topic(topic_id)?
            .ok_or(ApiError::TopicNotFound(topic_id))?;
        let history = self.store.list_snippets(topic_id)?;
        Ok(build_prompt(
            &topic.name,
            topic.description.as_deref(),
            &history,
            self.config.generation.snippets_per_topic,
        ))
    }

    fn handle_topic_command(&self, command: &TopicCommands) -> Result<String, ApiError> {
        match command {
            TopicCommands::Add { name, description } => {
                let topic = self.store.create_topic(name, description.as_deref())?;
                self.store.flush()?;
                Ok(format_topic_created(&topic))
            }
            TopicCommands::List { format } => {
                let topics = self.store.list_topics()?;
                Ok(if format == "json" {
                    format_topic_list_json(&topics)
                } else {
                    format_topic_list_text(&topics)
                })
            }
            TopicCommands::Show { topic_id, format } => {
                let topic = self
                    .store
                    .get_topic(*topic_id)?
                    .ok_or(ApiError::TopicNotFound(*topic_id))?;
                let history = self.store.list_snippets(*topic_id)?;
                Ok(if format == "json" {
                    format_topic_show_json(&topic, &history)
                } else {
                    format_topic_show_text(&topic, &history)
                })
            }
            TopicCommands::Remove { topic_id } => {
                let topic = self
                    .store
                    .delete_topic(*topic_id)
                    .map_err(ApiError::from_storage)?;
                self.store.flush()?;
                Ok(format!("Removed topic {} ({})", topic.topic_id, topic.name))
            }
        }
    }

    fn handle_snippet_command(&self, command: &SnippetCommands) -> Result<String, ApiError> {
        match command {
            SnippetCommands::List {
                topic,
                liked,
                disliked,
                deep_dive,
                limit,
                offset,
                format,
            } => {
                let query = SnippetQuery {
                    topic_id: *topic,
                    liked: *liked,
                    disliked: *disliked,
                    deep_dive: *deep_dive,
                    limit: *limit,
                    offset: *offset,
                };
                let page = self.store.query_snippets(&query)?;
                Ok(if format == "json" {
                    format_snippet_page_json(&page)
                } else {
                    format_snippet_page_text(&page)
                })
            }
            SnippetCommands::Feedback {
                snippet_id,
                liked,
                disliked,
                deep_dive,
            } => {
                let update = FeedbackUpdate {
                    liked: *liked,
                    disliked: *disliked,
                    deep_dive: *deep_dive,
                };
                if update.is_empty() {
                    return Err(ApiError::ConfigError(
                        "Nothing to update: pass --liked, --disliked or --deep-dive".to_string(),
                    ));
                }
                let snippet = self.store.update_feedback(*snippet_id, update)?;
                self.store.flush()?;
                Ok(format_feedback_result(&snippet))
            }
            SnippetCommands::Remove { snippet_id } => {
                let snippet = self.store.delete_snippet(*snippet_id)?;
                self.store.flush()?;
                Ok(format!("Removed snippet {}", snippet.snippet_id))
            }
        }
    }
}
