//! Generation client: prompt text in, raw response text out.

use crate::error::ApiError;
use crate::provider::{
    ChatMessage, CompletionOptions, ModelProviderClient, ProviderConfig, ProviderFactory,
};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::debug;

/// The generation oracle as seen by the pipeline.
///
/// Any `Err` is a generation failure. Implementations do not retry.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ApiError>;
}

/// [`GenerationClient`] backed by a configured model provider
pub struct ProviderGenerationClient {
    provider: Box<dyn ModelProviderClient>,
    options: CompletionOptions,
    timeout: Duration,
}

impl ProviderGenerationClient {
    pub fn new(
        provider: Box<dyn ModelProviderClient>,
        options: CompletionOptions,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            options,
            timeout,
        }
    }

    pub fn from_config(config: &ProviderConfig, timeout: Duration) -> Result<Self, ApiError> {
        let provider = ProviderFactory::from_config(config)?;
        Ok(Self::new(provider, config.default_options.clone(), timeout))
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }
}

#[async_trait]
impl GenerationClient for ProviderGenerationClient {
    async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        let started = Instant::now();
        let call = self
            .provider
            .complete(vec![ChatMessage::user(prompt)], self.options.clone());

        let response = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| ApiError::GenerationTimeout(self.timeout.as_secs()))??;

        debug!(
            provider = self.provider.provider_name(),
            model = %response.model,
            total_tokens = response.usage.total_tokens,
            duration_ms = started.elapsed().as_millis() as u64,
            "Generation call completed"
        );

        if response.content.trim().is_empty() {
            return Err(ApiError::EmptyResponse);
        }
        Ok(response.content)
    }
}
