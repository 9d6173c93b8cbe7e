//! Provider profile: the `[provider]` config section and its resolution into
//! a concrete [`ModelProvider`].

use super::{CompletionOptions, ModelProvider};
use crate::error::ApiError;
use serde::{Deserialize, Serialize};

/// Supported provider backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Gemini,
    OpenAI,
    Anthropic,
    Ollama,
}

impl ProviderType {
    /// Conventional environment variable holding this provider's API key.
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            ProviderType::Gemini => Some("GEMINI_API_KEY"),
            ProviderType::OpenAI => Some("OPENAI_API_KEY"),
            ProviderType::Anthropic => Some("ANTHROPIC_API_KEY"),
            ProviderType::Ollama => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::Gemini => "gemini",
            ProviderType::OpenAI => "openai",
            ProviderType::Anthropic => "anthropic",
            ProviderType::Ollama => "ollama",
        }
    }
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider configuration as written in config files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_provider_type")]
    pub provider_type: ProviderType,

    #[serde(default = "default_model")]
    pub model: String,

    /// Falls back to the provider's conventional env var when unset
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL override
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub default_options: CompletionOptions,
}

fn default_provider_type() -> ProviderType {
    ProviderType::Gemini
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            model: default_model(),
            api_key: None,
            endpoint: None,
            default_options: CompletionOptions::default(),
        }
    }
}

impl ProviderConfig {
    /// Validate provider configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("Model name cannot be empty".to_string());
        }

        if let Some(endpoint) = &self.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(format!("Invalid endpoint URL: {}", endpoint));
            }
        }

        if let Some(temperature) = self.default_options.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(format!(
                    "Temperature must be between 0.0 and 2.0, got {}",
                    temperature
                ));
            }
        }

        Ok(())
    }

    /// API key from config, else from the provider's env var.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    fn resolve_api_key_with<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.provider_type.api_key_env().and_then(lookup))
            .filter(|k| !k.trim().is_empty())
    }

    /// Convert to a ModelProvider, resolving the API key.
    pub fn to_model_provider(&self) -> Result<ModelProvider, ApiError> {
        self.to_model_provider_with(|name| std::env::var(name).ok())
    }

    fn to_model_provider_with<F>(&self, lookup: F) -> Result<ModelProvider, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let model = self.model.clone();
        let base_url = self.endpoint.clone();

        if self.provider_type == ProviderType::Ollama {
            return Ok(ModelProvider::Ollama { model, base_url });
        }

        let api_key = self.resolve_api_key_with(lookup).ok_or_else(|| {
            ApiError::ProviderNotConfigured(format!(
                "No API key for {} provider: set provider.api_key or {}",
                self.provider_type,
                self.provider_type.api_key_env().unwrap_or("an API key"),
            ))
        })?;

        Ok(match self.provider_type {
            ProviderType::Gemini => ModelProvider::Gemini {
                model,
                api_key,
                base_url,
            },
            ProviderType::OpenAI => ModelProvider::OpenAI {
                model,
                api_key,
                base_url,
            },
            ProviderType::Anthropic => ModelProvider::Anthropic {
                model,
                api_key,
                base_url,
            },
            ProviderType::Ollama => ModelProvider::Ollama { model, base_url },
        })
    }
}
