//! Error types for the Tidbit snippet generation service.

use crate::types::{SnippetId, TopicId};
use thiserror::Error;

/// Storage-related errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Topic not found: {0}")]
    TopicNotFound(TopicId),

    #[error("Snippet not found: {0}")]
    SnippetNotFound(SnippetId),

    #[error("Topic already exists: {0}")]
    DuplicateTopic(String),

    #[error("Invalid topic: {0}")]
    InvalidTopic(String),

    #[error("Invalid snippet: {0}")]
    InvalidSnippet(String),

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Service-level errors surfaced by the generation pipeline, scheduler and CLI
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Topic not found: {0}")]
    TopicNotFound(TopicId),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    #[error("Provider request failed: {0}")]
    ProviderRequestFailed(String),

    #[error("Provider authentication failed: {0}")]
    ProviderAuthFailed(String),

    #[error("Provider rate limit exceeded: {0}")]
    ProviderRateLimit(String),

    #[error("Provider model not found: {0}")]
    ProviderModelNotFound(String),

    #[error("Provider returned no content")]
    EmptyResponse,

    #[error("Generation timed out after {0}s")]
    GenerationTimeout(u64),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ApiError {
    /// Lift a storage lookup miss into the service-level not-found variant.
    pub fn from_storage(err: StorageError) -> Self {
        match err {
            StorageError::TopicNotFound(id) => ApiError::TopicNotFound(id),
            other => ApiError::StorageError(other),
        }
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
