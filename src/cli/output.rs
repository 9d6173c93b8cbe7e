//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, StorageError};

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::ProviderNotConfigured(msg) => format!(
            "Provider not configured: {}\n\nSet provider.api_key in config or export the provider's API key variable.",
            msg
        ),
        ApiError::StorageError(StorageError::IoError(io)) => {
            format!("Storage unavailable: {}", io)
        }
        other => other.to_string(),
    }
}
