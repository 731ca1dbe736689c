//! Upstream provider implementations
//!
//! Each provider is implemented in its own module for better organization and maintainability.

pub mod dictionary;
pub mod huggingface;
pub mod openai;

// Re-export providers for easy access
pub use dictionary::DictionaryProvider;
pub use huggingface::HuggingFaceProvider;
pub use openai::OpenAiProvider;

use crate::error::{Result, StudioError};
use reqwest::Client;
use std::time::Duration;

/// Shared HTTP client for all adapters
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(format!("text-studio/{}", crate::VERSION))
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .map_err(|e| StudioError::network(e.to_string(), None, None))
}

/// Read an error body without failing the caller
pub(crate) async fn error_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string())
}
