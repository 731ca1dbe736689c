//! Provider integration module
//!
//! Adapters for the upstream text services and the orchestrator that walks
//! them in order until one answers.

pub mod orchestrator;
pub mod providers;

// Re-export main functionality
pub use orchestrator::{
    AttemptStatus, FallbackNotice, Generation, GenerationOrchestrator, GenerationReport,
    ProviderAttempt,
};

use crate::types::{GenerationRequest, ProviderOutcome};
use async_trait::async_trait;

/// Core trait for prompt-to-text providers
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Generate text for a request. Failures are reported through the outcome.
    async fn generate(&self, request: &GenerationRequest) -> ProviderOutcome;

    /// Get provider name, as recorded in `model_info.provider`
    fn name(&self) -> &'static str;

    /// Check if provider is configured and ready
    fn is_ready(&self) -> bool;

    /// Whether this particular request can be attempted at all.
    /// A `false` answer means the provider is skipped without being called.
    fn can_serve(&self, _request: &GenerationRequest) -> bool {
        true
    }
}

/// Core trait for single-word definition lookups
#[async_trait]
pub trait DefinitionProvider: Send + Sync {
    /// Look up a lowercased word
    async fn lookup(&self, word: &str) -> ProviderOutcome;

    /// Get provider name
    fn name(&self) -> &'static str;
}
