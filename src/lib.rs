//! Text Studio - text generation that always answers
//!
//! Routes a prompt through a chain of providers (a premium chat API, a
//! dictionary lookup for single words, a hosted inference API) and falls
//! back to template synthesis when none of them can help.

pub mod error;
pub mod llm;
pub mod server;
pub mod template;
pub mod types;

// Re-export commonly used types
pub use error::{Result, StudioError};
pub use types::{
    GenerationRequest, GenerationResult, MetricsSnapshot, ModelInfo, PerformanceMetrics,
    PromptCategory, ProviderOutcome, RequestedProvider, ServiceConfig,
};

// Re-export main functionality
pub use llm::{Generation, GenerationOrchestrator, GenerationReport};
pub use template::TemplateSynthesizer;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Characters assumed per token when a token budget is enforced on text
pub const CHARS_PER_TOKEN: usize = 4;

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}
