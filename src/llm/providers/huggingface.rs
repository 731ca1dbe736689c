//! Hugging Face inference provider implementation
//!
//! Works without a key on the free tier; a key is sent as a bearer token when configured.

use crate::error::{Result, StudioError};
use crate::llm::TextProvider;
use crate::types::{GenerationRequest, GenerationResult, ModelInfo, ProviderOutcome, ServiceConfig};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::error_body;

pub const DEFAULT_HUGGINGFACE_URL: &str = "https://api-inference.huggingface.co/models";

/// Used for prompts that mention code
pub const CODE_MODEL: &str = "Xenova/codegen-350M-mono";
/// Used for long prompts
pub const LONG_PROMPT_MODEL: &str = "distilgpt2";

/// Upper bound on requested new tokens, whatever `max_length` says
pub const MAX_NEW_TOKENS: u32 = 250;

const LONG_PROMPT_CHARS: usize = 100;
const CODE_KEYWORDS: &[&str] = &["programming", "code", "function"];
const SENTENCE_MARKS: &[char] = &['.', '!', '?'];

/// Hugging Face provider implementation
pub struct HuggingFaceProvider {
    client: Client,
    api_key: Option<String>,
    default_model: String,
    base_url: String,
}

impl HuggingFaceProvider {
    pub fn new(client: Client, config: &ServiceConfig) -> Self {
        Self {
            client,
            api_key: config.huggingface_api_key.clone(),
            default_model: config.huggingface_model.clone(),
            base_url: config
                .huggingface_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_HUGGINGFACE_URL.to_string()),
        }
    }

    /// Pick a model from simple prompt heuristics
    pub fn select_model(&self, prompt: &str) -> &str {
        let lower = prompt.to_lowercase();
        if CODE_KEYWORDS.iter().any(|k| lower.contains(k)) {
            CODE_MODEL
        } else if prompt.chars().count() > LONG_PROMPT_CHARS {
            LONG_PROMPT_MODEL
        } else {
            &self.default_model
        }
    }

    async fn infer(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let model = self.select_model(request.prompt());
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), model);

        let payload = InferenceRequest {
            inputs: request.prompt().to_string(),
            parameters: InferenceParameters {
                max_new_tokens: request.max_length().min(MAX_NEW_TOKENS),
                temperature: request.temperature(),
                top_p: 0.9,
                do_sample: request.temperature() > 0.2,
            },
        };

        let mut builder = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&payload);
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", key));
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let error_text = error_body(response).await;
            return Err(StudioError::network(
                format!("Inference request failed ({}): {}", status, error_text),
                Some(status.as_u16()),
                Some(url),
            ));
        }

        let generations: Vec<InferenceGeneration> = response.json().await.map_err(|e| {
            StudioError::parse(format!("Unexpected API response format: {}", e), None)
        })?;

        let raw = generations
            .into_iter()
            .next()
            .map(|g| g.generated_text)
            .ok_or_else(|| StudioError::parse("Unexpected API response format: empty list", None))?;

        let continuation = clean_continuation(request.prompt(), &raw);
        if continuation.is_empty() {
            return Err(StudioError::parse("Model returned no continuation", Some(raw)));
        }

        let short_name = model.rsplit('/').next().unwrap_or(model);
        Ok(GenerationResult {
            generated_text: format!("{}\n\n{}", request.prompt(), continuation),
            model_info: ModelInfo::new(
                format!("Hugging Face {}", short_name),
                "Neural Language Model",
                self.name(),
            )
            .with_sampling(request)
            .with_parameter("model", model),
        })
    }
}

/// Strip an echoed prompt and drop a trailing partial sentence.
///
/// Text that does not end in `.`, `!` or `?` is cut after the last such
/// mark; text with no mark past its first character is left alone.
pub fn clean_continuation(prompt: &str, raw: &str) -> String {
    let text = raw.strip_prefix(prompt).unwrap_or(raw).trim();
    if text.ends_with(SENTENCE_MARKS) {
        return text.to_string();
    }
    match text.rfind(SENTENCE_MARKS) {
        Some(index) if index > 0 => text[..=index].to_string(),
        _ => text.to_string(),
    }
}

#[async_trait]
impl TextProvider for HuggingFaceProvider {
    async fn generate(&self, request: &GenerationRequest) -> ProviderOutcome {
        match self.infer(request).await {
            Ok(result) => ProviderOutcome::Success(result),
            Err(e) => ProviderOutcome::from_error(&e).or_unavailable(),
        }
    }

    fn name(&self) -> &'static str {
        "huggingface"
    }

    fn is_ready(&self) -> bool {
        true // the free tier needs no key
    }
}

// Inference API structures
#[derive(Serialize)]
struct InferenceRequest {
    inputs: String,
    parameters: InferenceParameters,
}

#[derive(Serialize)]
struct InferenceParameters {
    max_new_tokens: u32,
    temperature: f64,
    top_p: f64,
    do_sample: bool,
}

#[derive(Deserialize)]
struct InferenceGeneration {
    generated_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> HuggingFaceProvider {
        HuggingFaceProvider::new(Client::new(), &ServiceConfig::default())
    }

    #[test]
    fn test_model_selection() {
        let p = provider();
        assert_eq!(p.select_model("Write a Python function"), CODE_MODEL);
        assert_eq!(p.select_model("I love PROGRAMMING"), CODE_MODEL);
        assert_eq!(p.select_model(&"long prompt ".repeat(10)), LONG_PROMPT_MODEL);
        assert_eq!(p.select_model("The weather today"), "gpt2");
    }

    #[test]
    fn test_code_beats_length() {
        let prompt = format!("{} code", "x".repeat(120));
        assert_eq!(provider().select_model(&prompt), CODE_MODEL);
    }

    #[test]
    fn test_strips_echoed_prompt() {
        let cleaned = clean_continuation("Once there was", "Once there was a cat. It sat");
        assert_eq!(cleaned, "a cat.");
    }

    #[test]
    fn test_keeps_complete_text() {
        assert_eq!(clean_continuation("p", "It rained! Then stopped?"), "It rained! Then stopped?");
    }

    #[test]
    fn test_no_punctuation_left_alone() {
        assert_eq!(clean_continuation("p", "  just words here  "), "just words here");
        // a mark at index 0 does not count
        assert_eq!(clean_continuation("p", ".leading dot only"), ".leading dot only");
    }
}
