//! OpenAI provider implementation
//!
//! Premium chat-completion adapter. The credential comes from the request
//! when one is supplied, otherwise from the server configuration.

use crate::error::{Result, StudioError};
use crate::llm::TextProvider;
use crate::types::{GenerationRequest, GenerationResult, ModelInfo, ProviderOutcome, ServiceConfig};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::error_body;

pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";

/// Prefix shared by every recognized key format (`sk-`, `sk-proj-`)
const KEY_PREFIX: &str = "sk-";

/// Whether a key has a recognized shape
pub fn is_valid_credential(key: &str) -> bool {
    key.starts_with(KEY_PREFIX) && key.len() > KEY_PREFIX.len()
}

/// OpenAI provider implementation
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(client: Client, config: &ServiceConfig) -> Self {
        Self {
            client,
            api_key: config.openai_api_key.clone(),
            model: config.openai_model.clone(),
            base_url: config
                .openai_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string()),
        }
    }

    /// Request key first, server key second; `None` unless the chosen key looks valid
    fn credential<'a>(&'a self, request: &'a GenerationRequest) -> Option<&'a str> {
        let key = request.api_key().unwrap_or(self.api_key.as_str());
        is_valid_credential(key).then_some(key)
    }

    /// Intelligently constructs the full API URL
    fn build_url(&self, endpoint: &str) -> String {
        let base_url = self.base_url.trim_end_matches('/');
        if base_url.ends_with("/v1") {
            format!("{}{}", base_url, endpoint)
        } else {
            format!("{}/v1{}", base_url, endpoint)
        }
    }

    fn display_name(&self) -> String {
        match self.model.as_str() {
            "gpt-3.5-turbo" => "OpenAI GPT-3.5 Turbo".to_string(),
            other => format!("OpenAI {}", other),
        }
    }

    async fn complete(
        &self,
        request: &GenerationRequest,
        api_key: &str,
    ) -> Result<GenerationResult> {
        let body = OpenAiRequest {
            model: self.model.clone(),
            messages: vec![OpenAiMessage {
                role: "user".to_string(),
                content: request.prompt().to_string(),
            }],
            max_tokens: request.max_length(),
            temperature: request.temperature(),
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        };

        let url = self.build_url("/chat/completions");
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = error_body(response).await;
            return Err(classify_failure(status.as_u16(), &error_text, url));
        }

        let openai_response: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| StudioError::parse(e.to_string(), None))?;

        let content = openai_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| StudioError::parse("No completion in OpenAI response", None))?;

        Ok(GenerationResult {
            generated_text: content,
            model_info: ModelInfo::new(self.display_name(), "Transformer", self.name())
                .with_sampling(request),
        })
    }
}

/// Map a non-2xx response onto the error taxonomy
fn classify_failure(status: u16, body: &str, url: String) -> StudioError {
    let error_type = serde_json::from_str::<OpenAiErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.kind);

    if status == 429 || error_type.as_deref() == Some("insufficient_quota") {
        return StudioError::rate_limit("OpenAI API quota exceeded", None);
    }

    match status {
        401 | 403 => StudioError::authentication(format!(
            "OpenAI rejected the API key ({})",
            status
        )),
        500..=599 => StudioError::network(
            format!("Server error ({}). The API service is experiencing issues", status),
            Some(status),
            Some(url),
        ),
        _ => StudioError::network(
            format!("API request failed ({}): {}", status, body),
            Some(status),
            Some(url),
        ),
    }
}

#[async_trait]
impl TextProvider for OpenAiProvider {
    async fn generate(&self, request: &GenerationRequest) -> ProviderOutcome {
        let Some(api_key) = self.credential(request) else {
            return ProviderOutcome::Unavailable("OpenAI API key not configured".to_string());
        };

        match self.complete(request, api_key).await {
            Ok(result) => ProviderOutcome::Success(result),
            Err(e) => ProviderOutcome::from_error(&e),
        }
    }

    fn name(&self) -> &'static str {
        "openai"
    }

    fn is_ready(&self) -> bool {
        is_valid_credential(&self.api_key)
    }

    fn can_serve(&self, request: &GenerationRequest) -> bool {
        self.credential(request).is_some()
    }
}

// OpenAI API structures
#[derive(Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    max_tokens: u32,
    temperature: f64,
    top_p: f64,
    frequency_penalty: f64,
    presence_penalty: f64,
}

#[derive(Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Deserialize)]
struct OpenAiErrorEnvelope {
    error: OpenAiErrorBody,
}

#[derive(Deserialize)]
struct OpenAiErrorBody {
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RequestedProvider;

    fn provider(server_key: &str) -> OpenAiProvider {
        let config = ServiceConfig {
            openai_api_key: server_key.to_string(),
            ..ServiceConfig::default()
        };
        OpenAiProvider::new(Client::new(), &config)
    }

    fn request(api_key: Option<&str>) -> GenerationRequest {
        GenerationRequest::new("Hello", 50, 0.5, RequestedProvider::OpenAi)
            .unwrap()
            .with_api_key(api_key.map(str::to_string))
    }

    #[test]
    fn test_credential_shapes() {
        assert!(is_valid_credential("sk-abc"));
        assert!(is_valid_credential("sk-proj-abc"));
        assert!(!is_valid_credential("sk-"));
        assert!(!is_valid_credential("pk-abc"));
        assert!(!is_valid_credential(""));
    }

    #[test]
    fn test_request_key_takes_precedence() {
        let p = provider("sk-server");
        assert_eq!(p.credential(&request(Some("sk-caller"))), Some("sk-caller"));
        assert_eq!(p.credential(&request(None)), Some("sk-server"));
        // an invalid caller key is not silently replaced
        assert_eq!(p.credential(&request(Some("bogus"))), None);
    }

    #[test]
    fn test_build_url() {
        let mut p = provider("");
        assert_eq!(p.build_url("/chat/completions"), "https://api.openai.com/v1/chat/completions");
        p.base_url = "http://localhost:9000/".to_string();
        assert_eq!(p.build_url("/chat/completions"), "http://localhost:9000/v1/chat/completions");
    }

    #[test]
    fn test_failure_classification() {
        let url = || "http://x".to_string();
        assert!(classify_failure(429, "", url()).is_quota());
        assert!(classify_failure(
            400,
            r#"{"error":{"type":"insufficient_quota","message":"out"}}"#,
            url()
        )
        .is_quota());
        assert!(classify_failure(401, "", url()).is_unavailable());
        let err = classify_failure(503, "", url());
        assert!(!err.is_quota() && !err.is_unavailable());
    }

    #[test]
    fn test_can_serve_follows_credential() {
        assert!(!provider("").can_serve(&request(None)));
        assert!(provider("").can_serve(&request(Some("sk-caller"))));
        assert!(provider("sk-server").can_serve(&request(None)));
        assert!(!provider("sk-server").can_serve(&request(Some("bogus"))));
    }

    #[tokio::test]
    async fn test_missing_key_is_unavailable_without_network() {
        let p = provider("");
        let outcome = p.generate(&request(None)).await;
        assert!(matches!(outcome, ProviderOutcome::Unavailable(_)));
        assert!(!p.is_ready());
    }
}
