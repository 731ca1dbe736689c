//! Request handlers for the generation endpoints

use super::AppState;
use crate::error::{Result, StudioError};
use crate::llm::{Generation, GenerationReport};
use crate::types::{GenerationRequest, MetricsSnapshot, ModelInfo, RequestedProvider};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const DEFAULT_MAX_LENGTH: u32 = 100;
const DEFAULT_TEMPERATURE: f64 = 0.7;
const PROMPT_LOG_CHARS: usize = 30;

/// JSON body accepted by both generation routes
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextGenerationBody {
    pub prompt: String,
    #[serde(default)]
    pub max_length: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub provider: Option<RequestedProvider>,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl TextGenerationBody {
    /// Validate into a request, optionally forcing the provider
    pub fn into_request(self, forced: Option<RequestedProvider>) -> Result<GenerationRequest> {
        let provider = forced.or(self.provider).unwrap_or_default();
        Ok(GenerationRequest::new(
            self.prompt,
            self.max_length.unwrap_or(DEFAULT_MAX_LENGTH),
            self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            provider,
        )?
        .with_api_key(self.api_key))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TextGenerationResponse {
    pub generated_text: String,
    pub model_info: ModelInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<GenerationReport> for TextGenerationResponse {
    fn from(report: GenerationReport) -> Self {
        let (fallback, message) = match report.notice {
            Some(notice) => (Some(true), Some(notice.message)),
            None => (None, None),
        };
        Self {
            generated_text: report.result.generated_text,
            model_info: report.result.model_info,
            fallback,
            message,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub providers: Vec<&'static str>,
    pub started_at: DateTime<Utc>,
    pub metrics: MetricsSnapshot,
}

/// `POST /api/text-generation`
pub async fn text_generation(State(state): State<AppState>, body: Bytes) -> Response {
    handle(state, &body, None).await
}

/// `POST /api/openai`, kept for older clients
pub async fn openai_compat(State(state): State<AppState>, body: Bytes) -> Response {
    handle(state, &body, Some(RequestedProvider::OpenAi)).await
}

/// `GET /api/health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::VERSION,
        providers: state.orchestrator.ready_providers(),
        started_at: state.started_at,
        metrics: state.orchestrator.get_metrics_snapshot(),
    })
}

async fn handle(state: AppState, body: &[u8], forced: Option<RequestedProvider>) -> Response {
    let request = match parse_request(body, forced) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected text generation request");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Text generation failed",
                Some(e.to_string()),
                None,
            );
        }
    };

    let preview: String = request.prompt().chars().take(PROMPT_LOG_CHARS).collect();
    tracing::info!(
        provider = %request.provider(),
        "Processing text generation request with prompt: \"{}...\"",
        preview
    );

    match state.orchestrator.generate(&request).await {
        Generation::Completed(report) => Json(TextGenerationResponse::from(report)).into_response(),
        Generation::DeferToLocal => error_response(
            StatusCode::BAD_REQUEST,
            "Using local model as requested",
            Some("The application will use the local model as requested.".to_string()),
            Some(true),
        ),
    }
}

fn parse_request(body: &[u8], forced: Option<RequestedProvider>) -> Result<GenerationRequest> {
    let body: TextGenerationBody = serde_json::from_slice(body)
        .map_err(|e| StudioError::validation(format!("Malformed request body: {}", e)))?;
    body.into_request(forced)
}

fn error_response(
    status: StatusCode,
    error: &str,
    message: Option<String>,
    fallback: Option<bool>,
) -> Response {
    let body = ErrorResponse {
        error: error.to_string(),
        message,
        fallback,
    };
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let request = parse_request(br#"{"prompt":"hi there"}"#, None).unwrap();
        assert_eq!(request.max_length(), 100);
        assert_eq!(request.temperature(), 0.7);
        assert_eq!(request.provider(), RequestedProvider::HuggingFace);
    }

    #[test]
    fn test_forced_provider_wins() {
        let body = br#"{"prompt":"hi","provider":"local"}"#;
        let request = parse_request(body, Some(RequestedProvider::OpenAi)).unwrap();
        assert_eq!(request.provider(), RequestedProvider::OpenAi);
    }

    #[test]
    fn test_api_key_is_carried() {
        let body = br#"{"prompt":"hi","maxLength":20,"temperature":0.1,
            "provider":"openai","apiKey":"sk-x"}"#;
        let request = parse_request(body, None).unwrap();
        assert_eq!(request.api_key(), Some("sk-x"));
        assert_eq!(request.max_length(), 20);
    }

    #[test]
    fn test_malformed_bodies() {
        assert!(parse_request(b"not json", None).is_err());
        assert!(parse_request(br#"{"maxLength":20}"#, None).is_err());
        assert!(parse_request(br#"{"prompt":"","maxLength":20}"#, None).is_err());
        assert!(parse_request(br#"{"prompt":"x","maxLength":-3}"#, None).is_err());
        assert!(parse_request(br#"{"prompt":"x","temperature":2.0}"#, None).is_err());
    }

    #[test]
    fn test_unknown_provider_is_default() {
        let request = parse_request(br#"{"prompt":"x","provider":"cohere"}"#, None).unwrap();
        assert_eq!(request.provider(), RequestedProvider::Default);
    }
}
