//! Core types and structures for text-studio

use crate::error::{Result, StudioError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Provider the caller asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestedProvider {
    OpenAi,
    HuggingFace,
    Local,
    #[serde(other)]
    Default,
}

impl Default for RequestedProvider {
    fn default() -> Self {
        RequestedProvider::HuggingFace
    }
}

impl std::fmt::Display for RequestedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestedProvider::OpenAi => write!(f, "openai"),
            RequestedProvider::HuggingFace => write!(f, "huggingface"),
            RequestedProvider::Local => write!(f, "local"),
            RequestedProvider::Default => write!(f, "default"),
        }
    }
}

/// Kind of prompt, derived per request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptCategory {
    Question,
    Story,
    Explanation,
    WordDefinition,
    General,
}

impl PromptCategory {
    pub const ALL: [PromptCategory; 5] = [
        PromptCategory::Question,
        PromptCategory::Story,
        PromptCategory::Explanation,
        PromptCategory::WordDefinition,
        PromptCategory::General,
    ];
}

impl std::fmt::Display for PromptCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PromptCategory::Question => write!(f, "question"),
            PromptCategory::Story => write!(f, "story"),
            PromptCategory::Explanation => write!(f, "explanation"),
            PromptCategory::WordDefinition => write!(f, "word_definition"),
            PromptCategory::General => write!(f, "general"),
        }
    }
}

/// A validated generation request.
///
/// Fields are private so that every instance has a non-empty prompt,
/// a positive `max_length` and a temperature within `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    prompt: String,
    max_length: u32,
    temperature: f64,
    provider: RequestedProvider,
    api_key: Option<String>,
}

impl GenerationRequest {
    pub fn new(
        prompt: impl Into<String>,
        max_length: u32,
        temperature: f64,
        provider: RequestedProvider,
    ) -> Result<Self> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(StudioError::validation("prompt must not be empty"));
        }
        if max_length == 0 {
            return Err(StudioError::validation("maxLength must be greater than 0"));
        }
        if !(0.0..=1.0).contains(&temperature) {
            return Err(crate::validation_error!(
                "temperature must be between 0 and 1, got {}",
                temperature
            ));
        }

        Ok(Self {
            prompt,
            max_length,
            temperature,
            provider,
            api_key: None,
        })
    }

    /// Attach a caller-supplied premium credential
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn max_length(&self) -> u32 {
        self.max_length
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn provider(&self) -> RequestedProvider {
        self.provider
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
}

/// Description of whatever produced a result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub provider: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, Value>,
}

impl ModelInfo {
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            provider: provider.into(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Attach the usual temperature/max_length pair
    pub fn with_sampling(self, request: &GenerationRequest) -> Self {
        self.with_parameter("temperature", request.temperature())
            .with_parameter("max_length", request.max_length())
    }
}

/// Generated text plus the model that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub generated_text: String,
    pub model_info: ModelInfo,
}

/// What a single adapter call produced
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderOutcome {
    Success(GenerationResult),
    /// Not configured or preconditions unmet; nothing was attempted
    Unavailable(String),
    /// Network, timeout or malformed response
    TransientFailure(String),
    QuotaExceeded,
}

impl ProviderOutcome {
    /// Map an adapter-internal error onto an outcome
    pub fn from_error(err: &StudioError) -> Self {
        if err.is_quota() {
            ProviderOutcome::QuotaExceeded
        } else if err.is_unavailable() {
            ProviderOutcome::Unavailable(err.to_string())
        } else {
            ProviderOutcome::TransientFailure(err.to_string())
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProviderOutcome::Success(_))
    }

    /// Collapse every non-success into `Unavailable`
    pub fn or_unavailable(self) -> Self {
        match self {
            ProviderOutcome::Success(result) => ProviderOutcome::Success(result),
            ProviderOutcome::Unavailable(reason) | ProviderOutcome::TransientFailure(reason) => {
                ProviderOutcome::Unavailable(reason)
            }
            ProviderOutcome::QuotaExceeded => {
                ProviderOutcome::Unavailable("quota exceeded".to_string())
            }
        }
    }
}

/// Service configuration, read from the environment
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_address: String,
    pub port: u16,
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub huggingface_enabled: bool,
    pub huggingface_api_key: Option<String>,
    pub huggingface_model: String,
    pub huggingface_base_url: Option<String>,
    pub dictionary_enabled: bool,
    pub dictionary_base_url: Option<String>,
    pub provider_timeout: Duration,
    pub template_delay: Duration,
    pub template_seed: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3001,
            openai_api_key: String::new(),
            openai_model: "gpt-3.5-turbo".to_string(),
            openai_base_url: None,
            huggingface_enabled: true,
            huggingface_api_key: None,
            huggingface_model: "gpt2".to_string(),
            huggingface_base_url: None,
            dictionary_enabled: true,
            dictionary_base_url: None,
            provider_timeout: Duration::from_secs(10),
            template_delay: Duration::ZERO,
            template_seed: None,
        }
    }
}

impl ServiceConfig {
    /// Build the configuration from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Ok(Self {
            bind_address: get("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            port: parse_var(&get, "PORT")?.unwrap_or(defaults.port),
            openai_api_key: get("OPENAI_API_KEY").unwrap_or_default(),
            openai_model: get("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            openai_base_url: get("OPENAI_BASE_URL"),
            huggingface_enabled: parse_bool(&get, "HUGGINGFACE_ENABLED")?
                .unwrap_or(defaults.huggingface_enabled),
            huggingface_api_key: get("HUGGINGFACE_API_KEY"),
            huggingface_model: get("HUGGINGFACE_MODEL").unwrap_or(defaults.huggingface_model),
            huggingface_base_url: get("HUGGINGFACE_BASE_URL"),
            dictionary_enabled: parse_bool(&get, "DICTIONARY_ENABLED")?
                .unwrap_or(defaults.dictionary_enabled),
            dictionary_base_url: get("DICTIONARY_BASE_URL"),
            provider_timeout: parse_var::<u64, _>(&get, "PROVIDER_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.provider_timeout),
            template_delay: parse_var::<u64, _>(&get, "TEMPLATE_DELAY_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.template_delay),
            template_seed: parse_var(&get, "TEMPLATE_SEED")?,
        })
    }

    /// Whether the server-side premium credential has a recognized shape
    pub fn openai_enabled(&self) -> bool {
        crate::llm::providers::openai::is_valid_credential(&self.openai_api_key)
    }
}

fn parse_var<T, G>(get: &G, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| crate::config_error!("{} has invalid value '{}': {}", key, raw, e)),
        None => Ok(None),
    }
}

fn parse_bool<G>(get: &G, key: &str) -> Result<Option<bool>>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key).map(|v| v.to_lowercase()) {
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(Some(true)),
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(Some(false)),
        Some(v) => Err(crate::config_error!("{} has invalid boolean value '{}'", key, v)),
        None => Ok(None),
    }
}

/// Request counters shared by every orchestrator clone
#[derive(Debug, Default)]
pub struct PerformanceMetrics {
    requests: AtomicU64,
    openai_answers: AtomicU64,
    dictionary_answers: AtomicU64,
    huggingface_answers: AtomicU64,
    template_answers: AtomicU64,
    adapter_failures: AtomicU64,
    quota_fallbacks: AtomicU64,
    local_deferrals: AtomicU64,
    total_time_ms: AtomicU64,
}

impl PerformanceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_requests(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Count an answer under the provider that produced it
    pub fn record_answer(&self, provider: &str, elapsed: Duration) {
        let counter = match provider {
            "openai" => &self.openai_answers,
            "dictionary" => &self.dictionary_answers,
            "huggingface" => &self.huggingface_answers,
            _ => &self.template_answers,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.total_time_ms
            .fetch_add(elapsed.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn increment_adapter_failures(&self) {
        self.adapter_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_quota_fallbacks(&self) {
        self.quota_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_local_deferrals(&self) {
        self.local_deferrals.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            openai_answers: self.openai_answers.load(Ordering::Relaxed),
            dictionary_answers: self.dictionary_answers.load(Ordering::Relaxed),
            huggingface_answers: self.huggingface_answers.load(Ordering::Relaxed),
            template_answers: self.template_answers.load(Ordering::Relaxed),
            adapter_failures: self.adapter_failures.load(Ordering::Relaxed),
            quota_fallbacks: self.quota_fallbacks.load(Ordering::Relaxed),
            local_deferrals: self.local_deferrals.load(Ordering::Relaxed),
            total_time_ms: self.total_time_ms.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`PerformanceMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub openai_answers: u64,
    pub dictionary_answers: u64,
    pub huggingface_answers: u64,
    pub template_answers: u64,
    pub adapter_failures: u64,
    pub quota_fallbacks: u64,
    pub local_deferrals: u64,
    pub total_time_ms: u64,
}

impl MetricsSnapshot {
    pub fn answers(&self) -> u64 {
        self.openai_answers
            + self.dictionary_answers
            + self.huggingface_answers
            + self.template_answers
    }

    pub fn avg_generation_time_ms(&self) -> f64 {
        let answers = self.answers();
        if answers == 0 {
            0.0
        } else {
            self.total_time_ms as f64 / answers as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_request_validation() {
        assert!(GenerationRequest::new("hello", 100, 0.7, RequestedProvider::Default).is_ok());
        assert!(GenerationRequest::new("   ", 100, 0.7, RequestedProvider::Default).is_err());
        assert!(GenerationRequest::new("hello", 0, 0.7, RequestedProvider::Default).is_err());
        assert!(GenerationRequest::new("hello", 10, 1.5, RequestedProvider::Default).is_err());
        assert!(GenerationRequest::new("hello", 10, f64::NAN, RequestedProvider::Default).is_err());
    }

    #[test]
    fn test_blank_api_key_is_dropped() {
        let request = GenerationRequest::new("hi", 10, 0.5, RequestedProvider::OpenAi)
            .unwrap()
            .with_api_key(Some("  ".to_string()));
        assert_eq!(request.api_key(), None);
    }

    #[test]
    fn test_requested_provider_wire_names() {
        let p: RequestedProvider = serde_json::from_str("\"openai\"").unwrap();
        assert_eq!(p, RequestedProvider::OpenAi);
        let p: RequestedProvider = serde_json::from_str("\"huggingface\"").unwrap();
        assert_eq!(p, RequestedProvider::HuggingFace);
        let p: RequestedProvider = serde_json::from_str("\"something-else\"").unwrap();
        assert_eq!(p, RequestedProvider::Default);
    }

    #[test]
    fn test_outcome_from_error() {
        assert_eq!(
            ProviderOutcome::from_error(&StudioError::rate_limit("quota", None)),
            ProviderOutcome::QuotaExceeded
        );
        assert!(matches!(
            ProviderOutcome::from_error(&StudioError::authentication("bad")),
            ProviderOutcome::Unavailable(_)
        ));
        assert!(matches!(
            ProviderOutcome::from_error(&StudioError::timeout("call", 10)),
            ProviderOutcome::TransientFailure(_)
        ));
    }

    #[test]
    fn test_config_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("PORT", "8080"),
            ("OPENAI_API_KEY", "sk-test"),
            ("HUGGINGFACE_ENABLED", "false"),
            ("PROVIDER_TIMEOUT_SECS", "5"),
            ("TEMPLATE_SEED", "42"),
        ]
        .into_iter()
        .collect();

        let config = ServiceConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.openai_enabled());
        assert!(!config.huggingface_enabled);
        assert_eq!(config.provider_timeout, Duration::from_secs(5));
        assert_eq!(config.template_seed, Some(42));
        assert_eq!(config.huggingface_model, "gpt2");
    }

    #[test]
    fn test_config_rejects_bad_numbers() {
        let result = ServiceConfig::from_lookup(|k| (k == "PORT").then(|| "eighty".to_string()));
        assert!(matches!(result, Err(StudioError::Config { .. })));
    }

    #[test]
    fn test_metrics_snapshot() {
        let metrics = PerformanceMetrics::new();
        metrics.increment_requests();
        metrics.record_answer("dictionary", Duration::from_millis(30));
        metrics.record_answer("template", Duration::from_millis(10));
        let stats = metrics.get_stats();
        assert_eq!(stats.requests, 1);
        assert_eq!(stats.answers(), 2);
        assert_eq!(stats.avg_generation_time_ms(), 20.0);
    }
}
