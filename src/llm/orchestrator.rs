//! Generation orchestrator: walks the provider chain until something answers

use crate::error::{Result, StudioError};
use crate::llm::providers::{build_client, DictionaryProvider, HuggingFaceProvider, OpenAiProvider};
use crate::llm::{DefinitionProvider, TextProvider};
use crate::template::synthesizer::TEMPLATE_PROVIDER;
use crate::template::{classify, RandomSource, SeededRandom, TemplateSynthesizer};
use crate::types::{
    GenerationRequest, GenerationResult, MetricsSnapshot, PerformanceMetrics, PromptCategory,
    ProviderOutcome, RequestedProvider, ServiceConfig,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

const QUOTA_REASON: &str = "OpenAI API quota exceeded";
const QUOTA_MESSAGE: &str =
    "Your OpenAI API key has exceeded its quota. The application will use an alternative model instead.";

/// How a single step of the chain went
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    Succeeded,
    /// Adapter not configured; it was never called
    Skipped,
    Unavailable,
    TransientFailure,
    QuotaExceeded,
}

/// One step of the chain, kept for logging and tests
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderAttempt {
    pub provider: String,
    pub status: AttemptStatus,
    pub reason: Option<String>,
    pub duration_ms: u64,
}

impl ProviderAttempt {
    fn skipped(provider: &str, reason: &str) -> Self {
        Self {
            provider: provider.to_string(),
            status: AttemptStatus::Skipped,
            reason: Some(reason.to_string()),
            duration_ms: 0,
        }
    }

    fn from_outcome(provider: &str, outcome: &ProviderOutcome, elapsed: Duration) -> Self {
        let (status, reason) = match outcome {
            ProviderOutcome::Success(_) => (AttemptStatus::Succeeded, None),
            ProviderOutcome::Unavailable(r) => (AttemptStatus::Unavailable, Some(r.clone())),
            ProviderOutcome::TransientFailure(r) => {
                (AttemptStatus::TransientFailure, Some(r.clone()))
            }
            ProviderOutcome::QuotaExceeded => {
                (AttemptStatus::QuotaExceeded, Some(QUOTA_REASON.to_string()))
            }
        };
        Self {
            provider: provider.to_string(),
            status,
            reason,
            duration_ms: elapsed.as_millis() as u64,
        }
    }

    /// True when the adapter was actually called
    pub fn was_invoked(&self) -> bool {
        self.status != AttemptStatus::Skipped
    }
}

/// User-facing note that the requested provider could not be used
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FallbackNotice {
    pub reason: String,
    pub message: String,
}

impl FallbackNotice {
    fn quota_exceeded() -> Self {
        Self {
            reason: QUOTA_REASON.to_string(),
            message: QUOTA_MESSAGE.to_string(),
        }
    }
}

/// A completed run of the chain
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub result: GenerationResult,
    pub category: PromptCategory,
    pub attempts: Vec<ProviderAttempt>,
    pub notice: Option<FallbackNotice>,
    pub generated_at: DateTime<Utc>,
}

impl GenerationReport {
    /// Provider that produced the text
    pub fn provider(&self) -> &str {
        &self.result.model_info.provider
    }

    /// Providers that were actually called, in order
    pub fn invoked(&self) -> Vec<&str> {
        self.attempts
            .iter()
            .filter(|a| a.was_invoked())
            .map(|a| a.provider.as_str())
            .collect()
    }
}

/// What the orchestrator hands back to its caller
#[derive(Debug, Clone)]
pub enum Generation {
    Completed(GenerationReport),
    /// The caller asked for the local backend; no adapter was contacted
    DeferToLocal,
}

impl Generation {
    pub fn into_report(self) -> Option<GenerationReport> {
        match self {
            Generation::Completed(report) => Some(report),
            Generation::DeferToLocal => None,
        }
    }
}

/// Runs premium → dictionary → hosted → template for each request.
///
/// Cheap to clone; adapters and metrics are shared.
#[derive(Clone)]
pub struct GenerationOrchestrator {
    premium: Option<Arc<dyn TextProvider>>,
    dictionary: Option<Arc<dyn DefinitionProvider>>,
    hosted: Option<Arc<dyn TextProvider>>,
    synthesizer: TemplateSynthesizer,
    provider_timeout: Duration,
    template_delay: Duration,
    seed: Option<u64>,
    metrics: Arc<PerformanceMetrics>,
}

impl GenerationOrchestrator {
    /// Create an orchestrator with no adapters; every request ends in the template synthesizer
    pub fn new() -> Self {
        Self {
            premium: None,
            dictionary: None,
            hosted: None,
            synthesizer: TemplateSynthesizer::new(),
            provider_timeout: ServiceConfig::default().provider_timeout,
            template_delay: Duration::ZERO,
            seed: None,
            metrics: Arc::new(PerformanceMetrics::new()),
        }
    }

    /// Wire up every adapter the configuration enables
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let client = build_client(config.provider_timeout)?;

        let mut orchestrator = Self::new()
            .with_provider_timeout(config.provider_timeout)
            .with_template_delay(config.template_delay)
            .with_premium(Arc::new(OpenAiProvider::new(client.clone(), config)));

        if let Some(seed) = config.template_seed {
            orchestrator = orchestrator.with_seed(seed);
        }
        if config.dictionary_enabled {
            orchestrator = orchestrator.with_dictionary(Arc::new(DictionaryProvider::new(
                client.clone(),
                config.dictionary_base_url.clone(),
            )));
        }
        if config.huggingface_enabled {
            orchestrator =
                orchestrator.with_hosted(Arc::new(HuggingFaceProvider::new(client, config)));
        }

        if config.openai_enabled() {
            tracing::info!(model = %config.openai_model, "OpenAI API integration is enabled");
        } else {
            tracing::info!("OpenAI API integration is disabled - API key not configured");
        }

        Ok(orchestrator)
    }

    pub fn with_premium(mut self, provider: Arc<dyn TextProvider>) -> Self {
        self.premium = Some(provider);
        self
    }

    pub fn with_dictionary(mut self, provider: Arc<dyn DefinitionProvider>) -> Self {
        self.dictionary = Some(provider);
        self
    }

    pub fn with_hosted(mut self, provider: Arc<dyn TextProvider>) -> Self {
        self.hosted = Some(provider);
        self
    }

    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    /// Cosmetic pause before template output is returned
    pub fn with_template_delay(mut self, delay: Duration) -> Self {
        self.template_delay = delay;
        self
    }

    /// Make template output reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Names of adapters that are ready to serve, in chain order
    pub fn ready_providers(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if let Some(premium) = self.premium.as_ref().filter(|p| p.is_ready()) {
            names.push(premium.name());
        }
        if let Some(dictionary) = &self.dictionary {
            names.push(dictionary.name());
        }
        if let Some(hosted) = self.hosted.as_ref().filter(|p| p.is_ready()) {
            names.push(hosted.name());
        }
        names.push(TEMPLATE_PROVIDER);
        names
    }

    /// Get current metrics snapshot
    pub fn get_metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.get_stats()
    }

    /// Run the chain with a fresh random source
    pub async fn generate(&self, request: &GenerationRequest) -> Generation {
        let mut random = match self.seed {
            Some(seed) => SeededRandom::from_seed(seed),
            None => SeededRandom::from_entropy(),
        };
        self.generate_with_random(request, &mut random).await
    }

    /// Run the chain with a caller-supplied random source. Never fails.
    pub async fn generate_with_random(
        &self,
        request: &GenerationRequest,
        random: &mut (dyn RandomSource + Send),
    ) -> Generation {
        let started = Instant::now();
        self.metrics.increment_requests();

        if request.provider() == RequestedProvider::Local {
            self.metrics.increment_local_deferrals();
            tracing::info!("User explicitly requested local model");
            return Generation::DeferToLocal;
        }

        let analysis = classify(request.prompt(), random);
        let mut attempts = Vec::new();
        let mut notice = None;

        tracing::debug!(
            requested = %request.provider(),
            category = %analysis.category,
            "Starting generation chain"
        );

        if request.provider() == RequestedProvider::OpenAi {
            match &self.premium {
                Some(premium) if !premium.can_serve(request) => {
                    tracing::debug!("OpenAI requested but no credential applies, falling back");
                    attempts.push(ProviderAttempt::skipped(premium.name(), "no credential"));
                }
                Some(premium) => {
                    let outcome = self
                        .call(premium.name(), premium.generate(request), &mut attempts)
                        .await;
                    match outcome {
                        ProviderOutcome::Success(result) => {
                            return self.finish(
                                result,
                                analysis.category,
                                attempts,
                                notice,
                                started,
                            );
                        }
                        ProviderOutcome::QuotaExceeded => {
                            self.metrics.increment_quota_fallbacks();
                            notice = Some(FallbackNotice::quota_exceeded());
                        }
                        _ => {}
                    }
                }
                None => {
                    tracing::debug!("OpenAI requested but not configured, falling back");
                    attempts.push(ProviderAttempt::skipped("openai", "not configured"));
                }
            }
        }

        if analysis.category == PromptCategory::WordDefinition {
            match &self.dictionary {
                Some(dictionary) => {
                    tracing::debug!(word = %analysis.word, "Detected single word request");
                    let outcome = self
                        .call(dictionary.name(), dictionary.lookup(&analysis.word), &mut attempts)
                        .await;
                    if let ProviderOutcome::Success(result) = outcome {
                        return self.finish(result, analysis.category, attempts, notice, started);
                    }
                }
                None => attempts.push(ProviderAttempt::skipped("dictionary", "not configured")),
            }
        }

        match &self.hosted {
            Some(hosted) => {
                let outcome = self
                    .call(hosted.name(), hosted.generate(request), &mut attempts)
                    .await;
                if let ProviderOutcome::Success(result) = outcome {
                    return self.finish(result, analysis.category, attempts, notice, started);
                }
            }
            None => attempts.push(ProviderAttempt::skipped("huggingface", "not configured")),
        }

        tracing::debug!("Falling back to template-based generation");
        let template_started = Instant::now();
        if !self.template_delay.is_zero() {
            tokio::time::sleep(self.template_delay).await;
        }
        let result = self.synthesizer.generate_for(request, &analysis, random);
        attempts.push(ProviderAttempt {
            provider: TEMPLATE_PROVIDER.to_string(),
            status: AttemptStatus::Succeeded,
            reason: None,
            duration_ms: template_started.elapsed().as_millis() as u64,
        });

        self.finish(result, analysis.category, attempts, notice, started)
    }

    /// Call one adapter under the timeout and record how it went
    async fn call<F>(
        &self,
        provider: &'static str,
        future: F,
        attempts: &mut Vec<ProviderAttempt>,
    ) -> ProviderOutcome
    where
        F: Future<Output = ProviderOutcome>,
    {
        let started = Instant::now();
        let outcome = match tokio::time::timeout(self.provider_timeout, future).await {
            Ok(outcome) => outcome,
            Err(_) => ProviderOutcome::from_error(&StudioError::timeout(
                format!("{} call", provider),
                self.provider_timeout.as_secs(),
            )),
        };
        let elapsed = started.elapsed();

        let attempt = ProviderAttempt::from_outcome(provider, &outcome, elapsed);
        if !outcome.is_success() {
            self.metrics.increment_adapter_failures();
            tracing::warn!(
                provider = %provider,
                status = ?attempt.status,
                reason = attempt.reason.as_deref().unwrap_or(""),
                duration_ms = %elapsed.as_millis(),
                "Provider did not answer, moving on"
            );
        }
        attempts.push(attempt);
        outcome
    }

    fn finish(
        &self,
        result: GenerationResult,
        category: PromptCategory,
        attempts: Vec<ProviderAttempt>,
        notice: Option<FallbackNotice>,
        started: Instant,
    ) -> Generation {
        let elapsed = started.elapsed();
        self.metrics.record_answer(&result.model_info.provider, elapsed);

        tracing::info!(
            provider = %result.model_info.provider,
            category = %category,
            attempts = attempts.len(),
            fallback_used = attempts.len() > 1,
            duration_ms = %elapsed.as_millis(),
            "Text generation completed"
        );

        Generation::Completed(GenerationReport {
            result,
            category,
            attempts,
            notice,
            generated_at: Utc::now(),
        })
    }
}

impl Default for GenerationOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::ScriptedRandom;

    fn request(prompt: &str, provider: RequestedProvider) -> GenerationRequest {
        GenerationRequest::new(prompt, 100, 0.5, provider).unwrap()
    }

    #[tokio::test]
    async fn test_template_only_chain() {
        let orchestrator = GenerationOrchestrator::new();
        let report = orchestrator
            .generate(&request("Explain tides", RequestedProvider::Default))
            .await
            .into_report()
            .unwrap();
        assert_eq!(report.provider(), "template");
        assert_eq!(report.category, PromptCategory::Explanation);
        assert!(report.invoked().ends_with(&["template"]));
        assert!(report.notice.is_none());
    }

    #[tokio::test]
    async fn test_local_defers() {
        let orchestrator = GenerationOrchestrator::new();
        let generation = orchestrator
            .generate(&request("anything", RequestedProvider::Local))
            .await;
        assert!(matches!(generation, Generation::DeferToLocal));
        assert_eq!(orchestrator.get_metrics_snapshot().local_deferrals, 1);
    }

    #[tokio::test]
    async fn test_seeded_output_is_reproducible() {
        let orchestrator = GenerationOrchestrator::new().with_seed(99);
        let req = request("Tell me about volcanoes and lava", RequestedProvider::Default);
        let a = orchestrator.generate(&req).await.into_report().unwrap();
        let b = orchestrator.generate(&req).await.into_report().unwrap();
        assert_eq!(a.result.generated_text, b.result.generated_text);
    }

    #[tokio::test]
    async fn test_unconfigured_premium_is_skipped() {
        let orchestrator = GenerationOrchestrator::new();
        let mut random = ScriptedRandom::new(vec![0.0]);
        let report = orchestrator
            .generate_with_random(
                &request("Why is the sky blue?", RequestedProvider::OpenAi),
                &mut random,
            )
            .await
            .into_report()
            .unwrap();
        assert_eq!(report.attempts[0].provider, "openai");
        assert_eq!(report.attempts[0].status, AttemptStatus::Skipped);
        assert_ne!(report.provider(), "openai");
    }

    #[tokio::test]
    async fn test_keyless_premium_is_never_called() {
        let premium = OpenAiProvider::new(reqwest::Client::new(), &ServiceConfig::default());
        let orchestrator = GenerationOrchestrator::new().with_premium(Arc::new(premium));

        let report = orchestrator
            .generate(&request("Write a poem for spring", RequestedProvider::OpenAi))
            .await
            .into_report()
            .unwrap();

        assert_eq!(report.attempts[0].status, AttemptStatus::Skipped);
        assert_eq!(report.invoked(), vec!["template"]);
        assert_eq!(orchestrator.get_metrics_snapshot().adapter_failures, 0);
    }
}
