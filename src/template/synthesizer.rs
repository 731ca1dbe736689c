//! Pattern selection, placeholder filling and length budgeting

use super::classifier::{classify, PromptAnalysis};
use super::lexicon;
use super::library::{
    patterns_for, BANNER_HEADER, ELLIPSIS, EMBELLISHMENTS, STUDIO_MODEL_NAME, TEMPLATE_FOOTER,
};
use super::RandomSource;
use crate::types::{GenerationRequest, GenerationResult, ModelInfo, PromptCategory};
use crate::CHARS_PER_TOKEN;

/// Provider name recorded for template output
pub const TEMPLATE_PROVIDER: &str = "template";

/// Assembles text from the template library. Infallible.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateSynthesizer;

impl TemplateSynthesizer {
    pub fn new() -> Self {
        Self
    }

    /// Build the budgeted body, without the banner.
    ///
    /// Draw order: pattern index, embellishment coin, embellishment index.
    pub fn compose(
        &self,
        analysis: &PromptAnalysis,
        prompt: &str,
        temperature: f64,
        max_length: u32,
        random: &mut dyn RandomSource,
    ) -> String {
        let patterns = patterns_for(analysis.category);
        let pattern = patterns[random.next_index(patterns.len())];
        let embellish = random.next_f64() < temperature;

        let mut body = if analysis.category == PromptCategory::WordDefinition {
            let entry = lexicon::lookup_or_generic(&analysis.word);
            pattern
                .text
                .replace("{word}", &analysis.word)
                .replace("{domain_description}", entry.domain)
                .replace("{primary_meaning}", entry.meaning)
                .replace("{origin_description}", entry.origin)
        } else {
            pattern
                .text
                .replace("{topic}", &analysis.topic)
                .replace("{character}", &analysis.character)
        };

        if embellish {
            body.push_str(EMBELLISHMENTS[random.next_index(EMBELLISHMENTS.len())]);
        }

        if analysis.category != PromptCategory::WordDefinition {
            body = format!("{}\n\n{}", prompt, body);
        }

        truncate_to_budget(body, max_length as usize * CHARS_PER_TOKEN)
    }

    /// Compose and wrap in the studio banner
    pub fn synthesize(
        &self,
        analysis: &PromptAnalysis,
        prompt: &str,
        temperature: f64,
        max_length: u32,
        random: &mut dyn RandomSource,
    ) -> String {
        let body = self.compose(analysis, prompt, temperature, max_length, random);
        wrap_banner(&body)
    }

    /// Run classification and synthesis for a whole request
    pub fn generate(
        &self,
        request: &GenerationRequest,
        random: &mut dyn RandomSource,
    ) -> GenerationResult {
        let analysis = classify(request.prompt(), random);
        self.generate_for(request, &analysis, random)
    }

    /// Synthesis for a request whose prompt was already classified
    pub fn generate_for(
        &self,
        request: &GenerationRequest,
        analysis: &PromptAnalysis,
        random: &mut dyn RandomSource,
    ) -> GenerationResult {
        let text = self.synthesize(
            analysis,
            request.prompt(),
            request.temperature(),
            request.max_length(),
            random,
        );

        GenerationResult {
            generated_text: text,
            model_info: ModelInfo::new(STUDIO_MODEL_NAME, "Template Synthesizer", TEMPLATE_PROVIDER)
                .with_sampling(request)
                .with_parameter("category", analysis.category.to_string()),
        }
    }
}

/// Cut to `budget` characters and mark the cut with an ellipsis
pub fn truncate_to_budget(text: String, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text;
    }
    let mut cut: String = text.chars().take(budget).collect();
    cut.push_str(ELLIPSIS);
    cut
}

pub fn wrap_banner(body: &str) -> String {
    format!("{}{}{}", BANNER_HEADER, body, TEMPLATE_FOOTER)
}
