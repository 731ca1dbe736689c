//! Free dictionary provider implementation
//!
//! Formats a dictionary entry for single-word prompts. Any failure means
//! "no result" so the chain moves on.

use crate::error::{Result, StudioError};
use crate::llm::DefinitionProvider;
use crate::template::library::{BANNER_HEADER, DICTIONARY_FOOTER, STUDIO_MODEL_NAME};
use crate::types::{GenerationResult, ModelInfo, ProviderOutcome};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::fmt::Write;

use super::error_body;

pub const DEFAULT_DICTIONARY_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en";

const MAX_MEANINGS: usize = 3;
const MAX_DEFINITIONS: usize = 2;
const MAX_SYNONYMS: usize = 5;

/// Dictionary provider implementation
pub struct DictionaryProvider {
    client: Client,
    base_url: String,
}

impl DictionaryProvider {
    pub fn new(client: Client, base_url: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.unwrap_or_else(|| DEFAULT_DICTIONARY_URL.to_string()),
        }
    }

    /// Entry URL with the word as a percent-encoded path segment
    fn entry_url(&self, word: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            StudioError::config(format!("Invalid dictionary URL '{}': {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                StudioError::config(format!(
                    "Dictionary URL '{}' cannot take a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push(word);
        Ok(url)
    }

    async fn fetch(&self, word: &str) -> Result<DictionaryEntry> {
        let url = self.entry_url(word)?;
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = error_body(response).await;
            return Err(StudioError::network(
                format!("Dictionary lookup failed ({}): {}", status, error_text),
                Some(status.as_u16()),
                Some(url.to_string()),
            ));
        }

        let entries: Vec<DictionaryEntry> = response
            .json()
            .await
            .map_err(|e| StudioError::parse(e.to_string(), None))?;

        entries
            .into_iter()
            .next()
            .ok_or_else(|| StudioError::provider(self.name(), format!("No entries for '{}'", word)))
    }
}

/// Render an entry inside the studio banner
pub fn format_entry(entry: &DictionaryEntry) -> String {
    let mut text = String::from(BANNER_HEADER);
    let _ = write!(text, "### Definition for: {}", entry.word);
    if let Some(phonetic) = entry.phonetic.as_deref().filter(|p| !p.is_empty()) {
        let _ = write!(text, " {}", phonetic);
    }
    text.push_str("\n\n");

    for meaning in entry.meanings.iter().take(MAX_MEANINGS) {
        let _ = writeln!(text, "[{}]:", meaning.part_of_speech);

        for (index, definition) in meaning.definitions.iter().take(MAX_DEFINITIONS).enumerate() {
            let _ = writeln!(text, "{}. {}", index + 1, definition.definition);
            if let Some(example) = definition.example.as_deref().filter(|e| !e.is_empty()) {
                let _ = writeln!(text, "   Example: \"{}\"", example);
            }
        }

        if !meaning.synonyms.is_empty() {
            let synonyms: Vec<&str> = meaning
                .synonyms
                .iter()
                .take(MAX_SYNONYMS)
                .map(String::as_str)
                .collect();
            let _ = writeln!(text, "Synonyms: {}", synonyms.join(", "));
        }

        text.push('\n');
    }

    if let Some(origin) = entry.origin.as_deref().filter(|o| !o.is_empty()) {
        let _ = write!(text, "Origin: {}\n\n", origin);
    }

    text.push_str(DICTIONARY_FOOTER);
    text
}

#[async_trait]
impl DefinitionProvider for DictionaryProvider {
    async fn lookup(&self, word: &str) -> ProviderOutcome {
        let word = word.trim().to_lowercase();
        match self.fetch(&word).await {
            Ok(entry) => ProviderOutcome::Success(GenerationResult {
                generated_text: format_entry(&entry),
                model_info: ModelInfo::new(STUDIO_MODEL_NAME, "Dictionary Lookup", self.name())
                    .with_parameter("word", word),
            }),
            Err(e) => ProviderOutcome::Unavailable(e.to_string()),
        }
    }

    fn name(&self) -> &'static str {
        "dictionary"
    }
}

/// One entry of the dictionary API response
#[derive(Debug, Clone, Deserialize)]
pub struct DictionaryEntry {
    pub word: String,
    #[serde(default)]
    pub phonetic: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub meanings: Vec<Meaning>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Meaning {
    #[serde(rename = "partOfSpeech", default)]
    pub part_of_speech: String,
    #[serde(default)]
    pub definitions: Vec<Definition>,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Definition {
    pub definition: String,
    #[serde(default)]
    pub example: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DictionaryEntry {
        serde_json::from_str(
            r#"{
                "word": "dog",
                "phonetic": "/dɒɡ/",
                "origin": "Old English docga",
                "meanings": [
                    {
                        "partOfSpeech": "noun",
                        "definitions": [
                            {"definition": "A mammal.", "example": "The dog barked."},
                            {"definition": "A worthless person."},
                            {"definition": "A third sense that is dropped."}
                        ],
                        "synonyms": ["canine", "hound", "pooch", "mutt", "cur", "tyke"]
                    },
                    {"partOfSpeech": "verb", "definitions": [{"definition": "To follow."}]},
                    {"partOfSpeech": "adjective", "definitions": [{"definition": "Bad."}]},
                    {"partOfSpeech": "interjection", "definitions": [{"definition": "Dropped."}]}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_format_entry() {
        let text = format_entry(&sample());
        assert!(text.starts_with(BANNER_HEADER));
        assert!(text.contains("### Definition for: dog /dɒɡ/\n\n"));
        assert!(text.contains(
            "[noun]:\n1. A mammal.\n   Example: \"The dog barked.\"\n2. A worthless person.\n"
        ));
        assert!(!text.contains("A third sense"));
        assert!(text.contains("Synonyms: canine, hound, pooch, mutt, cur\n"));
        assert!(!text.contains("tyke"));
        assert!(text.contains("[adjective]:"));
        assert!(!text.contains("[interjection]"));
        assert!(text.contains("Origin: Old English docga\n\n"));
        assert!(text.ends_with(DICTIONARY_FOOTER));
    }

    #[test]
    fn test_entry_url_encodes_word() {
        let provider = DictionaryProvider::new(Client::new(), None);
        let url = provider.entry_url("naïve café").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.dictionaryapi.dev/api/v2/entries/en/na%C3%AFve%20caf%C3%A9"
        );
    }

    #[test]
    fn test_entry_url_with_trailing_slash() {
        let base = Some("http://127.0.0.1:9/entries/".to_string());
        let provider = DictionaryProvider::new(Client::new(), base);
        assert_eq!(
            provider.entry_url("dog").unwrap().as_str(),
            "http://127.0.0.1:9/entries/dog"
        );
    }
}
