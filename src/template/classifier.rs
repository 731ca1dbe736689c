//! Prompt classification and topic extraction

use super::library::{DEFAULT_CHARACTER, FALLBACK_TOPIC};
use super::RandomSource;
use crate::types::PromptCategory;

const QUESTION_MARKERS: &[&str] = &["?", "how", "what", "why", "when", "where"];
const STORY_MARKERS: &[&str] = &["tell", "story", "once upon", "adventure"];
const EXPLANATION_MARKERS: &[&str] = &["explain", "describe", "define", "detail"];

/// Offset from the start of "about" to the start of the topic slice
const ABOUT_OFFSET: usize = 6;
/// Offset from the start of "about" to the end of the topic slice
const ABOUT_END: usize = 20;

/// Everything the synthesizer needs to know about a prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptAnalysis {
    pub category: PromptCategory,
    pub topic: String,
    pub character: String,
    pub word: String,
}

/// True for a single whitespace-delimited token without a question mark
pub fn is_single_word(prompt: &str) -> bool {
    prompt.split_whitespace().count() == 1 && !prompt.contains('?')
}

/// Category of a prompt. Deterministic.
pub fn categorize(prompt: &str) -> PromptCategory {
    if is_single_word(prompt) {
        return PromptCategory::WordDefinition;
    }

    let lower = prompt.to_lowercase();
    let has_any = |markers: &[&str]| markers.iter().any(|m| lower.contains(m));

    if has_any(QUESTION_MARKERS) {
        PromptCategory::Question
    } else if has_any(STORY_MARKERS) {
        PromptCategory::Story
    } else if has_any(EXPLANATION_MARKERS) {
        PromptCategory::Explanation
    } else {
        PromptCategory::General
    }
}

/// Classify a prompt and pull out the values used to fill a pattern
pub fn classify(prompt: &str, random: &mut dyn RandomSource) -> PromptAnalysis {
    PromptAnalysis {
        category: categorize(prompt),
        topic: extract_topic(prompt, random),
        character: DEFAULT_CHARACTER.to_string(),
        word: prompt.trim().to_lowercase(),
    }
}

/// Topic for a prompt.
///
/// A prompt containing "about" yields the 14 characters starting six after
/// it, which may cut words in half. Otherwise a random word longer than three
/// characters is chosen.
pub fn extract_topic(prompt: &str, random: &mut dyn RandomSource) -> String {
    if let Some(topic) = about_slice(prompt) {
        return topic;
    }

    let words: Vec<&str> = prompt
        .split(' ')
        .filter(|w| w.chars().count() > 3)
        .collect();

    if words.is_empty() {
        FALLBACK_TOPIC.to_string()
    } else {
        words[random.next_index(words.len())].to_string()
    }
}

fn about_slice(prompt: &str) -> Option<String> {
    // ASCII lowercasing keeps char positions aligned with the original prompt
    let chars: Vec<char> = prompt.chars().collect();
    let lower: Vec<char> = chars.iter().map(|c| c.to_ascii_lowercase()).collect();
    let needle: Vec<char> = "about".chars().collect();

    let index = lower.windows(needle.len()).position(|w| w == needle.as_slice())?;
    if index + ABOUT_OFFSET >= chars.len() {
        return None;
    }

    let end = (index + ABOUT_END).min(chars.len());
    Some(chars[index + ABOUT_OFFSET..end].iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::ScriptedRandom;

    #[test]
    fn test_single_word_is_definition() {
        assert_eq!(categorize("dog"), PromptCategory::WordDefinition);
        assert_eq!(categorize("  Physics  "), PromptCategory::WordDefinition);
        assert_eq!(categorize("dog?"), PromptCategory::Question);
    }

    #[test]
    fn test_category_priority() {
        assert_eq!(categorize("How do plants grow"), PromptCategory::Question);
        assert_eq!(categorize("Tell me a story about dragons"), PromptCategory::Story);
        assert_eq!(categorize("Explain quantum computing"), PromptCategory::Explanation);
        assert_eq!(categorize("Photosynthesis in deserts"), PromptCategory::General);
        // Question markers win over story markers
        assert_eq!(categorize("What story should I tell"), PromptCategory::Question);
    }

    #[test]
    fn test_markers_match_as_substrings() {
        // "somewhat" contains "what"
        assert_eq!(categorize("a somewhat odd request"), PromptCategory::Question);
    }

    #[test]
    fn test_about_slice() {
        let mut random = ScriptedRandom::new(vec![0.0]);
        let analysis = classify("Tell me a story about dragons", &mut random);
        assert_eq!(analysis.category, PromptCategory::Story);
        assert_eq!(analysis.topic, "dragons");
        assert_eq!(analysis.character, "The protagonist");
    }

    #[test]
    fn test_about_slice_cuts_mid_word() {
        let mut random = ScriptedRandom::new(vec![0.0]);
        let topic = extract_topic("Write about the extraordinary history of Rome", &mut random);
        assert_eq!(topic, "the extraordin");
        assert_eq!(topic.chars().count(), 14);
    }

    #[test]
    fn test_about_at_end_is_ignored() {
        let mut random = ScriptedRandom::new(vec![0.0]);
        assert_eq!(extract_topic("what about", &mut random), "what");
    }

    #[test]
    fn test_random_word_pick() {
        let mut random = ScriptedRandom::new(vec![0.99]);
        assert_eq!(extract_topic("why is the ocean salty", &mut random), "salty");
        let mut random = ScriptedRandom::new(vec![0.0]);
        assert_eq!(extract_topic("why is the ocean salty", &mut random), "ocean");
    }

    #[test]
    fn test_fallback_topic() {
        let mut random = ScriptedRandom::new(vec![0.5]);
        assert_eq!(extract_topic("is it so", &mut random), "this topic");
    }

    #[test]
    fn test_definition_word_is_lowercased() {
        let mut random = ScriptedRandom::new(vec![0.0]);
        let analysis = classify("  Astronomy ", &mut random);
        assert_eq!(analysis.category, PromptCategory::WordDefinition);
        assert_eq!(analysis.word, "astronomy");
    }

    #[test]
    fn test_category_is_stable_across_calls() {
        let prompts = ["dog", "Why?", "Tell me about cats", "Describe it", "hello there"];
        for prompt in prompts {
            let first = classify(prompt, &mut ScriptedRandom::new(vec![0.1])).category;
            for seed in [0.3, 0.6, 0.9] {
                let again = classify(prompt, &mut ScriptedRandom::new(vec![seed])).category;
                assert_eq!(first, again);
            }
        }
    }
}
