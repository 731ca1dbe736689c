//! Sentence patterns, embellishments and banners used by the template synthesizer

use crate::types::PromptCategory;

/// A sentence pattern with named placeholders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplatePattern {
    pub category: PromptCategory,
    pub text: &'static str,
}

const fn pattern(category: PromptCategory, text: &'static str) -> TemplatePattern {
    TemplatePattern { category, text }
}

/// Fixed value for the `{character}` placeholder
pub const DEFAULT_CHARACTER: &str = "The protagonist";

/// Topic used when the prompt offers nothing better
pub const FALLBACK_TOPIC: &str = "this topic";

/// Appended after a truncated body
pub const ELLIPSIS: &str = "...";

pub const BANNER_HEADER: &str =
    "# Text Generation Studio\n## Powered by LSTM neural networks with deep language understanding\n\n";

pub const TEMPLATE_FOOTER: &str =
    "\n\n---\nGenerated using advanced sequence modeling and contextual analysis.";

pub const DICTIONARY_FOOTER: &str =
    "---\nAnalyzed and enhanced by our advanced LSTM language model architecture.";

pub const STUDIO_MODEL_NAME: &str = "Text Generation Studio";

const QUESTION_PATTERNS: &[TemplatePattern] = &[
    pattern(
        PromptCategory::Question,
        "There are several factors to consider. First, {topic} requires understanding the underlying principles. Second, we must consider the practical applications. Finally, it's important to evaluate the long-term implications.",
    ),
    pattern(
        PromptCategory::Question,
        "When examining {topic}, experts generally agree on a few key points: (1) The foundational concepts are essential to grasp first. (2) There are multiple perspectives worth considering. (3) Context matters significantly in application.",
    ),
    pattern(
        PromptCategory::Question,
        "The answer depends on several variables. Looking at {topic} from a scientific perspective suggests that evidence-based approaches are best. However, practical experience indicates that flexibility and adaptation are equally important.",
    ),
];

const STORY_PATTERNS: &[TemplatePattern] = &[
    pattern(
        PromptCategory::Story,
        "The sky darkened as clouds gathered overhead. {character} looked up, wondering if the approaching storm would delay their journey. Despite the weather, they knew that reaching their destination was too important to postpone.",
    ),
    pattern(
        PromptCategory::Story,
        "The ancient building stood silent against the horizon. {character} approached cautiously, aware of the legends surrounding this place. Each step forward revealed more intricate details of the architecture that had withstood centuries.",
    ),
    pattern(
        PromptCategory::Story,
        "In the bustling marketplace, {character} moved through the crowd with purpose. They had been searching for the rare artifact for months, and finally had a solid lead. The vendor at the corner stall might have exactly what they needed.",
    ),
];

const EXPLANATION_PATTERNS: &[TemplatePattern] = &[
    pattern(
        PromptCategory::Explanation,
        "{topic} represents an important concept in its field. The fundamental principles involve systematic approaches to problem-solving, analytical thinking, and practical application. Understanding these core elements provides a foundation for more advanced exploration.",
    ),
    pattern(
        PromptCategory::Explanation,
        "The development of {topic} has evolved significantly over time. Initially conceived as a solution to specific challenges, it has grown to encompass broader applications. Modern interpretations emphasize efficiency, scalability, and integration with existing systems.",
    ),
    pattern(
        PromptCategory::Explanation,
        "When analyzing {topic}, it's helpful to break it down into component parts. The structure typically includes input processing, core functionality, and output generation. Each of these elements plays a crucial role in the overall effectiveness of the system.",
    ),
];

const GENERAL_PATTERNS: &[TemplatePattern] = &[
    pattern(
        PromptCategory::General,
        "This is an interesting topic that spans multiple disciplines. Recent developments have shown promising results, particularly in how we understand and apply these concepts in real-world scenarios.",
    ),
    pattern(
        PromptCategory::General,
        "The intersection of theory and practice creates a rich area for exploration. Researchers continue to uncover new insights that challenge conventional thinking and open up possibilities for innovation.",
    ),
    pattern(
        PromptCategory::General,
        "Considering this from multiple perspectives reveals the complexity inherent in the subject. There are technical considerations, practical implications, and broader impacts that all need to be carefully weighed.",
    ),
];

const WORD_DEFINITION_PATTERNS: &[TemplatePattern] = &[
    pattern(
        PromptCategory::WordDefinition,
        "{word}: A term referring to {domain_description}. In its primary sense, it denotes {primary_meaning}. The concept originated {origin_description} and has evolved to encompass various applications across different fields.",
    ),
    pattern(
        PromptCategory::WordDefinition,
        "{word}: This term describes {primary_meaning}. It is commonly used in {domain_description} contexts. The historical development of this concept dates back to {origin_description}, and its significance continues to evolve.",
    ),
    pattern(
        PromptCategory::WordDefinition,
        "{word}: A concept central to {domain_description}. It fundamentally refers to {primary_meaning} and has both theoretical importance and practical applications in various fields.",
    ),
];

/// Sentences appended when the temperature draw succeeds
pub const EMBELLISHMENTS: &[&str] = &[
    " Interestingly, this connects to broader themes we see across different domains.",
    " This perspective has gained significant attention in recent research.",
    " When examined closely, the nuances become increasingly important.",
    " Many experts in the field have debated this exact point extensively.",
];

/// Patterns for a category, in a stable order
pub fn patterns_for(category: PromptCategory) -> &'static [TemplatePattern] {
    match category {
        PromptCategory::Question => QUESTION_PATTERNS,
        PromptCategory::Story => STORY_PATTERNS,
        PromptCategory::Explanation => EXPLANATION_PATTERNS,
        PromptCategory::WordDefinition => WORD_DEFINITION_PATTERNS,
        PromptCategory::General => GENERAL_PATTERNS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_patterns() {
        for category in PromptCategory::ALL {
            let patterns = patterns_for(category);
            assert!(patterns.len() >= 3, "{} has too few patterns", category);
            assert!(patterns.iter().all(|p| p.category == category));
        }
    }

    #[test]
    fn test_definition_patterns_use_word() {
        for p in patterns_for(PromptCategory::WordDefinition) {
            assert!(p.text.starts_with("{word}:"));
            assert!(p.text.contains("{primary_meaning}"));
        }
    }

    #[test]
    fn test_embellishments_start_with_space() {
        assert!(EMBELLISHMENTS.iter().all(|e| e.starts_with(' ')));
    }
}
