//! Curated domain, meaning and origin phrases for well-known subject words

use std::collections::HashMap;
use std::sync::OnceLock;

/// Descriptions used to fill a word-definition pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordEntry {
    pub domain: &'static str,
    pub meaning: &'static str,
    pub origin: &'static str,
}

/// Returned for any word that is not in the table
pub const GENERIC_ENTRY: WordEntry = WordEntry {
    domain: "various fields and disciplines",
    meaning: "a concept with multiple interpretations depending on context",
    origin: "throughout human history in various forms",
};

const fn entry(domain: &'static str, meaning: &'static str, origin: &'static str) -> WordEntry {
    WordEntry {
        domain,
        meaning,
        origin,
    }
}

const ENTRIES: &[(&str, WordEntry)] = &[
    (
        "astronomy",
        entry(
            "the scientific study of celestial objects and phenomena",
            "the observation and theoretical explanation of celestial bodies and phenomena occurring outside Earth's atmosphere",
            "in ancient civilizations that observed celestial patterns",
        ),
    ),
    (
        "biology",
        entry(
            "the study of living organisms and their interactions",
            "the scientific study of life and living organisms, including their physical structure, chemical processes, molecular interactions, physiological mechanisms, development, and evolution",
            "with early natural philosophers studying living organisms",
        ),
    ),
    (
        "chemistry",
        entry(
            "the scientific discipline involved with elements and compounds",
            "the scientific discipline that deals with the composition, structure, properties, and reactions of matter, especially of atomic and molecular systems",
            "from ancient alchemy practices that sought to transform materials",
        ),
    ),
    (
        "physics",
        entry(
            "the natural science that studies matter, motion, and energy",
            "the study of matter, energy, and the interaction between them through space and time",
            "with early attempts to understand natural phenomena and mechanics",
        ),
    ),
    (
        "mathematics",
        entry(
            "the abstract science of number, quantity, and space",
            "the abstract science of number, quantity, and space, either as abstract concepts or as applied to other disciplines such as physics and engineering",
            "in ancient civilizations that developed counting and measurement systems",
        ),
    ),
    (
        "philosophy",
        entry(
            "the study of fundamental questions about existence, knowledge, values, reason, mind, and language",
            "the rational investigation of questions about existence, knowledge, ethics, beauty, and more",
            "in ancient Greece with thinkers like Socrates, Plato, and Aristotle",
        ),
    ),
    (
        "technology",
        entry(
            "the application of scientific knowledge for practical purposes",
            "the practical application of knowledge especially in a particular area, often involving machinery and equipment developed from scientific knowledge",
            "with early tool-making and the progressive development of more complex systems",
        ),
    ),
    (
        "art",
        entry(
            "creative expression through various media",
            "the expression or application of human creative skill and imagination, typically in a visual form such as painting or sculpture",
            "with prehistoric cave paintings and early human creative expression",
        ),
    ),
    (
        "music",
        entry(
            "the art of organizing sounds in time",
            "vocal or instrumental sounds combined in such a way as to produce beauty of form, harmony, and expression of emotion",
            "with primitive instruments and vocal patterns in early human societies",
        ),
    ),
    (
        "literature",
        entry(
            "written works, especially those considered of superior or lasting artistic merit",
            "written works, especially those considered of superior or lasting artistic merit",
            "with oral storytelling traditions before the development of writing",
        ),
    ),
    (
        "history",
        entry(
            "the study of past events",
            "the study of past events, particularly in human affairs",
            "with early record-keeping and the development of writing systems",
        ),
    ),
    (
        "psychology",
        entry(
            "the scientific study of the mind and behavior",
            "the scientific study of the human mind and its functions, especially those affecting behavior in a given context",
            "as a branch of philosophy before becoming a scientific discipline in the 19th century",
        ),
    ),
    (
        "sociology",
        entry(
            "the study of society, patterns of social relationships, and culture",
            "the study of the development, structure, and functioning of human society",
            "in the early 19th century as society became more complex during industrialization",
        ),
    ),
    (
        "economics",
        entry(
            "the social science that studies production, distribution, and consumption",
            "the branch of knowledge concerned with the production, consumption, and transfer of wealth",
            "with early philosophical discussions about trade, value, and resources",
        ),
    ),
    (
        "politics",
        entry(
            "activities associated with governance of a country or area",
            "the activities associated with the governance of a country or other area, especially the debate or conflict among individuals or parties having or hoping to achieve power",
            "in early civilizations that developed systems of governance",
        ),
    ),
    (
        "medicine",
        entry(
            "the science and practice of diagnosing, treating, and preventing disease",
            "the science or practice of the diagnosis, treatment, and prevention of disease",
            "with traditional healing practices that evolved into systematic study",
        ),
    ),
    (
        "engineering",
        entry(
            "the application of scientific principles to design and build systems",
            "the branch of science and technology concerned with the design, building, and use of engines, machines, and structures",
            "with early innovations in construction, tools, and machines",
        ),
    ),
    (
        "computer",
        entry(
            "electronic device for storing and processing data",
            "an electronic device for storing and processing data, typically in binary form, according to instructions given to it in a variable program",
            "with mechanical calculating devices that evolved into electronic systems",
        ),
    ),
    (
        "science",
        entry(
            "systematic study of the structure and behavior of the physical world",
            "the intellectual and practical activity encompassing the systematic study of the structure and behavior of the physical and natural world through observation and experiment",
            "with natural philosophy that gradually adopted empirical methods",
        ),
    ),
    (
        "education",
        entry(
            "the process of facilitating learning, or the acquisition of knowledge",
            "the process of receiving or giving systematic instruction, especially at a school or university",
            "in informal knowledge transfer systems that became formalized over time",
        ),
    ),
    (
        "environment",
        entry(
            "the surroundings or conditions in which a person, animal, or plant lives",
            "the surroundings or conditions in which a person, animal, or plant lives or operates",
            "as humans recognized their impact on and dependence on natural surroundings",
        ),
    ),
    (
        "language",
        entry(
            "method of human communication using words in a structured way",
            "the method of human communication, either spoken or written, consisting of the use of words in a structured and conventional way",
            "with early human communication systems that became increasingly complex",
        ),
    ),
    (
        "business",
        entry(
            "commercial activity involving the exchange of goods and services",
            "a commercial activity or organization involved in the exchange of goods and services",
            "with early trade and barter systems that evolved into complex commerce",
        ),
    ),
    (
        "finance",
        entry(
            "management of money and other assets",
            "the management of large amounts of money, especially by governments or large companies",
            "with early banking systems and the development of currency",
        ),
    ),
    (
        "law",
        entry(
            "system of rules recognized by a community as regulating actions",
            "the system of rules which a particular country or community recognizes as regulating the actions of its members",
            "with early social codes that evolved into formal legal systems",
        ),
    ),
    (
        "religion",
        entry(
            "belief in and worship of a superhuman controlling power",
            "the belief in and worship of a superhuman controlling power, especially a personal God or gods",
            "with early spiritual practices and belief systems in human societies",
        ),
    ),
    (
        "culture",
        entry(
            "arts and other manifestations of human intellectual achievement",
            "the arts and other manifestations of human intellectual achievement regarded collectively",
            "as groups of humans developed shared practices, beliefs, and expressions",
        ),
    ),
    (
        "sports",
        entry(
            "activities involving physical exertion and skill",
            "an activity involving physical exertion and skill in which an individual or team competes against another or others for entertainment",
            "with ancient competitions and games that had ceremonial and practical purposes",
        ),
    ),
];

fn table() -> &'static HashMap<&'static str, WordEntry> {
    static TABLE: OnceLock<HashMap<&'static str, WordEntry>> = OnceLock::new();
    TABLE.get_or_init(|| ENTRIES.iter().copied().collect())
}

/// Look up a word, case-insensitively
pub fn lookup(word: &str) -> Option<WordEntry> {
    table().get(word.trim().to_lowercase().as_str()).copied()
}

/// Look up a word, falling back to the generic phrases
pub fn lookup_or_generic(word: &str) -> WordEntry {
    lookup(word).unwrap_or(GENERIC_ENTRY)
}

/// Number of curated words
pub fn len() -> usize {
    ENTRIES.len()
}
