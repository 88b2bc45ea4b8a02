//! Topic tagging from a fixed keyword table.

/// Topic tag -> trigger keywords, in declaration order.
///
/// A keyword matches as a case-insensitive substring, so short keywords
/// like `ai` or `eat` also fire inside longer words.
pub const TOPIC_TABLE: &[(&str, &[&str])] = &[
    (
        "programming",
        &[
            "code",
            "coding",
            "program",
            "developer",
            "software",
            "javascript",
            "python",
            "react",
        ],
    ),
    (
        "learning",
        &["learn", "study", "tutorial", "course", "teach", "education"],
    ),
    (
        "health",
        &[
            "health",
            "fitness",
            "exercise",
            "diet",
            "nutrition",
            "medical",
        ],
    ),
    (
        "finance",
        &["money", "finance", "invest", "stock", "crypto", "budget"],
    ),
    (
        "travel",
        &["travel", "trip", "vacation", "country", "city", "hotel"],
    ),
    (
        "food",
        &["food", "recipe", "cook", "meal", "restaurant", "eat"],
    ),
    (
        "technology",
        &[
            "tech",
            "ai",
            "machine learning",
            "computer",
            "device",
            "app",
        ],
    ),
    (
        "science",
        &["science", "research", "study", "experiment", "theory"],
    ),
    (
        "art",
        &["art", "design", "creative", "draw", "paint", "music"],
    ),
    (
        "business",
        &["business", "company", "startup", "entrepreneur", "market"],
    ),
];

/// Topic tags whose keywords occur in `text`, in table order.
pub fn extract_topics(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOPIC_TABLE
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
        .map(|(topic, _)| topic.to_string())
        .collect()
}
