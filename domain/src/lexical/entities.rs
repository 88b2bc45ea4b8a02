//! Entity mention extraction.
//!
//! Two passes, de-duplicated in first-occurrence order:
//!
//! 1. Every whitespace-separated word reduced to its ASCII letters that
//!    starts with an uppercase letter and is longer than two letters.
//! 2. A fixed allow-list of well-known terms, matched case-sensitively as
//!    substrings anywhere in the text.
//!
//! Sentence-initial words ("What", "Tell") are picked up by the first pass.
//! That is a known limitation of the heuristic and is kept as-is.

use crate::core::string::ascii_letters;

/// Well-known terms recognized verbatim.
pub const WELL_KNOWN_ENTITIES: &[&str] = &[
    "Python",
    "JavaScript",
    "React",
    "Node",
    "TypeScript",
    "AWS",
    "Google",
    "Microsoft",
    "Apple",
    "Facebook",
    "API",
    "SQL",
    "HTML",
    "CSS",
    "Git",
    "Docker",
];

/// Minimum letter count (exclusive) for a capitalized word to count.
const MIN_CAPITALIZED_LEN: usize = 2;

/// Entity names mentioned in `text`, first occurrence first.
pub fn extract_entities(text: &str) -> Vec<String> {
    let mut entities: Vec<String> = Vec::new();
    let mut push_unique = |name: String| {
        if !entities.contains(&name) {
            entities.push(name);
        }
    };

    for word in text.split_whitespace() {
        let cleaned = ascii_letters(word);
        if cleaned.len() > MIN_CAPITALIZED_LEN && cleaned.starts_with(|c: char| c.is_ascii_uppercase())
        {
            push_unique(cleaned);
        }
    }

    for known in WELL_KNOWN_ENTITIES {
        if text.contains(known) {
            push_unique(known.to_string());
        }
    }

    entities
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalized_words() {
        assert_eq!(
            extract_entities("Tell me about Python"),
            vec!["Tell", "Python"]
        );
    }

    #[test]
    fn test_short_capitalized_words_skipped() {
        assert!(extract_entities("I am OK").is_empty());
    }

    #[test]
    fn test_punctuation_is_stripped() {
        assert_eq!(extract_entities("What's (Rust)?"), vec!["Whats", "Rust"]);
    }

    #[test]
    fn test_allow_list_matches_inside_words() {
        // "Git" inside "GitHub" is a substring hit on the allow-list
        assert_eq!(extract_entities("use GitHub"), vec!["GitHub", "Git"]);
        assert_eq!(extract_entities("an API call"), vec!["API"]);
    }

    #[test]
    fn test_deduplicated_in_first_occurrence_order() {
        assert_eq!(
            extract_entities("React or Python? React!"),
            vec!["React", "Python"]
        );
    }

    #[test]
    fn test_garbage_text() {
        assert!(extract_entities("").is_empty());
        assert!(extract_entities("!!! ??? 123").is_empty());
    }
}
