//! Question-type detection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Interrogative that opens a turn.
///
/// `None` marks a turn that does not start with one of the recognized
/// question words. Refer to it as `QuestionType::None` so it is never
/// confused with `Option::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    What,
    How,
    Why,
    When,
    Where,
    Who,
    #[default]
    None,
}

impl QuestionType {
    /// Recognized question words, in match priority order
    const WORDS: [(&'static str, QuestionType); 6] = [
        ("what", QuestionType::What),
        ("how", QuestionType::How),
        ("why", QuestionType::Why),
        ("when", QuestionType::When),
        ("where", QuestionType::Where),
        ("who", QuestionType::Who),
    ];

    /// Classify by the sentence-initial word.
    ///
    /// Only a whole leading word counts: "however" is not "how", while
    /// "What's" reads as "what".
    pub fn detect(text: &str) -> Self {
        let lower = text.to_lowercase();
        let start = lower.trim_start_matches(|c: char| !c.is_alphanumeric());
        let first: String = start.chars().take_while(|c| c.is_alphabetic()).collect();

        Self::WORDS
            .iter()
            .find(|(word, _)| *word == first)
            .map(|(_, kind)| *kind)
            .unwrap_or(QuestionType::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::What => "what",
            QuestionType::How => "how",
            QuestionType::Why => "why",
            QuestionType::When => "when",
            QuestionType::Where => "where",
            QuestionType::Who => "who",
            QuestionType::None => "none",
        }
    }

    pub fn is_question(&self) -> bool {
        *self != QuestionType::None
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_each_word() {
        assert_eq!(QuestionType::detect("What is Rust?"), QuestionType::What);
        assert_eq!(QuestionType::detect("how do I start"), QuestionType::How);
        assert_eq!(QuestionType::detect("Why is it slow?"), QuestionType::Why);
        assert_eq!(QuestionType::detect("When is the release?"), QuestionType::When);
        assert_eq!(QuestionType::detect("Where can I read more"), QuestionType::Where);
        assert_eq!(QuestionType::detect("Who are they?"), QuestionType::Who);
    }

    #[test]
    fn test_contraction_and_leading_space() {
        assert_eq!(QuestionType::detect("  What's new?"), QuestionType::What);
        assert_eq!(QuestionType::detect("\"how\" exactly?"), QuestionType::How);
    }

    #[test]
    fn test_whole_word_only() {
        assert_eq!(QuestionType::detect("However, it works"), QuestionType::None);
        assert_eq!(QuestionType::detect("Whatever"), QuestionType::None);
        assert_eq!(QuestionType::detect("Whose book is this"), QuestionType::None);
    }

    #[test]
    fn test_not_sentence_initial() {
        assert_eq!(QuestionType::detect("Tell me what it is"), QuestionType::None);
        assert_eq!(QuestionType::detect(""), QuestionType::None);
        assert!(!QuestionType::detect("ok").is_question());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&QuestionType::None).unwrap(), "\"none\"");
        assert_eq!(QuestionType::Where.to_string(), "where");
    }
}
