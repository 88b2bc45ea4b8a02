//! Keyword-count sentiment labelling.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentiment label of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub const POSITIVE_WORDS: &[&str] = &[
    "great",
    "good",
    "excellent",
    "awesome",
    "love",
    "thanks",
    "perfect",
    "nice",
    "happy",
    "wonderful",
    "fantastic",
    "amazing",
];

pub const NEGATIVE_WORDS: &[&str] = &[
    "bad",
    "wrong",
    "error",
    "problem",
    "issue",
    "hate",
    "terrible",
    "awful",
    "frustrated",
    "confused",
    "stuck",
    "help",
];

/// Label `text` by comparing how many keywords of each list it contains.
///
/// Each keyword counts once regardless of how often it repeats.
pub fn detect_sentiment(text: &str) -> Sentiment {
    let lower = text.to_lowercase();
    let count = |words: &[&str]| words.iter().filter(|w| lower.contains(*w)).count();

    let positive = count(POSITIVE_WORDS);
    let negative = count(NEGATIVE_WORDS);

    match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}
