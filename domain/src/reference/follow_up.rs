//! Follow-up classification.

use crate::core::string::{contains_word, starts_with_phrase};
use serde::{Deserialize, Serialize};

/// Openers that mark a turn as continuing the previous one.
pub const CONNECTIVE_PHRASES: &[&str] = &[
    "what about",
    "how about",
    "and",
    "also",
    "what else",
    "tell me more",
    "explain",
    "show me",
    "give me",
    "can you",
    "what if",
    "but",
    "however",
];

/// Pronouns that point back at something already said.
pub const FOLLOW_UP_PRONOUNS: &[&str] = &[
    "it", "its", "that", "this", "those", "these", "he", "his", "him", "she", "her", "they",
    "them",
];

/// Short questions below this many words read as follow-ups.
const SHORT_QUESTION_WORDS: usize = 4;

/// Which rule classified a turn as a follow-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpSignal {
    /// Starts with a connective phrase ("what about", "and", ...)
    Connective,
    /// Contains a back-referencing pronoun
    Pronoun,
    /// A question of fewer than four words
    ShortQuestion,
    /// Mentions the subject under discussion
    SubjectMention,
}

impl FollowUpSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            FollowUpSignal::Connective => "connective",
            FollowUpSignal::Pronoun => "pronoun",
            FollowUpSignal::ShortQuestion => "short_question",
            FollowUpSignal::SubjectMention => "subject_mention",
        }
    }
}

/// First follow-up rule `text` satisfies, checked in rule order.
pub fn detect_follow_up(text: &str, current_subject: Option<&str>) -> Option<FollowUpSignal> {
    let lower = text.trim().to_lowercase();

    if CONNECTIVE_PHRASES
        .iter()
        .any(|phrase| starts_with_phrase(&lower, phrase))
    {
        return Some(FollowUpSignal::Connective);
    }

    if FOLLOW_UP_PRONOUNS
        .iter()
        .any(|pronoun| contains_word(&lower, pronoun))
    {
        return Some(FollowUpSignal::Pronoun);
    }

    if text.contains('?') && text.split_whitespace().count() < SHORT_QUESTION_WORDS {
        return Some(FollowUpSignal::ShortQuestion);
    }

    match current_subject {
        Some(subject) if !subject.is_empty() && lower.contains(&subject.to_lowercase()) => {
            Some(FollowUpSignal::SubjectMention)
        }
        _ => None,
    }
}
