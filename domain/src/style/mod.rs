//! Interaction-style learning.
//!
//! [`UserStyle`] keeps soft statistics about how a user converses. It only
//! ever changes through [`UserStyle::observe`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Subject-history entries considered for topic jumping
const JUMP_WINDOW: usize = 5;
/// Distinct subjects in the window above which the user jumps topics
const JUMP_THRESHOLD: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    Brief,
    #[default]
    Medium,
    Deep,
}

impl DetailLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetailLevel::Brief => "brief",
            DetailLevel::Medium => "medium",
            DetailLevel::Deep => "deep",
        }
    }
}

impl fmt::Display for DetailLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Overall conversation style derived from [`UserStyle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConversationStyle {
    #[default]
    Exploratory,
    DeepDive,
    Broad,
    Practical,
}

impl ConversationStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationStyle::Exploratory => "exploratory",
            ConversationStyle::DeepDive => "deep-dive",
            ConversationStyle::Broad => "broad",
            ConversationStyle::Practical => "practical",
        }
    }
}

impl fmt::Display for ConversationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserStyle {
    pub asks_follow_ups: bool,
    pub detail_level: DetailLevel,
    pub jumps_topics: bool,
    pub likes_examples: bool,
}

impl UserStyle {
    /// Update from one user turn.
    ///
    /// `likes_examples` and `asks_follow_ups` only ever flip to true.
    /// `jumps_topics` is recomputed from `subject_history` on every call.
    pub fn observe(&mut self, text: &str, subject_history: &[String], is_follow_up: bool) {
        let lower = text.to_lowercase();

        if lower.contains("example") || lower.contains("show me") {
            self.likes_examples = true;
        }

        if lower.contains("detail") || lower.contains("explain deeply") {
            self.detail_level = DetailLevel::Deep;
        } else if lower.contains("brief") || lower.contains("quick") {
            self.detail_level = DetailLevel::Brief;
        }

        let recent = &subject_history[subject_history.len().saturating_sub(JUMP_WINDOW)..];
        let distinct: HashSet<&String> = recent.iter().collect();
        self.jumps_topics = distinct.len() > JUMP_THRESHOLD;

        if is_follow_up {
            self.asks_follow_ups = true;
        }
    }

    /// Style label; later rules override earlier ones.
    pub fn conversation_style(&self) -> ConversationStyle {
        let mut style = ConversationStyle::Exploratory;
        if self.asks_follow_ups {
            style = ConversationStyle::DeepDive;
        }
        if self.jumps_topics {
            style = ConversationStyle::Broad;
        }
        if self.likes_examples {
            style = ConversationStyle::Practical;
        }
        style
    }
}
