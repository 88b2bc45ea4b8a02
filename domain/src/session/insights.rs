//! Session insights

use crate::reference::SubjectState;
use crate::style::{ConversationStyle, UserStyle};
use serde::{Deserialize, Serialize};

/// Depth above which the user is nudged towards a related subject
const DEEP_DISCUSSION_DEPTH: u32 = 3;

/// Read-only view of where a conversation stands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInsights {
    pub current_subject: Option<String>,
    pub topic_depth: u32,
    pub style: ConversationStyle,
    pub suggestions: Vec<String>,
}

impl SessionInsights {
    pub fn from_state(subject: &SubjectState, style: &UserStyle) -> Self {
        let current_subject = subject.current_subject().map(str::to_string);
        let topic_depth = subject.current_depth();

        let mut suggestions = Vec::new();
        if let Some(current) = &current_subject
            && topic_depth > DEEP_DISCUSSION_DEPTH
        {
            suggestions.push(format!(
                "We've been discussing {} - ready to explore something related?",
                current
            ));
        }
        if let Some(last) = subject.subject_history().last() {
            suggestions.push(format!("Want to return to {}?", last));
        }

        Self {
            current_subject,
            topic_depth,
            style: style.conversation_style(),
            suggestions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryPolicy;

    #[test]
    fn test_fresh_insights() {
        let insights = SessionInsights::from_state(&SubjectState::new(), &UserStyle::default());
        assert_eq!(insights.current_subject, None);
        assert_eq!(insights.topic_depth, 0);
        assert_eq!(insights.style, ConversationStyle::Exploratory);
        assert!(insights.suggestions.is_empty());
    }

    #[test]
    fn test_deep_discussion_and_return_suggestions() {
        let policy = MemoryPolicy::default();
        let mut state = SubjectState::new();
        state.apply_subject(Some("Python".into()), &policy);
        state.apply_subject(Some("Rust".into()), &policy);
        for _ in 0..3 {
            state.apply_subject(None, &policy);
        }

        let insights = SessionInsights::from_state(&state, &UserStyle::default());
        assert_eq!(insights.topic_depth, 4);
        assert_eq!(
            insights.suggestions,
            vec![
                "We've been discussing Rust - ready to explore something related?".to_string(),
                "Want to return to Python?".to_string(),
            ]
        );
    }

    #[test]
    fn test_depth_three_is_not_deep_yet() {
        let policy = MemoryPolicy::default();
        let mut state = SubjectState::new();
        state.apply_subject(Some("Rust".into()), &policy);
        state.apply_subject(None, &policy);
        state.apply_subject(None, &policy);
        let insights = SessionInsights::from_state(&state, &UserStyle::default());
        assert_eq!(insights.topic_depth, 3);
        assert!(insights.suggestions.is_empty());
    }
}
