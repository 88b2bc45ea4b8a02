//! Context digest compilation.
//!
//! A [`ContextDigest`] is everything the generation side needs to know
//! about a session before answering a new message: recent turns, current
//! topics, live entities, the subject under discussion and a fixed-format
//! natural-language summary.

use crate::config::MemoryPolicy;
use crate::conversation::{ConversationLog, Turn};
use crate::core::string::truncate_chars;
use crate::reference::SubjectState;
use crate::reference::pronoun::hint_pronouns_in;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Turns quoted in the summary
pub const SUMMARY_TURNS: usize = 5;
/// Characters kept per quoted turn
pub const TURN_PREVIEW_CHARS: usize = 100;
/// Entities listed under "Active context"
pub const SUMMARY_ENTITIES: usize = 5;

/// Session state a digest is compiled from.
#[derive(Debug, Clone, Copy)]
pub struct DigestSources<'a> {
    pub log: &'a ConversationLog,
    pub subject: &'a SubjectState,
    pub policy: &'a MemoryPolicy,
    pub now: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextDigest {
    /// The new message the digest was compiled for
    pub input: String,
    /// Input with pronoun annotations, when it differs from `input`
    pub resolved_text: Option<String>,
    pub recent_turns: Vec<Turn>,
    pub current_topics: Vec<String>,
    pub active_entity_names: Vec<String>,
    pub subject: Option<String>,
    pub topic_depth: u32,
    pub is_follow_up: bool,
    pub summary: String,
}

impl ContextDigest {
    /// Compile a digest for `input`.
    ///
    /// Output depends only on the arguments, so identical state and input
    /// always produce a byte-identical summary.
    pub fn compile(
        sources: DigestSources<'_>,
        input: &str,
        is_follow_up: bool,
        resolved_text: Option<&str>,
    ) -> Self {
        let DigestSources {
            log,
            subject,
            policy,
            now,
        } = sources;

        Self {
            input: input.to_string(),
            resolved_text: resolved_text
                .filter(|resolved| *resolved != input)
                .map(str::to_string),
            recent_turns: log.window(policy.context_window()),
            current_topics: log.current_topics().to_vec(),
            active_entity_names: log.active_entity_names(now, policy.entity_ttl()),
            subject: subject.current_subject().map(str::to_string),
            topic_depth: subject.current_depth(),
            is_follow_up,
            summary: summarize(log, subject, input, is_follow_up),
        }
    }

    /// Framed block handed to the generation collaborator.
    pub fn to_prompt(&self) -> String {
        let mut prompt = String::from("=== CONVERSATION CONTEXT ===\n\n");

        if let Some(resolved) = &self.resolved_text {
            prompt.push_str(&format!("User means: {}\n\n", resolved));
        }
        if let Some(subject) = &self.subject {
            prompt.push_str(&format!("Currently discussing: {}\n", subject));
        }
        if self.is_follow_up {
            prompt.push_str("This is a FOLLOW-UP question. Build on previous response.\n");
        }
        if !self.summary.is_empty() {
            prompt.push('\n');
            prompt.push_str(&self.summary);
            prompt.push('\n');
        }

        prompt.push_str("\n=== END CONTEXT ===\n");
        prompt
    }
}

fn summarize(log: &ConversationLog, subject: &SubjectState, input: &str, is_follow_up: bool) -> String {
    let mut lines: Vec<String> = Vec::new();

    let recent = log.window(SUMMARY_TURNS);
    if !recent.is_empty() {
        lines.push("Recent conversation:".to_string());
        for turn in &recent {
            lines.push(format!(
                "{}: {}",
                turn.role().label(),
                truncate_chars(turn.text(), TURN_PREVIEW_CHARS)
            ));
        }
    }

    if !log.current_topics().is_empty() {
        lines.push(format!("Current topics: {}", log.current_topics().join(", ")));
    }

    if let Some(current) = subject.current_subject() {
        lines.push(format!(
            "Current subject: {} (depth {})",
            current,
            subject.current_depth()
        ));
    }

    let entities = subject.entities_by_recency();
    if !entities.is_empty() {
        lines.push("Active context:".to_string());
        for (name, info) in entities.into_iter().take(SUMMARY_ENTITIES) {
            lines.push(format!("- {} ({}): {}", name, info.kind, info.description));
        }
    }

    let pronouns = hint_pronouns_in(input);
    if let Some(current) = subject.current_subject()
        && !pronouns.is_empty()
    {
        lines.push(format!(
            "Pronouns \"{}\" likely refer to: {}",
            pronouns.join(", "),
            current
        ));
    }

    if is_follow_up && let Some(question) = subject.last_question() {
        lines.push(format!("This is a follow-up to: \"{}\"", question));
    }

    lines.join("\n")
}
