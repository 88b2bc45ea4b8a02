//! Session aggregate

use super::insights::SessionInsights;
use crate::config::MemoryPolicy;
use crate::conversation::{ConversationLog, ConversationStats, Role, Turn};
use crate::core::error::DomainError;
use crate::digest::{ContextDigest, DigestSources};
use crate::reference::{Resolution, SubjectState, detect_follow_up, resolve};
use crate::style::UserStyle;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prefix of every persisted session key
pub const STORAGE_KEY_PREFIX: &str = "parley/session/";

/// All state kept for one conversation (Aggregate Root)
///
/// Owns the conversation log, the subject/entity state and the learned
/// user style. Every mutation of a session goes through this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: String,
    log: ConversationLog,
    subject: SubjectState,
    style: UserStyle,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            log: ConversationLog::new(),
            subject: SubjectState::new(),
            style: UserStyle::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Key this session is persisted under.
    pub fn storage_key(&self) -> String {
        storage_key(&self.id)
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn subject(&self) -> &SubjectState {
        &self.subject
    }

    pub fn style(&self) -> &UserStyle {
        &self.style
    }

    /// Append a turn and track the entities it mentions.
    pub fn record(
        &mut self,
        role: Role,
        text: &str,
        now: DateTime<Utc>,
        policy: &MemoryPolicy,
    ) -> Turn {
        let turn = self.log.record(role, text, now, policy);
        self.subject
            .note_mentions(text, turn.entities(), now, policy);
        turn
    }

    pub fn resolve(&mut self, text: &str, policy: &MemoryPolicy) -> Resolution {
        resolve(&mut self.subject, text, policy)
    }

    /// Learn from a user turn.
    ///
    /// Whether it was a follow-up is taken from the latest resolution of
    /// the same text, or detected afresh otherwise.
    pub fn observe(&mut self, text: &str) {
        let is_follow_up = self.follow_up_of(text);
        self.style
            .observe(text, self.subject.subject_history(), is_follow_up);
    }

    pub fn is_follow_up(&self, text: &str) -> bool {
        self.follow_up_of(text)
    }

    fn follow_up_of(&self, text: &str) -> bool {
        if self.subject.last_question() == Some(text) {
            self.subject.last_follow_up()
        } else {
            detect_follow_up(text, self.subject.current_subject()).is_some()
        }
    }

    /// Compile the context digest for `text` without changing the session.
    pub fn compile(&self, text: &str, now: DateTime<Utc>, policy: &MemoryPolicy) -> ContextDigest {
        let resolved = if self.subject.last_question() == Some(text) {
            self.subject.last_resolved_text()
        } else {
            None
        };
        let sources = DigestSources {
            log: &self.log,
            subject: &self.subject,
            policy,
            now,
        };
        ContextDigest::compile(sources, text, self.follow_up_of(text), resolved)
    }

    /// Record the assistant's reply and pick up catalog entities from the
    /// whole exchange.
    pub fn update_from_response(
        &mut self,
        user_text: &str,
        assistant_text: &str,
        now: DateTime<Utc>,
        policy: &MemoryPolicy,
    ) -> Turn {
        let turn = self.record(Role::Assistant, assistant_text, now, policy);
        let exchange = format!("{} {}", user_text, assistant_text);
        self.subject.note_recognized(&exchange, now, policy);
        turn
    }

    pub fn insights(&self) -> SessionInsights {
        SessionInsights::from_state(&self.subject, &self.style)
    }

    pub fn window(&self, size: usize) -> Vec<Turn> {
        self.log.window(size)
    }

    pub fn stats(&self) -> ConversationStats {
        self.log.stats()
    }

    pub fn describe(&self) -> String {
        self.log.describe()
    }

    /// Forget the conversation.
    ///
    /// Both kinds empty the log. A hard clear also resets subject state and
    /// style; a soft one moves past the current subject but keeps entity
    /// knowledge, topic depth and style.
    pub fn clear(&mut self, hard: bool, policy: &MemoryPolicy) {
        self.log.clear();
        if hard {
            self.subject = SubjectState::new();
            self.style = UserStyle::default();
        } else {
            self.subject.soft_reset(policy);
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DomainError> {
        serde_json::to_vec(self).map_err(|e| DomainError::SnapshotEncode(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DomainError> {
        serde_json::from_slice(bytes).map_err(|e| DomainError::SnapshotDecode(e.to_string()))
    }
}

/// Key a session with `id` is persisted under.
pub fn storage_key(id: &str) -> String {
    format!("{}{}", STORAGE_KEY_PREFIX, id)
}
