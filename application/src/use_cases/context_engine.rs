//! Context engine use case.
//!
//! [`ContextEngine`] is the explicit handle every caller holds. It exposes
//! the per-session operations (record, resolve, observe, compile, respond,
//! insights, clear) and routes each one through the [`SessionRegistry`], so
//! work on one session is serialized while sessions proceed in parallel.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger, REFERENCE_RESOLVED,
    SESSION_CLEARED, SUBJECT_CHANGED, TURN_RECORDED,
};
use crate::ports::session_persistence::{NoPersistence, SessionPersistencePort};
use crate::registry::SessionRegistry;
use chrono::{DateTime, Utc};
use parley_domain::{
    ContextDigest, ConversationStats, MemoryPolicy, Resolution, Role, SessionInsights, Turn,
};
use std::sync::Arc;
use tracing::{debug, info};

pub struct ContextEngine {
    pub(super) registry: SessionRegistry,
    pub(super) policy: MemoryPolicy,
    pub(super) conversation_logger: Arc<dyn ConversationLogger>,
}

impl ContextEngine {
    pub fn new(persistence: Arc<dyn SessionPersistencePort>, policy: MemoryPolicy) -> Self {
        Self {
            registry: SessionRegistry::new(persistence),
            policy,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Engine that keeps sessions in memory only.
    pub fn in_memory(policy: MemoryPolicy) -> Self {
        Self::new(Arc::new(NoPersistence), policy)
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn policy(&self) -> &MemoryPolicy {
        &self.policy
    }

    /// Sessions touched since the engine started.
    pub fn session_count(&self) -> usize {
        self.registry.len()
    }

    /// Wait until every session's latest state is saved.
    pub async fn flush(&self) {
        let written = self.registry.flush().await;
        if written > 0 {
            debug!(sessions = written, "Flushed pending session saves");
        }
    }

    pub async fn record_turn(
        &self,
        session_id: &str,
        role: Role,
        text: &str,
        now: DateTime<Utc>,
    ) -> Turn {
        let policy = &self.policy;
        let turn = self
            .registry
            .update(session_id, |session| session.record(role, text, now, policy))
            .await;
        self.log_turn(session_id, &turn);
        turn
    }

    /// Resolve references in `text`; `now` stamps the emitted events.
    pub async fn resolve(&self, session_id: &str, text: &str, now: DateTime<Utc>) -> Resolution {
        let policy = &self.policy;
        let resolution = self
            .registry
            .update(session_id, |session| session.resolve(text, policy))
            .await;
        self.log_resolution(session_id, &resolution, now);
        resolution
    }

    /// Update the learned interaction style from a user turn.
    pub async fn observe(&self, session_id: &str, text: &str) {
        self.registry
            .update(session_id, |session| session.observe(text))
            .await;
    }

    /// Compile a digest for `new_text`. Does not change the session.
    pub async fn compile(
        &self,
        session_id: &str,
        new_text: &str,
        now: DateTime<Utc>,
    ) -> ContextDigest {
        let policy = &self.policy;
        self.registry
            .read(session_id, |session| session.compile(new_text, now, policy))
            .await
    }

    /// Feed the assistant's reply back so the entities it introduces are
    /// tracked.
    pub async fn update_from_response(
        &self,
        session_id: &str,
        user_text: &str,
        assistant_text: &str,
        now: DateTime<Utc>,
    ) -> Turn {
        let policy = &self.policy;
        let turn = self
            .registry
            .update(session_id, |session| {
                session.update_from_response(user_text, assistant_text, now, policy)
            })
            .await;
        self.log_turn(session_id, &turn);
        turn
    }

    pub async fn insights(&self, session_id: &str) -> SessionInsights {
        self.registry
            .read(session_id, |session| session.insights())
            .await
    }

    /// Clear a session. See [`parley_domain::Session::clear`].
    pub async fn clear(&self, session_id: &str, hard: bool) {
        let policy = &self.policy;
        self.registry
            .update(session_id, |session| session.clear(hard, policy))
            .await;
        info!(session_id, hard, "Session cleared");
        self.conversation_logger.log(ConversationEvent::new(
            SESSION_CLEARED,
            serde_json::json!({
                "session_id": session_id,
                "hard": hard,
            }),
        ));
    }

    /// Last `size` turns, newest last.
    pub async fn window(&self, session_id: &str, size: usize) -> Vec<Turn> {
        self.registry
            .read(session_id, |session| session.window(size))
            .await
    }

    pub async fn stats(&self, session_id: &str) -> ConversationStats {
        self.registry
            .read(session_id, |session| session.stats())
            .await
    }

    /// One-line overview of the conversation.
    pub async fn describe(&self, session_id: &str) -> String {
        self.registry
            .read(session_id, |session| session.describe())
            .await
    }

    pub(super) fn log_turn(&self, session_id: &str, turn: &Turn) {
        debug!(
            session_id,
            turn_id = %turn.id(),
            role = %turn.role(),
            "Turn recorded"
        );
        self.conversation_logger.log(ConversationEvent::new(
            TURN_RECORDED,
            serde_json::json!({
                "session_id": session_id,
                "turn_id": turn.id().as_str(),
                "role": turn.role(),
                "topics": turn.topics(),
                "entities": turn.entities(),
                "sentiment": turn.sentiment(),
                "bytes": turn.text().len(),
            }),
        ));
    }

    pub(super) fn log_resolution(
        &self,
        session_id: &str,
        resolution: &Resolution,
        now: DateTime<Utc>,
    ) {
        debug!(
            session_id,
            follow_up = resolution.is_follow_up,
            subject = resolution.subject.as_deref().unwrap_or("-"),
            "Reference resolved"
        );
        self.conversation_logger.log(ConversationEvent::new(
            REFERENCE_RESOLVED,
            serde_json::json!({
                "session_id": session_id,
                "is_follow_up": resolution.is_follow_up,
                "follow_up_signal": resolution.follow_up_signal,
                "question_type": resolution.question_type,
                "annotated": resolution.is_annotated(),
                "subject": resolution.subject,
                "at": now.to_rfc3339(),
            }),
        ));

        if resolution.subject_changed
            && let Some(subject) = &resolution.subject
        {
            info!(session_id, subject = %subject, "Subject changed");
            self.conversation_logger.log(ConversationEvent::new(
                SUBJECT_CHANGED,
                serde_json::json!({
                    "session_id": session_id,
                    "subject": subject,
                    "at": now.to_rfc3339(),
                }),
            ));
        }
    }
}
