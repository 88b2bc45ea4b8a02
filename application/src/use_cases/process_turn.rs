//! Process Turn use case.
//!
//! Runs one whole user turn (record, resolve, observe, compile) under a
//! single session lock, so concurrent turns on the same session never
//! interleave.

use super::context_engine::ContextEngine;
use chrono::{DateTime, Utc};
use parley_domain::{ContextDigest, Resolution, Role, Turn};
use serde::Serialize;

/// Everything one user turn produced.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub turn: Turn,
    pub resolution: Resolution,
    pub digest: ContextDigest,
}

impl ContextEngine {
    /// Record `text` as a user turn and compile its digest.
    pub async fn process_turn(&self, session_id: &str, text: &str, now: DateTime<Utc>) -> TurnOutcome {
        let policy = &self.policy;
        let outcome = self
            .registry
            .update(session_id, |session| {
                let turn = session.record(Role::User, text, now, policy);
                let resolution = session.resolve(text, policy);
                session.observe(text);
                let digest = session.compile(text, now, policy);
                TurnOutcome {
                    turn,
                    resolution,
                    digest,
                }
            })
            .await;

        self.log_turn(session_id, &outcome.turn);
        self.log_resolution(session_id, &outcome.resolution, now);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use parley_domain::{ConversationStyle, MemoryPolicy, QuestionType};
    use std::sync::Arc;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn engine() -> ContextEngine {
        ContextEngine::in_memory(MemoryPolicy::default())
    }

    #[tokio::test]
    async fn test_process_turn_pipeline() {
        let engine = engine();
        let first = engine.process_turn("s", "Tell me about Python", t0()).await;
        assert_eq!(first.resolution.subject.as_deref(), Some("Python"));
        assert_eq!(first.digest.subject.as_deref(), Some("Python"));
        assert_eq!(first.digest.topic_depth, 1);
        assert_eq!(first.digest.recent_turns.len(), 1);

        engine
            .update_from_response("s", "Tell me about Python", "Python is a language.", t0())
            .await;

        let second = engine.process_turn("s", "What's its history?", t0()).await;
        assert_eq!(second.resolution.question_type, QuestionType::What);
        assert!(second.resolution.is_follow_up);
        assert!(second.digest.is_follow_up);
        assert_eq!(
            second.digest.resolved_text.as_deref(),
            Some("What's its history? [Referring to: Python]")
        );
        assert_eq!(second.digest.topic_depth, 2);
        assert!(
            second
                .digest
                .summary
                .contains("This is a follow-up to: \"What's its history?\"")
        );
    }

    #[tokio::test]
    async fn test_what_about_is_follow_up() {
        let engine = engine();
        let outcome = engine.process_turn("s", "What about hooks?", t0()).await;
        assert!(outcome.resolution.is_follow_up);
        assert_eq!(engine.insights("s").await.style, ConversationStyle::DeepDive);
    }

    #[tokio::test]
    async fn test_follow_up_note_names_current_question() {
        let engine = engine();
        engine.process_turn("s", "tell me about Python", t0()).await;
        let outcome = engine.process_turn("s", "what about its speed?", t0()).await;
        assert!(outcome.digest.is_follow_up);
        assert!(
            outcome
                .digest
                .summary
                .ends_with("This is a follow-up to: \"what about its speed?\"")
        );
    }

    #[tokio::test]
    async fn test_depth_three_after_three_turns() {
        let engine = engine();
        engine.process_turn("s", "tell me about Python", t0()).await;
        engine.process_turn("s", "how does it scale?", t0()).await;
        engine.process_turn("s", "is it fast?", t0()).await;
        assert_eq!(engine.insights("s").await.topic_depth, 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_turns_on_one_session_are_atomic() {
        let engine = Arc::new(engine());
        let tasks = (0..16).map(|i| {
            let engine = engine.clone();
            tokio::spawn(async move {
                engine
                    .process_turn("shared", &format!("message {}", i), t0())
                    .await
            })
        });

        for outcome in futures::future::join_all(tasks).await {
            let outcome = outcome.unwrap();
            // the digest was compiled in the same critical section as the record
            let last = outcome.digest.recent_turns.last().unwrap();
            assert_eq!(last.id(), outcome.turn.id());
        }
        assert_eq!(engine.stats("shared").await.total_turns, 16);
    }
}
