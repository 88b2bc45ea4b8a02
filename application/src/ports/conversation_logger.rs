//! Port for structured conversation logging.
//!
//! The engine emits one [`ConversationEvent`] per observable change to a
//! session. `tracing` carries the human-readable diagnostics; this port
//! carries the machine-readable record of what happened to each session,
//! typically one JSONL line per event.
//!
//! | type | payload fields |
//! |---|---|
//! | [`TURN_RECORDED`] | `session_id`, `turn_id`, `role`, `topics`, `entities`, `sentiment`, `bytes` |
//! | [`REFERENCE_RESOLVED`] | `session_id`, `is_follow_up`, `follow_up_signal`, `question_type`, `annotated`, `subject`, `at` |
//! | [`SUBJECT_CHANGED`] | `session_id`, `subject`, `at` |
//! | [`SESSION_CLEARED`] | `session_id`, `hard` |
//!
//! `bytes` is the length of the turn text; the text itself is never logged.
//! `at` is the caller-supplied resolution time (RFC 3339). Sinks add their
//! own write timestamp on top.

use serde_json::Value;

/// A turn was appended to a session log.
pub const TURN_RECORDED: &str = "turn_recorded";
/// A user question went through reference resolution.
pub const REFERENCE_RESOLVED: &str = "reference_resolved";
/// Resolution moved the session to a new subject.
pub const SUBJECT_CHANGED: &str = "subject_changed";
/// A session was soft (`hard: false`) or hard cleared.
pub const SESSION_CLEARED: &str = "session_cleared";

/// One structured event: a type from the table above and its payload.
#[derive(Debug, Clone)]
pub struct ConversationEvent {
    pub event_type: &'static str,
    /// JSON object with the fields listed for `event_type`
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    /// Session the event belongs to, when the payload names one.
    pub fn session_id(&self) -> Option<&str> {
        self.payload.get("session_id").and_then(Value::as_str)
    }
}

/// Sink for conversation events.
///
/// `log` is synchronous and infallible so a broken sink never disturbs a
/// turn; implementations swallow their own write errors.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// Drops every event. Used when no conversation log is configured.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
