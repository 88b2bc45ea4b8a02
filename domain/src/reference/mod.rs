//! Reference resolution.
//!
//! Given a session's [`SubjectState`], [`resolve`] classifies the question
//! type, decides whether the turn is a follow-up, annotates pronouns with
//! their most likely referents and updates the current subject.
//!
//! # Example
//!
//! ```
//! use parley_domain::config::MemoryPolicy;
//! use parley_domain::reference::{SubjectState, resolve};
//! use chrono::Utc;
//!
//! let policy = MemoryPolicy::default();
//! let mut state = SubjectState::new();
//! let now = Utc::now();
//!
//! state.note_recognized("Tell me about Python", now, &policy);
//! resolve(&mut state, "Tell me about Python", &policy);
//! assert_eq!(state.current_subject(), Some("Python"));
//!
//! let r = resolve(&mut state, "What's its history?", &policy);
//! assert!(r.resolved_text.ends_with("[Referring to: Python]"));
//! assert!(r.is_follow_up);
//! ```

pub mod catalog;
pub mod follow_up;
pub mod pronoun;
pub mod question;
pub mod state;
pub mod subject;

pub use catalog::{EntityKind, RecognizedEntity, recognize};
pub use follow_up::{FollowUpSignal, detect_follow_up};
pub use pronoun::PronounCategory;
pub use question::QuestionType;
pub use state::{EntityInfo, SubjectState, SubjectUpdate};
pub use subject::{ExtractedSubject, SubjectRule, extract_subject};

use crate::config::MemoryPolicy;
use crate::lexical::extract_entities;
use serde::{Deserialize, Serialize};

/// Result of resolving one turn against the session's subject state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Input text plus any `[Referring to: ...]` annotations
    pub resolved_text: String,
    pub is_follow_up: bool,
    pub follow_up_signal: Option<FollowUpSignal>,
    /// Current subject after this turn
    pub subject: Option<String>,
    pub question_type: QuestionType,
    pub subject_changed: bool,
}

impl Resolution {
    /// Whether any pronoun got a referent annotation
    pub fn is_annotated(&self) -> bool {
        self.resolved_text.contains("[Referring to: ")
    }
}

/// Resolve `text` and update `state` in place.
///
/// Follow-up detection runs against the subject as it was before this
/// turn. Entities named in `text` itself are never chosen as referents.
pub fn resolve(state: &mut SubjectState, text: &str, policy: &MemoryPolicy) -> Resolution {
    let question_type = QuestionType::detect(text);
    let follow_up_signal = detect_follow_up(text, state.current_subject());

    let mentioned = mentioned_names(text);
    let resolved_text = pronoun::annotate(text, |category| state.referent_for(category, &mentioned));

    let extracted = extract_subject(text).map(|s| s.value);
    let update = state.apply_subject(extracted, policy);

    let is_follow_up = follow_up_signal.is_some();
    state.record_question(text, question_type, is_follow_up, &resolved_text);

    Resolution {
        resolved_text,
        is_follow_up,
        follow_up_signal,
        subject: state.current_subject().map(str::to_string),
        question_type,
        subject_changed: update.changed,
    }
}

/// Every entity name `text` mentions, lexical or catalogued.
fn mentioned_names(text: &str) -> Vec<String> {
    let mut names = extract_entities(text);
    for entity in recognize(text) {
        if !names.contains(&entity.name) {
            names.push(entity.name);
        }
    }
    names
}
