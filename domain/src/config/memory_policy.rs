//! Memory policy controlling how much conversation state a session keeps.
//!
//! [`MemoryPolicy`] bounds every collection a session owns, so each
//! operation on a session runs in time bounded by these small constants.
//!
//! | Knob                  | Default | Bounds                                  |
//! |-----------------------|---------|-----------------------------------------|
//! | `max_turns`           | 20      | turns kept in the log (FIFO eviction)   |
//! | `entity_ttl_secs`     | 600     | age after which active entities decay   |
//! | `topic_window`        | 5       | turns scanned for current topics        |
//! | `context_window`      | 10      | turns handed out in a digest            |
//! | `subject_history_cap` | 10      | displaced subjects remembered           |
//! | `max_known_entities`  | 100     | long-term entity context entries        |

use crate::core::error::DomainError;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Upper bound for the entity TTL (100 years), keeps the conversion to
/// [`chrono::Duration`] in range.
const MAX_ENTITY_TTL_SECS: u64 = 100 * 365 * 24 * 60 * 60;

/// Limits applied to every session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryPolicy {
    max_turns: usize,
    entity_ttl_secs: u64,
    topic_window: usize,
    context_window: usize,
    subject_history_cap: usize,
    max_known_entities: usize,
}

impl MemoryPolicy {
    /// Build a policy, rejecting values that would break the session invariants.
    pub fn try_new(
        max_turns: usize,
        entity_ttl_secs: u64,
        topic_window: usize,
        context_window: usize,
    ) -> Result<Self, DomainError> {
        let policy = Self {
            max_turns,
            entity_ttl_secs,
            topic_window,
            context_window,
            ..Self::default()
        };
        let issues = policy.validate();
        if issues.is_empty() {
            Ok(policy)
        } else {
            Err(DomainError::InvalidPolicy(issues.join("; ")))
        }
    }

    // ==================== Accessors ====================

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    pub fn entity_ttl(&self) -> Duration {
        Duration::seconds(self.entity_ttl_secs.min(MAX_ENTITY_TTL_SECS) as i64)
    }

    pub fn entity_ttl_secs(&self) -> u64 {
        self.entity_ttl_secs
    }

    pub fn topic_window(&self) -> usize {
        self.topic_window
    }

    pub fn context_window(&self) -> usize {
        self.context_window
    }

    pub fn subject_history_cap(&self) -> usize {
        self.subject_history_cap
    }

    pub fn max_known_entities(&self) -> usize {
        self.max_known_entities
    }

    // ==================== Builder Methods ====================

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_entity_ttl_secs(mut self, secs: u64) -> Self {
        self.entity_ttl_secs = secs;
        self
    }

    pub fn with_topic_window(mut self, turns: usize) -> Self {
        self.topic_window = turns;
        self
    }

    pub fn with_context_window(mut self, turns: usize) -> Self {
        self.context_window = turns;
        self
    }

    pub fn with_subject_history_cap(mut self, cap: usize) -> Self {
        self.subject_history_cap = cap;
        self
    }

    pub fn with_max_known_entities(mut self, cap: usize) -> Self {
        self.max_known_entities = cap;
        self
    }

    // ==================== Validation ====================

    /// Validate this policy, returning a list of issues.
    ///
    /// Rules:
    /// - every window and cap is `>= 1`
    /// - `entity_ttl_secs >= 1`
    /// - `topic_window <= max_turns` and `context_window <= max_turns`
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        for (field, value) in [
            ("max_turns", self.max_turns),
            ("topic_window", self.topic_window),
            ("context_window", self.context_window),
            ("subject_history_cap", self.subject_history_cap),
            ("max_known_entities", self.max_known_entities),
        ] {
            if value < 1 {
                issues.push(format!("memory: {} must be >= 1", field));
            }
        }
        if self.entity_ttl_secs < 1 {
            issues.push("memory: entity_ttl_secs must be >= 1".to_string());
        }
        if self.max_turns >= 1 {
            if self.topic_window > self.max_turns {
                issues.push(format!(
                    "memory: topic_window ({}) must be <= max_turns ({})",
                    self.topic_window, self.max_turns
                ));
            }
            if self.context_window > self.max_turns {
                issues.push(format!(
                    "memory: context_window ({}) must be <= max_turns ({})",
                    self.context_window, self.max_turns
                ));
            }
        }
        issues
    }
}

impl Default for MemoryPolicy {
    /// Default: 20 turns, 10 minute entity TTL, 5 turn topic window,
    /// 10 turn digest window.
    fn default() -> Self {
        Self {
            max_turns: 20,
            entity_ttl_secs: 10 * 60,
            topic_window: 5,
            context_window: 10,
            subject_history_cap: 10,
            max_known_entities: 100,
        }
    }
}
