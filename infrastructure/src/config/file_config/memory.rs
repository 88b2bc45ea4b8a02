//! Memory policy configuration from TOML (`[memory]` section)

use parley_domain::config::{ConfigIssue, ConfigIssueCode};
use parley_domain::MemoryPolicy;
use serde::{Deserialize, Serialize};

/// Memory configuration from TOML.
///
/// Controls how much of a conversation each session keeps and for how long
/// mentioned entities stay active.
///
/// # Example
///
/// ```toml
/// [memory]
/// max_turns = 40
/// entity_ttl_secs = 900
/// topic_window = 5
/// context_window = 10
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMemoryConfig {
    /// Turns kept per session; older turns are evicted.
    pub max_turns: usize,
    /// Seconds an entity stays active after its last mention.
    pub entity_ttl_secs: u64,
    /// Recent turns used to rank the current topics.
    pub topic_window: usize,
    /// Recent turns included in a digest.
    pub context_window: usize,
    /// Previous subjects remembered for insights.
    pub subject_history_cap: usize,
    /// Known entities kept per session.
    pub max_known_entities: usize,
}

impl Default for FileMemoryConfig {
    fn default() -> Self {
        let policy = MemoryPolicy::default();
        Self {
            max_turns: policy.max_turns(),
            entity_ttl_secs: policy.entity_ttl_secs(),
            topic_window: policy.topic_window(),
            context_window: policy.context_window(),
            subject_history_cap: policy.subject_history_cap(),
            max_known_entities: policy.max_known_entities(),
        }
    }
}

impl FileMemoryConfig {
    /// Convert to domain `MemoryPolicy`, returning validation issues.
    ///
    /// If any value violates a constraint, falls back to
    /// `MemoryPolicy::default()` and returns one warning per violation.
    pub fn to_memory_policy(&self) -> (MemoryPolicy, Vec<ConfigIssue>) {
        let policy = MemoryPolicy::default()
            .with_max_turns(self.max_turns)
            .with_entity_ttl_secs(self.entity_ttl_secs)
            .with_topic_window(self.topic_window)
            .with_context_window(self.context_window)
            .with_subject_history_cap(self.subject_history_cap)
            .with_max_known_entities(self.max_known_entities);

        let errors = policy.validate();
        if errors.is_empty() {
            return (policy, vec![]);
        }

        let issues = errors
            .into_iter()
            .map(|msg| {
                ConfigIssue::warning(
                    ConfigIssueCode::InvalidConstraint {
                        field: "memory".to_string(),
                    },
                    msg,
                )
            })
            .collect();
        (MemoryPolicy::default(), issues)
    }
}
