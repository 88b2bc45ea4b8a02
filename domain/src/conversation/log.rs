//! Bounded, time-decaying conversation log.
//!
//! [`ConversationLog`] is the session store's half of a session: the last
//! `max_turns` turns, the entities mentioned within the TTL and the topics
//! currently dominating the conversation.

use super::stats::ConversationStats;
use super::turn::{Role, Turn, TurnId};
use crate::config::MemoryPolicy;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// How many topics are kept as "current"
pub const CURRENT_TOPIC_COUNT: usize = 3;

/// Ordered turn log plus derived recency state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationLog {
    turns: VecDeque<Turn>,
    /// entity name -> last mentioned
    active_entities: BTreeMap<String, DateTime<Utc>>,
    current_topics: Vec<String>,
    last_interaction: Option<DateTime<Utc>>,
    /// Survives `clear` so turn ids stay unique within a session
    next_sequence: u64,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify and append a turn, then refresh every derived field.
    pub fn record(
        &mut self,
        role: Role,
        text: impl Into<String>,
        now: DateTime<Utc>,
        policy: &MemoryPolicy,
    ) -> Turn {
        self.next_sequence += 1;
        let turn = Turn::new(TurnId::derive(now, self.next_sequence), role, text, now);

        self.turns.push_back(turn.clone());
        while self.turns.len() > policy.max_turns() {
            self.turns.pop_front();
        }

        self.current_topics = rank_topics(self.window_iter(policy.topic_window()));

        for entity in turn.entities() {
            self.active_entities.insert(entity.clone(), now);
        }
        self.prune_entities(now, policy.entity_ttl());

        self.last_interaction = Some(now);
        turn
    }

    /// Last `size` turns, newest last. `size` is clamped to the log length.
    pub fn window(&self, size: usize) -> Vec<Turn> {
        self.window_iter(size).cloned().collect()
    }

    fn window_iter(&self, size: usize) -> impl Iterator<Item = &Turn> {
        let skip = self.turns.len().saturating_sub(size);
        self.turns.iter().skip(skip)
    }

    pub fn turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn current_topics(&self) -> &[String] {
        &self.current_topics
    }

    pub fn last_interaction(&self) -> Option<DateTime<Utc>> {
        self.last_interaction
    }

    /// Entities still within `ttl` of `now`, most recently mentioned first.
    ///
    /// Filters at read time too, so an entity past its TTL is never reported
    /// even if no write has pruned it yet.
    pub fn active_entity_names(&self, now: DateTime<Utc>, ttl: Duration) -> Vec<String> {
        let mut live: Vec<(&String, &DateTime<Utc>)> = self
            .active_entities
            .iter()
            .filter(|(_, seen)| now.signed_duration_since(**seen) <= ttl)
            .collect();
        live.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        live.into_iter().map(|(name, _)| name.clone()).collect()
    }

    /// Last-seen instant of an active entity, as of the last write.
    pub fn entity_last_seen(&self, name: &str) -> Option<DateTime<Utc>> {
        self.active_entities.get(name).copied()
    }

    fn prune_entities(&mut self, now: DateTime<Utc>, ttl: Duration) {
        self.active_entities
            .retain(|_, seen| now.signed_duration_since(*seen) <= ttl);
    }

    pub fn stats(&self) -> ConversationStats {
        let mut stats = ConversationStats {
            total_turns: self.turns.len(),
            current_topics: self.current_topics.clone(),
            active_entities: self.active_entities.keys().cloned().collect(),
            ..ConversationStats::default()
        };
        for turn in &self.turns {
            match turn.role() {
                Role::User => stats.user_turns += 1,
                Role::Assistant => stats.assistant_turns += 1,
            }
            stats.sentiment_counts.add(turn.sentiment());
        }
        stats
    }

    /// One-line overview, e.g. `3 messages about programming. Last active: ...`
    pub fn describe(&self) -> String {
        if self.turns.is_empty() {
            return "No conversation yet.".to_string();
        }
        let topics = if self.current_topics.is_empty() {
            "various topics".to_string()
        } else {
            self.current_topics.join(", ")
        };
        let last_active = self
            .last_interaction
            .map(|at| at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
            .unwrap_or_else(|| "unknown".to_string());
        format!(
            "{} messages about {}. Last active: {}",
            self.turns.len(),
            topics,
            last_active
        )
    }

    /// Forget turns, active entities and topics.
    pub fn clear(&mut self) {
        self.turns.clear();
        self.active_entities.clear();
        self.current_topics.clear();
    }
}

/// Top topics by frequency; ties keep first-seen order.
fn rank_topics<'a>(turns: impl Iterator<Item = &'a Turn>) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for topic in turns.flat_map(|turn| turn.topics()) {
        match counts.iter_mut().find(|(name, _)| name == topic) {
            Some((_, count)) => *count += 1,
            None => counts.push((topic.clone(), 1)),
        }
    }
    // stable sort preserves first-seen order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(CURRENT_TOPIC_COUNT)
        .map(|(topic, _)| topic)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::Sentiment;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn record(log: &mut ConversationLog, text: &str, at: DateTime<Utc>) -> Turn {
        log.record(Role::User, text, at, &MemoryPolicy::default())
    }

    #[test]
    fn test_record_returns_classified_turn() {
        let mut log = ConversationLog::new();
        let turn = record(&mut log, "Docker is awesome", t0());
        assert_eq!(turn.entities().to_vec(), vec!["Docker"]);
        assert_eq!(turn.sentiment(), Sentiment::Positive);
        assert_eq!(log.len(), 1);
        assert_eq!(log.last_interaction(), Some(t0()));
    }

    #[test]
    fn test_bounded_history_keeps_most_recent_in_order() {
        let mut log = ConversationLog::new();
        for i in 0..25 {
            record(&mut log, &format!("message {}", i), t0());
        }
        assert_eq!(log.len(), 20);
        let texts: Vec<String> = log.turns().map(|t| t.text().to_string()).collect();
        let expected: Vec<String> = (5..25).map(|i| format!("message {}", i)).collect();
        assert_eq!(texts, expected);
    }

    #[test]
    fn test_turn_ids_are_unique_and_ordered() {
        let mut log = ConversationLog::new();
        let a = record(&mut log, "one", t0());
        let b = record(&mut log, "two", t0());
        assert_ne!(a.id(), b.id());
        assert!(a.id().as_str().ends_with("-1"));
        assert!(b.id().as_str().ends_with("-2"));
    }

    #[test]
    fn test_window_clamps() {
        let mut log = ConversationLog::new();
        record(&mut log, "a", t0());
        record(&mut log, "b", t0());
        record(&mut log, "c", t0());
        let texts = |turns: Vec<Turn>| -> Vec<String> {
            turns.iter().map(|t| t.text().to_string()).collect()
        };
        assert_eq!(texts(log.window(2)), vec!["b", "c"]);
        assert_eq!(texts(log.window(10)), vec!["a", "b", "c"]);
        assert!(log.window(0).is_empty());
    }

    #[test]
    fn test_current_topics_frequency_then_first_seen() {
        let mut log = ConversationLog::new();
        record(&mut log, "a new recipe", t0()); // food
        record(&mut log, "travel budget", t0()); // finance, travel
        record(&mut log, "my hotel", t0()); // travel
        record(&mut log, "money talks", t0()); // finance
        // travel: 2, finance: 2, food: 1; food seen first but ranks last
        assert_eq!(log.current_topics().to_vec(), vec!["finance", "travel", "food"]);
    }

    #[test]
    fn test_current_topics_only_use_topic_window() {
        let mut log = ConversationLog::new();
        record(&mut log, "a new recipe", t0());
        for _ in 0..5 {
            record(&mut log, "stock prices", t0());
        }
        assert_eq!(log.current_topics().to_vec(), vec!["finance"]);
    }

    #[test]
    fn test_entity_ttl_prunes_on_write() {
        let mut log = ConversationLog::new();
        record(&mut log, "Tell me about Kubernetes", t0());
        let later = t0() + Duration::minutes(11);
        record(&mut log, "hello there", later);
        assert_eq!(log.entity_last_seen("Kubernetes"), None);
        assert!(log.stats().active_entities.is_empty());
    }

    #[test]
    fn test_entity_ttl_filters_on_read() {
        let mut log = ConversationLog::new();
        record(&mut log, "Kubernetes", t0());
        let ttl = MemoryPolicy::default().entity_ttl();
        assert_eq!(log.active_entity_names(t0() + Duration::minutes(9), ttl), vec!["Kubernetes"]);
        assert!(log.active_entity_names(t0() + Duration::minutes(11), ttl).is_empty());
    }

    #[test]
    fn test_remention_refreshes_entity() {
        let mut log = ConversationLog::new();
        record(&mut log, "Kubernetes", t0());
        record(&mut log, "Kubernetes again", t0() + Duration::minutes(8));
        record(&mut log, "ok", t0() + Duration::minutes(15));
        assert_eq!(
            log.entity_last_seen("Kubernetes"),
            Some(t0() + Duration::minutes(8))
        );
    }

    #[test]
    fn test_active_entity_names_most_recent_first() {
        let mut log = ConversationLog::new();
        record(&mut log, "Kubernetes", t0());
        record(&mut log, "Terraform", t0() + Duration::minutes(1));
        let ttl = MemoryPolicy::default().entity_ttl();
        assert_eq!(
            log.active_entity_names(t0() + Duration::minutes(2), ttl),
            vec!["Terraform", "Kubernetes"]
        );
    }

    #[test]
    fn test_stats() {
        let mut log = ConversationLog::new();
        let policy = MemoryPolicy::default();
        log.record(Role::User, "This is great", t0(), &policy);
        log.record(Role::Assistant, "Glad to help", t0(), &policy);
        log.record(Role::User, "What next?", t0(), &policy);
        let stats = log.stats();
        assert_eq!(stats.total_turns, 3);
        assert_eq!(stats.user_turns, 2);
        assert_eq!(stats.assistant_turns, 1);
        assert_eq!(stats.sentiment_counts.positive, 1);
        assert_eq!(stats.sentiment_counts.negative, 1);
        assert_eq!(stats.sentiment_counts.neutral, 1);
        assert_eq!(stats.active_entities, vec!["Glad", "This", "What"]);
    }

    #[test]
    fn test_describe() {
        let mut log = ConversationLog::new();
        assert_eq!(log.describe(), "No conversation yet.");
        record(&mut log, "cheap hotel deals", t0());
        assert_eq!(
            log.describe(),
            "1 messages about travel. Last active: 2026-03-01T09:00:00Z"
        );
    }

    #[test]
    fn test_clear_keeps_sequence() {
        let mut log = ConversationLog::new();
        record(&mut log, "Kubernetes", t0());
        log.clear();
        assert!(log.is_empty());
        assert!(log.current_topics().is_empty());
        assert!(log.stats().active_entities.is_empty());
        let turn = record(&mut log, "again", t0());
        assert!(turn.id().as_str().ends_with("-2"));
    }
}
