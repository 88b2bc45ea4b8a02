//! Per-session reference state: subject tracking and entity context.

use super::catalog::{EntityKind, recognize};
use super::pronoun::PronounCategory;
use super::question::QuestionType;
use crate::config::MemoryPolicy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Description given to lexically extracted entities the catalog doesn't know
pub const MENTIONED_TERM: &str = "Mentioned term";

/// What the session knows about one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityInfo {
    pub kind: EntityKind,
    pub last_mentioned: DateTime<Utc>,
    pub description: String,
    pub aliases: Vec<String>,
    /// Orders mentions that share an instant
    pub mention_seq: u64,
}

impl EntityInfo {
    fn recency(&self) -> (DateTime<Utc>, u64) {
        (self.last_mentioned, self.mention_seq)
    }

    /// Whether the catalog knows this entity, as opposed to a bare
    /// capitalized word picked up from the text.
    pub fn is_recognized(&self) -> bool {
        self.description != MENTIONED_TERM
    }
}

/// Outcome of feeding an extracted subject into the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectUpdate {
    pub changed: bool,
    /// Subject displaced into history, when `changed`
    pub previous: Option<String>,
}

/// Subject, question and entity-context state of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectState {
    current_subject: Option<String>,
    /// Oldest first
    subject_history: Vec<String>,
    /// Consecutive turns spent on each subject
    topic_depth: BTreeMap<String, u32>,
    last_question: Option<String>,
    question_type: QuestionType,
    last_follow_up: bool,
    last_resolved_text: Option<String>,
    entity_context: BTreeMap<String, EntityInfo>,
    mention_seq: u64,
}

impl SubjectState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_subject(&self) -> Option<&str> {
        self.current_subject.as_deref()
    }

    pub fn subject_history(&self) -> &[String] {
        &self.subject_history
    }

    pub fn depth_of(&self, subject: &str) -> u32 {
        self.topic_depth.get(subject).copied().unwrap_or(0)
    }

    /// Depth of the current subject, 0 when there is none.
    pub fn current_depth(&self) -> u32 {
        self.current_subject().map_or(0, |s| self.depth_of(s))
    }

    pub fn last_question(&self) -> Option<&str> {
        self.last_question.as_deref()
    }

    pub fn question_type(&self) -> QuestionType {
        self.question_type
    }

    /// Whether the most recent resolved question was a follow-up
    pub fn last_follow_up(&self) -> bool {
        self.last_follow_up
    }

    pub fn last_resolved_text(&self) -> Option<&str> {
        self.last_resolved_text.as_deref()
    }

    pub fn entity(&self, name: &str) -> Option<&EntityInfo> {
        self.entity_context.get(name)
    }

    pub fn entity_count(&self) -> usize {
        self.entity_context.len()
    }

    /// Known entities, most recently mentioned first.
    pub fn entities_by_recency(&self) -> Vec<(&str, &EntityInfo)> {
        let mut entities: Vec<(&str, &EntityInfo)> = self
            .entity_context
            .iter()
            .map(|(name, info)| (name.as_str(), info))
            .collect();
        entities.sort_by(|a, b| b.1.recency().cmp(&a.1.recency()));
        entities
    }

    /// Most recent entity a pronoun of `category` can refer to, skipping
    /// anything named in `exclude`.
    ///
    /// Catalog entities outrank bare mentioned terms regardless of recency,
    /// so sentence openers like "Does" never steal a pronoun.
    pub fn referent_for(&self, category: PronounCategory, exclude: &[String]) -> Option<String> {
        let candidates: Vec<_> = self
            .entities_by_recency()
            .into_iter()
            .filter(|(name, info)| {
                category.accepts(info.kind) && !exclude.iter().any(|e| e == name)
            })
            .collect();
        candidates
            .iter()
            .find(|(_, info)| info.is_recognized())
            .or_else(|| candidates.first())
            .map(|(name, _)| name.to_string())
    }

    /// Track every entity mentioned in a recorded turn.
    ///
    /// Lexical mentions go in first as plain things; catalog hits then
    /// refine kind and description.
    pub fn note_mentions(
        &mut self,
        text: &str,
        lexical: &[String],
        now: DateTime<Utc>,
        policy: &MemoryPolicy,
    ) {
        for name in lexical {
            self.mention_seq += 1;
            let seq = self.mention_seq;
            self.entity_context
                .entry(name.clone())
                .and_modify(|info| {
                    info.last_mentioned = now;
                    info.mention_seq = seq;
                })
                .or_insert_with(|| EntityInfo {
                    kind: EntityKind::Thing,
                    last_mentioned: now,
                    description: MENTIONED_TERM.to_string(),
                    aliases: Vec::new(),
                    mention_seq: seq,
                });
        }
        self.note_recognized(text, now, policy);
    }

    /// Track catalog entities in `text`, overriding kind and description.
    pub fn note_recognized(&mut self, text: &str, now: DateTime<Utc>, policy: &MemoryPolicy) {
        for entity in recognize(text) {
            self.mention_seq += 1;
            self.entity_context.insert(
                entity.name,
                EntityInfo {
                    kind: entity.kind,
                    last_mentioned: now,
                    description: entity.description,
                    aliases: entity.aliases,
                    mention_seq: self.mention_seq,
                },
            );
        }
        self.evict_stale_entities(policy.max_known_entities());
    }

    fn evict_stale_entities(&mut self, cap: usize) {
        while self.entity_context.len() > cap {
            let oldest = self
                .entity_context
                .iter()
                .min_by_key(|(_, info)| info.recency())
                .map(|(name, _)| name.clone());
            match oldest {
                Some(name) => {
                    self.entity_context.remove(&name);
                }
                None => break,
            }
        }
    }

    /// Feed the subject extracted from a turn (if any).
    ///
    /// A new, different subject displaces the current one into history and
    /// starts at depth 1. Otherwise the current subject goes one turn deeper.
    pub fn apply_subject(&mut self, extracted: Option<String>, policy: &MemoryPolicy) -> SubjectUpdate {
        match extracted {
            Some(subject) if self.current_subject.as_deref() != Some(subject.as_str()) => {
                let previous = self.current_subject.take();
                if let Some(old) = &previous {
                    self.push_history(old.clone(), policy.subject_history_cap());
                }
                self.topic_depth.insert(subject.clone(), 1);
                self.current_subject = Some(subject);
                self.prune_depth();
                SubjectUpdate {
                    changed: true,
                    previous,
                }
            }
            _ => {
                if let Some(current) = &self.current_subject {
                    *self.topic_depth.entry(current.clone()).or_insert(0) += 1;
                }
                SubjectUpdate {
                    changed: false,
                    previous: None,
                }
            }
        }
    }

    /// Remember `text` as the latest question.
    pub fn record_question(
        &mut self,
        text: &str,
        question_type: QuestionType,
        is_follow_up: bool,
        resolved_text: &str,
    ) {
        self.last_question = Some(text.to_string());
        self.question_type = question_type;
        self.last_follow_up = is_follow_up;
        self.last_resolved_text = Some(resolved_text.to_string());
    }

    /// Move on from the current subject while keeping what was learned.
    ///
    /// The subject is displaced into history and the pending question is
    /// forgotten. Entity context and topic depth survive.
    pub fn soft_reset(&mut self, policy: &MemoryPolicy) {
        if let Some(old) = self.current_subject.take() {
            self.push_history(old, policy.subject_history_cap());
        }
        self.last_question = None;
        self.question_type = QuestionType::None;
        self.last_follow_up = false;
        self.last_resolved_text = None;
    }

    fn push_history(&mut self, subject: String, cap: usize) {
        self.subject_history.push(subject);
        if self.subject_history.len() > cap {
            let excess = self.subject_history.len() - cap;
            self.subject_history.drain(..excess);
        }
    }

    /// Depth is only kept for subjects still in view.
    fn prune_depth(&mut self) {
        let history = &self.subject_history;
        let current = &self.current_subject;
        self.topic_depth
            .retain(|subject, _| current.as_ref() == Some(subject) || history.contains(subject));
    }
}
