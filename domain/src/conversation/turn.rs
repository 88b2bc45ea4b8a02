//! Turn entity and its value objects.

use crate::lexical::{Sentiment, classify};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who authored a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Label used when rendering transcripts
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Opaque turn identifier: creation millis plus a per-session sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnId(String);

impl TurnId {
    pub fn derive(created_at: DateTime<Utc>, sequence: u64) -> Self {
        Self(format!("{}-{}", created_at.timestamp_millis(), sequence))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One conversation message (Entity)
///
/// Topics, entities and sentiment are computed from `text` once, at
/// creation, and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    id: TurnId,
    role: Role,
    text: String,
    created_at: DateTime<Utc>,
    topics: Vec<String>,
    entities: Vec<String>,
    sentiment: Sentiment,
}

impl Turn {
    pub fn new(id: TurnId, role: Role, text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        let text = text.into();
        let classification = classify(&text);
        Self {
            id,
            role,
            text,
            created_at,
            topics: classification.topics,
            entities: classification.entities,
            sentiment: classification.sentiment,
        }
    }

    pub fn id(&self) -> &TurnId {
        &self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    pub fn sentiment(&self) -> Sentiment {
        self.sentiment
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}
