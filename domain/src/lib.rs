//! Domain layer for parley
//!
//! This crate contains the conversation-memory model and the heuristics
//! that run on it. It has no dependencies on infrastructure or presentation
//! concerns, and nothing in it performs I/O.
//!
//! # Core Concepts
//!
//! ## Turn and Conversation Log
//!
//! Every message becomes a [`Turn`], classified once into topics, entity
//! mentions and a sentiment label. A [`ConversationLog`] keeps the most
//! recent turns, the entities mentioned within the TTL and the current
//! topics.
//!
//! ## Subject and References
//!
//! [`SubjectState`] tracks what the conversation is about, how long it has
//! stayed there and which entities are known. [`resolve`] uses it to detect
//! follow-ups and to annotate pronouns with their likely referents.
//!
//! ## Digest
//!
//! [`ContextDigest`] condenses a [`Session`] into the structured fields and
//! fixed-format summary a response generator consumes.

pub mod config;
pub mod conversation;
pub mod core;
pub mod digest;
pub mod lexical;
pub mod reference;
pub mod session;
pub mod style;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, MemoryPolicy, Severity};
pub use conversation::{ConversationLog, ConversationStats, Role, SentimentCounts, Turn, TurnId};
pub use core::error::DomainError;
pub use digest::{ContextDigest, DigestSources};
pub use lexical::{Classification, Sentiment, classify};
pub use reference::{
    EntityInfo, EntityKind, FollowUpSignal, PronounCategory, QuestionType, Resolution,
    SubjectState, resolve,
};
pub use session::{Session, SessionInsights, storage_key};
pub use style::{ConversationStyle, DetailLevel, UserStyle};
