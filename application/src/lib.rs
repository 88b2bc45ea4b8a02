//! Application layer for parley
//!
//! This crate contains the context engine, the session registry and port
//! definitions. It depends only on the domain layer.

pub mod ports;
pub mod registry;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    session_persistence::{NoPersistence, PersistenceError, SessionPersistencePort},
};
pub use registry::SessionRegistry;
pub use use_cases::context_engine::ContextEngine;
pub use use_cases::process_turn::TurnOutcome;
