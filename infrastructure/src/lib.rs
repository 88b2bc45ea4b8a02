//! Infrastructure layer for parley
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: session stores, the JSONL event log,
//! and configuration file loading.

pub mod config;
pub mod logging;
pub mod persistence;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigLoader, FileConfig, FileLoggingConfig, FileMemoryConfig,
    FilePersistenceConfig, PersistenceBackend,
};
pub use logging::JsonlConversationLogger;
pub use persistence::{FileSessionStore, InMemorySessionStore, build_persistence};
