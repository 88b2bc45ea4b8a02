//! Session persistence port
//!
//! A plain key-value contract. The engine serializes its own session
//! snapshots; adapters only move bytes.

use async_trait::async_trait;
use thiserror::Error;

/// Errors a persistence adapter may report
///
/// The engine never surfaces these to callers: a failed load counts as
/// "nothing persisted" and a failed save is logged and dropped.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Persistence unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Durable storage for session snapshots
#[async_trait]
pub trait SessionPersistencePort: Send + Sync {
    /// Bytes stored under `key`, or `None` when nothing is.
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError>;

    /// Store `bytes` under `key`, replacing what was there.
    async fn save(&self, key: &str, bytes: Vec<u8>) -> Result<(), PersistenceError>;

    /// Whether saves should be attempted at all.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Persistence that keeps nothing.
pub struct NoPersistence;

#[async_trait]
impl SessionPersistencePort for NoPersistence {
    async fn load(&self, _key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
        Ok(None)
    }

    async fn save(&self, _key: &str, _bytes: Vec<u8>) -> Result<(), PersistenceError> {
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}
