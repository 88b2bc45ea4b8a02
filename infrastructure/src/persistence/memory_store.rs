//! In-process session store.

use async_trait::async_trait;
use parley_application::ports::session_persistence::{PersistenceError, SessionPersistencePort};
use std::collections::HashMap;
use std::sync::RwLock;

/// Keeps snapshots in a map for the lifetime of the process.
///
/// Useful when several engines share one process, or in tests that restart
/// an engine and expect its sessions back.
#[derive(Default)]
pub struct InMemorySessionStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SessionPersistencePort for InMemorySessionStore {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| PersistenceError::Backend("session map poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    async fn save(&self, key: &str, bytes: Vec<u8>) -> Result<(), PersistenceError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| PersistenceError::Backend("session map poisoned".to_string()))?;
        entries.insert(key.to_string(), bytes);
        Ok(())
    }
}
