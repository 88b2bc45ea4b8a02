//! Session persistence adapters.
//!
//! Implementations of the
//! [`SessionPersistencePort`](parley_application::SessionPersistencePort)
//! plus [`build_persistence`], which picks one from the `[persistence]`
//! config section.

mod file_store;
mod memory_store;

pub use file_store::FileSessionStore;
pub use memory_store::InMemorySessionStore;

use crate::config::{FilePersistenceConfig, PersistenceBackend};
use parley_application::{NoPersistence, SessionPersistencePort};
use parley_domain::config::ConfigIssue;
use std::sync::Arc;
use tracing::{info, warn};

/// Build the persistence adapter described by `config`.
///
/// Never fails: a file backend without a usable directory degrades to the
/// in-memory store, and the reason is returned as an issue.
pub fn build_persistence(
    config: &FilePersistenceConfig,
) -> (Arc<dyn SessionPersistencePort>, Vec<ConfigIssue>) {
    let (backend, issues) = config.parse_backend();
    match backend {
        PersistenceBackend::None => (Arc::new(NoPersistence), issues),
        PersistenceBackend::Memory => (Arc::new(InMemorySessionStore::new()), issues),
        PersistenceBackend::File => match config.resolve_directory() {
            Some(dir) => {
                info!(directory = %dir.display(), "Persisting sessions to files");
                (Arc::new(FileSessionStore::new(dir)), issues)
            }
            None => {
                warn!("No directory for file persistence, keeping sessions in memory");
                (
                    Arc::new(InMemorySessionStore::new()),
                    config.validate(),
                )
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_none_is_disabled() {
        let config = FilePersistenceConfig {
            backend: "none".to_string(),
            directory: None,
        };
        let (port, issues) = build_persistence(&config);
        assert!(!port.is_enabled());
        assert!(issues.is_empty());
    }

    #[tokio::test]
    async fn test_build_file_uses_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = FilePersistenceConfig {
            backend: "file".to_string(),
            directory: Some(dir.path().to_path_buf()),
        };
        let (port, issues) = build_persistence(&config);
        assert!(port.is_enabled());
        assert!(issues.is_empty());

        port.save("parley/session/a", b"{}".to_vec()).await.unwrap();
        assert!(FileSessionStore::new(dir.path()).path_for("parley/session/a").exists());
    }

    #[test]
    fn test_build_unknown_backend_falls_back_with_issue() {
        let config = FilePersistenceConfig {
            backend: "s3".to_string(),
            directory: None,
        };
        let (port, issues) = build_persistence(&config);
        assert!(port.is_enabled());
        assert_eq!(issues.len(), 1);
    }
}
