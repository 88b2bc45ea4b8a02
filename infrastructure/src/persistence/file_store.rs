//! File-backed session store.
//!
//! Each storage key maps to one `<encoded key>.json` file under a root
//! directory. Writes go to a temporary sibling first and are renamed into
//! place, so a reader never sees a half-written snapshot.

use async_trait::async_trait;
use parley_application::ports::session_persistence::{PersistenceError, SessionPersistencePort};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct FileSessionStore {
    root: PathBuf,
}

impl FileSessionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Snapshot path for `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", encode_key(key)))
    }
}

/// Percent-encode everything outside `[A-Za-z0-9_-]` so that any key maps to
/// exactly one flat file name.
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }
    encoded
}

#[async_trait]
impl SessionPersistencePort for FileSessionStore {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
        let path = self.path_for(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, key: &str, bytes: Vec<u8>) -> Result<(), PersistenceError> {
        tokio::fs::create_dir_all(&self.root).await?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;

        debug!(path = %path.display(), bytes = bytes.len(), "Saved session snapshot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_key_is_flat_and_unambiguous() {
        assert_eq!(encode_key("parley/session/abc"), "parley%2Fsession%2Fabc");
        assert_eq!(encode_key("a_b-1"), "a_b-1");
        assert_eq!(encode_key("../x"), "%2E%2E%2Fx");
        assert_ne!(encode_key("a/b"), encode_key("a_b"));
    }

    #[tokio::test]
    async fn test_load_missing_key_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path());
        assert!(store.load("parley/session/x").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("sessions"));

        store
            .save("parley/session/x", b"{\"id\":\"x\"}".to_vec())
            .await
            .unwrap();
        store
            .save("parley/session/x", b"{\"id\":\"x\",\"v\":2}".to_vec())
            .await
            .unwrap();

        let loaded = store.load("parley/session/x").await.unwrap().unwrap();
        assert_eq!(loaded, b"{\"id\":\"x\",\"v\":2}".to_vec());
        assert!(store.path_for("parley/session/x").exists());
        assert!(!store.path_for("parley/session/x").with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_unreadable_path_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path());
        // a directory where the snapshot file should be
        std::fs::create_dir_all(store.path_for("k")).unwrap();
        assert!(matches!(
            store.load("k").await,
            Err(PersistenceError::Io(_))
        ));
    }
}
