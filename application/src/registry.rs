//! Session registry: one mutex-guarded session per id.
//!
//! Sessions are created lazily on first use and hydrated from persistence
//! the first time their lock is taken. Different sessions never contend;
//! all work on one session is serialized by its `tokio::sync::Mutex`.
//!
//! Saves never run under the session lock. Each session has a
//! [`SaveQueue`] holding at most one pending snapshot, drained by at most
//! one background writer, so a stalled store costs one parked task and one
//! snapshot per session no matter how many turns arrive behind it.

use crate::ports::session_persistence::SessionPersistencePort;
use dashmap::DashMap;
use parley_domain::{Session, storage_key};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// A session plus its hydration bookkeeping.
struct SessionSlot {
    session: Session,
    hydrated: bool,
    /// Bumped on every persisted mutation
    generation: u64,
}

impl SessionSlot {
    fn new(id: &str) -> Self {
        Self {
            session: Session::new(id),
            hydrated: false,
            generation: 0,
        }
    }
}

#[derive(Default)]
struct SaveState {
    /// Newest snapshot not yet handed to a writer
    pending: Option<(u64, Vec<u8>)>,
    /// A background writer owns draining `pending`
    writer_running: bool,
}

/// Coalescing save queue for one session.
///
/// A newer snapshot replaces the pending one. Writes hold `write_lock`, so
/// they land in generation order.
#[derive(Default)]
struct SaveQueue {
    state: StdMutex<SaveState>,
    write_lock: Mutex<()>,
}

impl SaveQueue {
    fn state(&self) -> MutexGuard<'_, SaveState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, generation: u64, bytes: Vec<u8>) {
        self.state().pending = Some((generation, bytes));
    }

    /// Returns true if the caller became the writer and must start one.
    fn claim_writer(&self) -> bool {
        let mut state = self.state();
        if state.writer_running {
            return false;
        }
        state.writer_running = true;
        true
    }

    /// Background writer: save pending snapshots until none is left.
    async fn run_writer(self: Arc<Self>, key: String, persistence: Arc<dyn SessionPersistencePort>) {
        loop {
            let _write = self.write_lock.lock().await;
            let next = {
                let mut state = self.state();
                let next = state.pending.take();
                if next.is_none() {
                    state.writer_running = false;
                }
                next
            };
            let Some((generation, bytes)) = next else {
                return;
            };
            self.write(&key, generation, bytes, persistence.as_ref()).await;
        }
    }

    /// Save the pending snapshot, if any, after in-flight writes finish.
    async fn write_pending(&self, key: &str, persistence: &dyn SessionPersistencePort) -> bool {
        let _write = self.write_lock.lock().await;
        let next = self.state().pending.take();
        match next {
            Some((generation, bytes)) => self.write(key, generation, bytes, persistence).await,
            None => false,
        }
    }

    async fn write(
        &self,
        key: &str,
        generation: u64,
        bytes: Vec<u8>,
        persistence: &dyn SessionPersistencePort,
    ) -> bool {
        match persistence.save(key, bytes).await {
            Ok(()) => {
                debug!(key = %key, generation, "Saved session");
                true
            }
            Err(e) => {
                warn!(key = %key, "Failed to save session: {}", e);
                false
            }
        }
    }
}

struct SessionEntry {
    slot: Mutex<SessionSlot>,
    saves: Arc<SaveQueue>,
}

pub struct SessionRegistry {
    sessions: DashMap<String, Arc<SessionEntry>>,
    persistence: Arc<dyn SessionPersistencePort>,
}

impl SessionRegistry {
    pub fn new(persistence: Arc<dyn SessionPersistencePort>) -> Self {
        Self {
            sessions: DashMap::new(),
            persistence,
        }
    }

    /// Number of sessions touched in this process.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn entry(&self, id: &str) -> Arc<SessionEntry> {
        // clone the Arc out so no map shard stays locked across an await
        self.sessions
            .entry(id.to_string())
            .or_insert_with(|| {
                Arc::new(SessionEntry {
                    slot: Mutex::new(SessionSlot::new(id)),
                    saves: Arc::new(SaveQueue::default()),
                })
            })
            .clone()
    }

    /// Run `f` on the session without persisting afterwards.
    pub async fn read<R>(&self, id: &str, f: impl FnOnce(&Session) -> R) -> R {
        let entry = self.entry(id);
        let mut guard = entry.slot.lock().await;
        self.hydrate(id, &mut guard).await;
        f(&guard.session)
    }

    /// Run `f` on the session under its lock, then queue a background save.
    pub async fn update<R>(&self, id: &str, f: impl FnOnce(&mut Session) -> R) -> R {
        let entry = self.entry(id);
        let mut guard = entry.slot.lock().await;
        self.hydrate(id, &mut guard).await;
        let result = f(&mut guard.session);
        self.persist(&mut guard, &entry.saves);
        result
    }

    async fn hydrate(&self, id: &str, slot: &mut SessionSlot) {
        if slot.hydrated {
            return;
        }
        slot.hydrated = true;
        if !self.persistence.is_enabled() {
            return;
        }

        let key = slot.session.storage_key();
        match self.persistence.load(&key).await {
            Ok(Some(bytes)) => match Session::from_bytes(&bytes) {
                Ok(stored) if stored.id() == id => {
                    debug!(session_id = id, turns = stored.log().len(), "Hydrated session");
                    slot.session = stored;
                }
                Ok(stored) => {
                    warn!(
                        session_id = id,
                        stored_id = stored.id(),
                        "Ignoring persisted session with mismatched id"
                    );
                }
                Err(e) => warn!(session_id = id, "Ignoring unreadable session snapshot: {}", e),
            },
            Ok(None) => {}
            Err(e) => warn!(session_id = id, "Failed to load session, starting fresh: {}", e),
        }
    }

    /// Queue the slot's current state and make sure a writer is draining it.
    ///
    /// Without an async runtime the snapshot stays queued for [`flush`].
    ///
    /// [`flush`]: SessionRegistry::flush
    fn persist(&self, slot: &mut SessionSlot, saves: &Arc<SaveQueue>) {
        if !self.persistence.is_enabled() {
            return;
        }

        let bytes = match slot.session.to_bytes() {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(session_id = slot.session.id(), "Failed to snapshot session: {}", e);
                return;
            }
        };

        slot.generation += 1;
        saves.push(slot.generation, bytes);

        let key = slot.session.storage_key();
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!(key = %key, "No async runtime, save left for flush");
            return;
        };
        if saves.claim_writer() {
            runtime.spawn(saves.clone().run_writer(key, self.persistence.clone()));
        }
    }

    /// Write every session's pending snapshot and wait for those writes.
    /// Returns the number of sessions written.
    ///
    /// Never takes a session lock, so turns keep running while it waits on
    /// a slow store. Short-lived hosts call this before exiting so queued
    /// saves are not lost with the runtime.
    pub async fn flush(&self) -> usize {
        if !self.persistence.is_enabled() {
            return 0;
        }

        let queues: Vec<_> = self
            .sessions
            .iter()
            .map(|e| (storage_key(e.key()), e.value().saves.clone()))
            .collect();
        let mut written = 0;
        for (key, saves) in queues {
            if saves.write_pending(&key, self.persistence.as_ref()).await {
                written += 1;
            }
        }
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::session_persistence::{NoPersistence, PersistenceError};
    use async_trait::async_trait;
    use chrono::Utc;
    use parley_domain::{MemoryPolicy, Role};
    use std::collections::HashMap;
    use std::time::Duration;

    #[derive(Default)]
    struct MapPersistence {
        entries: StdMutex<HashMap<String, Vec<u8>>>,
        saves: StdMutex<usize>,
    }

    #[async_trait]
    impl SessionPersistencePort for MapPersistence {
        async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        async fn save(&self, key: &str, bytes: Vec<u8>) -> Result<(), PersistenceError> {
            self.entries.lock().unwrap().insert(key.to_string(), bytes);
            *self.saves.lock().unwrap() += 1;
            Ok(())
        }
    }

    struct BrokenPersistence;

    #[async_trait]
    impl SessionPersistencePort for BrokenPersistence {
        async fn load(&self, _key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
            Err(PersistenceError::Unavailable("down".to_string()))
        }

        async fn save(&self, _key: &str, _bytes: Vec<u8>) -> Result<(), PersistenceError> {
            Err(PersistenceError::Backend("down".to_string()))
        }
    }

    /// Counts save calls; none of them ever completes
    #[derive(Default)]
    struct StalledPersistence {
        calls: StdMutex<usize>,
    }

    #[async_trait]
    impl SessionPersistencePort for StalledPersistence {
        async fn load(&self, _key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
            Ok(None)
        }

        async fn save(&self, _key: &str, _bytes: Vec<u8>) -> Result<(), PersistenceError> {
            *self.calls.lock().unwrap() += 1;
            std::future::pending::<()>().await;
            Ok(())
        }
    }

    async fn eventually(mut check: impl FnMut() -> bool) {
        for _ in 0..200 {
            if check() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not reached");
    }

    fn record(session: &mut Session, text: &str) {
        session.record(Role::User, text, Utc::now(), &MemoryPolicy::default());
    }

    fn pending_generation(registry: &SessionRegistry, id: &str) -> Option<u64> {
        let entry = registry.sessions.get(id).unwrap();
        let state = entry.saves.state();
        state.pending.as_ref().map(|(generation, _)| *generation)
    }

    #[tokio::test]
    async fn test_sessions_created_lazily() {
        let registry = SessionRegistry::new(Arc::new(NoPersistence));
        assert!(registry.is_empty());
        let turns = registry.read("a", |s| s.log().len()).await;
        assert_eq!(turns, 0);
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_update_persists_and_rehydrates() {
        let store = Arc::new(MapPersistence::default());
        let registry = SessionRegistry::new(store.clone());
        registry.update("a", |s| record(s, "hello there")).await;

        eventually(|| store.entries.lock().unwrap().contains_key("parley/session/a")).await;

        let restarted = SessionRegistry::new(store.clone());
        let turns = restarted.read("a", |s| s.log().len()).await;
        assert_eq!(turns, 1);
    }

    #[tokio::test]
    async fn test_latest_generation_wins() {
        let store = Arc::new(MapPersistence::default());
        let registry = SessionRegistry::new(store.clone());
        for i in 0..5 {
            registry.update("a", |s| record(s, &format!("turn {}", i))).await;
        }

        eventually(|| {
            store
                .entries
                .lock()
                .unwrap()
                .get("parley/session/a")
                .and_then(|bytes| Session::from_bytes(bytes).ok())
                .is_some_and(|s| s.log().len() == 5)
        })
        .await;
        assert!(*store.saves.lock().unwrap() <= 5);
    }

    #[tokio::test]
    async fn test_broken_persistence_never_fails_a_turn() {
        let registry = SessionRegistry::new(Arc::new(BrokenPersistence));
        registry.update("a", |s| record(s, "hello")).await;
        let turns = registry.read("a", |s| s.log().len()).await;
        assert_eq!(turns, 1);
    }

    #[tokio::test]
    async fn test_stalled_store_keeps_one_pending_snapshot() {
        let store = Arc::new(StalledPersistence::default());
        let registry = SessionRegistry::new(store.clone());

        registry.update("a", |s| record(s, "turn 0")).await;
        // the writer takes generation 1 and parks inside save
        eventually(|| *store.calls.lock().unwrap() == 1).await;

        for i in 1..20 {
            registry.update("a", |s| record(s, &format!("turn {}", i))).await;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(*store.calls.lock().unwrap(), 1);
        assert_eq!(pending_generation(&registry, "a"), Some(20));
    }

    #[tokio::test]
    async fn test_turns_proceed_while_flush_waits_on_stalled_store() {
        let store = Arc::new(StalledPersistence::default());
        let registry = Arc::new(SessionRegistry::new(store.clone()));
        registry.update("a", |s| record(s, "first")).await;
        eventually(|| *store.calls.lock().unwrap() == 1).await;

        let flushing = {
            let registry = registry.clone();
            tokio::spawn(async move { registry.flush().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        let turns = tokio::time::timeout(
            Duration::from_secs(2),
            registry.update("a", |s| {
                record(s, "second");
                s.log().len()
            }),
        )
        .await
        .expect("turn must not wait for flush");
        assert_eq!(turns, 2);
        assert!(!flushing.is_finished());
        flushing.abort();
    }

    #[tokio::test]
    async fn test_mismatched_snapshot_is_ignored() {
        let store = Arc::new(MapPersistence::default());
        let mut other = Session::new("b");
        record(&mut other, "not yours");
        store
            .entries
            .lock()
            .unwrap()
            .insert("parley/session/a".to_string(), other.to_bytes().unwrap());

        let registry = SessionRegistry::new(store);
        let id = registry.read("a", |s| s.id().to_string()).await;
        assert_eq!(id, "a");
        assert_eq!(registry.read("a", |s| s.log().len()).await, 0);
    }

    #[tokio::test]
    async fn test_garbage_snapshot_is_ignored() {
        let store = Arc::new(MapPersistence::default());
        store
            .entries
            .lock()
            .unwrap()
            .insert("parley/session/a".to_string(), b"{broken".to_vec());
        let registry = SessionRegistry::new(store);
        assert_eq!(registry.read("a", |s| s.log().len()).await, 0);
    }

    #[tokio::test]
    async fn test_flush_writes_pending_generations() {
        let store = Arc::new(MapPersistence::default());
        let registry = SessionRegistry::new(store.clone());
        registry.update("a", |s| record(s, "one")).await;
        registry.update("b", |s| record(s, "two")).await;

        registry.flush().await;
        let entries = store.entries.lock().unwrap();
        assert!(entries.contains_key("parley/session/a"));
        assert!(entries.contains_key("parley/session/b"));
        drop(entries);

        // nothing left to write
        assert_eq!(registry.flush().await, 0);
    }

    #[test]
    fn test_persist_without_runtime_queues_for_flush() {
        let store = Arc::new(MapPersistence::default());
        let registry = SessionRegistry::new(store.clone());
        let mut slot = SessionSlot::new("b");
        let saves = Arc::new(SaveQueue::default());
        registry.persist(&mut slot, &saves);
        assert_eq!(slot.generation, 1);
        assert!(store.entries.lock().unwrap().is_empty());
        assert!(!saves.state().writer_running);
        assert_eq!(saves.state().pending.as_ref().map(|(g, _)| *g), Some(1));
    }
}
