//! Snapshot persistence behind a small key/value port.
//!
//! Values are JSON documents, one per key. Handles that share a backend see
//! each other's writes as `StorageEvent`s, the way browser tabs observe
//! storage events from other tabs.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::{
    prelude::{Arc, HashMap, Mutex},
    MarketError, Result,
};

static NEXT_ORIGIN: AtomicU64 = AtomicU64::new(1);

fn next_origin() -> u64 {
    NEXT_ORIGIN.fetch_add(1, Ordering::Relaxed)
}

/// A write observed on a shared backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    /// `None` when the key was removed
    pub new_value: Option<String>,
    /// Handle that performed the write
    pub origin: u64,
}

/// Durable key/value storage for state snapshots
pub trait PersistencePort {
    fn load(&self, key: &str) -> Result<Option<String>>;

    fn save(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    /// Change notifications for this backend, including own writes
    fn subscribe(&self) -> Receiver<StorageEvent>;

    /// Identifier of this handle, carried by the events it causes
    fn origin(&self) -> u64;
}

#[derive(Default)]
struct MemoryBackend {
    values: HashMap<String, String>,
    subscribers: Vec<Sender<StorageEvent>>,
}

impl MemoryBackend {
    fn notify(&mut self, event: StorageEvent) {
        // Drop subscribers whose receiver is gone
        self.subscribers
            .retain(|tx| tx.send(event.clone()).is_ok());
    }
}

/// In-process storage shared between handles
pub struct MemoryPersistence {
    backend: Arc<Mutex<MemoryBackend>>,
    origin: u64,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self {
            backend: Arc::new(Mutex::new(MemoryBackend::default())),
            origin: next_origin(),
        }
    }

    /// Opens another handle on the same backend
    pub fn connect(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            origin: next_origin(),
        }
    }

    fn with_backend<R>(&self, f: impl FnOnce(&mut MemoryBackend) -> R) -> Result<R> {
        let mut guard = self
            .backend
            .lock()
            .map_err(|_| MarketError::Persistence("storage backend lock poisoned".into()))?;
        Ok(f(&mut guard))
    }
}

impl Default for MemoryPersistence {
    fn default() -> Self {
        Self::new()
    }
}

impl PersistencePort for MemoryPersistence {
    fn load(&self, key: &str) -> Result<Option<String>> {
        self.with_backend(|b| b.values.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let origin = self.origin;
        self.with_backend(|b| {
            b.values.insert(key.to_string(), value.to_string());
            b.notify(StorageEvent {
                key: key.to_string(),
                new_value: Some(value.to_string()),
                origin,
            });
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        let origin = self.origin;
        self.with_backend(|b| {
            if b.values.remove(key).is_some() {
                b.notify(StorageEvent {
                    key: key.to_string(),
                    new_value: None,
                    origin,
                });
            }
        })
    }

    fn subscribe(&self) -> Receiver<StorageEvent> {
        let (tx, rx) = unbounded();
        match self.backend.lock() {
            Ok(mut backend) => backend.subscribers.push(tx),
            Err(_) => log::warn!("storage backend lock poisoned, subscription inactive"),
        }
        rx
    }

    fn origin(&self) -> u64 {
        self.origin
    }
}

/// One `<key>.json` file per key inside a directory
///
/// Files written by other processes are not watched; `subscribe` returns a
/// channel that never yields.
pub struct FilePersistence {
    dir: PathBuf,
    origin: u64,
    // Keeps the event channel open so receivers block instead of disconnecting
    _events: Sender<StorageEvent>,
    events_rx: Receiver<StorageEvent>,
}

impl FilePersistence {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        let (tx, rx) = unbounded();
        Ok(Self {
            dir,
            origin: next_origin(),
            _events: tx,
            events_rx: rx,
        })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return Err(MarketError::Persistence(format!("invalid storage key: {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl PersistencePort for FilePersistence {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        // Readers never observe a partially written file
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn subscribe(&self) -> Receiver<StorageEvent> {
        self.events_rx.clone()
    }

    fn origin(&self) -> u64 {
        self.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_roundtrip_and_events() {
        let tab_a = MemoryPersistence::new();
        let tab_b = tab_a.connect();
        let events = tab_b.subscribe();

        tab_a.save("k", "[1]").unwrap();
        assert_eq!(tab_b.load("k").unwrap().as_deref(), Some("[1]"));

        let event = events.try_recv().unwrap();
        assert_eq!(event.key, "k");
        assert_eq!(event.origin, tab_a.origin());
        assert_ne!(event.origin, tab_b.origin());

        tab_a.remove("k").unwrap();
        assert_eq!(events.try_recv().unwrap().new_value, None);
        assert_eq!(tab_b.load("k").unwrap(), None);

        // Removing a missing key is silent
        tab_a.remove("k").unwrap();
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_file_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePersistence::open(dir.path()).unwrap();

        assert_eq!(store.load("mealbridge_role").unwrap(), None);
        store.save("mealbridge_role", "\"ngo\"").unwrap();
        assert_eq!(
            store.load("mealbridge_role").unwrap().as_deref(),
            Some("\"ngo\"")
        );
        assert!(dir.path().join("mealbridge_role.json").exists());

        store.remove("mealbridge_role").unwrap();
        store.remove("mealbridge_role").unwrap();
        assert_eq!(store.load("mealbridge_role").unwrap(), None);

        assert!(store.subscribe().try_recv().is_err());
    }

    #[test]
    fn test_file_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePersistence::open(dir.path()).unwrap();
        assert!(matches!(
            store.save("../escape", "x"),
            Err(MarketError::Persistence(_))
        ));
    }
}
