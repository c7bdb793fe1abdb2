//! Durable session persistence port.
//!
//! The session manager has no implicit dependency on a specific storage
//! mechanism: anything implementing [`SessionStore`] will do. Production
//! uses [`FileSessionStore`] (one JSON file); tests use
//! [`MemorySessionStore`].

use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::Principal;

/// The record persisted between runs.
///
/// Token and principal are stored together so that a restored session
/// upholds the "principal present iff credential present" invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    /// Raw bearer token.
    pub token: String,
    /// The admin principal the token belongs to.
    pub principal: Principal,
}

/// Injectable persistence port for the session.
pub trait SessionStore: Send + Sync {
    /// Load the persisted session, if any.
    ///
    /// Malformed or unreadable state yields `None`; restore must degrade
    /// to an anonymous session rather than fail.
    fn load(&self) -> Option<StoredSession>;

    /// Persist the session.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if the session cannot be written.
    fn save(&self, session: &StoredSession) -> io::Result<()>;

    /// Remove any persisted session. Removing an absent session is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if existing state cannot be removed.
    fn clear(&self) -> io::Result<()>;
}

/// Session store backed by a single JSON file.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Create a store persisting to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<StoredSession> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Ignoring malformed session file"
                );
                None
            }
        }
    }

    fn save(&self, session: &StoredSession) -> io::Result<()> {
        let raw = serde_json::to_string(session)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        std::fs::write(&self.path, raw)
    }

    fn clear(&self) -> io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// In-memory session store for deterministic tests.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: Mutex<Option<StoredSession>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store preloaded with a session.
    #[must_use]
    pub fn with_session(session: StoredSession) -> Self {
        Self {
            inner: Mutex::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<StoredSession> {
        self.inner.lock().ok().and_then(|guard| guard.clone())
    }

    fn save(&self, session: &StoredSession) -> io::Result<()> {
        if let Ok(mut guard) = self.inner.lock() {
            *guard = Some(session.clone());
        }
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        if let Ok(mut guard) = self.inner.lock() {
            *guard = None;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use agrolink_core::{Role, UserId};

    use super::*;

    fn sample() -> StoredSession {
        StoredSession {
            token: "tok-abc".to_string(),
            principal: Principal {
                id: UserId::new("u-1"),
                name: Some("Ops".to_string()),
                role: Role::Admin,
            },
        }
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileSessionStore::new(dir.path().join("session.json"));

        assert!(store.load().is_none());
        store.save(&sample()).expect("save");
        assert_eq!(store.load(), Some(sample()));

        store.clear().expect("clear");
        assert!(store.load().is_none());
    }

    #[test]
    fn test_file_store_clear_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileSessionStore::new(dir.path().join("session.json"));
        store.clear().expect("clear without file");
        store.save(&sample()).expect("save");
        store.clear().expect("first clear");
        store.clear().expect("second clear");
    }

    #[test]
    fn test_file_store_ignores_malformed_content() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").expect("write");

        let store = FileSessionStore::new(path);
        assert!(store.load().is_none());
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemorySessionStore::new();
        assert!(store.load().is_none());
        store.save(&sample()).expect("save");
        assert_eq!(store.load(), Some(sample()));
        store.clear().expect("clear");
        assert!(store.load().is_none());
    }
}
