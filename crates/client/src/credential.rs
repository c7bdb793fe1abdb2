//! The process-wide bearer credential.
//!
//! The [`SessionManager`](crate::session::SessionManager) is the only
//! writer; the [`HttpGateway`](crate::gateway::HttpGateway) and any other
//! reader observe the latest value on each access rather than caching it.

use std::sync::{Arc, RwLock};

/// Opaque bearer token proving authentication to the backend.
///
/// `Debug` is redacted so the token never lands in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wrap a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Expose the raw token for header construction.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("BearerToken").field(&"[REDACTED]").finish()
    }
}

/// Shared cell holding the current credential, if any.
///
/// Cloning the cell clones the handle, not the token: all clones observe
/// the same value. Reads never block on network; the lock is held only for
/// the copy.
#[derive(Debug, Clone, Default)]
pub struct CredentialCell {
    inner: Arc<RwLock<Option<BearerToken>>>,
}

impl CredentialCell {
    /// Create an empty cell.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the current token, if one is held.
    #[must_use]
    pub fn get(&self) -> Option<BearerToken> {
        self.inner.read().map(|guard| guard.clone()).unwrap_or(None)
    }

    /// Whether a token is currently held.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.get().is_some()
    }

    /// Replace the held token. Session manager only.
    pub(crate) fn set(&self, token: BearerToken) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = Some(token);
        }
    }

    /// Drop the held token. Session manager only.
    pub(crate) fn clear(&self) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = None;
        }
    }
}
