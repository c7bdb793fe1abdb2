//! Authentication session for the admin panel.
//!
//! The [`SessionManager`] owns the login/logout lifecycle, the persisted
//! credential, and the client-side role gate: only a principal whose role
//! is `admin` may hold a session, regardless of what the server
//! authenticated. Every other component in this crate is fenced off behind
//! it.

mod store;

pub use store::{FileSessionStore, MemorySessionStore, SessionStore, StoredSession};

use std::sync::RwLock;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use agrolink_core::{Role, UserId};

use crate::credential::{BearerToken, CredentialCell};
use crate::gateway::{GatewayError, HttpGateway};

const LOGIN_PATH: &str = "/public/auth/login";

/// Errors surfaced by session operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The login request itself failed (bad credentials, transport, ...).
    #[error("login failed: {0}")]
    Gateway(#[from] GatewayError),

    /// The server authenticated the credentials, but the principal is not
    /// an admin. No token is stored.
    #[error("access denied: role '{0}' may not use the admin panel")]
    AccessDenied(Role),

    /// The session could not be persisted.
    #[error("failed to persist session: {0}")]
    Store(#[from] std::io::Error),
}

/// The authenticated identity behind a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Platform user ID.
    pub id: UserId,
    /// Display name, when the backend provides one.
    #[serde(default)]
    pub name: Option<String>,
    /// Platform role; always [`Role::Admin`] once a session is held.
    pub role: Role,
}

/// Session state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No credential held.
    Anonymous,
    /// A login request is in flight.
    Authenticating,
    /// Logged in as an admin principal.
    Authenticated(Principal),
    /// The last login attempt failed; no credential held.
    Error(String),
}

/// Snapshot of the current session.
///
/// Invariant: `principal` is present iff `credential` is present.
#[derive(Debug, Clone)]
pub struct Session {
    /// Current bearer credential, if authenticated.
    pub credential: Option<BearerToken>,
    /// Current principal, if authenticated.
    pub principal: Option<Principal>,
}

impl Session {
    /// Whether this session may drive admin components.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.principal
            .as_ref()
            .is_some_and(|p| p.role.is_admin())
            && self.credential.is_some()
    }
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// `data` payload of a successful login response.
#[derive(Debug, Deserialize)]
struct LoginData {
    token: String,
    user: Principal,
}

/// Owns the authentication session.
///
/// Construction attempts restoration from the injected [`SessionStore`]
/// exactly once, synchronously; malformed or absent stored state falls
/// back to [`SessionState::Anonymous`] without error.
pub struct SessionManager {
    gateway: HttpGateway,
    store: Box<dyn SessionStore>,
    credential: CredentialCell,
    state: RwLock<SessionState>,
}

impl SessionManager {
    /// Create a session manager over `gateway`, restoring any persisted
    /// session from `store`.
    ///
    /// The gateway's credential cell becomes this manager's; no other
    /// component may write it.
    #[must_use]
    pub fn new(gateway: HttpGateway, store: Box<dyn SessionStore>) -> Self {
        let credential = gateway.credential().clone();

        let state = store.load().map_or(SessionState::Anonymous, |stored| {
            tracing::debug!(principal = %stored.principal.id, "Restored persisted session");
            credential.set(BearerToken::new(stored.token));
            SessionState::Authenticated(stored.principal)
        });

        Self {
            gateway,
            store,
            credential,
            state: RwLock::new(state),
        }
    }

    /// Log in with email and password.
    ///
    /// On success the credential is persisted and attached to all
    /// subsequent gateway requests. A principal whose role is not `admin`
    /// is refused client-side and its token is deliberately dropped.
    ///
    /// Concurrent calls are not coalesced; callers must serialize.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Gateway`] if the request fails,
    /// [`AuthError::AccessDenied`] if the principal is not an admin, or
    /// [`AuthError::Store`] if the session cannot be persisted. In every
    /// failure case the session holds no credential.
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Principal, AuthError> {
        self.set_state(SessionState::Authenticating);

        let request = LoginRequest {
            email,
            password: password.expose_secret(),
        };

        let data = match self
            .gateway
            .post_json::<LoginData, _>(LOGIN_PATH, &request)
            .await
        {
            Ok(data) => data,
            Err(e) => {
                self.set_state(SessionState::Error(e.user_message()));
                return Err(e.into());
            }
        };

        self.complete_login(data)
    }

    /// Apply the role gate and persistence to a parsed login payload.
    fn complete_login(&self, data: LoginData) -> Result<Principal, AuthError> {
        if !data.user.role.is_admin() {
            let role = data.user.role;
            tracing::warn!(%role, "Login refused: non-admin principal");
            self.set_state(SessionState::Error(format!(
                "access denied: role '{role}' may not use the admin panel"
            )));
            return Err(AuthError::AccessDenied(role));
        }

        let stored = StoredSession {
            token: data.token,
            principal: data.user,
        };

        // Persist before exposing the credential: a session we cannot
        // restore next run is reported as a failure, not as logged in.
        if let Err(e) = self.store.save(&stored) {
            self.set_state(SessionState::Error(format!("failed to persist session: {e}")));
            return Err(AuthError::Store(e));
        }

        self.credential.set(BearerToken::new(stored.token));
        self.set_state(SessionState::Authenticated(stored.principal.clone()));
        tracing::info!(principal = %stored.principal.id, "Logged in");

        Ok(stored.principal)
    }

    /// Log out: clear the in-memory credential and the persisted session.
    ///
    /// Idempotent; never performs a network call. The in-memory
    /// credential is dropped even when clearing the store fails, so the
    /// running process is logged out either way.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Store`] when the persisted session could not
    /// be removed; it would be restored on the next start.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.credential.clear();
        self.set_state(SessionState::Anonymous);
        self.store.clear().map_err(|e| {
            tracing::warn!(error = %e, "Failed to clear persisted session");
            AuthError::Store(e)
        })
    }

    /// Snapshot of the current session. Pure read.
    #[must_use]
    pub fn current_session(&self) -> Session {
        let principal = match self.state_snapshot() {
            SessionState::Authenticated(p) => Some(p),
            _ => None,
        };
        Session {
            credential: self.credential.get(),
            principal,
        }
    }

    /// Current state of the session machine.
    #[must_use]
    pub fn state_snapshot(&self) -> SessionState {
        self.state
            .read()
            .map(|guard| guard.clone())
            .unwrap_or(SessionState::Anonymous)
    }

    /// Whether an admin principal currently holds the session.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.current_session().is_admin()
    }

    fn set_state(&self, next: SessionState) {
        if let Ok(mut guard) = self.state.write() {
            tracing::debug!(from = ?*guard, to = ?next, "Session transition");
            *guard = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager_with_store(store: Box<dyn SessionStore>) -> SessionManager {
        // The base URL is never contacted by these tests
        let gateway = HttpGateway::new("http://127.0.0.1:1", CredentialCell::new());
        SessionManager::new(gateway, store)
    }

    fn login_data(role: Role) -> LoginData {
        LoginData {
            token: "tok-1".to_string(),
            user: Principal {
                id: UserId::new("u-1"),
                name: Some("Ops".to_string()),
                role,
            },
        }
    }

    #[test]
    fn test_starts_anonymous_without_persisted_session() {
        let manager = manager_with_store(Box::new(MemorySessionStore::new()));
        assert_eq!(manager.state_snapshot(), SessionState::Anonymous);

        let session = manager.current_session();
        assert!(session.credential.is_none());
        assert!(session.principal.is_none());
        assert!(!session.is_admin());
    }

    #[test]
    fn test_restores_persisted_session_once() {
        let stored = StoredSession {
            token: "tok-9".to_string(),
            principal: Principal {
                id: UserId::new("u-9"),
                name: None,
                role: Role::Admin,
            },
        };
        let manager = manager_with_store(Box::new(MemorySessionStore::with_session(stored)));

        let session = manager.current_session();
        assert!(session.is_admin());
        assert_eq!(session.credential.expect("credential").expose(), "tok-9");
    }

    #[test]
    fn test_admin_login_persists_and_authenticates() {
        let manager = manager_with_store(Box::new(MemorySessionStore::new()));
        let principal = manager
            .complete_login(login_data(Role::Admin))
            .expect("admin login");

        assert_eq!(principal.role, Role::Admin);
        assert!(manager.is_admin());
        assert_eq!(manager.store.load().expect("persisted").token, "tok-1");
    }

    #[test]
    fn test_non_admin_login_refused_and_nothing_stored() {
        let manager = manager_with_store(Box::new(MemorySessionStore::new()));
        let err = manager
            .complete_login(login_data(Role::Farmer))
            .expect_err("must refuse");

        assert!(matches!(err, AuthError::AccessDenied(Role::Farmer)));
        // No credential, no persisted session, observably anonymous
        let session = manager.current_session();
        assert!(session.credential.is_none());
        assert!(session.principal.is_none());
        assert!(manager.store.load().is_none());
        assert!(matches!(manager.state_snapshot(), SessionState::Error(_)));
    }

    #[test]
    fn test_store_failure_does_not_authenticate() {
        struct FailingStore;
        impl SessionStore for FailingStore {
            fn load(&self) -> Option<StoredSession> {
                None
            }
            fn save(&self, _session: &StoredSession) -> std::io::Result<()> {
                Err(std::io::Error::other("disk full"))
            }
            fn clear(&self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let manager = manager_with_store(Box::new(FailingStore));
        let err = manager
            .complete_login(login_data(Role::Admin))
            .expect_err("save must fail");

        assert!(matches!(err, AuthError::Store(_)));
        assert!(manager.current_session().credential.is_none());
        assert!(!manager.is_admin());
    }

    #[test]
    fn test_logout_is_idempotent() {
        let manager = manager_with_store(Box::new(MemorySessionStore::new()));
        manager
            .complete_login(login_data(Role::Admin))
            .expect("login");
        assert!(manager.is_admin());

        manager.logout().expect("logout");
        manager.logout().expect("logout again");

        assert_eq!(manager.state_snapshot(), SessionState::Anonymous);
        assert!(manager.current_session().credential.is_none());
        assert!(manager.store.load().is_none());
    }

    #[test]
    fn test_logout_surfaces_store_clear_failure() {
        struct StickyStore;
        impl SessionStore for StickyStore {
            fn load(&self) -> Option<StoredSession> {
                None
            }
            fn save(&self, _session: &StoredSession) -> std::io::Result<()> {
                Ok(())
            }
            fn clear(&self) -> std::io::Result<()> {
                Err(std::io::Error::other("read-only filesystem"))
            }
        }

        let manager = manager_with_store(Box::new(StickyStore));
        manager
            .complete_login(login_data(Role::Admin))
            .expect("login");

        let err = manager.logout().expect_err("clear must fail");
        assert!(matches!(err, AuthError::Store(_)));
        // The running process is still logged out
        assert_eq!(manager.state_snapshot(), SessionState::Anonymous);
        assert!(manager.current_session().credential.is_none());
    }
}
