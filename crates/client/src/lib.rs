//! AgroLink admin client library.
//!
//! Headless client for the AgroLink marketplace administration API. The
//! view layer (tables, charts, layout) lives elsewhere; this crate owns the
//! parts with real machinery:
//!
//! - [`session`] - login, logout, persisted-credential restore, and the
//!   client-side admin-role gate that fences everything else off
//! - [`list`] - the generic fetch/paginate/filter controller behind every
//!   list page, with last-trigger-wins stale-response discarding
//! - [`workflow`] - the open/submit/close state machine behind
//!   review-and-decide interactions (payout completion, verification review)
//! - [`gateway`] - bearer-authenticated HTTP transport with normalized
//!   failures and `{data: ...}` envelope handling
//! - [`api`] - typed functions for every admin endpoint
//!
//! # Example
//!
//! ```rust,ignore
//! use agrolink_admin_client::config::ClientConfig;
//! use agrolink_admin_client::credential::CredentialCell;
//! use agrolink_admin_client::gateway::HttpGateway;
//! use agrolink_admin_client::session::{FileSessionStore, SessionManager};
//!
//! let config = ClientConfig::from_env()?;
//! let gateway = HttpGateway::new(config.base_url.clone(), CredentialCell::new());
//! let store = FileSessionStore::new(config.session_file.clone());
//! let session = SessionManager::new(gateway, Box::new(store));
//! session.login("ops@agrolink.id", &password).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod credential;
pub mod gateway;
pub mod list;
pub mod session;
pub mod workflow;
