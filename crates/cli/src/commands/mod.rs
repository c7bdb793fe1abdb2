//! Command implementations, one module per command group.

pub mod auth;
pub mod payouts;
pub mod reports;
pub mod verifications;

use thiserror::Error;

use agrolink_admin_client::api::AdminApi;
use agrolink_admin_client::config::{ClientConfig, ConfigError};
use agrolink_admin_client::credential::CredentialCell;
use agrolink_admin_client::gateway::HttpGateway;
use agrolink_admin_client::session::{AuthError, FileSessionStore, SessionManager};
use agrolink_admin_client::workflow::WorkflowError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Login or session restore failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// No admin session is persisted.
    #[error("Not logged in as an admin. Run `agrolink-admin login` first")]
    NotLoggedIn,

    /// An action workflow was refused or failed.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// A request to the backend failed.
    #[error(transparent)]
    Gateway(#[from] agrolink_admin_client::gateway::GatewayError),

    /// Reading or writing a local file failed.
    #[error("File error: {0}")]
    File(#[from] std::io::Error),

    /// The command was invoked with unusable input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Everything a command needs: the session and the typed API.
pub struct Context {
    pub session: SessionManager,
    pub api: AdminApi,
}

/// Build a [`Context`] from the environment and the persisted session
/// file.
pub fn bootstrap() -> Result<Context, CliError> {
    let config = ClientConfig::from_env()?;
    let gateway = HttpGateway::new(config.base_url.clone(), CredentialCell::new());
    let store = FileSessionStore::new(config.session_file.clone());
    let session = SessionManager::new(gateway.clone(), Box::new(store));
    Ok(Context {
        session,
        api: AdminApi::new(gateway),
    })
}

/// Build a [`Context`] and refuse to proceed without an admin session.
pub fn bootstrap_admin() -> Result<Context, CliError> {
    let context = bootstrap()?;
    if !context.session.is_admin() {
        return Err(CliError::NotLoggedIn);
    }
    Ok(context)
}
