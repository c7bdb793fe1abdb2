//! Session management commands.
//!
//! # Environment Variables
//!
//! - `AGROLINK_ADMIN_PASSWORD` - password for `login` (prompted on stdin
//!   when unset)
//! - `AGROLINK_API_BASE_URL` - base URL of the AgroLink API
//! - `AGROLINK_SESSION_FILE` - path of the persisted session file

use std::io::{BufRead, Write};

use secrecy::SecretString;

use super::{CliError, bootstrap};

const PASSWORD_ENV: &str = "AGROLINK_ADMIN_PASSWORD";

/// Log in as a platform admin and persist the session.
#[allow(clippy::print_stdout)]
pub async fn login(email: &str) -> Result<(), CliError> {
    let context = bootstrap()?;
    let password = read_password()?;

    let principal = context.session.login(email, &password).await?;
    println!(
        "Logged in as {} ({})",
        principal.name.as_deref().unwrap_or(email),
        principal.role
    );
    Ok(())
}

/// Drop the persisted session. Safe to run when not logged in.
#[allow(clippy::print_stdout)]
pub fn logout() -> Result<(), CliError> {
    let context = bootstrap()?;
    context.session.logout()?;
    println!("Logged out");
    Ok(())
}

/// Show the currently persisted principal.
#[allow(clippy::print_stdout)]
pub fn whoami() -> Result<(), CliError> {
    let context = bootstrap()?;
    match context.session.current_session().principal {
        Some(principal) => println!(
            "{} ({}, id {})",
            principal.name.as_deref().unwrap_or("<unnamed>"),
            principal.role,
            principal.id
        ),
        None => println!("Not logged in"),
    }
    Ok(())
}

/// Take the password from the environment, or prompt for it.
#[allow(clippy::print_stdout)]
fn read_password() -> Result<SecretString, CliError> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(password));
    }

    print!("Password: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        return Err(CliError::InvalidInput("password must not be empty".into()));
    }
    Ok(SecretString::from(password))
}
