pub mod auth_client;
mod config;
mod session;
mod token_storage;

pub use auth_client::{AuthClientError, ServerAuthClient};
pub use config::Settings;
pub use session::{
    AuthBackend, AuthFailure, AuthSession, RequestError, SessionError, SessionState,
    SessionStatus,
};
pub use token_storage::TokenStore;

use crate::error::AuthError;
use std::io::{BufRead, Write};

const LOGIN_ATTEMPTS: usize = 3;

/// Authenticate user before starting TUI.
///
/// Resumes the persisted session when possible, otherwise prompts for
/// credentials on the terminal.
pub async fn authenticate() -> Result<AuthSession<ServerAuthClient>, AuthError> {
    let settings = Settings::new().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("\nPlease create a config.toml file with the following content:");
        eprintln!("\nserver_url = \"http://localhost:8080\"");
        AuthError::Configuration(e.to_string())
    })?;

    settings.validate().map_err(|e| {
        eprintln!("Configuration validation failed: {}", e);
        AuthError::Configuration(e)
    })?;

    let auth_client = ServerAuthClient::new(settings.server_url.clone())?;
    let token_store = TokenStore::new()?;
    let session = AuthSession::new(auth_client).with_store(token_store.clone());

    let stored = match token_store.load() {
        Ok(stored) => stored,
        Err(e) => {
            tracing::warn!("Ignoring unreadable persisted session: {}", e);
            token_store.delete()?;
            None
        }
    };

    if let Some(stored) = stored {
        let expired = token_store.is_access_expired(&stored);
        session.restore(stored);

        if expired {
            println!("Session expired, attempting to refresh...");
            if let Err(e) = session.refresh().await {
                eprintln!("Failed to refresh session: {}", e);
            }
        }

        if session.is_authenticated() && resume(&session).await {
            return Ok(session);
        }
    }

    prompt_credentials(&session).await?;
    Ok(session)
}

/// Confirms a restored session with the server before the board opens
async fn resume(session: &AuthSession<ServerAuthClient>) -> bool {
    match session.verify().await {
        Ok(user) => {
            println!("✓ Signed in as {} <{}>", user.name, user.email);
            true
        }
        Err(RequestError::Session(e)) => {
            eprintln!("Stored session is no longer valid: {}", e);
            false
        }
        // Server unreachable: keep the session, the board reports load errors
        Err(RequestError::Api(e)) => {
            tracing::warn!("Could not confirm stored session: {}", e);
            true
        }
    }
}

/// Interactive login, or registration when a name is given
async fn prompt_credentials(session: &AuthSession<ServerAuthClient>) -> Result<(), AuthError> {
    println!("\n=== Folio Login ===\n");
    println!("Leave the name empty to log in to an existing account.\n");

    for attempt in 1..=LOGIN_ATTEMPTS {
        let email = prompt("Email")?;
        let password = prompt("Password")?;
        let name = prompt("Name")?;

        let result = if name.is_empty() {
            session.login(&email, &password).await
        } else {
            session.register(&email, &password, &name).await
        };

        match result {
            Ok(user) => {
                println!("✓ Logged in as {} <{}>\n", user.name, user.email);
                return Ok(());
            }
            Err(e @ (SessionError::InvalidCredentials | SessionError::Rejected(_))) => {
                eprintln!("{} (attempt {}/{})\n", e, attempt, LOGIN_ATTEMPTS);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(AuthError::Session(SessionError::InvalidCredentials))
}

fn prompt(label: &str) -> Result<String, AuthError> {
    print!("{}: ", label);
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
