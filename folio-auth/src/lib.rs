// Common types shared between client and server
pub mod common;

// Client library (public API for folio)
mod client;
mod error;

pub use client::{
    authenticate, AuthBackend, AuthClientError, AuthFailure, AuthSession, RequestError,
    ServerAuthClient, SessionError, SessionState, SessionStatus, Settings, TokenStore,
};
pub use common::{CurrentUser, StoredSession};
pub use error::AuthError;

// Server modules (public for binary, internal for library)
#[cfg(feature = "server")]
pub mod server;
