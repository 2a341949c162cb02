use crate::common::{Claims, StoredSession};
use crate::error::AuthError;
use chrono::{Duration, Utc};
use std::fs;
use std::path::PathBuf;

/// Access tokens this close to expiry are treated as already expired
const EXPIRY_BUFFER: Duration = Duration::minutes(1);

/// On-disk copy of the session so a restart does not require a new login
#[derive(Debug, Clone)]
pub struct TokenStore {
    session_path: PathBuf,
}

impl TokenStore {
    pub fn new() -> Result<Self, AuthError> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| AuthError::TokenStorage("No cache directory on this platform".into()))?
            .join("folio");
        Ok(Self::at(cache_dir.join("session.json")))
    }

    pub fn at(session_path: PathBuf) -> Self {
        Self { session_path }
    }

    pub fn save(&self, session: &StoredSession) -> Result<(), AuthError> {
        if let Some(parent) = self.session_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AuthError::TokenStorage(format!("Failed to create cache directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(session)?;
        fs::write(&self.session_path, json)
            .map_err(|e| AuthError::TokenStorage(format!("Failed to save session: {}", e)))?;

        // Owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.session_path, fs::Permissions::from_mode(0o600)).map_err(
                |e| AuthError::TokenStorage(format!("Failed to set file permissions: {}", e)),
            )?;
        }

        Ok(())
    }

    pub fn load(&self) -> Result<Option<StoredSession>, AuthError> {
        if !self.session_path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&self.session_path)
            .map_err(|e| AuthError::TokenStorage(format!("Failed to read session: {}", e)))?;

        let session = serde_json::from_str(&json)?;
        Ok(Some(session))
    }

    pub fn delete(&self) -> Result<(), AuthError> {
        if self.session_path.exists() {
            fs::remove_file(&self.session_path)
                .map_err(|e| AuthError::TokenStorage(format!("Failed to delete session: {}", e)))?;
        }
        Ok(())
    }

    /// Undecodable tokens count as expired
    pub fn is_access_expired(&self, session: &StoredSession) -> bool {
        match Claims::decode_unverified(&session.access_token) {
            Ok(claims) => claims.exp <= (Utc::now() + EXPIRY_BUFFER).timestamp(),
            Err(_) => true,
        }
    }
}
