use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use folio_api::endpoints::UserId;

use crate::common::UserProfile;
use crate::server::error::ServerError;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

/// In-memory user accounts, unique by exact email.
///
/// Hashing and verification are CPU-bound; call `register` and
/// `authenticate` from a blocking task.
pub struct UserStore {
    users: DashMap<UserId, User>,
    emails: DashMap<String, UserId>,
    hash_cost: u32,
}

impl UserStore {
    pub fn new(hash_cost: u32) -> Self {
        Self {
            users: DashMap::new(),
            emails: DashMap::new(),
            hash_cost,
        }
    }

    pub fn register(&self, email: &str, password: &str, name: &str) -> Result<User, ServerError> {
        let email = email.trim();
        let name = name.trim();

        if email.is_empty() || !email.contains('@') {
            return Err(ServerError::BadRequest("A valid email is required".to_string()));
        }
        if name.is_empty() {
            return Err(ServerError::BadRequest("Name is required".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ServerError::BadRequest(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if self.emails.contains_key(email) {
            return Err(ServerError::BadRequest("Email already registered".to_string()));
        }

        let password_hash = bcrypt::hash(password, self.hash_cost)?;

        let user = User {
            id: UserId::new_v4(),
            email: email.to_string(),
            name: name.to_string(),
            password_hash,
            created_at: Utc::now(),
        };

        // Re-checked under the shard lock; two registrations may have raced past the check above
        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => {
                return Err(ServerError::BadRequest("Email already registered".to_string()));
            }
            Entry::Vacant(entry) => {
                entry.insert(user.id);
            }
        }
        self.users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, "Registered user");
        Ok(user)
    }

    /// Unknown email and wrong password are indistinguishable to the caller
    pub fn authenticate(&self, email: &str, password: &str) -> Result<User, ServerError> {
        let invalid = || ServerError::Unauthorized("Invalid email or password".to_string());

        let user = self
            .emails
            .get(email.trim())
            .and_then(|id| self.get(*id))
            .ok_or_else(invalid)?;

        if !bcrypt::verify(password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(invalid());
        }

        Ok(user)
    }

    pub fn get(&self, id: UserId) -> Option<User> {
        self.users.get(&id).map(|u| u.value().clone())
    }

    pub fn exists(&self, id: UserId) -> bool {
        self.users.contains_key(&id)
    }

    /// Remove an account; tokens issued for it stop working
    pub fn remove(&self, id: UserId) -> Option<User> {
        let (_, user) = self.users.remove(&id)?;
        self.emails.remove(&user.email);
        Some(user)
    }
}
