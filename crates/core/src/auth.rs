//! Authentication-session collaborator.
//!
//! Login is a plaintext comparison against the user list persisted under
//! the `users` key; the matched user becomes the session record under
//! `authUser`. This is demo-grade by design — there is no hashing, no
//! token, no expiry. The store's reset clears the session key along with
//! the data collections.

use crate::constants::{AUTH_USER_KEY, USERS_KEY};
use crate::sample::sample_users;
use crate::storage::StorageMedium;
use crate::StoreError;
use dcm_id::PatientId;
use dcm_types::EmailAddress;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Dashboard role of a login user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Patient,
}

/// A login user as persisted under the `users` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub role: Role,
    pub email: EmailAddress,
    /// Stored and compared in the clear.
    pub password: String,
    /// Links a `Patient`-role user to their patient record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<PatientId>,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Session operations over the shared storage medium.
pub struct AuthService {
    storage: Arc<dyn StorageMedium>,
}

impl AuthService {
    /// Creates the service over the same medium the store uses.
    pub fn new(storage: Arc<dyn StorageMedium>) -> Self {
        Self { storage }
    }

    /// Returns the user list, seeding the demo users when the key is
    /// absent. An unparsable list falls back to the demo users without
    /// overwriting whatever is stored.
    pub fn users(&self) -> AuthResult<Vec<User>> {
        match self.storage.read(USERS_KEY)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(users) => Ok(users),
                Err(e) => {
                    tracing::warn!("unparsable '{}' key, using demo users: {}", USERS_KEY, e);
                    Ok(sample_users())
                }
            },
            None => {
                let users = sample_users();
                let raw = serde_json::to_string(&users).map_err(StoreError::Serialization)?;
                self.storage.write(USERS_KEY, &raw)?;
                Ok(users)
            }
        }
    }

    /// Logs in with an email/password pair, persisting the matched user
    /// as the current session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` when no user matches, or a
    /// storage error if the session cannot be persisted.
    pub fn login(&self, email: &str, password: &str) -> AuthResult<User> {
        let user = self
            .users()?
            .into_iter()
            .find(|u| u.email.as_str() == email.trim() && u.password == password)
            .ok_or(AuthError::InvalidCredentials)?;

        let raw = serde_json::to_string(&user).map_err(StoreError::Serialization)?;
        self.storage.write(AUTH_USER_KEY, &raw)?;
        Ok(user)
    }

    /// Clears the current session. Logging out while logged out is fine.
    pub fn logout(&self) -> AuthResult<()> {
        self.storage.remove(AUTH_USER_KEY)?;
        Ok(())
    }

    /// Returns the logged-in user, if any. An unparsable session record
    /// counts as logged out.
    pub fn current_user(&self) -> AuthResult<Option<User>> {
        match self.storage.read(AUTH_USER_KEY)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(user) => Ok(Some(user)),
                Err(e) => {
                    tracing::warn!("unparsable '{}' key, treating as logged out: {}", AUTH_USER_KEY, e);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// True when a session record exists.
    pub fn is_authenticated(&self) -> AuthResult<bool> {
        Ok(self.current_user()?.is_some())
    }
}
