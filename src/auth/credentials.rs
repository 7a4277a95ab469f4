//! In-memory credential store with salted password hashing.

use std::collections::HashMap;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use rand::RngCore;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::common::time::now_unix_millis;
use crate::domain::Username;

/// Minimum accepted username length at registration.
pub const MIN_USERNAME_LEN: usize = 3;
/// Minimum accepted password length at registration.
pub const MIN_PASSWORD_LEN: usize = 4;

/// Credential errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("username must be at least {} characters", MIN_USERNAME_LEN)]
    UsernameTooShort,
    #[error("password must be at least {} characters", MIN_PASSWORD_LEN)]
    PasswordTooShort,
    #[error("username is already taken")]
    UsernameTaken,
    #[error("invalid username or password")]
    InvalidCredentials,
}

/// Validates credentials and returns the bound identity.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Create an account and return its identity.
    async fn register(&self, username: &str, password: &str)
    -> Result<Username, CredentialError>;

    /// Check a username/password pair. Unknown users and wrong passwords are
    /// indistinguishable to the caller.
    async fn verify(&self, username: &str, password: &str) -> Result<Username, CredentialError>;
}

struct UserRecord {
    salt: [u8; 16],
    password_hash: String,
    #[allow(dead_code)]
    created_at: i64,
}

/// In-memory account storage. Accounts do not survive a process restart.
pub struct InMemoryCredentialStore {
    users: Mutex<HashMap<String, UserRecord>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

fn hash_password(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    STANDARD.encode(hasher.finalize())
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Username, CredentialError> {
        if username.chars().count() < MIN_USERNAME_LEN {
            return Err(CredentialError::UsernameTooShort);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(CredentialError::PasswordTooShort);
        }
        let identity = Username::new(username.to_string())
            .map_err(|_| CredentialError::UsernameTooShort)?;

        let mut users = self.users.lock().await;
        if users.contains_key(identity.as_str()) {
            return Err(CredentialError::UsernameTaken);
        }

        let mut salt = [0u8; 16];
        rand::rng().fill_bytes(&mut salt);
        let record = UserRecord {
            salt,
            password_hash: hash_password(&salt, password),
            created_at: now_unix_millis(),
        };
        users.insert(identity.as_str().to_string(), record);
        tracing::info!("registered user '{}'", identity.as_str());

        Ok(identity)
    }

    async fn verify(&self, username: &str, password: &str) -> Result<Username, CredentialError> {
        let users = self.users.lock().await;
        let record = users
            .get(username)
            .ok_or(CredentialError::InvalidCredentials)?;

        if hash_password(&record.salt, password) != record.password_hash {
            return Err(CredentialError::InvalidCredentials);
        }

        Username::new(username.to_string()).map_err(|_| CredentialError::InvalidCredentials)
    }
}
