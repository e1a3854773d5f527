use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::config::SecurityConfig;

/// A stored user. The password is kept only as an argon2 PHC string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(rename = "hashed_password")]
    pub password_hash: String,
    #[serde(default)]
    pub premium: bool,
    pub created_at: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Username already registered: {0}")]
    Duplicate(String),

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("I/O error on user store: {0}")]
    Io(#[from] std::io::Error),

    #[error("User store is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Password hashing failed: {0}")]
    Hash(String),
}

/// Storage capability behind the credential store.
///
/// Records are keyed by `UserRecord::username` exactly as stored; the
/// whitespace-tolerant lookup lives one level up in [`crate::db::Store`].
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get(&self, username: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Inserts or replaces the record under its username.
    async fn put(&self, record: UserRecord) -> Result<(), StoreError>;

    async fn list(&self) -> Result<Vec<UserRecord>, StoreError>;

    async fn clear(&self) -> Result<(), StoreError>;

    fn backend_name(&self) -> &'static str;
}

#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl MemoryUserRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn get(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn put(&self, record: UserRecord) -> Result<(), StoreError> {
        self.users
            .write()
            .await
            .insert(record.username.clone(), record);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<UserRecord>, StoreError> {
        Ok(self.users.read().await.values().cloned().collect())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.users.write().await.clear();
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String, StoreError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None,
    )
    .map_err(|e| StoreError::Hash(format!("Invalid Argon2 params: {e}")))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| StoreError::Hash(e.to_string()))?;

    Ok(hash.to_string())
}

/// Outcome of checking a password against a stored hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordCheck {
    Match,
    /// Matched an unsalted SHA-256 hex digest left by older writers.
    LegacyMatch,
    Mismatch,
}

/// Argon2 parameters come from the PHC string, so hashes made under older
/// settings still verify. A hash that is neither PHC nor a SHA-256 hex digest
/// never matches.
#[must_use]
pub fn verify_password(password: &str, password_hash: &str) -> PasswordCheck {
    if let Ok(parsed_hash) = PasswordHash::new(password_hash) {
        return if Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
        {
            PasswordCheck::Match
        } else {
            PasswordCheck::Mismatch
        };
    }

    let stored = password_hash.trim();
    if !is_sha256_hex(stored) {
        tracing::warn!("Stored password hash has an unrecognized format");
        return PasswordCheck::Mismatch;
    }

    let digest = hex::encode(Sha256::digest(password.as_bytes()));
    if digest.eq_ignore_ascii_case(stored) {
        PasswordCheck::LegacyMatch
    } else {
        PasswordCheck::Mismatch
    }
}

fn is_sha256_hex(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| b.is_ascii_hexdigit())
}
