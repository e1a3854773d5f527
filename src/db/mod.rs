use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task;
use tracing::{info, warn};

use crate::config::{Config, SecurityConfig, StorageBackend};

pub mod repositories;

pub use repositories::{
    FileUserRepository, MemoryUserRepository, PasswordCheck, StoreError, UserRecord,
    UserRepository,
};

/// Input for [`Store::register`]. Fields are trimmed by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

/// The credential store: user records over a swappable [`UserRepository`].
///
/// Usernames are trimmed on the way in, and lookups also match stored keys
/// that carry stray whitespace. Check-then-write sequences hold
/// `mutation_lock`, so two registrations of the same name cannot both land.
#[derive(Clone)]
pub struct Store {
    repo: Arc<dyn UserRepository>,
    security: SecurityConfig,
    mutation_lock: Arc<Mutex<()>>,
}

impl Store {
    #[must_use]
    pub fn new(repo: Arc<dyn UserRepository>, security: SecurityConfig) -> Self {
        Self {
            repo,
            security,
            mutation_lock: Arc::new(Mutex::new(())),
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let repo: Arc<dyn UserRepository> = match config.storage.backend {
            StorageBackend::Memory => Arc::new(MemoryUserRepository::new()),
            StorageBackend::File => {
                Arc::new(FileUserRepository::new(&config.storage.users_file))
            }
        };

        info!(
            backend = repo.backend_name(),
            "Credential store initialized"
        );

        Self::new(repo, config.security.clone())
    }

    #[must_use]
    pub fn in_memory(security: SecurityConfig) -> Self {
        Self::new(Arc::new(MemoryUserRepository::new()), security)
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.repo.backend_name()
    }

    pub async fn register(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        let username = user.username.trim().to_string();

        if self.find(&username).await?.is_some() {
            return Err(StoreError::Duplicate(username));
        }

        let password_hash = self.hash(user.password).await?;

        let _guard = self.mutation_lock.lock().await;

        // Another registration may have landed while hashing.
        if self.find_unlocked(&username).await?.is_some() {
            return Err(StoreError::Duplicate(username));
        }

        let record = UserRecord {
            username,
            email: user.email.trim().to_string(),
            full_name: user
                .full_name
                .map(|n| n.trim().to_string())
                .unwrap_or_default(),
            password_hash,
            premium: false,
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        self.repo.put(record.clone()).await?;
        Ok(record)
    }

    pub async fn find(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        self.find_unlocked(username).await
    }

    async fn find_unlocked(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        let username = username.trim();

        if let Some(user) = self.repo.get(username).await? {
            return Ok(Some(user));
        }

        // Stored keys may carry whitespace from older writers.
        let found = self
            .repo
            .list()
            .await?
            .into_iter()
            .find(|u| u.username.trim() == username);

        Ok(found)
    }

    pub async fn set_premium(&self, username: &str, premium: bool) -> Result<UserRecord, StoreError> {
        let _guard = self.mutation_lock.lock().await;

        let mut user = self
            .find_unlocked(username)
            .await?
            .ok_or_else(|| StoreError::NotFound(username.trim().to_string()))?;

        if user.premium != premium {
            user.premium = premium;
            self.repo.put(user.clone()).await?;
        }

        Ok(user)
    }

    /// Returns the record when the password matches; `None` for an unknown
    /// user or a wrong password. A match against a legacy SHA-256 digest is
    /// rehashed to argon2id when `auto_migrate_password_hashes` is set.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<UserRecord>, StoreError> {
        let Some(user) = self.find(username).await? else {
            return Ok(None);
        };

        let candidate = password.to_string();
        let password_hash = user.password_hash.clone();
        let check = task::spawn_blocking(move || {
            repositories::user::verify_password(&candidate, &password_hash)
        })
        .await
        .map_err(|e| StoreError::Hash(format!("Password verification task panicked: {e}")))?;

        match check {
            PasswordCheck::Mismatch => Ok(None),
            PasswordCheck::Match => Ok(Some(user)),
            PasswordCheck::LegacyMatch if self.security.auto_migrate_password_hashes => {
                match self.rehash_password(&user.username, password).await {
                    Ok(migrated) => Ok(Some(migrated)),
                    Err(e) => {
                        warn!(username = %user.username.trim(), error = %e, "Failed to migrate legacy password hash");
                        Ok(Some(user))
                    }
                }
            }
            PasswordCheck::LegacyMatch => Ok(Some(user)),
        }
    }

    async fn rehash_password(&self, username: &str, password: &str) -> Result<UserRecord, StoreError> {
        let password_hash = self.hash(password.to_string()).await?;

        let _guard = self.mutation_lock.lock().await;
        let mut user = self
            .find_unlocked(username)
            .await?
            .ok_or_else(|| StoreError::NotFound(username.trim().to_string()))?;

        user.password_hash = password_hash;
        self.repo.put(user.clone()).await?;

        info!(username = %user.username.trim(), "Migrated legacy password hash to argon2id");
        Ok(user)
    }

    async fn hash(&self, password: String) -> Result<String, StoreError> {
        let security = self.security.clone();
        task::spawn_blocking(move || repositories::user::hash_password(&password, &security))
            .await
            .map_err(|e| StoreError::Hash(format!("Password hashing task panicked: {e}")))?
    }

    pub async fn usernames(&self) -> Result<Vec<String>, StoreError> {
        let mut names: Vec<String> = self
            .repo
            .list()
            .await?
            .into_iter()
            .map(|u| u.username)
            .collect();
        names.sort();
        Ok(names)
    }

    /// Removes every user. Returns how many were dropped.
    pub async fn reset(&self) -> Result<usize, StoreError> {
        let _guard = self.mutation_lock.lock().await;
        let count = self.repo.list().await?.len();
        self.repo.clear().await?;
        Ok(count)
    }
}
