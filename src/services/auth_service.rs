//! Domain service for registration, login and token resolution.

use serde::Serialize;
use thiserror::Error;

use crate::db::StoreError;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Username already registered")]
    DuplicateUser(String),

    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("Authentication required")]
    MissingToken,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("User not found")]
    UserNotFound(String),

    #[error("{message}")]
    PremiumRequired { message: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(name) => Self::DuplicateUser(name),
            StoreError::NotFound(name) => Self::UserNotFound(name),
            other => Self::Storage(other.to_string()),
        }
    }
}

/// The identity resolved from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    pub username: String,
    pub premium: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenResult {
    pub access_token: String,
    pub token_type: String,
    pub username: String,
    pub premium: bool,
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates a user and issues its token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::DuplicateUser`] if the trimmed username exists.
    async fn register(&self, registration: Registration) -> Result<TokenResult, AuthError>;

    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown user or a wrong password.
    async fn login(&self, username: &str, password: &str) -> Result<TokenResult, AuthError>;

    /// Resolves a raw token (already extracted from the request) to a user.
    async fn resolve_token(&self, token: Option<&str>) -> Result<CurrentUser, AuthError>;

    /// Sets the premium flag. Upgrading an already-premium user is a no-op.
    async fn upgrade_premium(&self, username: &str) -> Result<CurrentUser, AuthError>;

    async fn list_usernames(&self) -> Result<Vec<String>, AuthError>;
}

/// Premium flag gate.
///
/// # Errors
///
/// Returns [`AuthError::PremiumRequired`] carrying `message` when `user` is not premium.
pub fn require_premium(user: &CurrentUser, message: &str) -> Result<(), AuthError> {
    if user.premium {
        Ok(())
    } else {
        Err(AuthError::PremiumRequired {
            message: message.to_string(),
        })
    }
}
