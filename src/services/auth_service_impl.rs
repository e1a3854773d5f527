//! [`Store`]-backed implementation of the `AuthService` trait.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::constants::auth::TOKEN_TYPE;
use crate::db::{NewUser, Store};
use crate::services::auth_service::{
    AuthError, AuthService, CurrentUser, Registration, TokenResult,
};
use crate::services::token;

pub struct StoreAuthService {
    store: Store,
}

impl StoreAuthService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AuthService for StoreAuthService {
    async fn register(&self, registration: Registration) -> Result<TokenResult, AuthError> {
        if registration.username.trim().is_empty() {
            return Err(AuthError::Validation("Username is required".to_string()));
        }
        if registration.password.is_empty() {
            return Err(AuthError::Validation("Password is required".to_string()));
        }

        let user = self
            .store
            .register(NewUser {
                username: registration.username,
                email: registration.email,
                password: registration.password,
                full_name: registration.full_name,
            })
            .await?;

        info!(username = %user.username, "User registered");

        Ok(TokenResult {
            access_token: token::issue(&user.username),
            token_type: TOKEN_TYPE.to_string(),
            username: user.username,
            premium: false,
        })
    }

    async fn login(&self, username: &str, password: &str) -> Result<TokenResult, AuthError> {
        let username = username.trim();

        let user = self
            .store
            .verify_credentials(username, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        info!(username, "User logged in");

        Ok(TokenResult {
            access_token: token::issue(username),
            token_type: TOKEN_TYPE.to_string(),
            username: username.to_string(),
            premium: user.premium,
        })
    }

    async fn resolve_token(&self, token: Option<&str>) -> Result<CurrentUser, AuthError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        let username = token::parse(token).ok_or(AuthError::InvalidTokenFormat)?;

        let user = self
            .store
            .find(username)
            .await?
            .ok_or_else(|| AuthError::UserNotFound(username.to_string()))?;

        debug!(username, "Token resolved");

        Ok(CurrentUser {
            username: username.to_string(),
            premium: user.premium,
        })
    }

    async fn upgrade_premium(&self, username: &str) -> Result<CurrentUser, AuthError> {
        let user = self.store.set_premium(username, true).await?;
        let username = user.username.trim().to_string();

        info!(username = %username, "User upgraded to premium");

        Ok(CurrentUser {
            username,
            premium: user.premium,
        })
    }

    async fn list_usernames(&self) -> Result<Vec<String>, AuthError> {
        Ok(self.store.usernames().await?)
    }
}
