use axum::{
    Json,
    extract::{FromRequestParts, Query, State},
    http::{HeaderMap, request::Parts},
};
use serde::Deserialize;
use std::sync::Arc;

use super::extract::{ValidJson, ValidPath, ValidQuery};
use super::{
    ApiError, AppState, LoginRequest, RegisterRequest, TokenCheckResponse, TokenResponse,
    UpgradeResponse, UserResponse,
};
use crate::constants::auth::TOKEN_PREFIX;
use crate::services::{AuthError, CurrentUser, Registration, TokenResult};

// ============================================================================
// Token extraction
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct TokenQuery {
    pub token: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Header,
    Query,
    None,
}

impl TokenSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Query => "query",
            Self::None => "none",
        }
    }
}

/// Extract the bearer token. `Authorization: Bearer` wins over `?token=`.
pub fn extract_token(headers: &HeaderMap, query: &TokenQuery) -> (Option<String>, TokenSource) {
    if let Some(auth_header) = headers.get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && !token.trim().is_empty()
    {
        return (Some(token.trim().to_string()), TokenSource::Header);
    }

    if let Some(token) = query.token.as_deref()
        && !token.trim().is_empty()
    {
        return (Some(token.trim().to_string()), TokenSource::Query);
    }

    (None, TokenSource::None)
}

// ============================================================================
// Extractors
// ============================================================================

/// The caller identity resolved from the request's bearer token.
pub struct AuthUser(pub CurrentUser);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let query = Query::<TokenQuery>::try_from_uri(&parts.uri)
            .map(|Query(q)| q)
            .unwrap_or_default();

        let (token, _) = extract_token(&parts.headers, &query);

        let user = state.auth_service.resolve_token(token.as_deref()).await?;
        tracing::Span::current().record("user_id", user.username.as_str());

        Ok(Self(user))
    }
}

// ============================================================================
// Handlers
// ============================================================================

impl From<TokenResult> for TokenResponse {
    fn from(result: TokenResult) -> Self {
        Self {
            access_token: result.access_token,
            token_type: result.token_type,
            username: result.username,
            premium: result.premium,
        }
    }
}

/// POST /register
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<RegisterRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let result = state
        .auth_service
        .register(Registration {
            username: payload.username,
            email: payload.email,
            password: payload.password,
            full_name: payload.full_name,
        })
        .await?;

    Ok(Json(result.into()))
}

/// POST /login
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    if payload.username.trim().is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let result = state
        .auth_service
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(result.into()))
}

/// GET /users/me
pub async fn get_current_user(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(UserResponse {
        username: user.username,
        premium: user.premium,
    })
}

/// POST /upgrade-premium/{username}
pub async fn upgrade_premium(
    State(state): State<Arc<AppState>>,
    ValidPath(username): ValidPath<String>,
) -> Result<Json<UpgradeResponse>, ApiError> {
    let user = state
        .auth_service
        .upgrade_premium(&username)
        .await
        .map_err(|e| match e {
            AuthError::UserNotFound(name) => ApiError::not_found("User", name),
            other => other.into(),
        })?;

    Ok(Json(UpgradeResponse {
        message: format!("User {} upgraded to premium", user.username),
        username: user.username,
        premium: user.premium,
    }))
}

/// GET /debug/token-check
/// Reports where the token came from and whether its prefix is right.
pub async fn token_check(
    ValidQuery(query): ValidQuery<TokenQuery>,
    headers: HeaderMap,
) -> Json<TokenCheckResponse> {
    let (token, source) = extract_token(&headers, &query);
    let is_valid = token.as_deref().is_some_and(|t| t.starts_with(TOKEN_PREFIX));

    Json(TokenCheckResponse {
        token_received: token,
        token_type: source.as_str(),
        is_valid,
        message: "Token check completed",
    })
}
