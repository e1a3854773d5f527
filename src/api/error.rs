use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ErrorResponse;
use crate::constants::premium::UPGRADE_URL;
use crate::services::AuthError;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    ValidationError(String),

    Unauthorized(String),

    PremiumRequired(String),

    ExternalApiError { service: String, message: String },

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::PremiumRequired(msg) => write!(f, "Premium required: {}", msg),
            ApiError::ExternalApiError { service, message } => {
                write!(f, "{} error: {}", service, message)
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse::new(msg)),
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::new(msg)),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, ErrorResponse::new(msg)),
            ApiError::PremiumRequired(msg) => (
                StatusCode::FORBIDDEN,
                ErrorResponse::new("Premium feature required").with_upgrade_hint(msg, UPGRADE_URL),
            ),
            ApiError::ExternalApiError { service, message } => {
                tracing::warn!("{} API error: {}", service, message);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse::new(format!("{} service is unavailable", service)),
                )
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("An internal error occurred"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

/// Maps auth failures onto the request-authentication path, where an unknown
/// user is a 401. Handlers addressing a user directly map `UserNotFound`
/// to [`ApiError::NotFound`] themselves.
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::DuplicateUser(_) => ApiError::validation(err.to_string()),
            AuthError::InvalidCredentials
            | AuthError::MissingToken
            | AuthError::InvalidTokenFormat
            | AuthError::UserNotFound(_) => ApiError::Unauthorized(err.to_string()),
            AuthError::PremiumRequired { message } => ApiError::PremiumRequired(message),
            AuthError::Validation(msg) => ApiError::ValidationError(msg),
            AuthError::Storage(msg) => ApiError::InternalError(msg),
        }
    }
}

impl ApiError {
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        ApiError::NotFound(format!("{} {} not found", resource, id))
    }

    pub fn agent_error(msg: impl Into<String>) -> Self {
        ApiError::ExternalApiError {
            service: "AI agent".to_string(),
            message: msg.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }
}
