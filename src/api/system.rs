use axum::{Json, extract::State, response::IntoResponse};
use serde_json::{Value, json};
use std::sync::Arc;

use super::auth::AuthUser;
use super::{ApiError, AppState, UsersResponse};

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "message": "pocketkit API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": state.start_time.elapsed().as_secs(),
        "features": ["authentication", "calculator", "text_tools", "premium_features"],
    }))
}

/// GET /auth/status
pub async fn auth_status(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "online",
        "database": state.store.backend_name(),
        "message": "Simple local authentication system working",
    }))
}

/// GET /users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<UsersResponse>, ApiError> {
    let users = state.auth_service.list_usernames().await?;
    Ok(Json(UsersResponse {
        total_users: users.len(),
        users,
    }))
}

/// GET /api/status
pub async fn api_status(AuthUser(user): AuthUser) -> Json<Value> {
    Json(json!({
        "status": "operational",
        "user": user.username,
        "premium": user.premium,
        "features_available": [
            "text_tools",
            "calculator",
            if user.premium { "premium_features" } else { "basic_features" }
        ],
    }))
}

/// GET /metrics
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.prometheus_handle.as_ref().map_or_else(
        || "Metrics not enabled or failed to initialize".to_string(),
        metrics_exporter_prometheus::PrometheusHandle::render,
    )
}
