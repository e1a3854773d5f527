use axum::{Json, extract::State};
use serde_json::Value;
use std::sync::Arc;

use super::auth::AuthUser;
use super::extract::ValidJson;
use super::{AgentStatusResponse, ApiError, AppState, ChatRequest};

const AGENT_SERVICE: &str = "AI chat agent";

/// POST /ai/chat
/// Forward a message to the AI agent and relay its reply.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ValidJson(payload): ValidJson<ChatRequest>,
) -> Result<Json<Value>, ApiError> {
    if payload.message.trim().is_empty() {
        return Err(ApiError::validation("Message cannot be empty"));
    }

    let agent = state
        .agent
        .as_ref()
        .ok_or_else(|| ApiError::agent_error("AI agent is disabled"))?;

    tracing::debug!(username = %user.username, "Forwarding chat message to agent");

    let reply = agent
        .chat(&payload.message)
        .await
        .map_err(|e| ApiError::agent_error(format!("{e:#}")))?;

    Ok(Json(reply))
}

/// GET /ai/status
pub async fn status(State(state): State<Arc<AppState>>) -> Json<AgentStatusResponse> {
    let online = match &state.agent {
        Some(agent) => agent.is_online().await,
        None => false,
    };

    Json(AgentStatusResponse {
        status: if online { "online" } else { "offline" },
        service: AGENT_SERVICE,
    })
}
