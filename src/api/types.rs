use serde::{Deserialize, Serialize};

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upgrade_url: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            message: None,
            upgrade_url: None,
        }
    }

    #[must_use]
    pub fn with_upgrade_hint(mut self, message: String, upgrade_url: &str) -> Self {
        self.message = Some(message);
        self.upgrade_url = Some(upgrade_url.to_string());
        self
    }
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub username: String,
    pub premium: bool,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub premium: bool,
}

#[derive(Debug, Serialize)]
pub struct UpgradeResponse {
    pub message: String,
    pub username: String,
    pub premium: bool,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub total_users: usize,
    pub users: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenCheckResponse {
    pub token_received: Option<String>,
    pub token_type: &'static str,
    pub is_valid: bool,
    pub message: &'static str,
}

// ============================================================================
// Tools
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct TextResponse {
    pub result: String,
    pub original: String,
    pub operation: &'static str,
}

#[derive(Debug, Serialize)]
pub struct OperationInfo {
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub expression: String,
}

#[derive(Debug, Serialize)]
pub struct AggregateResponse {
    pub operation: &'static str,
    pub values: Vec<f64>,
    pub result: f64,
    pub steps: Vec<String>,
}

// ============================================================================
// AI agent
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AgentStatusResponse {
    pub status: &'static str,
    pub service: &'static str,
}
