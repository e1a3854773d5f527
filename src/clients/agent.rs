use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::config::AgentConfig;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// HTTP client for the external AI chat agent. Calls are single-shot:
/// a fixed timeout, no retry.
#[derive(Clone)]
pub struct AgentClient {
    client: Client,
    base_url: String,
    status_timeout: Duration,
}

impl AgentClient {
    pub fn new(config: &AgentConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to build agent HTTP client")?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            status_timeout: Duration::from_secs(config.status_timeout_seconds),
        })
    }

    /// Forwards `message` to `<base>/chat` and returns the agent's JSON reply.
    pub async fn chat(&self, message: &str) -> Result<serde_json::Value> {
        let url = format!("{}/chat", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&ChatRequest { message })
            .send()
            .await
            .with_context(|| format!("Agent request to {url} failed"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Agent error: {} - {}", status, body));
        }

        response
            .json()
            .await
            .context("Agent returned an invalid JSON body")
    }

    /// True when the agent answers its root URL at all.
    pub async fn is_online(&self) -> bool {
        self.client
            .get(format!("{}/", self.base_url))
            .timeout(self.status_timeout)
            .send()
            .await
            .is_ok()
    }
}
