//! HTTP implementation of the session API.
//!
//! Talks to the agent-session endpoints under
//! `/institutions/{institution_id}/agent-sessions` and maps the snake_case
//! wire shape into the domain record.

use async_trait::async_trait;
use reqwest::Client;

use intake_core::error::{IntakeError, Result};
use intake_core::session::{AgentSession, CreateSessionRequest, SessionApi};

use crate::dto::session::{CreateSessionBody, SessionDto};

/// Reqwest-backed client for the authoritative session store.
#[derive(Debug, Clone)]
pub struct HttpSessionApi {
    client: Client,
    base_url: String,
}

impl HttpSessionApi {
    /// Creates a client against the given base URL (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn sessions_url(&self, institution_id: &str) -> String {
        format!(
            "{}/institutions/{}/agent-sessions",
            self.base_url, institution_id
        )
    }

    /// Reads the response body, rejecting non-2xx statuses with the body
    /// excerpt the server sent. A 404 means the institution is unknown.
    async fn read_body(institution_id: &str, response: reqwest::Response) -> Result<String> {
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(IntakeError::not_found("institution", institution_id));
        }
        let body = response.text().await?;
        if !status.is_success() {
            let excerpt: String = body.chars().take(200).collect();
            return Err(IntakeError::transport(format!(
                "server returned {}: {}",
                status, excerpt
            )));
        }
        Ok(body)
    }
}

#[async_trait]
impl SessionApi for HttpSessionApi {
    async fn list_sessions(&self, institution_id: &str) -> Result<Vec<AgentSession>> {
        let url = self.sessions_url(institution_id);
        tracing::debug!(target: "session_api", "GET {}", url);

        let response = self.client.get(&url).send().await?;
        let body = Self::read_body(institution_id, response).await?;
        let dtos: Vec<SessionDto> = serde_json::from_str(&body)?;
        Ok(dtos.into_iter().map(AgentSession::from).collect())
    }

    async fn create_session(
        &self,
        institution_id: &str,
        request: CreateSessionRequest,
    ) -> Result<AgentSession> {
        let url = self.sessions_url(institution_id);
        tracing::debug!(target: "session_api", "POST {} ({})", url, request.agent_kind);

        let response = self
            .client
            .post(&url)
            .json(&CreateSessionBody::from(&request))
            .send()
            .await?;
        let body = Self::read_body(institution_id, response).await?;
        let dto: SessionDto = serde_json::from_str(&body)?;
        Ok(dto.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sessions_url_shape() {
        let api = HttpSessionApi::new("https://api.example.test/");
        assert_eq!(
            api.sessions_url("inst-1"),
            "https://api.example.test/institutions/inst-1/agent-sessions"
        );
    }
}
