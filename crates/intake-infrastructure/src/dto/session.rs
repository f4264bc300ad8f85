//! Session DTOs.
//!
//! The wire shape of the agent-session endpoints, with the external
//! snake_case field names. Mapping between the wire shape and the domain
//! record happens here and nowhere else. Unknown enum strings fall back
//! rather than fail: the server may grow vocabulary before this client does.

use serde::{Deserialize, Serialize};

use intake_core::session::{AgentKind, AgentSession, CreateSessionRequest, SessionStatus};

/// A session as returned by the agent-session endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDto {
    pub id: String,
    pub agent_type: String,
    pub institution_id: String,
    #[serde(default)]
    pub course_id: Option<String>,
    pub status: String,
    #[serde(default)]
    pub processed_items: u32,
    #[serde(default)]
    pub total_items: u32,
    pub created_at: String,
}

/// Request body for the session creation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSessionBody {
    pub agent_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    pub instructions: String,
}

impl From<&CreateSessionRequest> for CreateSessionBody {
    fn from(request: &CreateSessionRequest) -> Self {
        Self {
            agent_type: request.agent_kind.as_str().to_string(),
            course_id: request.course_id.clone(),
            instructions: request.instructions.clone(),
        }
    }
}

fn parse_agent_kind(value: &str) -> AgentKind {
    match value {
        "document_review" => AgentKind::DocumentReview,
        "ranking" => AgentKind::Ranking,
        "assistant" => AgentKind::Assistant,
        "analytics" => AgentKind::Analytics,
        "notifier" => AgentKind::Notifier,
        other => {
            tracing::warn!("unknown agent_type '{}', falling back to assistant", other);
            AgentKind::Assistant
        }
    }
}

fn parse_status(value: &str) -> SessionStatus {
    match value {
        "queued" => SessionStatus::Queued,
        "running" => SessionStatus::Running,
        "completed" => SessionStatus::Completed,
        "failed" => SessionStatus::Failed,
        other => {
            tracing::warn!("unknown session status '{}', falling back to queued", other);
            SessionStatus::Queued
        }
    }
}

impl From<SessionDto> for AgentSession {
    fn from(dto: SessionDto) -> Self {
        Self {
            id: dto.id,
            agent_kind: parse_agent_kind(&dto.agent_type),
            institution_id: dto.institution_id,
            course_id: dto.course_id,
            status: parse_status(&dto.status),
            processed_items: dto.processed_items,
            total_items: dto.total_items,
            created_at: dto.created_at,
        }
    }
}

impl From<&AgentSession> for SessionDto {
    fn from(session: &AgentSession) -> Self {
        Self {
            id: session.id.clone(),
            agent_type: session.agent_kind.as_str().to_string(),
            institution_id: session.institution_id.clone(),
            course_id: session.course_id.clone(),
            status: session.status.as_str().to_string(),
            processed_items: session.processed_items,
            total_items: session.total_items,
            created_at: session.created_at.clone(),
        }
    }
}
