//! Session domain model.
//!
//! This module contains the core AgentSession entity that represents one
//! long-running agent task in the application's domain layer.

use serde::{Deserialize, Serialize};

/// The closed set of task types a session can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    /// Reviews uploaded applicant documents.
    DocumentReview,
    /// Ranks applicants against an admission-intake threshold.
    Ranking,
    /// Free-form assistant conversation.
    Assistant,
    /// Institution-wide analytics.
    Analytics,
    /// Sends applicant notifications.
    Notifier,
}

impl AgentKind {
    /// Stable string form, matching the external `agent_type` wire values.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DocumentReview => "document_review",
            Self::Ranking => "ranking",
            Self::Assistant => "assistant",
            Self::Analytics => "analytics",
            Self::Notifier => "notifier",
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted, session-level lifecycle status.
///
/// This is distinct from the conversational status used by the chat-oriented
/// variant (see `ConversationStatus` in this module's `conversation`
/// submodule); the two vocabularies are never merged or compared against
/// each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Accepted but not yet picked up by the task runner.
    Queued,
    /// The task runner is processing items.
    Running,
    /// All items processed.
    Completed,
    /// The task runner gave up.
    Failed,
}

impl SessionStatus {
    /// Stable string form, matching the external `status` wire values.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Whether the session has reached a final state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents one long-running agent task in the domain layer.
///
/// A session always belongs to exactly one institution. Ranking and
/// document-review sessions are usually course-scoped; assistant and
/// analytics sessions may be institution-wide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSession {
    /// Unique session identifier, immutable once assigned.
    pub id: String,
    /// The kind of agent task this session represents.
    pub agent_kind: AgentKind,
    /// Tenant scoping key.
    pub institution_id: String,
    /// Optional course scoping key.
    pub course_id: Option<String>,
    /// Current lifecycle status.
    pub status: SessionStatus,
    /// Number of items processed so far. `0/0` means extent unknown.
    pub processed_items: u32,
    /// Total number of items, once known.
    pub total_items: u32,
    /// Timestamp when the session was created (ISO 8601 format), immutable.
    pub created_at: String,
}

impl AgentSession {
    /// Creates a new queued session with a generated id and current timestamp.
    ///
    /// Used on the locally-authoritative path; server-created sessions arrive
    /// with their ids already assigned.
    pub fn new(
        agent_kind: AgentKind,
        institution_id: impl Into<String>,
        course_id: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            agent_kind,
            institution_id: institution_id.into(),
            course_id,
            status: SessionStatus::Queued,
            processed_items: 0,
            total_items: 0,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
